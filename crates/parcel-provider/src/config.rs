// crates/parcel-provider/src/config.rs
//
// Runtime configuration for the provider daemon.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;

use parcel_core::wire::DEFAULT_MAX_PAYLOAD_BYTES;
use parcel_rpc::RpcConfig;

/// Runtime configuration for the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// Host address for the RPC server.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// Port for the RPC server.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Largest request or response envelope, in bytes.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    50051
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            log_level: default_log_level(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

impl ProviderConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: ProviderConfig = toml::from_str(contents)?;
        if config.max_payload_bytes == 0 {
            return Err("max_payload_bytes must be greater than zero".into());
        }
        Ok(config)
    }

    pub fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            host: self.rpc_host.clone(),
            port: self.rpc_port,
            max_payload_bytes: self.max_payload_bytes,
        }
    }
}
