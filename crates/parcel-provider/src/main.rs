// crates/parcel-provider/src/main.rs
//
// Binary entrypoint for the Parcel provider daemon.
//
// Parses CLI arguments, loads configuration, initializes tracing, binds the
// demo handlers into a registry, and serves the contract over RPC.

mod config;

use std::sync::Arc;

use clap::Parser;
use config::ProviderConfig;

use parcel_rpc::{handlers, ParcelRpcServer, ProviderRegistry};

/// Parcel provider: serves the DemoProvider, BasicTypeProvider, and
/// ErrorProvider operations.
#[derive(Parser, Debug)]
#[command(name = "parcel-provider", version = "0.1.0", about = "Parcel RPC demo provider")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "~/.parcel/provider.toml")]
    config: String,

    /// Host to bind, overriding the config file.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding the config file.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config_path = expand_tilde(&args.config);

    // Load before tracing is up so the configured level can seed the filter;
    // the outcome is logged right after.
    let loaded = ProviderConfig::load(&config_path);
    let mut provider_config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => ProviderConfig::default(),
    };

    // Initialize tracing subscriber for structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&provider_config.log_level)),
        )
        .init();

    match loaded {
        Ok(_) => tracing::info!("Loaded configuration from {}", config_path),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            config_path,
            e
        ),
    }

    // CLI flags override the config file values.
    if let Some(host) = args.host {
        provider_config.rpc_host = host;
    }
    if let Some(port) = args.port {
        provider_config.rpc_port = port;
    }

    tracing::info!("Parcel Provider v0.1.0");
    tracing::info!(
        "RPC endpoint: {}:{}",
        provider_config.rpc_host,
        provider_config.rpc_port
    );
    tracing::info!("Payload limit: {} bytes", provider_config.max_payload_bytes);

    let mut registry = ProviderRegistry::with_declared_contract();
    handlers::register_all(&mut registry);

    for descriptor in registry.unfulfilled() {
        tracing::warn!("Operation {} is declared but has no handler", descriptor.name());
    }
    for descriptor in registry.declared() {
        tracing::debug!(
            "Serving {} ({} -> {})",
            descriptor.name(),
            descriptor.request_type,
            descriptor.response_type.unwrap_or(parcel_core::contract::VOID_TYPE)
        );
    }

    let server = ParcelRpcServer::new(provider_config.rpc_config(), Arc::new(registry));
    server.start().await?;

    Ok(())
}

/// Expand a leading `~/` to the user's home directory.
fn expand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}/{}", home.display(), rest);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_leaves_plain_paths() {
        assert_eq!(expand_tilde("/etc/parcel.toml"), "/etc/parcel.toml");
        assert_eq!(expand_tilde("relative/~/x.toml"), "relative/~/x.toml");
    }

    #[test]
    fn test_expand_tilde_uses_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_tilde("~/.parcel/provider.toml"),
                format!("{}/.parcel/provider.toml", home.display())
            );
        }
    }

    #[test]
    fn test_args_override_flags() {
        let args = Args::parse_from(["parcel-provider", "--port", "6001", "--host", "0.0.0.0"]);
        assert_eq!(args.port, Some(6001));
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.config, "~/.parcel/provider.toml");
    }
}
