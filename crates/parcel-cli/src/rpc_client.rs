// crates/parcel-cli/src/rpc_client.rs
//
// HTTP transport that POSTs request envelopes to a running parcel-provider.

use async_trait::async_trait;

use parcel_core::wire::{self, DEFAULT_MAX_PAYLOAD_BYTES};
use parcel_core::{ParcelError, RpcRequest, RpcResponse, Transport};
use parcel_rpc::CALL_PATH;

/// Sends one envelope per HTTP POST to `<endpoint>/parcel.rpc.ParcelService/Call`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    max_payload_bytes: usize,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> Self {
        Self {
            url: call_url(endpoint),
            client: reqwest::Client::new(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, request: RpcRequest) -> Result<RpcResponse, ParcelError> {
        let body = wire::encode(&request, self.max_payload_bytes)?;

        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ParcelError::Transport(format!("POST {} failed: {}", self.url, e)))?;

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ParcelError::Transport(format!("reading response from {} failed: {}", self.url, e)))?;
        wire::check_payload(bytes.len(), self.max_payload_bytes)?;

        wire::decode(&bytes)
    }
}

fn call_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), CALL_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_url() {
        assert_eq!(
            call_url("http://127.0.0.1:50051"),
            "http://127.0.0.1:50051/parcel.rpc.ParcelService/Call"
        );
        assert_eq!(
            call_url("http://localhost:6000/"),
            "http://localhost:6000/parcel.rpc.ParcelService/Call"
        );
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_transport_error() {
        // Port 9 (discard) is almost never served over HTTP.
        let transport = HttpTransport::new("http://127.0.0.1:9");
        let request = RpcRequest::for_operation::<parcel_core::services::Echo>(&()).unwrap();
        let err = transport.round_trip(request).await.unwrap_err();
        assert!(matches!(err, ParcelError::Transport(_)));
    }
}
