// crates/parcel-rpc/src/local.rs
//
// In-process transport. Encodes the envelope to bytes and feeds it through a
// `ProviderEndpoint` exactly as the HTTP service would, without a socket.

use async_trait::async_trait;

use parcel_core::wire;
use parcel_core::{ParcelError, RpcRequest, RpcResponse, Transport};

use crate::server::ProviderEndpoint;

#[derive(Debug, Clone)]
pub struct LocalTransport {
    endpoint: ProviderEndpoint,
}

impl LocalTransport {
    pub fn new(endpoint: ProviderEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn round_trip(&self, request: RpcRequest) -> Result<RpcResponse, ParcelError> {
        let body = wire::encode(&request, self.endpoint.max_payload_bytes())?;
        let reply = self.endpoint.handle_bytes(&body);
        wire::decode(&reply)
    }
}
