// crates/parcel-rpc/src/server.rs
//
// RPC server setup: ParcelRpcServer, RpcConfig, and the byte-level endpoint.
//
// A single tonic service accepts one JSON `RpcRequest` per POST to
// `/parcel.rpc.ParcelService/Call`, hands it to the provider registry, and
// answers with one JSON `RpcResponse`. There is no proto codegen; tonic only
// supplies the HTTP server, routing, and interceptor plumbing.

use std::sync::Arc;

use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tonic::transport::Server;
use tonic::Status;

use parcel_core::wire::{self, DEFAULT_MAX_PAYLOAD_BYTES};
use parcel_core::{ParcelError, ResponseBody, ResponseStatus, RpcRequest, RpcResponse};

use crate::middleware;
use crate::registry::ProviderRegistry;

/// gRPC-style service name; requests are routed by this path prefix.
pub const SERVICE_NAME: &str = "parcel.rpc.ParcelService";

/// Path a consumer POSTs its envelope to.
pub const CALL_PATH: &str = "/parcel.rpc.ParcelService/Call";

// ---------------------------------------------------------------------------
// RpcConfig
// ---------------------------------------------------------------------------

/// Configuration for the RPC server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Host to bind to (e.g., "127.0.0.1" or "0.0.0.0").
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Largest request or response envelope accepted, in bytes.
    pub max_payload_bytes: usize,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50051,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderEndpoint
// ---------------------------------------------------------------------------

/// Bytes in, bytes out. Shared by the HTTP service and the in-process
/// transport so both run exactly the same decode/dispatch/encode path.
#[derive(Debug, Clone)]
pub struct ProviderEndpoint {
    registry: Arc<ProviderRegistry>,
    max_payload_bytes: usize,
}

impl ProviderEndpoint {
    pub fn new(registry: Arc<ProviderRegistry>, max_payload_bytes: usize) -> Self {
        Self {
            registry,
            max_payload_bytes,
        }
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }

    /// Handle one encoded request envelope and return the encoded response.
    ///
    /// The payload limit applies to value and fault replies; an oversized
    /// one is replaced by a `bad_response` error body. Error replies are
    /// always sent as they are.
    pub fn handle_bytes(&self, body: &[u8]) -> Vec<u8> {
        let response = self.handle(body);
        if matches!(response.body, ResponseBody::Error { .. }) {
            return encode_error_reply(&response);
        }

        match wire::encode(&response, self.max_payload_bytes) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(request_id = ?response.request_id, "Replacing response: {}", err);
                let replacement = RpcResponse::failure(response.request_id, ResponseStatus::BadResponse, &err);
                encode_error_reply(&replacement)
            }
        }
    }

    fn handle(&self, body: &[u8]) -> RpcResponse {
        if let Err(err) = wire::check_payload(body.len(), self.max_payload_bytes) {
            return RpcResponse::failure(None, ResponseStatus::BadRequest, &err);
        }

        let request: RpcRequest = match wire::decode(body) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Invalid RPC envelope: {}", e);
                let err = ParcelError::Transport(format!("invalid RPC envelope: {}", e));
                return RpcResponse::failure(None, ResponseStatus::ServerError, &err);
            }
        };

        tracing::info!(
            method = %request.method,
            request_id = %request.request_id,
            "Dispatching RPC request"
        );
        self.registry.dispatch(request)
    }
}

// ---------------------------------------------------------------------------
// ParcelRpcServer
// ---------------------------------------------------------------------------

/// The provider's RPC server.
#[derive(Debug, Clone)]
pub struct ParcelRpcServer {
    config: RpcConfig,
    registry: Arc<ProviderRegistry>,
}

impl ParcelRpcServer {
    /// Create a new ParcelRpcServer.
    ///
    /// # Arguments
    /// * `config` - Server configuration (host, port, payload limit).
    /// * `registry` - Provider registry with handlers already bound.
    pub fn new(config: RpcConfig, registry: Arc<ProviderRegistry>) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// Start the RPC server and listen for requests.
    ///
    /// This binds to the configured address and serves requests until
    /// the process is terminated.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        tracing::info!("Parcel RPC server starting on {}", addr);

        let endpoint = ProviderEndpoint::new(self.registry.clone(), self.config.max_payload_bytes);

        Server::builder()
            .accept_http1(true)
            .add_service(tonic::service::interceptor::InterceptedService::new(
                ParcelJsonRpcServer::new(endpoint),
                middleware::logging_interceptor,
            ))
            .serve(addr)
            .await?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tonic Service Wiring
// ---------------------------------------------------------------------------

/// The tonic service wrapper. Implements the low-level service by collecting
/// the body and handing it to the endpoint.
#[derive(Clone)]
pub struct ParcelJsonRpcServer {
    endpoint: ProviderEndpoint,
}

impl std::fmt::Debug for ParcelJsonRpcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParcelJsonRpcServer").finish()
    }
}

impl ParcelJsonRpcServer {
    fn new(endpoint: ProviderEndpoint) -> Self {
        Self { endpoint }
    }
}

impl tonic::server::NamedService for ParcelJsonRpcServer {
    const NAME: &'static str = SERVICE_NAME;
}

impl<B> tower_service::Service<http::Request<B>> for ParcelJsonRpcServer
where
    B: HttpBody + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send,
    B::Data: Send,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = std::convert::Infallible;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let endpoint = self.endpoint.clone();

        Box::pin(async move {
            let body_bytes = match collect_body(req.into_body(), endpoint.max_payload_bytes()).await {
                Ok(b) => b,
                Err(e) => {
                    tracing::error!("Failed to read request body: {}", e);
                    let resp = RpcResponse::failure(None, ResponseStatus::ServerError, &ParcelError::Transport(e));
                    return Ok(build_response(encode_error_reply(&resp)));
                }
            };

            let json = endpoint.handle_bytes(&body_bytes);
            Ok(build_response(json))
        })
    }
}

/// Collect the body of an HTTP request into bytes, stopping once it grows
/// past one byte over `limit` so the endpoint can report the overflow.
async fn collect_body<B>(body: B, limit: usize) -> Result<Vec<u8>, String>
where
    B: HttpBody + Send,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    B::Data: Send,
{
    let mut collected = Vec::new();
    let mut body = std::pin::pin!(body);

    loop {
        match std::future::poll_fn(|cx| HttpBody::poll_frame(body.as_mut(), cx)).await {
            Some(Ok(frame)) => {
                if let Ok(data) = frame.into_data() {
                    use bytes::Buf;
                    collected.extend_from_slice(data.chunk());
                    if collected.len() > limit {
                        collected.truncate(limit.saturating_add(1));
                        break;
                    }
                }
            }
            Some(Err(e)) => return Err(e.into().to_string()),
            None => break,
        }
    }

    Ok(collected)
}

/// Encode an error reply. Error bodies hold only strings and tags; should
/// encoding still fail, a fixed `server_error` envelope is sent instead.
fn encode_error_reply(response: &RpcResponse) -> Vec<u8> {
    match serde_json::to_vec(response) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(request_id = ?response.request_id, "Failed to encode error reply: {}", e);
            UNENCODABLE_REPLY.to_vec()
        }
    }
}

const UNENCODABLE_REPLY: &[u8] =
    br#"{"request_id":null,"status":"server_error","body":{"kind":"error","failure":"transport","message":"provider could not encode its reply"}}"#;

/// Build an HTTP response with the given JSON body.
fn build_response(json: Vec<u8>) -> http::Response<tonic::body::BoxBody> {
    let body = tonic::body::BoxBody::new(
        http_body_util::Full::new(bytes::Bytes::from(json))
            .map_err(|e| Status::internal(format!("body error: {}", e))),
    );

    let mut response = http::Response::new(body);
    response.headers_mut().insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/json"),
    );
    response
}
