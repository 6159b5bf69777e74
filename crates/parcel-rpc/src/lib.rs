// crates/parcel-rpc/src/lib.rs
//
// parcel-rpc: provider registry, demo handlers, and the JSON-RPC server.
//
// Requests arrive as JSON envelopes over tonic's HTTP server (no protobuf
// codegen), are checked against the declared contract, and are dispatched to
// plain synchronous handlers. `LocalTransport` runs the same path in process.

pub mod handlers;
pub mod local;
pub mod middleware;
pub mod registry;
pub mod server;

// Re-export the main server types for ergonomic access.
pub use local::LocalTransport;
pub use registry::ProviderRegistry;
pub use server::{ParcelRpcServer, ProviderEndpoint, RpcConfig, CALL_PATH, SERVICE_NAME};
