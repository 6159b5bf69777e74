// crates/parcel-core/src/lib.rs
//
// parcel-core: payload types, fault type, and service contract for Parcel.
//
// This is the leaf crate that both the provider and the consumer depend on.
// It defines the records that cross the RPC boundary, the fault value that
// replaces a response on failure, the operation contract, and the JSON wire
// envelope plus the consumer-side `Transport` seam.

pub mod consumer;
pub mod contract;
pub mod decimal;
pub mod error;
pub mod fault;
pub mod marshal;
pub mod payload;
pub mod services;
pub mod wire;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use parcel_core::Fault;`

// Payload types
pub use decimal::ExactDecimal;
pub use payload::{CompositeResponse, GenericListWrapper, KeyedValueRequest, Sex, TypedScalarRequest};

// Fault and error types
pub use error::ParcelError;
pub use fault::Fault;

// Contract
pub use contract::{CallOutcome, Operation, OperationDescriptor, Payload};

// Wire envelope and consumer
pub use consumer::{Consumer, Transport};
pub use wire::{FailureKind, ResponseBody, ResponseStatus, RpcRequest, RpcResponse};
