// crates/parcel-core/src/error.rs

use thiserror::Error;

/// Failures that are not business faults.
///
/// A `Fault` is an expected, declared outcome of an operation. Everything in
/// this enum means the call itself could not be carried out as declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParcelError {
    /// A payload failed to encode or decode exactly (lost precision,
    /// repeated map key, oversized payload, wrong shape).
    #[error("Marshalling error: {0}")]
    Marshalling(String),

    /// An operation was invoked with a request type its contract does not accept.
    #[error("Contract mismatch: {0}")]
    ContractMismatch(String),

    /// The operation is unknown to the provider, or declared but not bound
    /// to a handler.
    #[error("Operation not fulfilled: {0}")]
    NotFulfilled(String),

    /// Envelope, connection, or request/response correlation failure.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<serde_json::Error> for ParcelError {
    fn from(e: serde_json::Error) -> Self {
        ParcelError::Marshalling(e.to_string())
    }
}
