// crates/parcel-core/src/contract.rs
//
// The service contract: what an operation is called, what it accepts, what it
// returns, and which faults it may raise. Plus the per-call outcome type.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ParcelError;
use crate::fault::Fault;
use crate::payload::{CompositeResponse, GenericListWrapper, KeyedValueRequest, TypedScalarRequest};

/// Type tag carried by void requests and responses.
pub const VOID_TYPE: &str = "void";

/// A record that may cross the RPC boundary.
///
/// `TYPE_NAME` is the tag the consumer sends with a request so the provider
/// can reject a request of the wrong type before decoding it.
pub trait Payload: Serialize + DeserializeOwned + Send + 'static {
    const TYPE_NAME: &'static str;
}

impl Payload for () {
    const TYPE_NAME: &'static str = VOID_TYPE;
}

impl Payload for String {
    const TYPE_NAME: &'static str = "text";
}

impl Payload for KeyedValueRequest {
    const TYPE_NAME: &'static str = "KeyedValueRequest";
}

impl Payload for TypedScalarRequest {
    const TYPE_NAME: &'static str = "TypedScalarRequest";
}

impl Payload for CompositeResponse {
    const TYPE_NAME: &'static str = "CompositeResponse";
}

impl<T> Payload for GenericListWrapper<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    const TYPE_NAME: &'static str = "GenericListWrapper";
}

/// A named operation with exactly one request type and one response type.
///
/// Implemented by zero-sized marker types; see `crate::services`.
pub trait Operation: Send + Sync + 'static {
    const SERVICE: &'static str;
    const METHOD: &'static str;
    /// Names of the fault types this operation may raise.
    const DECLARED_FAULTS: &'static [&'static str] = &[];

    type Request: Payload;
    type Response: Payload;

    /// Stable operation name: `<Service>/<method>`.
    fn name() -> String {
        format!("{}/{}", Self::SERVICE, Self::METHOD)
    }

    fn descriptor() -> OperationDescriptor {
        let response = <Self::Response as Payload>::TYPE_NAME;
        OperationDescriptor {
            service: Self::SERVICE,
            method: Self::METHOD,
            request_type: <Self::Request as Payload>::TYPE_NAME,
            response_type: (response != VOID_TYPE).then_some(response),
            declared_faults: Self::DECLARED_FAULTS,
        }
    }
}

/// Runtime description of an operation, used by the provider registry for
/// contract checks and by the CLI for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationDescriptor {
    pub service: &'static str,
    pub method: &'static str,
    pub request_type: &'static str,
    /// `None` for operations that return nothing.
    pub response_type: Option<&'static str>,
    pub declared_faults: &'static [&'static str],
}

impl OperationDescriptor {
    pub fn name(&self) -> String {
        format!("{}/{}", self.service, self.method)
    }
}

// ---------------------------------------------------------------------------
// CallOutcome
// ---------------------------------------------------------------------------

/// How one call ended: `Invoked -> Success | Fault | Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome<T> {
    /// The operation completed and returned its response.
    Success(T),
    /// The operation completed by raising a business fault.
    Fault(Fault),
    /// The call could not be carried out (marshalling, contract, transport).
    Failed(ParcelError),
}

impl<T> CallOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success(_))
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, CallOutcome::Fault(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            CallOutcome::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            CallOutcome::Fault(fault) => Some(fault),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ParcelError> {
        match self {
            CallOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> CallOutcome<U> {
        match self {
            CallOutcome::Success(value) => CallOutcome::Success(f(value)),
            CallOutcome::Fault(fault) => CallOutcome::Fault(fault),
            CallOutcome::Failed(err) => CallOutcome::Failed(err),
        }
    }

    /// Outer `Err` for call failures, inner `Err` for business faults.
    pub fn into_result(self) -> Result<Result<T, Fault>, ParcelError> {
        match self {
            CallOutcome::Success(value) => Ok(Ok(value)),
            CallOutcome::Fault(fault) => Ok(Err(fault)),
            CallOutcome::Failed(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    impl Operation for Ping {
        const SERVICE: &'static str = "PingProvider";
        const METHOD: &'static str = "ping";
        type Request = KeyedValueRequest;
        type Response = ();
    }

    #[test]
    fn test_descriptor_of_void_operation() {
        let d = Ping::descriptor();
        assert_eq!(d.name(), "PingProvider/ping");
        assert_eq!(Ping::name(), d.name());
        assert_eq!(d.request_type, "KeyedValueRequest");
        assert_eq!(d.response_type, None);
        assert!(d.declared_faults.is_empty());
    }

    #[test]
    fn test_outcome_distinguishes_fault_from_failure() {
        let fault: CallOutcome<()> = CallOutcome::Fault(Fault::with_message("exception"));
        let failed: CallOutcome<()> = CallOutcome::Failed(ParcelError::NotFulfilled("x".into()));

        assert!(fault.is_fault() && !fault.is_success());
        assert!(!failed.is_fault() && failed.error().is_some());
        assert!(matches!(fault.into_result(), Ok(Err(_))));
        assert!(matches!(failed.into_result(), Err(ParcelError::NotFulfilled(_))));
    }

    #[test]
    fn test_outcome_map_only_touches_success() {
        let ok: CallOutcome<i32> = CallOutcome::Success(2);
        assert_eq!(ok.map(|v| v * 2), CallOutcome::Success(4));

        let fault: CallOutcome<i32> = CallOutcome::Fault(Fault::new());
        assert!(fault.map(|v| v * 2).is_fault());
    }
}
