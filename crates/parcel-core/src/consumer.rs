// crates/parcel-core/src/consumer.rs
//
// Consumer side of the contract: build a typed request envelope, hand it to
// a transport, and turn whatever comes back into a `CallOutcome`.

use async_trait::async_trait;

use crate::contract::{CallOutcome, Operation};
use crate::error::ParcelError;
use crate::wire::{RpcRequest, RpcResponse};

/// Carries one request envelope to a provider and brings back its response.
///
/// Implemented by the HTTP client in parcel-cli and by the in-process
/// transport in parcel-rpc.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, request: RpcRequest) -> Result<RpcResponse, ParcelError>;
}

/// Typed front door for invoking declared operations over a transport.
#[derive(Debug, Clone)]
pub struct Consumer<T> {
    transport: T,
}

impl<T: Transport> Consumer<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Invoke `Op` with `request`.
    ///
    /// Never panics and never retries: every failure comes back as
    /// `CallOutcome::Failed`, every business fault as `CallOutcome::Fault`.
    pub async fn invoke<Op: Operation>(&self, request: &Op::Request) -> CallOutcome<Op::Response> {
        let envelope = match RpcRequest::for_operation::<Op>(request) {
            Ok(envelope) => envelope,
            Err(e) => return CallOutcome::Failed(e),
        };
        let request_id = envelope.request_id;
        tracing::debug!(method = %envelope.method, %request_id, "Invoking operation");

        match self.transport.round_trip(envelope).await {
            Ok(response) => response.into_outcome(request_id),
            Err(e) => {
                tracing::debug!(%request_id, "Transport failed: {}", e);
                CallOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::Fault;
    use crate::services::{ErrorTest, SayHello};

    /// Answers every request locally without a provider.
    struct Scripted;

    #[async_trait]
    impl Transport for Scripted {
        async fn round_trip(&self, request: RpcRequest) -> Result<RpcResponse, ParcelError> {
            match request.method.as_str() {
                "DemoProvider/sayHello" => {
                    let name: String = serde_json::from_str(request.params.get())?;
                    RpcResponse::encode_value(request.request_id, &format!("hello {}", name))
                }
                "ErrorProvider/errorTest" => Ok(RpcResponse::fault(request.request_id, Fault::with_message("exception"))),
                _ => Err(ParcelError::Transport("connection refused".into())),
            }
        }
    }

    /// Replies to a request other than the one it received.
    struct Crossed;

    #[async_trait]
    impl Transport for Crossed {
        async fn round_trip(&self, _request: RpcRequest) -> Result<RpcResponse, ParcelError> {
            RpcResponse::encode_value(uuid::Uuid::now_v7(), &"hello someone else")
        }
    }

    #[tokio::test]
    async fn test_invoke_success() {
        let consumer = Consumer::new(Scripted);
        let outcome = consumer.invoke::<SayHello>(&"world".to_string()).await;
        assert_eq!(outcome, CallOutcome::Success("hello world".to_string()));
    }

    #[tokio::test]
    async fn test_invoke_fault() {
        let consumer = Consumer::new(Scripted);
        let outcome = consumer.invoke::<ErrorTest>(&()).await;
        let fault = outcome.fault().expect("fault outcome");
        assert_eq!(fault.message(), Some("exception"));
        assert!(fault.cause().is_none());
    }

    #[tokio::test]
    async fn test_crossed_response_is_rejected() {
        let consumer = Consumer::new(Crossed);
        let outcome = consumer.invoke::<SayHello>(&"world".to_string()).await;
        assert!(matches!(outcome, CallOutcome::Failed(ParcelError::Transport(_))));
    }
}
