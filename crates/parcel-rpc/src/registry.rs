// crates/parcel-rpc/src/registry.rs
//
// Provider-side dispatch table.
//
// The registry knows the declared contract and which declared operations have
// a handler bound. Dispatch checks the operation name, then the request type
// tag, then decodes the request and runs the handler. Every path ends in a
// response envelope; nothing is swallowed.

use std::collections::{BTreeMap, HashMap};

use serde_json::value::RawValue;

use parcel_core::services;
use parcel_core::{Fault, Operation, OperationDescriptor, ParcelError, Payload, ResponseStatus, RpcRequest, RpcResponse};

/// What a bound handler produced before it is wrapped in an envelope.
enum Handled {
    Value(Box<RawValue>),
    Fault(Fault),
}

type BoxedHandler = Box<dyn Fn(&RawValue) -> Result<Handled, (ResponseStatus, ParcelError)> + Send + Sync>;

/// Immutable after construction; share it with `Arc`.
pub struct ProviderRegistry {
    declared: BTreeMap<String, OperationDescriptor>,
    handlers: HashMap<String, BoxedHandler>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("declared", &self.declared.len())
            .field("fulfilled", &self.handlers.len())
            .finish()
    }
}

impl ProviderRegistry {
    /// An empty registry that declares `contract` but fulfils nothing yet.
    pub fn new(contract: Vec<OperationDescriptor>) -> Self {
        Self {
            declared: contract.into_iter().map(|d| (d.name(), d)).collect(),
            handlers: HashMap::new(),
        }
    }

    /// An empty registry declaring the demo contract.
    pub fn with_declared_contract() -> Self {
        Self::new(services::declared_operations())
    }

    /// Bind `handler` to `Op`. Declares `Op` too if it was not declared yet.
    pub fn register<Op, F>(&mut self, handler: F) -> &mut Self
    where
        Op: Operation,
        F: Fn(Op::Request) -> Result<Op::Response, Fault> + Send + Sync + 'static,
    {
        let name = Op::name();
        self.declared.entry(name.clone()).or_insert_with(Op::descriptor);

        let boxed: BoxedHandler = Box::new(move |params: &RawValue| {
            let request: Op::Request = serde_json::from_str(params.get()).map_err(|e| {
                (
                    ResponseStatus::BadRequest,
                    ParcelError::Marshalling(format!(
                        "cannot decode {} for {}: {}",
                        <Op::Request as Payload>::TYPE_NAME,
                        Op::name(),
                        e
                    )),
                )
            })?;
            match handler(request) {
                Ok(response) => serde_json::value::to_raw_value(&response).map(Handled::Value).map_err(|e| {
                    (
                        ResponseStatus::BadResponse,
                        ParcelError::Marshalling(format!("cannot encode response of {}: {}", Op::name(), e)),
                    )
                }),
                Err(fault) => Ok(Handled::Fault(fault)),
            }
        });
        self.handlers.insert(name, boxed);
        self
    }

    pub fn declared(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.declared.values()
    }

    /// Declared operations with no handler bound.
    pub fn unfulfilled(&self) -> Vec<&OperationDescriptor> {
        self.declared
            .iter()
            .filter(|(name, _)| !self.handlers.contains_key(*name))
            .map(|(_, d)| d)
            .collect()
    }

    /// Run one request through the contract checks and its handler.
    pub fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let id = request.request_id;

        let Some(descriptor) = self.declared.get(&request.method) else {
            let err = ParcelError::NotFulfilled(format!("unknown operation `{}`", request.method));
            return RpcResponse::failure(Some(id), ResponseStatus::ServiceNotFound, &err);
        };

        if request.request_type != descriptor.request_type {
            let err = ParcelError::ContractMismatch(format!(
                "`{}` accepts {} but was invoked with {}",
                request.method, descriptor.request_type, request.request_type
            ));
            return RpcResponse::failure(Some(id), ResponseStatus::BadRequest, &err);
        }

        let Some(handler) = self.handlers.get(&request.method) else {
            let err = ParcelError::NotFulfilled(format!(
                "`{}` is declared but not fulfilled by this provider",
                request.method
            ));
            return RpcResponse::failure(Some(id), ResponseStatus::ServiceNotFound, &err);
        };

        match handler(&request.params) {
            Ok(Handled::Value(value)) => RpcResponse::value(id, value),
            Ok(Handled::Fault(fault)) => {
                tracing::debug!(method = %request.method, %id, "Operation raised fault: {}", fault);
                RpcResponse::fault(id, fault)
            }
            Err((status, err)) => {
                tracing::warn!(method = %request.method, %id, code = status.code(), "{}", err);
                RpcResponse::failure(Some(id), status, &err)
            }
        }
    }
}
