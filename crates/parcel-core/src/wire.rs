// crates/parcel-core/src/wire.rs
//
// JSON envelope shared by provider and consumer.
//
// A request names the operation and the request type tag and carries the
// request record as JSON. A response echoes the request id and carries
// exactly one of: a value, a null value, a fault, or an error. Faults travel
// in their own body variant, never inside a value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use uuid::Uuid;

use crate::contract::{CallOutcome, Operation, Payload};
use crate::error::ParcelError;
use crate::fault::Fault;

/// Default upper bound on an encoded envelope (8 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 8 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Correlates the response with this request.
    pub request_id: Uuid,
    /// Operation name, `<Service>/<method>`.
    pub method: String,
    /// `Payload::TYPE_NAME` of the request record.
    pub request_type: String,
    /// The request record, kept as raw JSON so the provider decodes it
    /// straight into the declared type (repeated keys are still visible).
    pub params: Box<RawValue>,
}

impl RpcRequest {
    /// Build the envelope for one call of `Op`.
    pub fn for_operation<Op: Operation>(request: &Op::Request) -> Result<Self, ParcelError> {
        Ok(Self {
            request_id: Uuid::now_v7(),
            method: Op::name(),
            request_type: <Op::Request as Payload>::TYPE_NAME.to_string(),
            params: serde_json::value::to_raw_value(request)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Response status, with numeric codes for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    BadRequest,
    BadResponse,
    ServiceNotFound,
    ServerError,
}

impl ResponseStatus {
    pub fn code(self) -> u16 {
        match self {
            ResponseStatus::Ok => 20,
            ResponseStatus::BadRequest => 40,
            ResponseStatus::BadResponse => 50,
            ResponseStatus::ServiceNotFound => 60,
            ResponseStatus::ServerError => 80,
        }
    }
}

/// Which `ParcelError` an error body stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Marshalling,
    ContractMismatch,
    NotFulfilled,
    Transport,
}

impl FailureKind {
    pub fn of(err: &ParcelError) -> Self {
        match err {
            ParcelError::Marshalling(_) => FailureKind::Marshalling,
            ParcelError::ContractMismatch(_) => FailureKind::ContractMismatch,
            ParcelError::NotFulfilled(_) => FailureKind::NotFulfilled,
            ParcelError::Transport(_) => FailureKind::Transport,
        }
    }

    pub fn into_error(self, message: String) -> ParcelError {
        match self {
            FailureKind::Marshalling => ParcelError::Marshalling(message),
            FailureKind::ContractMismatch => ParcelError::ContractMismatch(message),
            FailureKind::NotFulfilled => ParcelError::NotFulfilled(message),
            FailureKind::Transport => ParcelError::Transport(message),
        }
    }
}

/// What a response carries. On the wire this is one object tagged by `kind`.
///
/// A value result is kept as raw JSON until the consumer decodes it into the
/// declared response type, so repeated keys in its maps are still caught.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BodyRecord", into = "BodyRecord")]
pub enum ResponseBody {
    /// The operation returned a value.
    Value { result: Box<RawValue> },
    /// The operation returned nothing.
    NullValue,
    /// The operation raised a business fault.
    Fault { fault: Fault },
    /// The call could not be carried out.
    Error { failure: FailureKind, message: String },
}

impl PartialEq for ResponseBody {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResponseBody::Value { result: a }, ResponseBody::Value { result: b }) => a.get() == b.get(),
            (ResponseBody::NullValue, ResponseBody::NullValue) => true,
            (ResponseBody::Fault { fault: a }, ResponseBody::Fault { fault: b }) => a == b,
            (
                ResponseBody::Error { failure: fa, message: ma },
                ResponseBody::Error { failure: fb, message: mb },
            ) => fa == fb && ma == mb,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BodyKind {
    Value,
    NullValue,
    Fault,
    Error,
}

/// Flat wire form of `ResponseBody`. Internal tagging would buffer the
/// result through `serde_json::Value`, which cannot hold a raw value.
#[derive(Serialize, Deserialize)]
struct BodyRecord {
    kind: BodyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Box<RawValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fault: Option<Fault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    failure: Option<FailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl From<ResponseBody> for BodyRecord {
    fn from(body: ResponseBody) -> Self {
        let mut record = BodyRecord {
            kind: BodyKind::NullValue,
            result: None,
            fault: None,
            failure: None,
            message: None,
        };
        match body {
            ResponseBody::Value { result } => {
                record.kind = BodyKind::Value;
                record.result = Some(result);
            }
            ResponseBody::NullValue => {}
            ResponseBody::Fault { fault } => {
                record.kind = BodyKind::Fault;
                record.fault = Some(fault);
            }
            ResponseBody::Error { failure, message } => {
                record.kind = BodyKind::Error;
                record.failure = Some(failure);
                record.message = Some(message);
            }
        }
        record
    }
}

impl TryFrom<BodyRecord> for ResponseBody {
    type Error = String;

    fn try_from(record: BodyRecord) -> Result<Self, String> {
        match record.kind {
            BodyKind::Value => match record.result {
                Some(result) => Ok(ResponseBody::Value { result }),
                None => Err("value body without `result`".to_string()),
            },
            BodyKind::NullValue => Ok(ResponseBody::NullValue),
            BodyKind::Fault => match record.fault {
                Some(fault) => Ok(ResponseBody::Fault { fault }),
                None => Err("fault body without `fault`".to_string()),
            },
            BodyKind::Error => match (record.failure, record.message) {
                (Some(failure), Some(message)) => Ok(ResponseBody::Error { failure, message }),
                _ => Err("error body without `failure` and `message`".to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// `None` only when the request envelope itself was unreadable.
    pub request_id: Option<Uuid>,
    pub status: ResponseStatus,
    pub body: ResponseBody,
}

impl RpcResponse {
    /// A successful completion. JSON `null` becomes a null-value body.
    pub fn value(request_id: Uuid, result: Box<RawValue>) -> Self {
        let body = if result.get() == "null" {
            ResponseBody::NullValue
        } else {
            ResponseBody::Value { result }
        };
        Self {
            request_id: Some(request_id),
            status: ResponseStatus::Ok,
            body,
        }
    }

    /// Encode `result` and wrap it as a successful completion.
    pub fn encode_value<T: Serialize>(request_id: Uuid, result: &T) -> Result<Self, ParcelError> {
        Ok(Self::value(request_id, serde_json::value::to_raw_value(result)?))
    }

    /// A completion that raised a fault. The call itself succeeded.
    pub fn fault(request_id: Uuid, fault: Fault) -> Self {
        Self {
            request_id: Some(request_id),
            status: ResponseStatus::Ok,
            body: ResponseBody::Fault { fault },
        }
    }

    pub fn failure(request_id: Option<Uuid>, status: ResponseStatus, err: &ParcelError) -> Self {
        let message = match err {
            ParcelError::Marshalling(m)
            | ParcelError::ContractMismatch(m)
            | ParcelError::NotFulfilled(m)
            | ParcelError::Transport(m) => m.clone(),
        };
        Self {
            request_id,
            status,
            body: ResponseBody::Error {
                failure: FailureKind::of(err),
                message,
            },
        }
    }

    /// Interpret this response as the answer to request `expected`.
    pub fn into_outcome<T: DeserializeOwned>(self, expected: Uuid) -> CallOutcome<T> {
        match (self.request_id, self.body) {
            (_, ResponseBody::Error { failure, message }) => CallOutcome::Failed(failure.into_error(message)),
            (Some(id), _) if id != expected => CallOutcome::Failed(ParcelError::Transport(format!(
                "response for request {} delivered to request {}",
                id, expected
            ))),
            (None, _) => CallOutcome::Failed(ParcelError::Transport(format!(
                "uncorrelated response delivered to request {}",
                expected
            ))),
            (Some(_), ResponseBody::Fault { fault }) => CallOutcome::Fault(fault),
            (Some(_), ResponseBody::Value { result }) => decode_result(result.get()),
            (Some(_), ResponseBody::NullValue) => decode_result("null"),
        }
    }
}

fn decode_result<T: DeserializeOwned>(result: &str) -> CallOutcome<T> {
    match serde_json::from_str(result) {
        Ok(value) => CallOutcome::Success(value),
        Err(e) => CallOutcome::Failed(ParcelError::Marshalling(format!("cannot decode response: {}", e))),
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encode an envelope, refusing anything above `limit` bytes.
pub fn encode<T: Serialize>(envelope: &T, limit: usize) -> Result<Vec<u8>, ParcelError> {
    let bytes = serde_json::to_vec(envelope)?;
    check_payload(bytes.len(), limit)?;
    Ok(bytes)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ParcelError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn check_payload(len: usize, limit: usize) -> Result<(), ParcelError> {
    if len > limit {
        return Err(ParcelError::Marshalling(format!(
            "payload of {} bytes exceeds limit of {} bytes",
            len, limit
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ErrorTest, GetUserInfo};
    use crate::{CompositeResponse, KeyedValueRequest};

    #[test]
    fn test_request_envelope_names_operation_and_type() {
        let req = RpcRequest::for_operation::<GetUserInfo>(&KeyedValueRequest::new().with_id(1)).unwrap();
        assert_eq!(req.method, "DemoProvider/getUserInfo");
        assert_eq!(req.request_type, "KeyedValueRequest");
        assert_eq!(req.params.get(), r#"{"id":1}"#);

        let void = RpcRequest::for_operation::<ErrorTest>(&()).unwrap();
        assert_eq!(void.params.get(), "null");
        assert_ne!(req.request_id, void.request_id);
    }

    #[test]
    fn test_fault_body_is_not_a_value() {
        let id = Uuid::now_v7();
        let resp = RpcResponse::fault(id, Fault::with_message("exception"));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["body"]["kind"], "fault");
        assert!(json["body"].get("result").is_none());

        let back: RpcResponse = serde_json::from_value(json).unwrap();
        let outcome: CallOutcome<()> = back.into_outcome(id);
        assert_eq!(outcome.fault().and_then(Fault::message), Some("exception"));
    }

    #[test]
    fn test_null_value_decodes_as_void() {
        let id = Uuid::now_v7();
        let resp = RpcResponse::encode_value(id, &()).unwrap();
        assert_eq!(resp.body, ResponseBody::NullValue);
        let outcome: CallOutcome<()> = resp.into_outcome(id);
        assert_eq!(outcome, CallOutcome::Success(()));
    }

    #[test]
    fn test_null_value_for_record_is_marshalling_error() {
        let id = Uuid::now_v7();
        let outcome: CallOutcome<String> = RpcResponse::encode_value(id, &()).unwrap().into_outcome(id);
        assert!(matches!(outcome, CallOutcome::Failed(ParcelError::Marshalling(_))));
    }

    #[test]
    fn test_mismatched_request_id_is_transport_error() {
        let resp = RpcResponse::encode_value(Uuid::now_v7(), &"pong").unwrap();
        let outcome: CallOutcome<String> = resp.into_outcome(Uuid::now_v7());
        assert!(matches!(outcome, CallOutcome::Failed(ParcelError::Transport(_))));
    }

    #[test]
    fn test_error_body_maps_back_to_parcel_error() {
        let id = Uuid::now_v7();
        let err = ParcelError::ContractMismatch("expected text".into());
        let resp = RpcResponse::failure(Some(id), ResponseStatus::BadRequest, &err);
        assert_eq!(resp.status.code(), 40);

        let json = serde_json::to_vec(&resp).unwrap();
        let back: RpcResponse = decode(&json).unwrap();
        let outcome: CallOutcome<String> = back.into_outcome(id);
        assert_eq!(outcome, CallOutcome::Failed(err));
    }

    #[test]
    fn test_value_result_survives_bytes_unchanged() {
        let id = Uuid::now_v7();
        let mut response = CompositeResponse::new().with_status("ok");
        response.insert_order(1001, "shipped");

        let bytes = encode(&RpcResponse::encode_value(id, &response).unwrap(), DEFAULT_MAX_PAYLOAD_BYTES).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains(r#""body":{"kind":"value","result":{"status":"ok","orders":{"1001":"shipped"}}}"#));

        let back: RpcResponse = decode(&bytes).unwrap();
        let outcome: CallOutcome<CompositeResponse> = back.into_outcome(id);
        assert_eq!(outcome, CallOutcome::Success(response));
    }

    #[test]
    fn test_duplicate_key_in_response_is_marshalling_error() {
        let id = Uuid::now_v7();
        let bytes = format!(
            r#"{{"request_id":"{}","status":"ok","body":{{"kind":"value","result":{{"orders":{{"1001":"shipped","1001":"lost"}}}}}}}}"#,
            id
        );

        // The envelope itself is well formed; the repeated key surfaces when
        // the result is decoded into the declared type.
        let response: RpcResponse = decode(bytes.as_bytes()).unwrap();
        let outcome: CallOutcome<CompositeResponse> = response.into_outcome(id);
        match outcome {
            CallOutcome::Failed(ParcelError::Marshalling(message)) => assert!(message.contains("duplicate")),
            other => panic!("expected marshalling failure, got {:?}", other),
        }
    }

    #[test]
    fn test_incomplete_body_is_rejected() {
        let id = Uuid::now_v7();
        let missing_result = format!(r#"{{"request_id":"{}","status":"ok","body":{{"kind":"value"}}}}"#, id);
        assert!(decode::<RpcResponse>(missing_result.as_bytes()).is_err());

        let missing_message =
            format!(r#"{{"request_id":"{}","status":"bad_request","body":{{"kind":"error","failure":"marshalling"}}}}"#, id);
        assert!(decode::<RpcResponse>(missing_message.as_bytes()).is_err());
    }

    #[test]
    fn test_encode_enforces_limit() {
        let big = "x".repeat(64);
        assert!(encode(&big, 1024).is_ok());
        let err = encode(&big, 16).unwrap_err();
        assert!(matches!(err, ParcelError::Marshalling(m) if m.contains("exceeds limit")));
    }
}
