// crates/parcel-rpc/src/middleware.rs
//
// Interceptor applied to every request reaching the provider's tonic service.

use tonic::{Request, Status};

/// Logging interceptor for incoming RPC requests.
///
/// Logs the request metadata at debug level and lets every request through.
/// Per-call details (operation, request id) are logged by the endpoint once
/// the envelope is decoded.
pub fn logging_interceptor(req: Request<()>) -> Result<Request<()>, Status> {
    tracing::debug!("Incoming RPC request: {:?}", req.metadata());
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_interceptor_passes_request_through() {
        let mut req = Request::new(());
        req.metadata_mut().insert("x-parcel-caller", "cli".parse().unwrap());

        let passed = logging_interceptor(req).unwrap();
        assert_eq!(passed.metadata().get("x-parcel-caller").unwrap().to_str().unwrap(), "cli");
    }
}
