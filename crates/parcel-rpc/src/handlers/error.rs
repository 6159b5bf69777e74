// crates/parcel-rpc/src/handlers/error.rs
//
// ErrorProvider handler: errorTest.

use parcel_core::services::ErrorTest;
use parcel_core::Fault;

use crate::registry::ProviderRegistry;

pub fn register(registry: &mut ProviderRegistry) {
    registry.register::<ErrorTest, _>(handle_error_test);
}

/// Always raises the declared business fault.
pub fn handle_error_test(_request: ()) -> Result<(), Fault> {
    Err(Fault::with_message("exception"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_test_always_faults() {
        for _ in 0..3 {
            let fault = handle_error_test(()).unwrap_err();
            assert_eq!(fault.message(), Some("exception"));
            assert!(fault.cause().is_none());
            assert!(fault.backtrace().is_none());
        }
    }
}
