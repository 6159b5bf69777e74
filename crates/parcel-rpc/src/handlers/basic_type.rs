// crates/parcel-rpc/src/handlers/basic_type.rs
//
// BasicTypeProvider handler: testBasicType.

use parcel_core::services::TestBasicType;
use parcel_core::{Fault, TypedScalarRequest};

use crate::registry::ProviderRegistry;

pub fn register(registry: &mut ProviderRegistry) {
    registry.register::<TestBasicType, _>(handle_test_basic_type);
}

/// Return the request unchanged. Exercises map and decimal marshalling in
/// both directions.
pub fn handle_test_basic_type(request: TypedScalarRequest) -> Result<TypedScalarRequest, Fault> {
    tracing::debug!("testBasicType: {}", request);
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_core::ExactDecimal;
    use std::collections::BTreeMap;

    #[test]
    fn test_empty_map_without_amount_succeeds() {
        let request = TypedScalarRequest::new().with_attributes(BTreeMap::new());
        let response = handle_test_basic_type(request.clone()).unwrap();
        assert_eq!(response, request);
        assert_eq!(response.attributes, Some(BTreeMap::new()));
        assert!(response.amount.is_none());
    }

    #[test]
    fn test_amount_is_echoed_exactly() {
        let mut request = TypedScalarRequest::new().with_amount(ExactDecimal::parse("12.50").unwrap());
        request.insert_attribute("hello", "hello");
        let response = handle_test_basic_type(request).unwrap();
        assert_eq!(response.amount.unwrap().to_string(), "12.50");
    }
}
