// crates/parcel-core/src/services.rs
//
// The declared services of the demo provider, one marker type per operation.

use crate::contract::{Operation, OperationDescriptor};
use crate::payload::{CompositeResponse, KeyedValueRequest, TypedScalarRequest};

pub const DEMO_PROVIDER: &str = "DemoProvider";
pub const BASIC_TYPE_PROVIDER: &str = "BasicTypeProvider";
pub const ERROR_PROVIDER: &str = "ErrorProvider";

/// Name under which business faults are declared.
pub const BUSINESS_FAULT: &str = "Fault";

// ---------------------------------------------------------------------------
// DemoProvider
// ---------------------------------------------------------------------------

/// `sayHello(name) -> "hello <name>"`
pub struct SayHello;

impl Operation for SayHello {
    const SERVICE: &'static str = DEMO_PROVIDER;
    const METHOD: &'static str = "sayHello";
    type Request = String;
    type Response = String;
}

/// `echo() -> "pong"`
pub struct Echo;

impl Operation for Echo {
    const SERVICE: &'static str = DEMO_PROVIDER;
    const METHOD: &'static str = "echo";
    type Request = ();
    type Response = String;
}

/// `test()`, returns nothing.
pub struct Test;

impl Operation for Test {
    const SERVICE: &'static str = DEMO_PROVIDER;
    const METHOD: &'static str = "test";
    type Request = ();
    type Response = ();
}

pub struct GetUserInfo;

impl Operation for GetUserInfo {
    const SERVICE: &'static str = DEMO_PROVIDER;
    const METHOD: &'static str = "getUserInfo";
    type Request = KeyedValueRequest;
    type Response = CompositeResponse;
}

// ---------------------------------------------------------------------------
// BasicTypeProvider
// ---------------------------------------------------------------------------

/// Echoes a map-and-decimal request back unchanged.
pub struct TestBasicType;

impl Operation for TestBasicType {
    const SERVICE: &'static str = BASIC_TYPE_PROVIDER;
    const METHOD: &'static str = "testBasicType";
    type Request = TypedScalarRequest;
    type Response = TypedScalarRequest;
}

// ---------------------------------------------------------------------------
// ErrorProvider
// ---------------------------------------------------------------------------

/// Always raises a business fault.
pub struct ErrorTest;

impl Operation for ErrorTest {
    const SERVICE: &'static str = ERROR_PROVIDER;
    const METHOD: &'static str = "errorTest";
    const DECLARED_FAULTS: &'static [&'static str] = &[BUSINESS_FAULT];
    type Request = ();
    type Response = ();
}

/// Every operation the demo contract declares, in service order.
pub fn declared_operations() -> Vec<OperationDescriptor> {
    vec![
        SayHello::descriptor(),
        Echo::descriptor(),
        Test::descriptor(),
        GetUserInfo::descriptor(),
        TestBasicType::descriptor(),
        ErrorTest::descriptor(),
    ]
}
