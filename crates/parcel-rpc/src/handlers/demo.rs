// crates/parcel-rpc/src/handlers/demo.rs
//
// DemoProvider handlers: sayHello, echo, test, getUserInfo.

use parcel_core::services::{Echo, GetUserInfo, SayHello, Test};
use parcel_core::{CompositeResponse, Fault, KeyedValueRequest};

use crate::registry::ProviderRegistry;

pub fn register(registry: &mut ProviderRegistry) {
    registry
        .register::<SayHello, _>(handle_say_hello)
        .register::<Echo, _>(handle_echo)
        .register::<Test, _>(handle_test)
        .register::<GetUserInfo, _>(handle_get_user_info);
}

// ---------------------------------------------------------------------------
// sayHello / echo / test
// ---------------------------------------------------------------------------

pub fn handle_say_hello(name: String) -> Result<String, Fault> {
    Ok(format!("hello {}", name))
}

pub fn handle_echo(_request: ()) -> Result<String, Fault> {
    Ok("pong".to_string())
}

pub fn handle_test(_request: ()) -> Result<(), Fault> {
    tracing::debug!("DemoProvider/test invoked");
    Ok(())
}

// ---------------------------------------------------------------------------
// getUserInfo
// ---------------------------------------------------------------------------

/// Handle a getUserInfo request.
///
/// Answers with status "ok" and an info map of the caller's identity. The
/// id entry is fixed at "1"; name and email are copied when present.
pub fn handle_get_user_info(request: KeyedValueRequest) -> Result<CompositeResponse, Fault> {
    tracing::debug!("getUserInfo: {}", request);

    let mut response = CompositeResponse::new().with_status("ok");
    response.insert_info("id", "1");
    if let Some(name) = request.name {
        response.insert_info("name", name);
    }
    if let Some(email) = request.email {
        response.insert_info("email", email);
    }
    Ok(response)
}
