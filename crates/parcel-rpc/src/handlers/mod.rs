// crates/parcel-rpc/src/handlers/mod.rs
//
// Handler modules for the demo services.
// Each module implements the operations of one declared service as plain
// synchronous functions: a fully materialised request in, a response or a
// fault out.

pub mod basic_type;
pub mod demo;
pub mod error;

use crate::registry::ProviderRegistry;

/// Bind every demo handler into `registry`.
pub fn register_all(registry: &mut ProviderRegistry) {
    demo::register(registry);
    basic_type::register(registry);
    error::register(registry);
}
