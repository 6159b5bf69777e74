// crates/parcel-cli/src/commands/mod.rs
//
// Command module declarations for the Parcel CLI.

pub mod basic_type;
pub mod demo;
pub mod error_test;
pub mod operations;

use parcel_core::Consumer;

use crate::rpc_client::HttpTransport;

/// The consumer every remote command calls through.
pub type RemoteConsumer = Consumer<HttpTransport>;
