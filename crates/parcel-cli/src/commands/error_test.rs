// crates/parcel-cli/src/commands/error_test.rs
//
// `parcel error-test`: invokes ErrorProvider/errorTest, which always faults.

use parcel_core::services::ErrorTest;

use super::RemoteConsumer;
use crate::output::{render, CliError, OutputFormat};

pub async fn run(consumer: &RemoteConsumer, format: OutputFormat) -> Result<String, CliError> {
    let outcome = consumer.invoke::<ErrorTest>(&()).await;
    render(outcome, format, |_| "ok".to_string())
}
