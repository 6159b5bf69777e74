// crates/parcel-cli/src/commands/basic_type.rs
//
// `parcel basic-type [--attr k=v]... [--amount <decimal>]`: round-trips a
// TypedScalarRequest through BasicTypeProvider/testBasicType.

use clap::Args;

use parcel_core::services::TestBasicType;
use parcel_core::{ExactDecimal, TypedScalarRequest};

use super::RemoteConsumer;
use crate::output::{render, CliError, OutputFormat};

#[derive(Debug, Args)]
pub struct BasicTypeCmd {
    /// Attribute entry as key=value. Repeatable; a repeated key keeps the
    /// last value.
    #[arg(long = "attr", value_parser = parse_key_val)]
    pub attrs: Vec<(String, String)>,

    /// Send an empty attribute map when no --attr is given, instead of none.
    #[arg(long)]
    pub empty_attrs: bool,

    /// Exact decimal amount, e.g. 12.50 (scale is preserved).
    #[arg(long)]
    pub amount: Option<ExactDecimal>,
}

impl BasicTypeCmd {
    pub fn to_request(&self) -> TypedScalarRequest {
        let mut request = TypedScalarRequest::new();
        if self.empty_attrs {
            request.attributes = Some(Default::default());
        }
        for (key, value) in &self.attrs {
            request.insert_attribute(key.clone(), value.clone());
        }
        request.amount = self.amount;
        request
    }
}

pub async fn run(consumer: &RemoteConsumer, cmd: &BasicTypeCmd, format: OutputFormat) -> Result<String, CliError> {
    let outcome = consumer.invoke::<TestBasicType>(&cmd.to_request()).await;
    render(outcome, format, |echoed| echoed.to_string())
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got `{}`", s)),
    }
}
