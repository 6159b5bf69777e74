// crates/parcel-cli/src/commands/demo.rs
//
// `parcel hello`, `parcel echo`, `parcel test`, `parcel user-info`: the
// DemoProvider operations.

use clap::Args;

use parcel_core::services::{Echo, GetUserInfo, SayHello, Test};
use parcel_core::{KeyedValueRequest, Sex};

use super::RemoteConsumer;
use crate::output::{render, CliError, OutputFormat};

/// Greet someone through the provider.
#[derive(Debug, Args)]
pub struct HelloCmd {
    /// Name to greet.
    #[arg(long, default_value = "world")]
    pub name: String,
}

/// Identity to look up; every field is optional.
#[derive(Debug, Args)]
pub struct UserInfoCmd {
    #[arg(long)]
    pub id: Option<i32>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// "male" or "female".
    #[arg(long)]
    pub sex: Option<Sex>,
}

impl UserInfoCmd {
    pub fn to_request(&self) -> KeyedValueRequest {
        KeyedValueRequest {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            sex: self.sex,
        }
    }
}

pub async fn hello(consumer: &RemoteConsumer, cmd: &HelloCmd, format: OutputFormat) -> Result<String, CliError> {
    let outcome = consumer.invoke::<SayHello>(&cmd.name).await;
    render(outcome, format, |greeting| greeting.clone())
}

pub async fn echo(consumer: &RemoteConsumer, format: OutputFormat) -> Result<String, CliError> {
    let outcome = consumer.invoke::<Echo>(&()).await;
    render(outcome, format, |reply| reply.clone())
}

pub async fn test(consumer: &RemoteConsumer, format: OutputFormat) -> Result<String, CliError> {
    let outcome = consumer.invoke::<Test>(&()).await;
    render(outcome, format, |_| "ok".to_string())
}

pub async fn user_info(consumer: &RemoteConsumer, cmd: &UserInfoCmd, format: OutputFormat) -> Result<String, CliError> {
    let outcome = consumer.invoke::<GetUserInfo>(&cmd.to_request()).await;
    render(outcome, format, |response| response.to_string())
}
