// crates/parcel-cli/src/main.rs
//
// CLI entrypoint for the Parcel consumer.
//
// Invokes the demo operations on a running parcel-provider and lists the
// declared contract. Faults and failed calls exit non-zero.

mod commands;
mod output;
mod rpc_client;

use clap::{Parser, Subcommand};
use commands::basic_type::BasicTypeCmd;
use commands::demo::{HelloCmd, UserInfoCmd};
use output::{CliError, OutputFormat};
use parcel_core::Consumer;
use rpc_client::HttpTransport;

/// Parcel CLI: consumer for the Parcel RPC demo provider.
#[derive(Parser, Debug)]
#[command(name = "parcel", version = "0.1.0", about = "Parcel RPC demo consumer")]
struct Cli {
    /// RPC endpoint of the parcel-provider.
    #[arg(long, global = true, default_value = "http://127.0.0.1:50051")]
    rpc: String,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// DemoProvider/sayHello.
    Hello(HelloCmd),

    /// DemoProvider/echo.
    Echo,

    /// DemoProvider/test.
    Test,

    /// DemoProvider/getUserInfo.
    UserInfo(UserInfoCmd),

    /// BasicTypeProvider/testBasicType.
    BasicType(BasicTypeCmd),

    /// ErrorProvider/errorTest (always faults).
    ErrorTest,

    /// List the declared operations.
    Operations,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match run(&cli).await {
        Ok(out) => println!("{}", out),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<String, CliError> {
    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };
    let consumer = Consumer::new(HttpTransport::new(&cli.rpc));

    match &cli.command {
        Commands::Hello(cmd) => commands::demo::hello(&consumer, cmd, format).await,
        Commands::Echo => commands::demo::echo(&consumer, format).await,
        Commands::Test => commands::demo::test(&consumer, format).await,
        Commands::UserInfo(cmd) => commands::demo::user_info(&consumer, cmd, format).await,
        Commands::BasicType(cmd) => commands::basic_type::run(&consumer, cmd, format).await,
        Commands::ErrorTest => commands::error_test::run(&consumer, format).await,
        Commands::Operations => Ok(commands::operations::run(format)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_basic_type() {
        let cli = Cli::try_parse_from([
            "parcel", "--json", "basic-type", "--attr", "a=1", "--attr", "b=2", "--amount", "12.50",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::BasicType(cmd) => {
                assert_eq!(cmd.attrs.len(), 2);
                assert_eq!(cmd.amount.unwrap().to_string(), "12.50");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_user_info_and_bad_amount() {
        let cli = Cli::try_parse_from(["parcel", "user-info", "--name", "x", "--sex", "female"]).unwrap();
        match cli.command {
            Commands::UserInfo(cmd) => {
                let request = cmd.to_request();
                assert_eq!(request.name.as_deref(), Some("x"));
                assert_eq!(request.sex, Some(parcel_core::Sex::Female));
                assert!(request.id.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["parcel", "basic-type", "--amount", "1e3"]).is_err());
    }

    #[tokio::test]
    async fn test_operations_needs_no_provider() {
        let cli = Cli::try_parse_from(["parcel", "--rpc", "http://127.0.0.1:9", "operations"]).unwrap();
        let out = run(&cli).await.unwrap();
        assert!(out.contains("errorTest"));
    }
}
