// crates/parcel-cli/src/output.rs
//
// Output formatting for the Parcel CLI.
// Supports plain text and JSON output modes, and turns a call outcome into
// printed output or a `CliError`.

use serde::Serialize;
use tabled::{Table, Tabled};
use thiserror::Error;

use parcel_core::{CallOutcome, Fault, ParcelError};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable rendering (default).
    Text,
    /// Pretty JSON for machine consumption.
    Json,
}

/// Why a command exits non-zero.
#[derive(Debug, Error)]
pub enum CliError {
    /// The operation completed by raising a fault.
    #[error("{}", fault_chain(.0))]
    Fault(Fault),

    /// The call could not be carried out.
    #[error("call failed: {0}")]
    Call(#[from] ParcelError),
}

/// Format a slice of Tabled items as a table string.
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    Table::new(data).to_string()
}

/// Format a serializable value as a pretty-printed JSON string.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|e| format!("JSON serialization error: {}", e))
}

/// `fault: <message>`, then one `caused by:` line per cause.
pub fn fault_chain(fault: &Fault) -> String {
    let mut lines = fault.chain();
    let mut out = match lines.next() {
        Some(top) => format!("fault: {}", top),
        None => String::from("fault"),
    };
    for cause in lines {
        out.push_str(&format!("\n  caused by: {}", cause));
    }
    out
}

/// Render the outcome of one call.
///
/// Success prints `text(&value)` (or JSON); a fault or failure becomes the
/// returned error.
pub fn render<T, F>(outcome: CallOutcome<T>, format: OutputFormat, text: F) -> Result<String, CliError>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match outcome {
        CallOutcome::Success(value) => Ok(match format {
            OutputFormat::Text => text(&value),
            OutputFormat::Json => format_json(&value),
        }),
        CallOutcome::Fault(fault) => Err(CliError::Fault(fault)),
        CallOutcome::Failed(err) => Err(CliError::Call(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_chain_lists_causes() {
        let fault = Fault::with_cause("outer", Fault::with_cause("middle", Fault::with_message("root")));
        assert_eq!(
            fault_chain(&fault),
            "fault: outer\n  caused by: middle\n  caused by: root"
        );
        assert_eq!(fault_chain(&Fault::with_message("exception")), "fault: exception");
    }

    #[test]
    fn test_render_success_text_and_json() {
        let text = render(CallOutcome::Success("pong".to_string()), OutputFormat::Text, |s| s.clone()).unwrap();
        assert_eq!(text, "pong");

        let json = render(CallOutcome::Success("pong".to_string()), OutputFormat::Json, |s| s.clone()).unwrap();
        assert_eq!(json, "\"pong\"");
    }

    #[test]
    fn test_render_fault_is_error() {
        let outcome: CallOutcome<()> = CallOutcome::Fault(Fault::with_message("exception"));
        let err = render(outcome, OutputFormat::Text, |_| String::new()).unwrap_err();
        assert_eq!(err.to_string(), "fault: exception");
    }

    #[test]
    fn test_render_failure_is_error() {
        let outcome: CallOutcome<()> = CallOutcome::Failed(ParcelError::Transport("refused".into()));
        let err = render(outcome, OutputFormat::Json, |_| String::new()).unwrap_err();
        assert!(matches!(err, CliError::Call(ParcelError::Transport(_))));
    }
}
