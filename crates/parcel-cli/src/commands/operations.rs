// crates/parcel-cli/src/commands/operations.rs
//
// `parcel operations`: list the declared contract. Local only, no RPC.

use tabled::Tabled;

use parcel_core::contract::VOID_TYPE;
use parcel_core::services;
use parcel_core::OperationDescriptor;

use crate::output::{format_json, format_table, OutputFormat};

/// A row in the operations table.
#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Request")]
    request: String,
    #[tabled(rename = "Response")]
    response: String,
    #[tabled(rename = "Faults")]
    faults: String,
}

impl From<&OperationDescriptor> for OperationRow {
    fn from(d: &OperationDescriptor) -> Self {
        Self {
            service: d.service.to_string(),
            method: d.method.to_string(),
            request: d.request_type.to_string(),
            response: d.response_type.unwrap_or(VOID_TYPE).to_string(),
            faults: if d.declared_faults.is_empty() {
                "--".to_string()
            } else {
                d.declared_faults.join(", ")
            },
        }
    }
}

pub fn run(format: OutputFormat) -> String {
    let contract = services::declared_operations();
    match format {
        OutputFormat::Json => format_json(&contract),
        OutputFormat::Text => {
            let rows: Vec<OperationRow> = contract.iter().map(OperationRow::from).collect();
            format_table(&rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_operation() {
        let table = run(OutputFormat::Text);
        for name in ["sayHello", "echo", "test", "getUserInfo", "testBasicType", "errorTest"] {
            assert!(table.contains(name), "missing {} in\n{}", name, table);
        }
        assert!(table.contains("Fault"));
    }

    #[test]
    fn test_json_lists_every_operation() {
        let json: serde_json::Value = serde_json::from_str(&run(OutputFormat::Json)).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 6);
    }
}
