//! Tool catalog: the operations the model may request
//!
//! This module provides:
//! - **Tool**: the interface every operation implements (name, description,
//!   parameter schema, execute)
//! - **ToolRegistry**: the fixed catalog with by-name execution
//! - The six HR operations in [`hr`] and [`search`]
//!
//! Execution is total: a tool returns a [`ToolOutcome`] for every input,
//! success or failure, so nothing unwinds into the dispatch loop.

pub mod hr;
pub mod registry;
pub mod search;

pub use hr::{AllEmployeesTool, AttendanceReportTool, EmployeeInfoTool, LeaveReportTool};
pub use registry::ToolRegistry;
pub use search::{EmployeeDetailsByNameTool, EmployeeRecord, SearchEmployeeByNameTool};

use async_trait::async_trait;
use serde_json::Value;

use crate::backend::ToolOutcome;

/// One named, schema-declared operation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Operation name, used for registration and invocation.
    fn name(&self) -> &str;

    /// Natural-language description; consumed by the model for operation
    /// selection, not by code.
    fn description(&self) -> &str;

    /// Parameter JSON Schema (type, properties, required).
    fn parameters_schema(&self) -> Value;

    /// Run the operation with the parsed argument object.
    async fn execute(&self, args: &Value) -> ToolOutcome;
}

/// Extract a required string argument.
pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(format!("parameter '{}' must be a string", key)),
        None => Err(format!("missing required parameter '{}'", key)),
    }
}

/// Extract a required list-of-strings argument, normalizing whatever
/// sequence representation the model produced to a plain `Vec<String>`.
///
/// A JSON array of scalars becomes one string per element; a bare scalar
/// becomes a single-element list (models regularly send `"MMT6765"` where
/// `["MMT6765"]` was declared).
pub(crate) fn string_list(args: &Value, key: &str) -> Result<Vec<String>, String> {
    match args.get(key) {
        None => Err(format!("missing required parameter '{}'", key)),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| scalar_to_string(item, key))
            .collect(),
        Some(value) => scalar_to_string(value, key).map(|s| vec![s]),
    }
}

fn scalar_to_string(value: &Value, key: &str) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(format!(
            "parameter '{}' must contain only strings or numbers",
            key
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str() {
        let args = json!({"name": "Sonali"});
        assert_eq!(required_str(&args, "name").unwrap(), "Sonali");
        assert!(required_str(&args, "missing").unwrap_err().contains("missing"));
        assert!(required_str(&json!({"name": 3}), "name").is_err());
    }

    #[test]
    fn test_string_list_from_array() {
        let args = json!({"employee_ids": ["MMT6765", "EMP001"]});
        assert_eq!(
            string_list(&args, "employee_ids").unwrap(),
            vec!["MMT6765".to_string(), "EMP001".to_string()]
        );
    }

    #[test]
    fn test_string_list_flattens_bare_scalar() {
        let args = json!({"employee_ids": "MMT6765"});
        assert_eq!(
            string_list(&args, "employee_ids").unwrap(),
            vec!["MMT6765".to_string()]
        );
    }

    #[test]
    fn test_string_list_accepts_numbers() {
        let args = json!({"employee_ids": [1001, "EMP001"]});
        assert_eq!(
            string_list(&args, "employee_ids").unwrap(),
            vec!["1001".to_string(), "EMP001".to_string()]
        );
    }

    #[test]
    fn test_string_list_rejects_nested_values() {
        let args = json!({"employee_ids": [["MMT6765"]]});
        assert!(string_list(&args, "employee_ids").is_err());
    }

    #[test]
    fn test_string_list_missing_key() {
        assert!(string_list(&json!({}), "employee_ids").is_err());
    }
}
