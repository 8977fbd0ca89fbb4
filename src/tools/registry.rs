//! The fixed catalog of operations, with by-name execution

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::backend::{FailureKind, HrApi, ToolOutcome};
use crate::model::ToolDeclaration;

use super::hr::{AllEmployeesTool, AttendanceReportTool, EmployeeInfoTool, LeaveReportTool};
use super::search::{EmployeeDetailsByNameTool, SearchEmployeeByNameTool};
use super::Tool;

/// Registry mapping operation names to implementations.
///
/// Declaration order is stable so the model sees the same catalog every
/// turn. An unknown operation name yields an `unknown_operation` failure
/// outcome, never a crash.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Empty registry; callers register their own subset.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// The full six-operation catalog over one backend handle.
    pub fn with_catalog(api: Arc<dyn HrApi>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(LeaveReportTool::new(api.clone())));
        registry.register(Arc::new(EmployeeInfoTool::new(api.clone())));
        registry.register(Arc::new(AllEmployeesTool::new(api.clone())));
        registry.register(Arc::new(AttendanceReportTool::new(api.clone())));
        registry.register(Arc::new(SearchEmployeeByNameTool::new(api.clone())));
        registry.register(Arc::new(EmployeeDetailsByNameTool::new(api)));
        registry
    }

    /// Register a tool, replacing any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        if let Some(existing) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            *existing = tool;
        } else {
            self.tools.push(tool);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Declarations handed to the model at each request.
    pub fn declarations(&self) -> Vec<ToolDeclaration> {
        self.tools
            .iter()
            .map(|t| ToolDeclaration {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.parameters_schema(),
            })
            .collect()
    }

    /// Execute an operation by name.
    ///
    /// Required keys from the schema are checked here so every tool can
    /// assume its declared parameters are at least present; type and value
    /// checks stay inside the tool.
    pub async fn execute(&self, name: &str, args: &Value) -> ToolOutcome {
        let Some(tool) = self.get(name) else {
            return ToolOutcome::failure(
                FailureKind::UnknownOperation,
                format!("Unknown operation '{}' requested", name),
            );
        };
        if let Err(message) = check_required(&tool.parameters_schema(), args) {
            return ToolOutcome::invalid(message);
        }
        info!(operation = %name, "executing operation");
        tool.execute(args).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that `args` is an object containing every key in
/// `schema["required"]`.
fn check_required(schema: &Value, args: &Value) -> Result<(), String> {
    let Some(required) = schema.get("required").and_then(Value::as_array) else {
        return Ok(());
    };
    let Some(object) = args.as_object() else {
        return Err("arguments must be an object".to_string());
    };
    for key in required.iter().filter_map(Value::as_str) {
        if !object.contains_key(key) {
            return Err(format!("missing required parameter '{}'", key));
        }
    }
    Ok(())
}
