//! The four backend-backed operations: leave, employee info, roster, attendance
//!
//! Each tool validates its arguments fully before touching the network, so
//! malformed model output costs nothing and `validation` failures never
//! reach the backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backend::{HrApi, ToolOutcome};
use crate::validate::{
    convert_date, is_valid_date, is_valid_employee_id, parse_date, within_future_horizon,
    DATE_FORMAT, LEAVE_WIRE_FORMAT,
};

use super::{required_str, string_list, Tool};

/// Validate a normalized id list: non-empty, every id well-formed.
/// Returns the trimmed ids ready for transmission.
fn clean_id_list(ids: Vec<String>) -> Result<Vec<String>, String> {
    if ids.is_empty() {
        return Err("employee_ids must be a non-empty list".to_string());
    }
    let mut clean = Vec::with_capacity(ids.len());
    for id in ids {
        if !is_valid_employee_id(&id) {
            return Err(format!("Invalid employee id: '{}'", id));
        }
        clean.push(id.trim().to_string());
    }
    Ok(clean)
}

/// Validate a `YYYY-MM-DD` pair and check ordering.
fn checked_range(start: &str, end: &str) -> Result<(chrono::NaiveDate, chrono::NaiveDate), String> {
    if !is_valid_date(start) {
        return Err(format!("Invalid date '{}': expected YYYY-MM-DD", start));
    }
    if !is_valid_date(end) {
        return Err(format!("Invalid date '{}': expected YYYY-MM-DD", end));
    }
    let (Ok(start), Ok(end)) = (parse_date(start), parse_date(end)) else {
        return Err("Dates could not be parsed".to_string());
    };
    if start > end {
        return Err("Start date cannot be after end date".to_string());
    }
    Ok((start, end))
}

/// Approved-leave records for one employee in a date window.
pub struct LeaveReportTool {
    api: Arc<dyn HrApi>,
}

impl LeaveReportTool {
    pub fn new(api: Arc<dyn HrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for LeaveReportTool {
    fn name(&self) -> &str {
        "get_leave_report"
    }

    fn description(&self) -> &str {
        "Retrieves approved/actioned leave records for a specific employee within a date range. \
         Use this when users ask about leaves, absences, or time-off for an employee."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "employee_id": {
                    "type": "string",
                    "description": "The unique employee identifier (e.g. 'MMT6765')",
                },
                "start_date": {
                    "type": "string",
                    "description": "Start date of the query in YYYY-MM-DD format",
                },
                "end_date": {
                    "type": "string",
                    "description": "End date of the query in YYYY-MM-DD format",
                },
            },
            "required": ["employee_id", "start_date", "end_date"],
        })
    }

    async fn execute(&self, args: &Value) -> ToolOutcome {
        let employee_id = match required_str(args, "employee_id") {
            Ok(v) => v,
            Err(m) => return ToolOutcome::invalid(m),
        };
        let start_date = match required_str(args, "start_date") {
            Ok(v) => v,
            Err(m) => return ToolOutcome::invalid(m),
        };
        let end_date = match required_str(args, "end_date") {
            Ok(v) => v,
            Err(m) => return ToolOutcome::invalid(m),
        };

        if !is_valid_employee_id(employee_id) {
            return ToolOutcome::invalid(format!("Invalid employee id: '{}'", employee_id));
        }
        let (start, _end) = match checked_range(start_date, end_date) {
            Ok(range) => range,
            Err(m) => return ToolOutcome::invalid(m),
        };
        let today = chrono::Local::now().date_naive();
        if !within_future_horizon(start, today) {
            return ToolOutcome::invalid(
                "Start date cannot be more than 30 days in the future".to_string(),
            );
        }

        // The leave endpoint takes DD-MM-YYYY on the wire.
        let (from, to) = match (
            convert_date(start_date, DATE_FORMAT, LEAVE_WIRE_FORMAT),
            convert_date(end_date, DATE_FORMAT, LEAVE_WIRE_FORMAT),
        ) {
            (Ok(from), Ok(to)) => (from, to),
            (Err(e), _) | (_, Err(e)) => return ToolOutcome::invalid(e.to_string()),
        };

        self.api
            .fetch_leave_report(employee_id.trim(), &from, &to)
            .await
    }
}

/// Master profile data for one or more explicit employee ids.
pub struct EmployeeInfoTool {
    api: Arc<dyn HrApi>,
}

impl EmployeeInfoTool {
    pub fn new(api: Arc<dyn HrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for EmployeeInfoTool {
    fn name(&self) -> &str {
        "get_employee_info"
    }

    fn description(&self) -> &str {
        "Gets core master profile data for one or more employees, such as their manager, email, \
         team, designation, or other profile details. Use this for who-is-who questions when you \
         already know the employee ids."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "employee_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "One or more employee ids, e.g. ['MMT6765', 'EMP001']",
                },
            },
            "required": ["employee_ids"],
        })
    }

    async fn execute(&self, args: &Value) -> ToolOutcome {
        let ids = match string_list(args, "employee_ids").and_then(clean_id_list) {
            Ok(ids) => ids,
            Err(m) => return ToolOutcome::invalid(m),
        };
        self.api.fetch_employees(&ids).await
    }
}

/// The full organization roster; no parameters.
pub struct AllEmployeesTool {
    api: Arc<dyn HrApi>,
}

impl AllEmployeesTool {
    pub fn new(api: Arc<dyn HrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for AllEmployeesTool {
    fn name(&self) -> &str {
        "get_all_employees"
    }

    fn description(&self) -> &str {
        "Fetches master data for every employee in the organization. Expensive; use only when \
         the question genuinely spans the whole roster."
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _args: &Value) -> ToolOutcome {
        self.api.fetch_all_employees().await
    }
}

/// Per-day attendance entries for one or more employees in a window.
pub struct AttendanceReportTool {
    api: Arc<dyn HrApi>,
}

impl AttendanceReportTool {
    pub fn new(api: Arc<dyn HrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for AttendanceReportTool {
    fn name(&self) -> &str {
        "get_attendance_report"
    }

    fn description(&self) -> &str {
        "Retrieves the daily attendance roster for one or more employees within a date range. \
         Use this when users ask about attendance, presence, check-ins, or working days."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "employee_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "One or more employee ids",
                },
                "from_date": {
                    "type": "string",
                    "description": "Start date of the query in YYYY-MM-DD format",
                },
                "to_date": {
                    "type": "string",
                    "description": "End date of the query in YYYY-MM-DD format",
                },
            },
            "required": ["employee_ids", "from_date", "to_date"],
        })
    }

    async fn execute(&self, args: &Value) -> ToolOutcome {
        let ids = match string_list(args, "employee_ids").and_then(clean_id_list) {
            Ok(ids) => ids,
            Err(m) => return ToolOutcome::invalid(m),
        };
        let from_date = match required_str(args, "from_date") {
            Ok(v) => v,
            Err(m) => return ToolOutcome::invalid(m),
        };
        let to_date = match required_str(args, "to_date") {
            Ok(v) => v,
            Err(m) => return ToolOutcome::invalid(m),
        };
        if let Err(m) = checked_range(from_date, to_date) {
            return ToolOutcome::invalid(m);
        }

        // Attendance transmits YYYY-MM-DD unchanged.
        self.api.fetch_attendance(&ids, from_date, to_date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::FailureKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend stub that counts calls and returns a fixed success.
    struct CountingApi {
        calls: AtomicUsize,
    }

    impl CountingApi {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HrApi for CountingApi {
        async fn fetch_leave_report(
            &self,
            _employee_id: &str,
            _from: &str,
            _to: &str,
        ) -> ToolOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ToolOutcome::success(Value::Null, json!({"leaves": []}))
        }

        async fn fetch_employees(&self, _employee_ids: &[String]) -> ToolOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ToolOutcome::success(Value::Null, json!({"employee_data": []}))
        }

        async fn fetch_all_employees(&self) -> ToolOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ToolOutcome::success(Value::Null, json!({"data": []}))
        }

        async fn fetch_attendance(
            &self,
            _employee_ids: &[String],
            _from_date: &str,
            _to_date: &str,
        ) -> ToolOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ToolOutcome::success(Value::Null, json!({"attendance": []}))
        }
    }

    #[tokio::test]
    async fn test_leave_rejects_reversed_range_without_network_call() {
        let api = CountingApi::new();
        let tool = LeaveReportTool::new(api.clone());

        let outcome = tool
            .execute(&json!({
                "employee_id": "MMT6765",
                "start_date": "2024-02-01",
                "end_date": "2024-01-01",
            }))
            .await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_leave_rejects_bad_date_without_network_call() {
        let api = CountingApi::new();
        let tool = LeaveReportTool::new(api.clone());

        let outcome = tool
            .execute(&json!({
                "employee_id": "MMT6765",
                "start_date": "2024-02-30",
                "end_date": "2024-03-01",
            }))
            .await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_leave_rejects_far_future_start() {
        let api = CountingApi::new();
        let tool = LeaveReportTool::new(api.clone());

        let start = chrono::Local::now().date_naive() + chrono::Duration::days(60);
        let end = start + chrono::Duration::days(5);
        let outcome = tool
            .execute(&json!({
                "employee_id": "MMT6765",
                "start_date": start.format(DATE_FORMAT).to_string(),
                "end_date": end.format(DATE_FORMAT).to_string(),
            }))
            .await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_leave_rejects_short_employee_id() {
        let api = CountingApi::new();
        let tool = LeaveReportTool::new(api.clone());

        let outcome = tool
            .execute(&json!({
                "employee_id": "AB",
                "start_date": "2024-01-01",
                "end_date": "2024-01-31",
            }))
            .await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_leave_happy_path_calls_backend_once() {
        let api = CountingApi::new();
        let tool = LeaveReportTool::new(api.clone());

        let outcome = tool
            .execute(&json!({
                "employee_id": " MMT6765 ",
                "start_date": "2024-01-01",
                "end_date": "2024-01-31",
            }))
            .await;

        assert!(outcome.is_success());
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_employee_info_rejects_empty_list_without_network_call() {
        let api = CountingApi::new();
        let tool = EmployeeInfoTool::new(api.clone());

        let outcome = tool.execute(&json!({"employee_ids": []})).await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_employee_info_accepts_bare_scalar_id() {
        let api = CountingApi::new();
        let tool = EmployeeInfoTool::new(api.clone());

        let outcome = tool.execute(&json!({"employee_ids": "MMT6765"})).await;
        assert!(outcome.is_success());
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_attendance_rejects_empty_list_without_network_call() {
        let api = CountingApi::new();
        let tool = AttendanceReportTool::new(api.clone());

        let outcome = tool
            .execute(&json!({
                "employee_ids": [],
                "from_date": "2024-01-01",
                "to_date": "2024-01-31",
            }))
            .await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_attendance_rejects_reversed_range() {
        let api = CountingApi::new();
        let tool = AttendanceReportTool::new(api.clone());

        let outcome = tool
            .execute(&json!({
                "employee_ids": ["MMT6765"],
                "from_date": "2024-02-01",
                "to_date": "2024-01-01",
            }))
            .await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Validation));
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_all_employees_takes_no_arguments() {
        let api = CountingApi::new();
        let tool = AllEmployeesTool::new(api.clone());

        let outcome = tool.execute(&json!({})).await;
        assert!(outcome.is_success());
        assert_eq!(api.calls(), 1);
    }
}
