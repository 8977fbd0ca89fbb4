//! Name resolution over the employee roster
//!
//! The backend does not guarantee one canonical field name per attribute,
//! so each attribute is resolved through an ordered alias list, first
//! present-and-non-empty wins. Matching is pure substring/token logic with
//! no ranking or edit distance; ambiguity is returned to the user, never
//! guessed away.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use crate::backend::{FailureKind, HrApi, ToolOutcome};

use super::{required_str, Tool};

const EMPLOYEE_ID_ALIASES: &[&str] = &["employee_number", "employeeNumber", "emp_id"];
const FULL_NAME_ALIASES: &[&str] = &["full_name", "employee_name", "name"];
const FIRST_NAME_ALIASES: &[&str] = &["first_name", "firstName"];
const LAST_NAME_ALIASES: &[&str] = &["last_name", "lastName"];
const PREFERRED_NAME_ALIASES: &[&str] = &["preferred_name", "preferredName"];
const EMAIL_ALIASES: &[&str] = &["company_email_id", "email", "companyEmail"];
const DESIGNATION_ALIASES: &[&str] = &["designation_name", "designation", "role"];
const DEPARTMENT_ALIASES: &[&str] = &["department_name", "department", "function"];
const STATUS_ALIASES: &[&str] = &["employee_status", "status"];

/// Minimum query length after trimming.
const MIN_QUERY_LEN: usize = 2;

/// Profile fields extracted defensively from one roster entry.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl EmployeeRecord {
    pub fn from_entry(entry: &Value) -> Self {
        Self {
            employee_id: first_non_empty(entry, EMPLOYEE_ID_ALIASES),
            full_name: first_non_empty(entry, FULL_NAME_ALIASES),
            first_name: first_non_empty(entry, FIRST_NAME_ALIASES),
            last_name: first_non_empty(entry, LAST_NAME_ALIASES),
            preferred_name: first_non_empty(entry, PREFERRED_NAME_ALIASES),
            email: first_non_empty(entry, EMAIL_ALIASES),
            designation: first_non_empty(entry, DESIGNATION_ALIASES),
            department: first_non_empty(entry, DEPARTMENT_ALIASES),
            status: first_non_empty(entry, STATUS_ALIASES),
        }
    }

    /// Lowercased name-bearing fields to match against.
    fn name_fields(&self) -> Vec<String> {
        [
            &self.full_name,
            &self.first_name,
            &self.last_name,
            &self.preferred_name,
        ]
        .into_iter()
        .flatten()
        .map(|s| s.to_lowercase())
        .filter(|s| !s.is_empty() && s != "none")
        .collect()
    }

    /// Bounded summary for disambiguation lists.
    fn summary(&self) -> Value {
        json!({
            "employee_id": self.employee_id,
            "full_name": self.full_name,
            "designation": self.designation,
        })
    }
}

/// Resolve one attribute through its alias list, first non-empty wins.
fn first_non_empty(entry: &Value, aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        match entry.get(alias) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => continue,
        }
    }
    None
}

/// Match policy, first rule that fires wins:
/// (a) the whole query is a substring of any field;
/// (b) every query word is a substring of some token of one field;
/// (c) any single query word is a substring of any field.
fn matches_query(query: &str, fields: &[String]) -> bool {
    if fields.iter().any(|f| f.contains(query)) {
        return true;
    }

    let words: Vec<&str> = query.split_whitespace().collect();
    if words.len() > 1 {
        let all_words_in_one_field = fields.iter().any(|field| {
            let tokens: Vec<&str> = field.split_whitespace().collect();
            words
                .iter()
                .all(|word| tokens.iter().any(|token| token.contains(word)))
        });
        if all_words_in_one_field {
            return true;
        }
    }

    words
        .iter()
        .any(|word| fields.iter().any(|field| field.contains(word)))
}

/// Pull the employee list out of a roster body; the backend returns either
/// `{"data": [...]}` or a bare array.
fn roster_entries(data: &Value) -> Option<&Vec<Value>> {
    data.get("data")
        .and_then(Value::as_array)
        .or_else(|| data.as_array())
}

/// Fetch the roster and collect every record matching `name`.
///
/// `Err` carries a ready-made failure outcome so callers can return it
/// directly.
async fn search_roster(api: &dyn HrApi, name: &str) -> Result<Vec<EmployeeRecord>, ToolOutcome> {
    let roster = match api.fetch_all_employees().await {
        ToolOutcome::Success { data, .. } => data,
        ToolOutcome::Failure { kind, message } => {
            return Err(ToolOutcome::failure(
                kind,
                format!("Failed to fetch the employee directory: {}", message),
            ));
        }
    };

    let Some(entries) = roster_entries(&roster) else {
        return Err(ToolOutcome::failure(
            FailureKind::MalformedResponse,
            "The employee directory response did not contain an employee list.",
        ));
    };

    let query = name.trim().to_lowercase();
    let matches = entries
        .iter()
        .map(EmployeeRecord::from_entry)
        .filter(|record| {
            let fields = record.name_fields();
            !fields.is_empty() && matches_query(&query, &fields)
        })
        .collect();
    Ok(matches)
}

fn checked_query<'a>(args: &'a Value) -> Result<&'a str, ToolOutcome> {
    let name = required_str(args, "name").map_err(|m| ToolOutcome::invalid(m))?;
    if name.trim().chars().count() < MIN_QUERY_LEN {
        return Err(ToolOutcome::invalid(
            "Name must be at least 2 characters long",
        ));
    }
    Ok(name)
}

fn no_matches(name: &str) -> ToolOutcome {
    ToolOutcome::failure(
        FailureKind::NotFound,
        format!(
            "No employees found matching '{}'. Check the spelling or try a different name.",
            name
        ),
    )
}

/// Find employees by (partial) name against the full roster.
pub struct SearchEmployeeByNameTool {
    api: Arc<dyn HrApi>,
}

impl SearchEmployeeByNameTool {
    pub fn new(api: Arc<dyn HrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for SearchEmployeeByNameTool {
    fn name(&self) -> &str {
        "search_employee_by_name"
    }

    fn description(&self) -> &str {
        "Searches the employee directory by full or partial name and returns matching \
         employees with their ids. Use this when the user gives a person's name instead \
         of an employee id."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Full or partial employee name, at least 2 characters",
                },
            },
            "required": ["name"],
        })
    }

    async fn execute(&self, args: &Value) -> ToolOutcome {
        let name = match checked_query(args) {
            Ok(name) => name,
            Err(outcome) => return outcome,
        };
        let matches = match search_roster(self.api.as_ref(), name).await {
            Ok(matches) => matches,
            Err(outcome) => return outcome,
        };
        if matches.is_empty() {
            return no_matches(name);
        }
        ToolOutcome::success(
            json!({ "name": name }),
            json!({
                "search_query": name,
                "matches_found": matches.len(),
                "employees": matches,
            }),
        )
    }
}

/// Full profile lookup by name: search, then fetch details for a unique match.
pub struct EmployeeDetailsByNameTool {
    api: Arc<dyn HrApi>,
}

impl EmployeeDetailsByNameTool {
    pub fn new(api: Arc<dyn HrApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for EmployeeDetailsByNameTool {
    fn name(&self) -> &str {
        "get_employee_details_by_name"
    }

    fn description(&self) -> &str {
        "Looks up an employee by name and, when the name matches exactly one person, returns \
         their full profile. When several people match, returns the candidates so the user can \
         say which one they meant."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Full or partial employee name, at least 2 characters",
                },
            },
            "required": ["name"],
        })
    }

    async fn execute(&self, args: &Value) -> ToolOutcome {
        let name = match checked_query(args) {
            Ok(name) => name,
            Err(outcome) => return outcome,
        };
        let mut matches = match search_roster(self.api.as_ref(), name).await {
            Ok(matches) => matches,
            Err(outcome) => return outcome,
        };

        match matches.len() {
            0 => no_matches(name),
            1 => {
                let record = matches.remove(0);
                let Some(employee_id) = record.employee_id.clone() else {
                    return ToolOutcome::failure(
                        FailureKind::MalformedResponse,
                        "The matched directory entry has no employee id.",
                    );
                };
                match self.api.fetch_employees(&[employee_id]).await {
                    ToolOutcome::Success { data, .. } => ToolOutcome::success(
                        json!({ "name": name }),
                        json!({
                            "search_query": name,
                            "employee_found": record,
                            "details": data,
                        }),
                    ),
                    failure => failure,
                }
            }
            n => ToolOutcome::success(
                json!({ "name": name }),
                json!({
                    "status": "multiple_matches",
                    "search_query": name,
                    "matches_found": n,
                    "employees": matches.iter().map(EmployeeRecord::summary).collect::<Vec<_>>(),
                    "message": format!(
                        "Found {} employees matching '{}'. Please specify which one you meant.",
                        n, name
                    ),
                }),
            ),
        }
    }
}
