//! The uniform result value returned by every tool invocation
//!
//! Success and failure travel in the same shape: the dispatch loop
//! serializes a [`ToolOutcome`] and hands it to the model regardless of
//! which side it landed on. Failures are values here, never exceptions
//! crossing a component boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure classification for a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed input caught before any network call
    Validation,
    /// Backend responded 401
    Authentication,
    /// Backend responded 404, or a lookup yielded zero records
    NotFound,
    /// Backend responded with a 5xx status
    Server,
    /// 200 status but the body was not valid JSON
    MalformedResponse,
    /// Timeout or connection failure before any response arrived
    Transport,
    /// The model requested an operation that is not in the catalog
    UnknownOperation,
    /// Anything not classified above; still caught, never propagated
    Unexpected,
}

/// Outcome of one tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The backend answered with a parseable body.
    Success {
        /// Echo of the request parameters the caller supplied
        #[serde(default, skip_serializing_if = "Value::is_null")]
        request: Value,
        /// Parsed response body, arbitrary nested JSON
        data: Value,
        /// ISO timestamp of completion
        timestamp: String,
    },
    /// The invocation failed; `kind` says where in the taxonomy.
    Failure { kind: FailureKind, message: String },
}

impl ToolOutcome {
    /// Success outcome stamped with the current local time.
    pub fn success(request: Value, data: Value) -> Self {
        ToolOutcome::Success {
            request,
            data,
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        ToolOutcome::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Shorthand for the pre-network validation failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::failure(FailureKind::Validation, message)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success { .. })
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ToolOutcome::Success { .. } => None,
            ToolOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Serialize for relay to the model.
    ///
    /// Serialization of these shapes cannot fail in practice; the fallback
    /// keeps the dispatch loop total anyway.
    pub fn to_relay_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!("{{\"status\":\"failure\",\"kind\":\"unexpected\",\"message\":\"serialization failed: {}\"}}", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let outcome = ToolOutcome::success(json!({"employee_id": "MMT6765"}), json!({"leaves": []}));
        assert!(outcome.is_success());
        assert!(outcome.failure_kind().is_none());

        let value: Value = serde_json::from_str(&outcome.to_relay_json()).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["request"]["employee_id"], "MMT6765");
        assert!(value["timestamp"].as_str().is_some());
    }

    #[test]
    fn test_failure_shape() {
        let outcome = ToolOutcome::failure(FailureKind::Authentication, "credentials rejected");
        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Authentication));

        let value: Value = serde_json::from_str(&outcome.to_relay_json()).unwrap();
        assert_eq!(value["status"], "failure");
        assert_eq!(value["kind"], "authentication");
        assert_eq!(value["message"], "credentials rejected");
    }

    #[test]
    fn test_failure_kind_snake_case() {
        let value = serde_json::to_value(FailureKind::UnknownOperation).unwrap();
        assert_eq!(value, "unknown_operation");
        let value = serde_json::to_value(FailureKind::MalformedResponse).unwrap();
        assert_eq!(value, "malformed_response");
    }

    #[test]
    fn test_null_request_echo_is_omitted() {
        let outcome = ToolOutcome::success(Value::Null, json!([]));
        let value: Value = serde_json::from_str(&outcome.to_relay_json()).unwrap();
        assert!(value.get("request").is_none());
    }
}
