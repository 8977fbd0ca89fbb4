//! HTTP client for the HR backend API
//!
//! One authenticated POST per operation. Every status code and transport
//! failure is folded into a [`ToolOutcome`]; nothing raises past this
//! module into the dispatch loop.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::BackendConfig;

use super::outcome::{FailureKind, ToolOutcome};
use super::transport::{HttpTransport, ReqwestTransport, TransportError};
use super::HrApi;

const LEAVE_PATH: &str = "/leavesactionapi/leaveActionTakenLeaves";
const EMPLOYEE_PATH: &str = "/masterapi/employee";
const ATTENDANCE_PATH: &str = "/attendanceDataApi/DailyAttendanceRoster";

/// Leave endpoint discriminator for "action taken" (approved) records.
const LEAVE_ACTION_TAKEN: &str = "2";

struct CachedRoster {
    fetched_at: Instant,
    data: Value,
}

/// Client for the HR backend.
///
/// Holds no per-call state; the only thing shared between calls is the
/// read-through roster cache. Safe to wrap in an `Arc` and share across
/// sessions.
pub struct HrClient {
    config: BackendConfig,
    transport: Arc<dyn HttpTransport>,
    roster_cache: RwLock<Option<CachedRoster>>,
}

impl HrClient {
    /// Production client over a reqwest transport.
    pub fn new(config: BackendConfig) -> Self {
        let transport = Arc::new(ReqwestTransport::new(
            config.username.clone(),
            config.password.clone(),
        ));
        Self::with_transport(config, transport)
    }

    /// Client over an explicit transport; used by tests.
    pub fn with_transport(config: BackendConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            roster_cache: RwLock::new(None),
        }
    }

    async fn call(
        &self,
        path: &str,
        payload: Value,
        timeout: std::time::Duration,
        request_echo: Value,
    ) -> ToolOutcome {
        let url = format!("{}{}", self.config.base_url, path);
        info!(%path, "calling HR backend");

        let reply = match self.transport.post_json(&url, &payload, timeout).await {
            Ok(reply) => reply,
            Err(TransportError::Timeout) => {
                warn!(%path, "backend request timed out");
                return ToolOutcome::failure(
                    FailureKind::Transport,
                    "The request to the HR backend timed out. Please try again.",
                );
            }
            Err(err) => {
                warn!(%path, error = %err, "backend request failed");
                return ToolOutcome::failure(
                    FailureKind::Transport,
                    format!("Unable to reach the HR backend: {}", err),
                );
            }
        };

        match reply.status {
            200 => match serde_json::from_str::<Value>(&reply.body) {
                Ok(data) => ToolOutcome::success(request_echo, data),
                Err(_) => {
                    warn!(%path, "backend returned 200 with a non-JSON body");
                    ToolOutcome::failure(
                        FailureKind::MalformedResponse,
                        "The HR backend returned a response that was not valid JSON.",
                    )
                }
            },
            401 => ToolOutcome::failure(
                FailureKind::Authentication,
                "HR backend authentication failed. Please check the configured credentials.",
            ),
            404 => ToolOutcome::failure(
                FailureKind::NotFound,
                "The HR backend endpoint was not found.",
            ),
            status if status >= 500 => ToolOutcome::failure(
                FailureKind::Server,
                format!("HR backend server error: {}. Please try again later.", status),
            ),
            status => ToolOutcome::failure(
                FailureKind::Unexpected,
                format!("Unexpected HR backend response status: {}", status),
            ),
        }
    }
}

#[async_trait]
impl HrApi for HrClient {
    async fn fetch_leave_report(&self, employee_id: &str, from: &str, to: &str) -> ToolOutcome {
        let payload = json!({
            "api_key": self.config.leave_api_key,
            "from": from,
            "to": to,
            "action": LEAVE_ACTION_TAKEN,
            "action_from": from,
            "employee_no": [employee_id],
        });
        let echo = json!({
            "employee_id": employee_id,
            "from": from,
            "to": to,
        });
        self.call(LEAVE_PATH, payload, self.config.medium_timeout, echo)
            .await
    }

    async fn fetch_employees(&self, employee_ids: &[String]) -> ToolOutcome {
        let payload = json!({
            "api_key": self.config.employee_api_key,
            "datasetKey": self.config.employee_dataset_key,
            "employee_ids": employee_ids,
        });
        let echo = json!({ "requested_employee_ids": employee_ids });
        self.call(EMPLOYEE_PATH, payload, self.config.short_timeout, echo)
            .await
    }

    async fn fetch_all_employees(&self) -> ToolOutcome {
        let echo = json!({ "request_type": "all_employees" });

        {
            let cache = self.roster_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.config.roster_cache_ttl {
                    info!("serving roster from cache");
                    return ToolOutcome::success(echo, cached.data.clone());
                }
            }
        }

        // Omitting employee_ids makes the master endpoint return everyone.
        let payload = json!({
            "api_key": self.config.employee_api_key,
            "datasetKey": self.config.employee_dataset_key,
        });
        let outcome = self
            .call(EMPLOYEE_PATH, payload, self.config.roster_timeout, echo)
            .await;

        if let ToolOutcome::Success { data, .. } = &outcome {
            // Last writer wins; the fetch is idempotent so a concurrent
            // refresh overwriting us is harmless.
            let mut cache = self.roster_cache.write().await;
            *cache = Some(CachedRoster {
                fetched_at: Instant::now(),
                data: data.clone(),
            });
        }
        outcome
    }

    async fn fetch_attendance(
        &self,
        employee_ids: &[String],
        from_date: &str,
        to_date: &str,
    ) -> ToolOutcome {
        let payload = json!({
            "api_key": self.config.attendance_api_key,
            "emp_number_list": employee_ids,
            "from_date": from_date,
            "to_date": to_date,
        });
        let echo = json!({
            "employee_ids": employee_ids,
            "from_date": from_date,
            "to_date": to_date,
        });
        self.call(ATTENDANCE_PATH, payload, self.config.medium_timeout, echo)
            .await
    }
}
