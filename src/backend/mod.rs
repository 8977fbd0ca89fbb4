//! Backend client for the HR API
//!
//! This module owns the network edge: the [`HrApi`] trait is the seam the
//! tool catalog calls through, [`HrClient`] is the production
//! implementation, and [`ToolOutcome`] is the uniform result every call
//! returns. Components above this line never see an HTTP status code or a
//! transport exception.

pub mod client;
pub mod outcome;
pub mod transport;

pub use client::HrClient;
pub use outcome::{FailureKind, ToolOutcome};
pub use transport::{HttpReply, HttpTransport, ReqwestTransport, TransportError};

use async_trait::async_trait;

/// Operation-level interface to the HR backend.
///
/// Date parameters arrive already converted to each endpoint's wire format
/// (leave wants `DD-MM-YYYY`, attendance keeps `YYYY-MM-DD`); validation
/// and conversion happen in the tool layer before this trait is reached.
/// Implementations must be total: every failure comes back as a
/// [`ToolOutcome::Failure`], never a panic or an `Err` the dispatch loop
/// would have to unwind.
#[async_trait]
pub trait HrApi: Send + Sync {
    /// Approved-leave records for one employee in a window.
    async fn fetch_leave_report(&self, employee_id: &str, from: &str, to: &str) -> ToolOutcome;

    /// Master profile data for the given employee ids.
    async fn fetch_employees(&self, employee_ids: &[String]) -> ToolOutcome;

    /// The full organization roster; cached, most expensive call.
    async fn fetch_all_employees(&self) -> ToolOutcome;

    /// Per-day attendance entries for a window.
    async fn fetch_attendance(
        &self,
        employee_ids: &[String],
        from_date: &str,
        to_date: &str,
    ) -> ToolOutcome;
}
