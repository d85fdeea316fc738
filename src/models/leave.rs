//! Leave request model and workflow states.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The category of a time-off application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Planned annual leave.
    Annual,
    /// Sick leave.
    Sick,
    /// Short-notice casual leave.
    Casual,
    /// Unpaid leave.
    Unpaid,
}

/// The review state of a leave request.
///
/// Requests are created `Pending` and move exactly once to one of the
/// terminal states; there is no re-open after approval or rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review.
    Pending,
    /// Approved by a reviewer.
    Approved,
    /// Rejected by a reviewer, with a reason.
    Rejected,
    /// Withdrawn by the staff member before review.
    Cancelled,
}

impl LeaveStatus {
    /// Returns true if the request is still awaiting review.
    pub fn is_pending(&self) -> bool {
        *self == LeaveStatus::Pending
    }
}

/// A staff-initiated time-off application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: Uuid,
    /// The clinic this request belongs to.
    pub clinic_id: String,
    /// The staff member requesting time off.
    pub staff_id: Uuid,
    /// The category of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub from_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub to_date: NaiveDate,
    /// Number of leave days, computed by the configured day-count rule at
    /// creation time.
    pub days_count: u32,
    /// Free-text reason supplied by the staff member.
    pub reason: Option<String>,
    /// The review state.
    pub status: LeaveStatus,
    /// Reviewer identity, stamped on approval or rejection.
    pub reviewed_by: Option<String>,
    /// Review timestamp, stamped on approval or rejection.
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Reason given by the reviewer when rejecting.
    pub rejection_reason: Option<String>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
}
