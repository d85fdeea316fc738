//! Leave request lifecycle: create, list, review, delete.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::config::LeavePolicy;
use crate::error::{CoreError, CoreResult};
use crate::models::{LeaveRequest, LeaveStatus, LeaveType};
use crate::store::CoreStore;

use super::day_count::count_days;

/// Input for creating a leave request.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    /// The staff member requesting time off.
    pub staff_id: Uuid,
    /// The category of leave.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub from_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub to_date: NaiveDate,
    /// Free-text reason.
    pub reason: Option<String>,
}

/// A review decision for a pending request.
#[derive(Debug, Clone)]
pub enum ReviewAction {
    /// Approve the request.
    Approve {
        /// Who approved it.
        reviewer: String,
    },
    /// Reject the request with a reason.
    Reject {
        /// Who rejected it.
        reviewer: String,
        /// Why it was rejected. Required.
        reason: String,
    },
    /// Withdraw the request before review.
    Cancel,
}

fn status_label(status: LeaveStatus) -> &'static str {
    match status {
        LeaveStatus::Pending => "pending",
        LeaveStatus::Approved => "approved",
        LeaveStatus::Rejected => "rejected",
        LeaveStatus::Cancelled => "cancelled",
    }
}

/// Creates a pending leave request.
///
/// The staff member must belong to the clinic, and `days_count` is
/// computed by the clinic's configured day-count rule.
pub async fn create_request(
    store: &CoreStore,
    policy: &LeavePolicy,
    clinic_id: &str,
    input: NewLeaveRequest,
) -> CoreResult<LeaveRequest> {
    store.get_staff(clinic_id, input.staff_id).await?;
    let days_count = count_days(input.from_date, input.to_date, policy.day_count_rule)?;

    let request = LeaveRequest {
        id: Uuid::new_v4(),
        clinic_id: clinic_id.to_string(),
        staff_id: input.staff_id,
        leave_type: input.leave_type,
        from_date: input.from_date,
        to_date: input.to_date,
        days_count,
        reason: input.reason,
        status: LeaveStatus::Pending,
        reviewed_by: None,
        reviewed_at: None,
        rejection_reason: None,
        created_at: Utc::now(),
    };
    store.insert_leave(request).await
}

/// Lists a clinic's leave requests, optionally filtered by status and staff
/// member, ordered by from-date.
pub async fn list_requests(
    store: &CoreStore,
    clinic_id: &str,
    status: Option<LeaveStatus>,
    staff_id: Option<Uuid>,
) -> Vec<LeaveRequest> {
    store.list_leave(clinic_id, status, staff_id).await
}

/// Applies a review decision to a pending request.
///
/// Only pending requests may transition; anything already approved,
/// rejected, or cancelled conflicts — there is no re-open. Approval and
/// rejection stamp the reviewer and timestamp; rejection additionally
/// requires a non-empty reason.
pub async fn review(
    store: &CoreStore,
    clinic_id: &str,
    request_id: Uuid,
    action: ReviewAction,
) -> CoreResult<LeaveRequest> {
    // Boundary validation before the store is touched.
    match &action {
        ReviewAction::Approve { reviewer } | ReviewAction::Reject { reviewer, .. } => {
            if reviewer.trim().is_empty() {
                return Err(CoreError::validation("reviewer must not be empty"));
            }
        }
        ReviewAction::Cancel => {}
    }
    if let ReviewAction::Reject { reason, .. } = &action {
        if reason.trim().is_empty() {
            return Err(CoreError::validation("rejection_reason must not be empty"));
        }
    }

    store
        .update_leave(clinic_id, request_id, |request| {
            if !request.status.is_pending() {
                return Err(CoreError::conflict(format!(
                    "leave request already {}",
                    status_label(request.status)
                )));
            }
            match action {
                ReviewAction::Approve { reviewer } => {
                    request.status = LeaveStatus::Approved;
                    request.reviewed_by = Some(reviewer);
                    request.reviewed_at = Some(Utc::now());
                }
                ReviewAction::Reject { reviewer, reason } => {
                    request.status = LeaveStatus::Rejected;
                    request.reviewed_by = Some(reviewer);
                    request.reviewed_at = Some(Utc::now());
                    request.rejection_reason = Some(reason);
                }
                ReviewAction::Cancel => {
                    request.status = LeaveStatus::Cancelled;
                }
            }
            Ok(())
        })
        .await
}

/// Deletes a leave request, refusing unless it is still pending.
pub async fn delete_request(
    store: &CoreStore,
    clinic_id: &str,
    request_id: Uuid,
) -> CoreResult<()> {
    store
        .remove_leave(clinic_id, request_id, |request| {
            if !request.status.is_pending() {
                return Err(CoreError::conflict(format!(
                    "only pending leave requests may be deleted, this one is {}",
                    status_label(request.status)
                )));
            }
            Ok(())
        })
        .await
}
