//! The payroll approval state machine.
//!
//! The chain is one-directional: `draft → submitted → approved → paid`.
//! Skipping forward is legal; moving backward or standing still is not.
//! Entering approved stamps `approved_at`; entering paid stamps `paid_at`.

use chrono::Utc;

use crate::error::{CoreError, CoreResult};
use crate::models::{PayrollEntry, PayrollStatus};

/// Human-readable status label matching the wire form.
pub fn status_label(status: PayrollStatus) -> &'static str {
    match status {
        PayrollStatus::Draft => "draft",
        PayrollStatus::Submitted => "submitted",
        PayrollStatus::Approved => "approved",
        PayrollStatus::Paid => "paid",
    }
}

/// Advances an entry to the target status, stamping timestamps.
///
/// Fails with a conflict when the move is backward or a no-op, leaving the
/// entry untouched.
pub fn advance(entry: &mut PayrollEntry, target: PayrollStatus) -> CoreResult<()> {
    if !entry.status.can_advance_to(target) {
        return Err(CoreError::conflict(format!(
            "cannot move payroll entry from {} to {}",
            status_label(entry.status),
            status_label(target)
        )));
    }
    apply(entry, target);
    Ok(())
}

/// Non-failing variant for bulk updates: advances when legal and reports
/// whether the entry changed.
pub fn try_advance(entry: &mut PayrollEntry, target: PayrollStatus) -> bool {
    if !entry.status.can_advance_to(target) {
        return false;
    }
    apply(entry, target);
    true
}

fn apply(entry: &mut PayrollEntry, target: PayrollStatus) {
    let now = Utc::now();
    entry.status = target;
    entry.updated_at = now;
    match target {
        PayrollStatus::Approved => entry.approved_at = Some(now),
        PayrollStatus::Paid => entry.paid_at = Some(now),
        PayrollStatus::Draft | PayrollStatus::Submitted => {}
    }
}
