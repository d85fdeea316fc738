//! Payroll entry model and approval states.
//!
//! A payroll entry is a payable line item keyed uniquely per clinic by its
//! `payroll_key`, which makes upserts idempotent. Entries advance through a
//! strict forward-only status chain.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of payable line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    /// Regular salary for a staff member.
    Salary,
    /// Overtime pay for a staff member.
    Overtime,
    /// Payment for external locum cover at a location.
    LocumCover,
    /// Manual adjustment.
    Adjustment,
}

/// The approval state of a payroll entry.
///
/// The chain is one-directional: `Draft → Submitted → Approved → Paid`.
/// Skipping forward is allowed; moving backward is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Freshly created or re-derived, not yet submitted.
    Draft,
    /// Submitted for approval.
    Submitted,
    /// Approved for payment.
    Approved,
    /// Paid out.
    Paid,
}

impl PayrollStatus {
    /// Position of the status in the forward chain.
    pub fn rank(&self) -> u8 {
        match self {
            PayrollStatus::Draft => 0,
            PayrollStatus::Submitted => 1,
            PayrollStatus::Approved => 2,
            PayrollStatus::Paid => 3,
        }
    }

    /// Returns true if moving from `self` to `target` advances the chain.
    pub fn can_advance_to(&self, target: PayrollStatus) -> bool {
        target.rank() > self.rank()
    }
}

/// A payable line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollEntry {
    /// The clinic this entry belongs to.
    pub clinic_id: String,
    /// Unique key per clinic, used for idempotent upsert.
    pub payroll_key: String,
    /// The kind of payable line item.
    pub pay_type: PayType,
    /// The staff member paid, for staff-keyed entries.
    pub staff_id: Option<Uuid>,
    /// The location paid for, for locum-cover entries.
    pub location_id: Option<String>,
    /// Number of payable units (hours, days, covers).
    pub units: Decimal,
    /// Rate per unit.
    pub rate: Decimal,
    /// Total payable amount, supplied by the caller.
    pub amount: Decimal,
    /// The approval state.
    pub status: PayrollStatus,
    /// Stamped when the entry enters `Approved`.
    pub approved_at: Option<DateTime<Utc>>,
    /// Stamped when the entry enters `Paid`.
    pub paid_at: Option<DateTime<Utc>>,
    /// Last time the entry was created, overwritten, or advanced.
    pub updated_at: DateTime<Utc>,
}
