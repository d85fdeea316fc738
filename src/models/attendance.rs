//! Attendance model and worked-hours status.
//!
//! One attendance record is a single staff-day: created open on clock-in,
//! closed on clock-out. At most one record exists per (staff, date).

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The payable status derived from worked hours on clock-out.
///
/// A freshly opened record carries [`AttendanceStatus::Present`] as a
/// provisional value until clock-out reclassifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked at least the full-day threshold.
    Present,
    /// Worked at least the half-day threshold but less than a full day.
    HalfDay,
    /// Worked less than the half-day threshold.
    Absent,
}

/// One staff-day worked-time record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The clinic this record belongs to.
    pub clinic_id: String,
    /// The staff member the record is for.
    pub staff_id: Uuid,
    /// The date the record covers.
    pub date: NaiveDate,
    /// When the staff member clocked in.
    pub clock_in: NaiveDateTime,
    /// When the staff member clocked out. `None` while the session is open.
    pub clock_out: Option<NaiveDateTime>,
    /// Worked hours, rounded to 2 decimals. Populated on clock-out.
    pub hours_worked: Option<Decimal>,
    /// Hours beyond the full-day threshold. Only populated when the record
    /// classifies as present.
    pub overtime_hours: Option<Decimal>,
    /// The derived payable status.
    pub status: AttendanceStatus,
}

impl Attendance {
    /// Returns true while the session has no clock-out yet.
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}
