//! Attendance clock engine.
//!
//! Records per-staff-per-day clock-in/clock-out events and derives a
//! payable status from the worked hours: full day, half day, or absent,
//! with overtime beyond the full-day threshold. The thresholds come from
//! the policy configuration, not from constants.

mod classify;
mod clock;
mod export;
mod summary;

pub use classify::{classify, worked_hours, Classification};
pub use clock::{clock_in, clock_out};
pub use export::export_csv;
pub use summary::{summarize, StaffAttendanceSummary};
