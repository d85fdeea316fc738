//! Worked-hours computation and payable-status classification.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::config::AttendancePolicy;
use crate::error::{CoreError, CoreResult};
use crate::models::AttendanceStatus;

/// The outcome of classifying a closed attendance record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The derived payable status.
    pub status: AttendanceStatus,
    /// Hours beyond the full-day threshold, clamped at zero. Only present
    /// when the status is [`AttendanceStatus::Present`].
    pub overtime_hours: Option<Decimal>,
}

/// Computes worked hours between clock-in and clock-out, rounded to 2
/// decimals.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use roster_core::attendance::worked_hours;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
/// let hours = worked_hours(
///     day.and_hms_opt(9, 0, 0).unwrap(),
///     day.and_hms_opt(17, 30, 0).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(hours.to_string(), "8.50");
/// ```
pub fn worked_hours(clock_in: NaiveDateTime, clock_out: NaiveDateTime) -> CoreResult<Decimal> {
    if clock_out <= clock_in {
        return Err(CoreError::validation(format!(
            "clock_out ({clock_out}) must be after clock_in ({clock_in})"
        )));
    }
    let seconds = (clock_out - clock_in).num_seconds();
    // Round first, then pin the scale: an exact quotient like 9 would
    // otherwise serialize as "9" instead of "9.00".
    let mut hours = (Decimal::new(seconds, 0) / Decimal::new(3600, 0)).round_dp(2);
    hours.rescale(2);
    Ok(hours)
}

/// Classifies worked hours against the clinic's attendance thresholds.
///
/// Hours at or above the full-day threshold are present, with overtime for
/// anything beyond it; at or above the half-day threshold, a half day; less
/// than that, absent. Overtime is never negative and is only populated for
/// present days.
pub fn classify(hours: Decimal, policy: &AttendancePolicy) -> Classification {
    if hours >= policy.full_day_hours {
        let mut overtime = (hours - policy.full_day_hours).max(Decimal::ZERO).round_dp(2);
        overtime.rescale(2);
        Classification {
            status: AttendanceStatus::Present,
            overtime_hours: Some(overtime),
        }
    } else if hours >= policy.half_day_hours {
        Classification {
            status: AttendanceStatus::HalfDay,
            overtime_hours: None,
        }
    } else {
        Classification {
            status: AttendanceStatus::Absent,
            overtime_hours: None,
        }
    }
}
