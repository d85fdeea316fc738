//! Leave-duration day counting.
//!
//! The configured rule is applied at the single entry point here, so every
//! code path that computes a request's `days_count` agrees. The canonical
//! rule is calendar-inclusive; weekdays-only counts Monday through Friday
//! within the same inclusive range.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::config::DayCountRule;
use crate::error::{CoreError, CoreResult};

/// Counts leave days from `from` to `to` inclusive under the given rule.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use roster_core::config::DayCountRule;
/// use roster_core::leave::count_days;
///
/// let sat = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
/// let sun = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
/// assert_eq!(count_days(sat, sun, DayCountRule::CalendarInclusive).unwrap(), 2);
/// assert_eq!(count_days(sat, sun, DayCountRule::WeekdaysOnly).unwrap(), 0);
/// ```
pub fn count_days(from: NaiveDate, to: NaiveDate, rule: DayCountRule) -> CoreResult<u32> {
    if to < from {
        return Err(CoreError::validation(format!(
            "to_date ({to}) must not be before from_date ({from})"
        )));
    }

    match rule {
        DayCountRule::CalendarInclusive => Ok((to - from).num_days() as u32 + 1),
        DayCountRule::WeekdaysOnly => {
            let mut count = 0;
            let mut day = from;
            while day <= to {
                if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                    count += 1;
                }
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
            Ok(count)
        }
    }
}
