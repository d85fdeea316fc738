//! Typed policy configuration structures.
//!
//! These structs are deserialized from the policy YAML file. Decimal values
//! are written as strings in the YAML (e.g. `"8.0"`).

use rust_decimal::Decimal;
use serde::Deserialize;

/// Attendance classification thresholds.
///
/// Worked hours at or above `full_day_hours` classify as present; at or
/// above `half_day_hours` (but below a full day) as a half day; anything
/// less as absent. These are clinic-policy values, not hardcoded behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendancePolicy {
    /// Hours at or above which a day counts as a full day.
    pub full_day_hours: Decimal,
    /// Hours at or above which a day counts as a half day.
    pub half_day_hours: Decimal,
}

/// The rule used to compute `days_count` for a leave request.
///
/// The canonical rule is [`DayCountRule::CalendarInclusive`]; the
/// weekdays-only variant exists for clinics that exclude weekends from
/// leave balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCountRule {
    /// Every calendar day from `from_date` to `to_date` inclusive.
    CalendarInclusive,
    /// Only Monday through Friday within the inclusive range.
    WeekdaysOnly,
}

/// Leave workflow policy.
#[derive(Debug, Clone, Deserialize)]
pub struct LeavePolicy {
    /// The day-count rule applied when a request is created.
    pub day_count_rule: DayCountRule,
}

/// What happens when an add would push a block's fill count past its
/// target headcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverfillRule {
    /// Refuse the add with a conflict.
    Reject,
    /// Accept the add; the fill count is not capped.
    Allow,
}

/// Coverage fill policy.
#[derive(Debug, Clone, Deserialize)]
pub struct CoveragePolicy {
    /// Overfill handling for assignment and locum adds.
    pub overfill: OverfillRule,
}

/// The complete policy configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Attendance classification thresholds.
    pub attendance: AttendancePolicy,
    /// Leave workflow policy.
    pub leave: LeavePolicy,
    /// Coverage fill policy.
    pub coverage: CoveragePolicy,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_policy_yaml() {
        let yaml = r#"
attendance:
  full_day_hours: "8.0"
  half_day_hours: "4.0"
leave:
  day_count_rule: calendar_inclusive
coverage:
  overfill: reject
"#;
        let config: PolicyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.attendance.full_day_hours,
            Decimal::from_str("8.0").unwrap()
        );
        assert_eq!(config.leave.day_count_rule, DayCountRule::CalendarInclusive);
        assert_eq!(config.coverage.overfill, OverfillRule::Reject);
    }

    #[test]
    fn test_deserialize_weekdays_only_rule() {
        let yaml = r#"
attendance:
  full_day_hours: "7.5"
  half_day_hours: "3.5"
leave:
  day_count_rule: weekdays_only
coverage:
  overfill: allow
"#;
        let config: PolicyConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.leave.day_count_rule, DayCountRule::WeekdaysOnly);
        assert_eq!(config.coverage.overfill, OverfillRule::Allow);
    }
}
