//! Per-staff attendance aggregation.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::AttendanceStatus;
use crate::store::CoreStore;

/// Aggregated attendance for one staff member over a date range.
///
/// Day counts cover closed records only; a session still open contributes
/// to `open_sessions` instead, since its status is provisional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffAttendanceSummary {
    /// The staff member.
    pub staff_id: Uuid,
    /// Display name from the directory.
    pub name: String,
    /// Job role from the directory.
    pub job_role: String,
    /// Closed records classified present.
    pub days_present: u32,
    /// Closed records classified half day.
    pub days_half_day: u32,
    /// Closed records classified absent.
    pub days_absent: u32,
    /// Records without a clock-out in the range.
    pub open_sessions: u32,
    /// Sum of worked hours over closed records.
    pub total_hours: Decimal,
    /// Sum of overtime hours over closed records.
    pub total_overtime_hours: Decimal,
}

/// Aggregates a clinic's attendance per staff member over a date range,
/// optionally restricted to one staff member. Results are ordered by name.
pub async fn summarize(
    store: &CoreStore,
    clinic_id: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    staff_id: Option<Uuid>,
) -> Vec<StaffAttendanceSummary> {
    let records = store.list_attendance(clinic_id, from, to, staff_id).await;
    let directory: HashMap<Uuid, (String, String)> = store
        .list_staff(clinic_id)
        .await
        .into_iter()
        .map(|s| (s.id, (s.name, s.job_role)))
        .collect();

    let mut by_staff: HashMap<Uuid, StaffAttendanceSummary> = HashMap::new();
    for record in records {
        let entry = by_staff.entry(record.staff_id).or_insert_with(|| {
            let (name, job_role) = directory
                .get(&record.staff_id)
                .cloned()
                .unwrap_or_else(|| ("(unknown)".to_string(), String::new()));
            StaffAttendanceSummary {
                staff_id: record.staff_id,
                name,
                job_role,
                days_present: 0,
                days_half_day: 0,
                days_absent: 0,
                open_sessions: 0,
                total_hours: Decimal::ZERO,
                total_overtime_hours: Decimal::ZERO,
            }
        });

        if record.is_open() {
            entry.open_sessions += 1;
            continue;
        }
        match record.status {
            AttendanceStatus::Present => entry.days_present += 1,
            AttendanceStatus::HalfDay => entry.days_half_day += 1,
            AttendanceStatus::Absent => entry.days_absent += 1,
        }
        if let Some(hours) = record.hours_worked {
            entry.total_hours += hours;
        }
        if let Some(overtime) = record.overtime_hours {
            entry.total_overtime_hours += overtime;
        }
    }

    let mut summaries: Vec<StaffAttendanceSummary> = by_staff.into_values().collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.staff_id.cmp(&b.staff_id)));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::{clock_in, clock_out};
    use crate::config::AttendancePolicy;
    use crate::models::{EmploymentStatus, KycStatus, Staff};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_policy() -> AttendancePolicy {
        AttendancePolicy {
            full_day_hours: dec("8.0"),
            half_day_hours: dec("4.0"),
        }
    }

    async fn seed_staff(store: &CoreStore, clinic: &str, name: &str) -> Uuid {
        store
            .insert_staff(Staff {
                id: Uuid::new_v4(),
                clinic_id: clinic.to_string(),
                name: name.to_string(),
                email: None,
                job_role: "nurse".to_string(),
                employment_status: EmploymentStatus::Active,
                kyc_status: KycStatus::Verified,
            })
            .await
            .unwrap()
            .id
    }

    async fn work_day(store: &CoreStore, staff_id: Uuid, day: u32, hours: u32) {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        clock_in(
            store,
            "clinic_a",
            staff_id,
            Some(date.and_hms_opt(9, 0, 0).unwrap()),
        )
        .await
        .unwrap();
        clock_out(
            store,
            &test_policy(),
            "clinic_a",
            staff_id,
            Some(date.and_hms_opt(9 + hours, 0, 0).unwrap()),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_summary_counts_days_and_sums_hours() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a", "Asha Verma").await;

        work_day(&store, staff_id, 4, 9).await; // present, 1h overtime
        work_day(&store, staff_id, 5, 5).await; // half day
        work_day(&store, staff_id, 6, 2).await; // absent

        let summaries = summarize(&store, "clinic_a", None, None, None).await;
        assert_eq!(summaries.len(), 1);
        let summary = &summaries[0];
        assert_eq!(summary.name, "Asha Verma");
        assert_eq!(summary.days_present, 1);
        assert_eq!(summary.days_half_day, 1);
        assert_eq!(summary.days_absent, 1);
        assert_eq!(summary.open_sessions, 0);
        assert_eq!(summary.total_hours, dec("16.00"));
        assert_eq!(summary.total_overtime_hours, dec("1.00"));
    }

    #[tokio::test]
    async fn test_open_sessions_counted_separately() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a", "Asha Verma").await;

        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        clock_in(
            &store,
            "clinic_a",
            staff_id,
            Some(date.and_hms_opt(9, 0, 0).unwrap()),
        )
        .await
        .unwrap();

        let summaries = summarize(&store, "clinic_a", None, None, None).await;
        assert_eq!(summaries[0].open_sessions, 1);
        assert_eq!(summaries[0].days_present, 0);
        assert_eq!(summaries[0].total_hours, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_summary_respects_date_range_and_staff_filter() {
        let store = CoreStore::new();
        let asha = seed_staff(&store, "clinic_a", "Asha Verma").await;
        let ben = seed_staff(&store, "clinic_a", "Ben Okafor").await;

        work_day(&store, asha, 4, 8).await;
        work_day(&store, asha, 10, 8).await;
        work_day(&store, ben, 4, 8).await;

        let summaries = summarize(
            &store,
            "clinic_a",
            Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
            Some(asha),
        )
        .await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].staff_id, asha);
        assert_eq!(summaries[0].days_present, 1);
    }

    #[tokio::test]
    async fn test_summary_ordered_by_name() {
        let store = CoreStore::new();
        let zoe = seed_staff(&store, "clinic_a", "Zoe Park").await;
        let asha = seed_staff(&store, "clinic_a", "Asha Verma").await;

        work_day(&store, zoe, 4, 8).await;
        work_day(&store, asha, 4, 8).await;

        let summaries = summarize(&store, "clinic_a", None, None, None).await;
        assert_eq!(summaries[0].staff_id, asha);
        assert_eq!(summaries[1].staff_id, zoe);
    }
}
