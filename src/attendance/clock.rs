//! Clock-in/clock-out state transitions.
//!
//! Per (staff, date) the state machine is: unclocked, open (clock-in
//! recorded), closed (clock-out recorded with a derived status). A second
//! clock-in for the same day conflicts, as does a clock-out without an open
//! record for that exact day; stale open records from prior days persist
//! and never satisfy a later clock-out.

use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

use crate::config::AttendancePolicy;
use crate::error::CoreResult;
use crate::models::{Attendance, AttendanceStatus};
use crate::store::CoreStore;

use super::classify::{classify, worked_hours};

/// Opens an attendance record for the staff member.
///
/// The timestamp defaults to now; the record's date is derived from it.
/// The staff member must belong to the clinic, and no record may already
/// exist for that staff/date — the store enforces the uniqueness under a
/// single lock, so concurrent duplicate clock-ins cannot both succeed.
pub async fn clock_in(
    store: &CoreStore,
    clinic_id: &str,
    staff_id: Uuid,
    at: Option<NaiveDateTime>,
) -> CoreResult<Attendance> {
    // Cross-tenant clock-ins must fail before any insert.
    store.get_staff(clinic_id, staff_id).await?;

    let at = at.unwrap_or_else(|| Utc::now().naive_utc());
    let record = Attendance {
        id: Uuid::new_v4(),
        clinic_id: clinic_id.to_string(),
        staff_id,
        date: at.date(),
        clock_in: at,
        clock_out: None,
        hours_worked: None,
        overtime_hours: None,
        // Provisional until clock-out reclassifies.
        status: AttendanceStatus::Present,
    };
    store.create_attendance(record).await
}

/// Closes the open attendance record for the staff member's day.
///
/// The timestamp defaults to now and selects which day's record is closed.
/// Worked hours are computed from the stored clock-in, rounded to 2
/// decimals, and classified against the clinic's thresholds; overtime is
/// recorded only for present days.
pub async fn clock_out(
    store: &CoreStore,
    policy: &AttendancePolicy,
    clinic_id: &str,
    staff_id: Uuid,
    at: Option<NaiveDateTime>,
) -> CoreResult<Attendance> {
    let at = at.unwrap_or_else(|| Utc::now().naive_utc());

    store
        .close_attendance(clinic_id, staff_id, at.date(), |record| {
            let hours = worked_hours(record.clock_in, at)?;
            let classification = classify(hours, policy);

            record.clock_out = Some(at);
            record.hours_worked = Some(hours);
            record.status = classification.status;
            record.overtime_hours = classification.overtime_hours;
            Ok(())
        })
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::models::{EmploymentStatus, KycStatus, Staff};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
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

    async fn seed_staff(store: &CoreStore, clinic: &str) -> Uuid {
        store
            .insert_staff(Staff {
                id: Uuid::new_v4(),
                clinic_id: clinic.to_string(),
                name: "Asha Verma".to_string(),
                email: None,
                job_role: "nurse".to_string(),
                employment_status: EmploymentStatus::Active,
                kyc_status: KycStatus::Verified,
            })
            .await
            .unwrap()
            .id
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_clock_in_opens_provisional_record() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a").await;

        let record = clock_in(&store, "clinic_a", staff_id, Some(at(4, 9, 0)))
            .await
            .unwrap();
        assert!(record.is_open());
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.hours_worked, None);
    }

    #[tokio::test]
    async fn test_second_clock_in_same_day_conflicts() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a").await;

        clock_in(&store, "clinic_a", staff_id, Some(at(4, 9, 0)))
            .await
            .unwrap();
        let result = clock_in(&store, "clinic_a", staff_id, Some(at(4, 10, 0))).await;
        assert!(matches!(result, Err(CoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_clock_in_for_unknown_staff_is_not_found() {
        let store = CoreStore::new();
        let result = clock_in(&store, "clinic_a", Uuid::new_v4(), Some(at(4, 9, 0))).await;
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_clock_in_for_other_clinics_staff_is_not_found() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_b").await;
        let result = clock_in(&store, "clinic_a", staff_id, Some(at(4, 9, 0))).await;
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_nine_hour_day_is_present_with_overtime() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a").await;

        clock_in(&store, "clinic_a", staff_id, Some(at(4, 9, 0)))
            .await
            .unwrap();
        let record = clock_out(
            &store,
            &test_policy(),
            "clinic_a",
            staff_id,
            Some(at(4, 18, 0)),
        )
        .await
        .unwrap();

        assert_eq!(record.status, AttendanceStatus::Present);
        assert_eq!(record.hours_worked, Some(dec("9.00")));
        assert_eq!(record.overtime_hours, Some(dec("1.00")));
    }

    #[tokio::test]
    async fn test_five_hour_day_is_half_day() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a").await;

        clock_in(&store, "clinic_a", staff_id, Some(at(4, 9, 0)))
            .await
            .unwrap();
        let record = clock_out(
            &store,
            &test_policy(),
            "clinic_a",
            staff_id,
            Some(at(4, 14, 0)),
        )
        .await
        .unwrap();

        assert_eq!(record.status, AttendanceStatus::HalfDay);
        assert_eq!(record.hours_worked, Some(dec("5.00")));
        assert_eq!(record.overtime_hours, None);
    }

    #[tokio::test]
    async fn test_two_hour_day_is_absent() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a").await;

        clock_in(&store, "clinic_a", staff_id, Some(at(4, 9, 0)))
            .await
            .unwrap();
        let record = clock_out(
            &store,
            &test_policy(),
            "clinic_a",
            staff_id,
            Some(at(4, 11, 0)),
        )
        .await
        .unwrap();

        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(record.hours_worked, Some(dec("2.00")));
    }

    #[tokio::test]
    async fn test_clock_out_without_clock_in_conflicts() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a").await;

        let result = clock_out(
            &store,
            &test_policy(),
            "clinic_a",
            staff_id,
            Some(at(4, 17, 0)),
        )
        .await;
        assert!(matches!(result, Err(CoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_stale_open_record_does_not_satisfy_todays_clock_out() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a").await;

        // Open record left over from the prior day.
        clock_in(&store, "clinic_a", staff_id, Some(at(3, 9, 0)))
            .await
            .unwrap();

        let result = clock_out(
            &store,
            &test_policy(),
            "clinic_a",
            staff_id,
            Some(at(4, 17, 0)),
        )
        .await;
        assert!(matches!(result, Err(CoreError::Conflict { .. })));

        // The stale record is still open and untouched.
        let records = store
            .list_attendance("clinic_a", None, None, Some(staff_id))
            .await;
        assert_eq!(records.len(), 1);
        assert!(records[0].is_open());
    }

    #[tokio::test]
    async fn test_clock_out_before_clock_in_is_rejected() {
        let store = CoreStore::new();
        let staff_id = seed_staff(&store, "clinic_a").await;

        clock_in(&store, "clinic_a", staff_id, Some(at(4, 9, 0)))
            .await
            .unwrap();
        let result = clock_out(
            &store,
            &test_policy(),
            "clinic_a",
            staff_id,
            Some(at(4, 8, 0)),
        )
        .await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));

        // Validation failure left the record open.
        let records = store
            .list_attendance("clinic_a", None, None, Some(staff_id))
            .await;
        assert!(records[0].is_open());
    }
}
