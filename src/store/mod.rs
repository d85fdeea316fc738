//! In-process store with atomic per-entity operations.
//!
//! One table per entity behind a [`tokio::sync::RwLock`], standing in for
//! the shared relational store. The store's methods are the atomic
//! primitives the core relies on: check-then-insert for attendance runs
//! under a single write lock (the unique (staff, date) index), and every
//! mutation of a schedule block, leave request, or payroll entry applies a
//! fallible closure under one write lock instead of a fetch/mutate/write
//! round trip, so concurrent writers cannot lose updates.
//!
//! Tenant isolation is enforced here and only here by filtering every
//! lookup on `clinic_id`; a clinic mismatch surfaces as [`CoreError::NotFound`],
//! never as a cross-tenant read or write.

use std::collections::HashMap;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    Attendance, LeaveRequest, LeaveStatus, PayrollEntry, PayrollStatus, ScheduleBlock, Staff,
};

/// The shared store for all core entities.
#[derive(Debug, Default)]
pub struct CoreStore {
    staff: RwLock<HashMap<Uuid, Staff>>,
    blocks: RwLock<HashMap<Uuid, ScheduleBlock>>,
    attendance: RwLock<HashMap<Uuid, Attendance>>,
    leave: RwLock<HashMap<Uuid, LeaveRequest>>,
    payroll: RwLock<HashMap<(String, String), PayrollEntry>>,
}

impl CoreStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ---- staff directory ----

    /// Inserts a staff member.
    pub async fn insert_staff(&self, staff: Staff) -> CoreResult<Staff> {
        let mut table = self.staff.write().await;
        table.insert(staff.id, staff.clone());
        Ok(staff)
    }

    /// Fetches a staff member scoped to a clinic.
    pub async fn get_staff(&self, clinic_id: &str, id: Uuid) -> CoreResult<Staff> {
        let table = self.staff.read().await;
        table
            .get(&id)
            .filter(|s| s.clinic_id == clinic_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("staff member", id))
    }

    /// Lists a clinic's staff, ordered by name.
    pub async fn list_staff(&self, clinic_id: &str) -> Vec<Staff> {
        let table = self.staff.read().await;
        let mut staff: Vec<Staff> = table
            .values()
            .filter(|s| s.clinic_id == clinic_id)
            .cloned()
            .collect();
        staff.sort_by(|a, b| a.name.cmp(&b.name));
        staff
    }

    // ---- schedule blocks ----

    /// Inserts a schedule block.
    pub async fn insert_block(&self, block: ScheduleBlock) -> CoreResult<ScheduleBlock> {
        let mut table = self.blocks.write().await;
        table.insert(block.id, block.clone());
        Ok(block)
    }

    /// Fetches a schedule block scoped to a clinic.
    pub async fn get_block(&self, clinic_id: &str, id: Uuid) -> CoreResult<ScheduleBlock> {
        let table = self.blocks.read().await;
        table
            .get(&id)
            .filter(|b| b.clinic_id == clinic_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("schedule block", id))
    }

    /// Lists a clinic's schedule blocks, optionally filtered by location and
    /// date range, ordered by date then start time.
    pub async fn list_blocks(
        &self,
        clinic_id: &str,
        location_id: Option<&str>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<ScheduleBlock> {
        let table = self.blocks.read().await;
        let mut blocks: Vec<ScheduleBlock> = table
            .values()
            .filter(|b| b.clinic_id == clinic_id)
            .filter(|b| location_id.is_none_or(|loc| b.location_id.as_deref() == Some(loc)))
            .filter(|b| from.is_none_or(|d| b.date >= d))
            .filter(|b| to.is_none_or(|d| b.date <= d))
            .cloned()
            .collect();
        blocks.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        blocks
    }

    /// Applies a fallible mutation to a schedule block under one write lock.
    ///
    /// If the closure returns an error the block is left untouched. This is
    /// the atomic set-update primitive used for assignment and locum
    /// mutations; concurrent callers serialize on the lock instead of
    /// overwriting each other's whole-row writes.
    pub async fn update_block<F>(
        &self,
        clinic_id: &str,
        id: Uuid,
        mutate: F,
    ) -> CoreResult<ScheduleBlock>
    where
        F: FnOnce(&mut ScheduleBlock) -> CoreResult<()>,
    {
        let mut table = self.blocks.write().await;
        let block = table
            .get_mut(&id)
            .filter(|b| b.clinic_id == clinic_id)
            .ok_or_else(|| CoreError::not_found("schedule block", id))?;

        let mut updated = block.clone();
        mutate(&mut updated)?;
        *block = updated.clone();
        Ok(updated)
    }

    /// Removes a schedule block after the guard approves it, atomically.
    pub async fn remove_block<F>(&self, clinic_id: &str, id: Uuid, guard: F) -> CoreResult<()>
    where
        F: FnOnce(&ScheduleBlock) -> CoreResult<()>,
    {
        let mut table = self.blocks.write().await;
        let block = table
            .get(&id)
            .filter(|b| b.clinic_id == clinic_id)
            .ok_or_else(|| CoreError::not_found("schedule block", id))?;

        guard(block)?;
        table.remove(&id);
        Ok(())
    }

    // ---- attendance ----

    /// Inserts an attendance record, enforcing the unique (staff, date)
    /// constraint.
    ///
    /// The existence check and the insert run under the same write lock, so
    /// two concurrent clock-ins for the same staff member and date cannot
    /// both succeed.
    pub async fn create_attendance(&self, record: Attendance) -> CoreResult<Attendance> {
        let mut table = self.attendance.write().await;
        let duplicate = table
            .values()
            .any(|a| a.staff_id == record.staff_id && a.date == record.date);
        if duplicate {
            return Err(CoreError::conflict(format!(
                "already clocked in for {}",
                record.date
            )));
        }
        table.insert(record.id, record.clone());
        Ok(record)
    }

    /// Closes the open attendance record for (staff, date) via a fallible
    /// closure, under one write lock.
    ///
    /// Fails with a conflict when no open record exists for that exact date;
    /// stale open records from earlier days do not satisfy the lookup and
    /// are never auto-closed.
    pub async fn close_attendance<F>(
        &self,
        clinic_id: &str,
        staff_id: Uuid,
        date: NaiveDate,
        mutate: F,
    ) -> CoreResult<Attendance>
    where
        F: FnOnce(&mut Attendance) -> CoreResult<()>,
    {
        let mut table = self.attendance.write().await;
        let record = table
            .values_mut()
            .find(|a| {
                a.clinic_id == clinic_id && a.staff_id == staff_id && a.date == date && a.is_open()
            })
            .ok_or_else(|| CoreError::conflict(format!("no active clock-in for {date}")))?;

        let mut updated = record.clone();
        mutate(&mut updated)?;
        *record = updated.clone();
        Ok(updated)
    }

    /// Lists a clinic's attendance records, optionally filtered by date
    /// range and staff member, ordered by date then clock-in time.
    pub async fn list_attendance(
        &self,
        clinic_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        staff_id: Option<Uuid>,
    ) -> Vec<Attendance> {
        let table = self.attendance.read().await;
        let mut records: Vec<Attendance> = table
            .values()
            .filter(|a| a.clinic_id == clinic_id)
            .filter(|a| from.is_none_or(|d| a.date >= d))
            .filter(|a| to.is_none_or(|d| a.date <= d))
            .filter(|a| staff_id.is_none_or(|s| a.staff_id == s))
            .cloned()
            .collect();
        records.sort_by(|a, b| (a.date, a.clock_in).cmp(&(b.date, b.clock_in)));
        records
    }

    // ---- leave requests ----

    /// Inserts a leave request.
    pub async fn insert_leave(&self, request: LeaveRequest) -> CoreResult<LeaveRequest> {
        let mut table = self.leave.write().await;
        table.insert(request.id, request.clone());
        Ok(request)
    }

    /// Fetches a leave request scoped to a clinic.
    pub async fn get_leave(&self, clinic_id: &str, id: Uuid) -> CoreResult<LeaveRequest> {
        let table = self.leave.read().await;
        table
            .get(&id)
            .filter(|r| r.clinic_id == clinic_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("leave request", id))
    }

    /// Lists a clinic's leave requests, optionally filtered by status and
    /// staff member, ordered by from-date.
    pub async fn list_leave(
        &self,
        clinic_id: &str,
        status: Option<LeaveStatus>,
        staff_id: Option<Uuid>,
    ) -> Vec<LeaveRequest> {
        let table = self.leave.read().await;
        let mut requests: Vec<LeaveRequest> = table
            .values()
            .filter(|r| r.clinic_id == clinic_id)
            .filter(|r| status.is_none_or(|s| r.status == s))
            .filter(|r| staff_id.is_none_or(|s| r.staff_id == s))
            .cloned()
            .collect();
        requests.sort_by(|a, b| (a.from_date, a.created_at).cmp(&(b.from_date, b.created_at)));
        requests
    }

    /// Applies a fallible mutation to a leave request under one write lock.
    pub async fn update_leave<F>(
        &self,
        clinic_id: &str,
        id: Uuid,
        mutate: F,
    ) -> CoreResult<LeaveRequest>
    where
        F: FnOnce(&mut LeaveRequest) -> CoreResult<()>,
    {
        let mut table = self.leave.write().await;
        let request = table
            .get_mut(&id)
            .filter(|r| r.clinic_id == clinic_id)
            .ok_or_else(|| CoreError::not_found("leave request", id))?;

        let mut updated = request.clone();
        mutate(&mut updated)?;
        *request = updated.clone();
        Ok(updated)
    }

    /// Removes a leave request after the guard approves it, atomically.
    pub async fn remove_leave<F>(&self, clinic_id: &str, id: Uuid, guard: F) -> CoreResult<()>
    where
        F: FnOnce(&LeaveRequest) -> CoreResult<()>,
    {
        let mut table = self.leave.write().await;
        let request = table
            .get(&id)
            .filter(|r| r.clinic_id == clinic_id)
            .ok_or_else(|| CoreError::not_found("leave request", id))?;

        guard(request)?;
        table.remove(&id);
        Ok(())
    }

    // ---- payroll entries ----

    /// Creates or overwrites the payroll entry for (clinic, key).
    ///
    /// The closure receives the existing entry, if any, and produces the row
    /// to store; read and write happen under one lock so the upsert is
    /// idempotent under concurrency.
    pub async fn upsert_payroll<F>(
        &self,
        clinic_id: &str,
        payroll_key: &str,
        build: F,
    ) -> CoreResult<PayrollEntry>
    where
        F: FnOnce(Option<&PayrollEntry>) -> CoreResult<PayrollEntry>,
    {
        let mut table = self.payroll.write().await;
        let key = (clinic_id.to_string(), payroll_key.to_string());
        let entry = build(table.get(&key))?;
        table.insert(key, entry.clone());
        Ok(entry)
    }

    /// Fetches a payroll entry scoped to a clinic.
    pub async fn get_payroll(&self, clinic_id: &str, payroll_key: &str) -> CoreResult<PayrollEntry> {
        let table = self.payroll.read().await;
        table
            .get(&(clinic_id.to_string(), payroll_key.to_string()))
            .cloned()
            .ok_or_else(|| CoreError::not_found("payroll entry", payroll_key))
    }

    /// Lists a clinic's payroll entries, optionally filtered by status,
    /// ordered by key.
    pub async fn list_payroll(
        &self,
        clinic_id: &str,
        status: Option<PayrollStatus>,
    ) -> Vec<PayrollEntry> {
        let table = self.payroll.read().await;
        let mut entries: Vec<PayrollEntry> = table
            .values()
            .filter(|e| e.clinic_id == clinic_id)
            .filter(|e| status.is_none_or(|s| e.status == s))
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.payroll_key.cmp(&b.payroll_key));
        entries
    }

    /// Applies a fallible mutation to a payroll entry under one write lock.
    pub async fn update_payroll<F>(
        &self,
        clinic_id: &str,
        payroll_key: &str,
        mutate: F,
    ) -> CoreResult<PayrollEntry>
    where
        F: FnOnce(&mut PayrollEntry) -> CoreResult<()>,
    {
        let mut table = self.payroll.write().await;
        let entry = table
            .get_mut(&(clinic_id.to_string(), payroll_key.to_string()))
            .ok_or_else(|| CoreError::not_found("payroll entry", payroll_key))?;

        let mut updated = entry.clone();
        mutate(&mut updated)?;
        *entry = updated.clone();
        Ok(updated)
    }

    /// Applies a mutation to every listed key that exists and accepts it,
    /// under one write lock, and returns the number of rows changed.
    ///
    /// The update is atomic as a set; callers get an affected-row count, not
    /// per-key outcomes. Keys that are absent or whose closure declines the
    /// change are skipped.
    pub async fn bulk_update_payroll<F>(
        &self,
        clinic_id: &str,
        payroll_keys: &[String],
        mutate: F,
    ) -> usize
    where
        F: Fn(&mut PayrollEntry) -> bool,
    {
        let mut table = self.payroll.write().await;
        let mut affected = 0;
        for payroll_key in payroll_keys {
            let key = (clinic_id.to_string(), payroll_key.clone());
            if let Some(entry) = table.get_mut(&key) {
                let mut updated = entry.clone();
                if mutate(&mut updated) {
                    *entry = updated;
                    affected += 1;
                }
            }
        }
        affected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, EmploymentStatus, KycStatus};
    use chrono::{NaiveTime, Utc};
    use std::sync::Arc;

    fn test_staff(clinic: &str) -> Staff {
        Staff {
            id: Uuid::new_v4(),
            clinic_id: clinic.to_string(),
            name: "Asha Verma".to_string(),
            email: None,
            job_role: "nurse".to_string(),
            employment_status: EmploymentStatus::Active,
            kyc_status: KycStatus::Verified,
        }
    }

    fn test_block(clinic: &str) -> ScheduleBlock {
        ScheduleBlock {
            id: Uuid::new_v4(),
            clinic_id: clinic.to_string(),
            location_id: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            role_needed: "nurse".to_string(),
            qty_needed: 10,
            assigned_staff_ids: vec![],
            external_covers: vec![],
        }
    }

    fn test_attendance(clinic: &str, staff_id: Uuid, date: NaiveDate) -> Attendance {
        Attendance {
            id: Uuid::new_v4(),
            clinic_id: clinic.to_string(),
            staff_id,
            date,
            clock_in: date.and_hms_opt(9, 0, 0).unwrap(),
            clock_out: None,
            hours_worked: None,
            overtime_hours: None,
            status: AttendanceStatus::Present,
        }
    }

    #[tokio::test]
    async fn test_get_staff_rejects_other_clinic() {
        let store = CoreStore::new();
        let staff = store.insert_staff(test_staff("clinic_a")).await.unwrap();

        assert!(store.get_staff("clinic_a", staff.id).await.is_ok());
        let result = store.get_staff("clinic_b", staff.id).await;
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_blocks_orders_by_date_then_start_time() {
        let store = CoreStore::new();

        let mut late = test_block("clinic_a");
        late.start_time = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        let mut early = test_block("clinic_a");
        early.start_time = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        let mut next_day = test_block("clinic_a");
        next_day.date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        next_day.start_time = NaiveTime::from_hms_opt(6, 0, 0).unwrap();

        store.insert_block(next_day.clone()).await.unwrap();
        store.insert_block(late.clone()).await.unwrap();
        store.insert_block(early.clone()).await.unwrap();

        let blocks = store.list_blocks("clinic_a", None, None, None).await;
        let ids: Vec<Uuid> = blocks.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![early.id, late.id, next_day.id]);
    }

    #[tokio::test]
    async fn test_list_blocks_filters_by_location_and_range() {
        let store = CoreStore::new();

        let mut ward = test_block("clinic_a");
        ward.location_id = Some("ward_1".to_string());
        let other = test_block("clinic_a");
        store.insert_block(ward.clone()).await.unwrap();
        store.insert_block(other).await.unwrap();

        let blocks = store
            .list_blocks("clinic_a", Some("ward_1"), None, None)
            .await;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].id, ward.id);

        let out_of_range = store
            .list_blocks(
                "clinic_a",
                None,
                Some(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
                None,
            )
            .await;
        assert!(out_of_range.is_empty());
    }

    #[tokio::test]
    async fn test_update_block_error_leaves_block_untouched() {
        let store = CoreStore::new();
        let block = store.insert_block(test_block("clinic_a")).await.unwrap();

        let result = store
            .update_block("clinic_a", block.id, |b| {
                b.assigned_staff_ids.push(Uuid::new_v4());
                Err(CoreError::conflict("abort"))
            })
            .await;
        assert!(result.is_err());

        let unchanged = store.get_block("clinic_a", block.id).await.unwrap();
        assert!(unchanged.assigned_staff_ids.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_block_updates_lose_no_writes() {
        let store = Arc::new(CoreStore::new());
        let block = store.insert_block(test_block("clinic_a")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = Arc::clone(&store);
            let block_id = block.id;
            handles.push(tokio::spawn(async move {
                store
                    .update_block("clinic_a", block_id, |b| {
                        b.assigned_staff_ids.push(Uuid::new_v4());
                        Ok(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let updated = store.get_block("clinic_a", block.id).await.unwrap();
        assert_eq!(updated.assigned_staff_ids.len(), 10);
    }

    #[tokio::test]
    async fn test_create_attendance_enforces_staff_date_uniqueness() {
        let store = CoreStore::new();
        let staff_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        store
            .create_attendance(test_attendance("clinic_a", staff_id, date))
            .await
            .unwrap();
        let second = store
            .create_attendance(test_attendance("clinic_a", staff_id, date))
            .await;
        assert!(matches!(second, Err(CoreError::Conflict { .. })));

        // A different date is fine.
        let next_day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(store
            .create_attendance(test_attendance("clinic_a", staff_id, next_day))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_clock_ins_only_one_succeeds() {
        let store = Arc::new(CoreStore::new());
        let staff_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create_attendance(test_attendance("clinic_a", staff_id, date))
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_close_attendance_ignores_stale_open_records() {
        let store = CoreStore::new();
        let staff_id = Uuid::new_v4();
        let yesterday = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();

        // Stale open record from the prior day.
        store
            .create_attendance(test_attendance("clinic_a", staff_id, yesterday))
            .await
            .unwrap();

        let result = store
            .close_attendance("clinic_a", staff_id, today, |_| Ok(()))
            .await;
        assert!(matches!(result, Err(CoreError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_bulk_update_payroll_counts_affected_rows() {
        let store = CoreStore::new();
        let entry = PayrollEntry {
            clinic_id: "clinic_a".to_string(),
            payroll_key: "2024-03-asha".to_string(),
            pay_type: crate::models::PayType::Salary,
            staff_id: Some(Uuid::new_v4()),
            location_id: None,
            units: rust_decimal::Decimal::ZERO,
            rate: rust_decimal::Decimal::ZERO,
            amount: rust_decimal::Decimal::ZERO,
            status: PayrollStatus::Draft,
            approved_at: None,
            paid_at: None,
            updated_at: Utc::now(),
        };
        store
            .upsert_payroll("clinic_a", "2024-03-asha", |_| Ok(entry.clone()))
            .await
            .unwrap();

        let keys = vec!["2024-03-asha".to_string(), "missing".to_string()];
        let affected = store
            .bulk_update_payroll("clinic_a", &keys, |e| {
                e.status = PayrollStatus::Submitted;
                true
            })
            .await;
        assert_eq!(affected, 1);

        let updated = store.get_payroll("clinic_a", "2024-03-asha").await.unwrap();
        assert_eq!(updated.status, PayrollStatus::Submitted);
    }
}
