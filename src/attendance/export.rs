//! CSV export of attendance records.
//!
//! Produces the dashboard download: one row per attendance record with the
//! staff member's name and role, clock times, worked hours, and status.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::AttendanceStatus;
use crate::store::CoreStore;

/// The export header row.
const CSV_HEADER: [&str; 7] = [
    "Name",
    "Job Role",
    "Date",
    "Clock In",
    "Clock Out",
    "Hours Worked",
    "Status",
];

/// Clock times are exported in 12-hour wall-clock form, e.g. "09:00 AM".
const TIME_FORMAT: &str = "%I:%M %p";

fn status_label(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => "present",
        AttendanceStatus::HalfDay => "half_day",
        AttendanceStatus::Absent => "absent",
    }
}

/// Exports a clinic's attendance records in a date range as CSV.
///
/// Open records export with empty clock-out and hours columns. Rows follow
/// the listing order: date, then clock-in time.
pub async fn export_csv(
    store: &CoreStore,
    clinic_id: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> CoreResult<String> {
    let records = store.list_attendance(clinic_id, from, to, None).await;
    let directory: HashMap<Uuid, (String, String)> = store
        .list_staff(clinic_id)
        .await
        .into_iter()
        .map(|s| (s.id, (s.name, s.job_role)))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(CSV_HEADER)
        .map_err(|e| CoreError::Store {
            message: format!("CSV write failed: {e}"),
        })?;

    for record in records {
        let (name, job_role) = directory
            .get(&record.staff_id)
            .cloned()
            .unwrap_or_else(|| ("(unknown)".to_string(), String::new()));

        writer
            .write_record([
                name,
                job_role,
                record.date.to_string(),
                record.clock_in.format(TIME_FORMAT).to_string(),
                record
                    .clock_out
                    .map(|t| t.format(TIME_FORMAT).to_string())
                    .unwrap_or_default(),
                record
                    .hours_worked
                    .map(|h| h.to_string())
                    .unwrap_or_default(),
                status_label(record.status).to_string(),
            ])
            .map_err(|e| CoreError::Store {
                message: format!("CSV write failed: {e}"),
            })?;
    }

    let bytes = writer.into_inner().map_err(|e| CoreError::Store {
        message: format!("CSV flush failed: {e}"),
    })?;
    String::from_utf8(bytes).map_err(|e| CoreError::Store {
        message: format!("CSV produced invalid UTF-8: {e}"),
    })
}
