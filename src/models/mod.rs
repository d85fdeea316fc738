//! Core data models for the coverage and time-accounting core.
//!
//! This module contains all the domain entities used throughout the core.
//! Every entity carries a `clinic_id`; cross-tenant references are an error.

mod attendance;
mod leave;
mod payroll;
mod schedule_block;
mod staff;

pub use attendance::{Attendance, AttendanceStatus};
pub use leave::{LeaveRequest, LeaveStatus, LeaveType};
pub use payroll::{PayType, PayrollEntry, PayrollStatus};
pub use schedule_block::{ExternalCover, ScheduleBlock};
pub use staff::{EmploymentStatus, KycStatus, Staff};
