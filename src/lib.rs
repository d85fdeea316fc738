//! Coverage and time-accounting core for multi-tenant workforce management.
//!
//! This crate implements the scheduling core of a clinic workforce back end:
//! coverage demand blocks filled by staff assignment or external locum cover,
//! a per-staff-per-day attendance clock state machine, a leave-request
//! workflow, and payroll-entry derivation with an approval state machine.
//! All entities are scoped to a clinic identifier and every operation
//! enforces tenant isolation explicitly.

#![warn(missing_docs)]

pub mod api;
pub mod attendance;
pub mod config;
pub mod coverage;
pub mod error;
pub mod leave;
pub mod models;
pub mod payroll;
pub mod store;
