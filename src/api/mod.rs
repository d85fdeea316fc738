//! HTTP API for the coverage and time-accounting core.
//!
//! This module provides the clinic-scoped REST endpoints consumed by the
//! web dashboards: schedule blocks and their fills, attendance clocking and
//! export, leave requests, and payroll entries.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use response::{ApiError, BulkStatusResponse};
pub use state::AppState;
