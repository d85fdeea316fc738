//! Operational policy configuration.
//!
//! Policy knobs (attendance thresholds, the leave day-count rule, the
//! coverage overfill rule) are loaded once at startup from a YAML file and
//! passed by reference to collaborators. Nothing in the core reads ambient
//! process state at call time.

mod loader;
mod types;

pub use loader::PolicyLoader;
pub use types::{
    AttendancePolicy, CoveragePolicy, DayCountRule, LeavePolicy, OverfillRule, PolicyConfig,
};
