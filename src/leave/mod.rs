//! Leave request workflow.
//!
//! Staff-initiated time-off requests compete for the same capacity the
//! coverage blocks consume. Requests are created pending, reviewed exactly
//! once (approve, reject, or cancel), and only pending requests may be
//! deleted. Approval deliberately does not reconcile schedule-block
//! assignments or attendance expectations for the covered dates.

mod day_count;
mod workflow;

pub use day_count::count_days;
pub use workflow::{
    create_request, delete_request, list_requests, review, NewLeaveRequest, ReviewAction,
};
