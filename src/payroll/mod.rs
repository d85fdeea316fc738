//! Payroll entry derivation and approval.
//!
//! Payable line items are keyed per clinic by `payroll_key`, upserted
//! idempotently from caller-supplied units/rate/amount, and advanced
//! through a strict forward-only approval chain.

mod entries;
mod status;

pub use entries::{bulk_set_status, list_entries, set_status, upsert_entry, PayrollInput};
pub use status::{advance, status_label, try_advance};
