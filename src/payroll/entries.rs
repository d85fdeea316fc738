//! Payroll entry upsert, listing, and status changes.
//!
//! Entries are caller-driven: the units, rate, and amount arrive in the
//! payload rather than being recomputed from attendance. What the core
//! guarantees is key uniqueness per clinic, boundary validation, and the
//! forward-only approval chain.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{PayType, PayrollEntry, PayrollStatus};
use crate::store::CoreStore;

use super::status::{advance, try_advance};

/// Input for creating or overwriting a payroll entry.
#[derive(Debug, Clone)]
pub struct PayrollInput {
    /// Unique key per clinic for this line item.
    pub payroll_key: String,
    /// The kind of payable line item.
    pub pay_type: PayType,
    /// The staff member paid. Exactly one of `staff_id` / `location_id`.
    pub staff_id: Option<Uuid>,
    /// The location paid for. Exactly one of `staff_id` / `location_id`.
    pub location_id: Option<String>,
    /// Number of payable units.
    pub units: Decimal,
    /// Rate per unit.
    pub rate: Decimal,
    /// Total payable amount.
    pub amount: Decimal,
}

fn validate_input(input: &PayrollInput) -> CoreResult<()> {
    if input.payroll_key.trim().is_empty() {
        return Err(CoreError::validation("payroll_key must not be empty"));
    }
    match (&input.staff_id, &input.location_id) {
        (Some(_), None) | (None, Some(_)) => {}
        (Some(_), Some(_)) => {
            return Err(CoreError::validation(
                "exactly one of staff_id and location_id must be set, not both",
            ));
        }
        (None, None) => {
            return Err(CoreError::validation(
                "one of staff_id or location_id must be set",
            ));
        }
    }
    for (field, value) in [
        ("units", input.units),
        ("rate", input.rate),
        ("amount", input.amount),
    ] {
        if value < Decimal::ZERO {
            return Err(CoreError::validation(format!(
                "{field} must not be negative, got {value}"
            )));
        }
    }
    Ok(())
}

/// Creates or overwrites the entry for (clinic, payroll_key).
///
/// A new entry starts at draft. Overwriting replaces the payable fields
/// but leaves the approval status and its timestamps alone, so re-deriving
/// a line item never resets its place in the approval chain.
pub async fn upsert_entry(
    store: &CoreStore,
    clinic_id: &str,
    input: PayrollInput,
) -> CoreResult<PayrollEntry> {
    validate_input(&input)?;
    if let Some(staff_id) = input.staff_id {
        // Cross-tenant payroll references must fail before any write.
        store.get_staff(clinic_id, staff_id).await?;
    }

    let payroll_key = input.payroll_key.clone();
    store
        .upsert_payroll(clinic_id, &payroll_key, move |existing| {
            let (status, approved_at, paid_at) = match existing {
                Some(entry) => (entry.status, entry.approved_at, entry.paid_at),
                None => (PayrollStatus::Draft, None, None),
            };
            Ok(PayrollEntry {
                clinic_id: clinic_id.to_string(),
                payroll_key: input.payroll_key,
                pay_type: input.pay_type,
                staff_id: input.staff_id,
                location_id: input.location_id,
                units: input.units,
                rate: input.rate,
                amount: input.amount,
                status,
                approved_at,
                paid_at,
                updated_at: Utc::now(),
            })
        })
        .await
}

/// Lists a clinic's entries, optionally filtered by status, ordered by key.
pub async fn list_entries(
    store: &CoreStore,
    clinic_id: &str,
    status: Option<PayrollStatus>,
) -> Vec<PayrollEntry> {
    store.list_payroll(clinic_id, status).await
}

/// Advances one entry to the target status.
pub async fn set_status(
    store: &CoreStore,
    clinic_id: &str,
    payroll_key: &str,
    target: PayrollStatus,
) -> CoreResult<PayrollEntry> {
    store
        .update_payroll(clinic_id, payroll_key, |entry| advance(entry, target))
        .await
}

/// Advances every listed key that exists and may legally move, returning
/// the number of rows changed. Missing keys and illegal moves are skipped,
/// not reported individually.
pub async fn bulk_set_status(
    store: &CoreStore,
    clinic_id: &str,
    payroll_keys: &[String],
    target: PayrollStatus,
) -> usize {
    store
        .bulk_update_payroll(clinic_id, payroll_keys, |entry| try_advance(entry, target))
        .await
}
