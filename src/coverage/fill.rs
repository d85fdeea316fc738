//! Assignment and locum cover resolution.
//!
//! Both fill paths mutate a block's collections inside the store's atomic
//! update, so concurrent add/remove calls on the same block serialize
//! instead of overwriting each other. Adds are idempotent for staff
//! (membership check before push) and removes of an absent id are no-ops.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{OverfillRule, PolicyConfig};
use crate::error::{CoreError, CoreResult};
use crate::models::{ExternalCover, ScheduleBlock};
use crate::store::CoreStore;

/// Whether a fill mutation adds or removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillAction {
    /// Add the staff member or cover to the block.
    Add,
    /// Remove the staff member or cover from the block.
    Remove,
}

/// Input for attaching an external locum cover.
#[derive(Debug, Clone)]
pub struct NewCover {
    /// The locum's display name. Required.
    pub name: String,
    /// Contact details, if known.
    pub contact: Option<String>,
}

/// A resolved cover mutation: attach a new locum or detach one by id.
#[derive(Debug, Clone)]
pub enum CoverAction {
    /// Attach the given locum; its id is generated at add time.
    Add(NewCover),
    /// Detach the cover with this id. Absent ids are a no-op.
    Remove(Uuid),
}

/// Refuses an add that would push the fill count past the target headcount,
/// when the policy says to.
fn check_overfill(block: &ScheduleBlock, policy: &PolicyConfig) -> CoreResult<()> {
    if policy.coverage.overfill == OverfillRule::Reject && block.is_filled() {
        return Err(CoreError::conflict(format!(
            "block already filled ({} of {})",
            block.fill_count(),
            block.qty_needed
        )));
    }
    Ok(())
}

/// Adds or removes a staff assignment on a block.
///
/// Adding verifies the staff member exists in the clinic first, then is
/// idempotent: an already-assigned id leaves the block unchanged and never
/// trips the overfill check. Removing an absent id is a no-op, not an
/// error.
pub async fn assign_staff(
    store: &CoreStore,
    policy: &PolicyConfig,
    clinic_id: &str,
    block_id: Uuid,
    staff_id: Uuid,
    action: FillAction,
) -> CoreResult<ScheduleBlock> {
    if action == FillAction::Add {
        // Cross-tenant assignment must fail before touching the block.
        store.get_staff(clinic_id, staff_id).await?;
    }

    store
        .update_block(clinic_id, block_id, |block| match action {
            FillAction::Add => {
                if block.has_staff(staff_id) {
                    return Ok(());
                }
                check_overfill(block, policy)?;
                block.assigned_staff_ids.push(staff_id);
                Ok(())
            }
            FillAction::Remove => {
                block.assigned_staff_ids.retain(|id| *id != staff_id);
                Ok(())
            }
        })
        .await
}

/// Attaches or detaches an external locum cover on a block.
///
/// The cover record is typed: `name` is required and validated before the
/// block is touched, and the cover id is generated here at add time.
pub async fn cover_block(
    store: &CoreStore,
    policy: &PolicyConfig,
    clinic_id: &str,
    block_id: Uuid,
    action: CoverAction,
) -> CoreResult<ScheduleBlock> {
    if let CoverAction::Add(cover) = &action {
        if cover.name.trim().is_empty() {
            return Err(CoreError::validation("locum name must not be empty"));
        }
    }

    store
        .update_block(clinic_id, block_id, |block| match action {
            CoverAction::Add(cover) => {
                check_overfill(block, policy)?;
                block.external_covers.push(ExternalCover {
                    id: Uuid::new_v4(),
                    name: cover.name,
                    contact: cover.contact,
                });
                Ok(())
            }
            CoverAction::Remove(cover_id) => {
                block.external_covers.retain(|c| c.id != cover_id);
                Ok(())
            }
        })
        .await
}
