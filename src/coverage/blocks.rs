//! Schedule block CRUD.
//!
//! Blocks are created by a planner, listed by location and date range, and
//! deleted only while unfilled. Every operation is scoped by clinic; a
//! mismatched clinic behaves exactly like a missing block.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::ScheduleBlock;
use crate::store::CoreStore;

/// Input for creating a schedule block.
#[derive(Debug, Clone)]
pub struct NewBlock {
    /// The location within the clinic, if any.
    pub location_id: Option<String>,
    /// The date the demand falls on.
    pub date: NaiveDate,
    /// Start of the demand window.
    pub start_time: NaiveTime,
    /// End of the demand window.
    pub end_time: NaiveTime,
    /// The job role needed.
    pub role_needed: String,
    /// Target headcount; defaults to 1 when absent.
    pub qty_needed: Option<u32>,
}

/// Partial update for a schedule block. Absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BlockChanges {
    /// New location, if changing.
    pub location_id: Option<String>,
    /// New date, if changing.
    pub date: Option<NaiveDate>,
    /// New window start, if changing.
    pub start_time: Option<NaiveTime>,
    /// New window end, if changing.
    pub end_time: Option<NaiveTime>,
    /// New role, if changing.
    pub role_needed: Option<String>,
    /// New target headcount, if changing.
    pub qty_needed: Option<u32>,
}

/// Listing filter for schedule blocks.
#[derive(Debug, Clone, Default)]
pub struct BlockFilter {
    /// Only blocks at this location.
    pub location_id: Option<String>,
    /// Only blocks on or after this date.
    pub from: Option<NaiveDate>,
    /// Only blocks on or before this date.
    pub to: Option<NaiveDate>,
}

fn validate_window(start_time: NaiveTime, end_time: NaiveTime) -> CoreResult<()> {
    if end_time <= start_time {
        return Err(CoreError::validation(format!(
            "end_time ({end_time}) must be after start_time ({start_time})"
        )));
    }
    Ok(())
}

fn validate_role(role_needed: &str) -> CoreResult<()> {
    if role_needed.trim().is_empty() {
        return Err(CoreError::validation("role_needed must not be empty"));
    }
    Ok(())
}

fn validate_qty(qty_needed: u32) -> CoreResult<()> {
    if qty_needed == 0 {
        return Err(CoreError::validation("qty_needed must be at least 1"));
    }
    Ok(())
}

/// Creates a schedule block with empty assignments and covers.
pub async fn create_block(
    store: &CoreStore,
    clinic_id: &str,
    new_block: NewBlock,
) -> CoreResult<ScheduleBlock> {
    validate_window(new_block.start_time, new_block.end_time)?;
    validate_role(&new_block.role_needed)?;
    let qty_needed = new_block.qty_needed.unwrap_or(1);
    validate_qty(qty_needed)?;

    let block = ScheduleBlock {
        id: Uuid::new_v4(),
        clinic_id: clinic_id.to_string(),
        location_id: new_block.location_id,
        date: new_block.date,
        start_time: new_block.start_time,
        end_time: new_block.end_time,
        role_needed: new_block.role_needed,
        qty_needed,
        assigned_staff_ids: Vec::new(),
        external_covers: Vec::new(),
    };
    store.insert_block(block).await
}

/// Lists a clinic's blocks by the given filter, ordered by date then start
/// time.
pub async fn list_blocks(
    store: &CoreStore,
    clinic_id: &str,
    filter: &BlockFilter,
) -> Vec<ScheduleBlock> {
    store
        .list_blocks(
            clinic_id,
            filter.location_id.as_deref(),
            filter.from,
            filter.to,
        )
        .await
}

/// Applies a partial update to a block.
///
/// The resulting time window is validated as a whole, so moving only one
/// end of the window cannot invert it.
pub async fn update_block(
    store: &CoreStore,
    clinic_id: &str,
    block_id: Uuid,
    changes: BlockChanges,
) -> CoreResult<ScheduleBlock> {
    store
        .update_block(clinic_id, block_id, |block| {
            if let Some(location_id) = changes.location_id {
                block.location_id = Some(location_id);
            }
            if let Some(date) = changes.date {
                block.date = date;
            }
            if let Some(start_time) = changes.start_time {
                block.start_time = start_time;
            }
            if let Some(end_time) = changes.end_time {
                block.end_time = end_time;
            }
            if let Some(role_needed) = changes.role_needed {
                validate_role(&role_needed)?;
                block.role_needed = role_needed;
            }
            if let Some(qty_needed) = changes.qty_needed {
                validate_qty(qty_needed)?;
                block.qty_needed = qty_needed;
            }
            validate_window(block.start_time, block.end_time)
        })
        .await
}

/// Deletes a block, refusing while anything fills it.
pub async fn delete_block(store: &CoreStore, clinic_id: &str, block_id: Uuid) -> CoreResult<()> {
    store
        .remove_block(clinic_id, block_id, |block| {
            if !block.is_unfilled() {
                return Err(CoreError::conflict(format!(
                    "cannot delete a filled block ({} of {} filled)",
                    block.fill_count(),
                    block.qty_needed
                )));
            }
            Ok(())
        })
        .await
}
