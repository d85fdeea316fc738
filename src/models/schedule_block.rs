//! Schedule block and external cover models.
//!
//! A schedule block is a unit of staffing demand: a role, a quantity, and a
//! date/time window at an optional location. Blocks are filled either by
//! assigning staff members or by attaching external locum cover records.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A non-staff locum filling a schedule block.
///
/// Cover records have no independent lifecycle: they are created and removed
/// as part of a block's cover list, and their identifier is generated at add
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCover {
    /// Identifier generated when the cover was attached to the block.
    pub id: Uuid,
    /// The locum's display name.
    pub name: String,
    /// Contact details (phone or email), if provided.
    pub contact: Option<String>,
}

/// A coverage demand unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    /// Unique identifier for the block.
    pub id: Uuid,
    /// The clinic this block belongs to.
    pub clinic_id: String,
    /// The location within the clinic, if any.
    pub location_id: Option<String>,
    /// The date the demand falls on.
    pub date: NaiveDate,
    /// Start of the demand window.
    pub start_time: NaiveTime,
    /// End of the demand window.
    pub end_time: NaiveTime,
    /// The job role needed (matched against staff `job_role`).
    pub role_needed: String,
    /// Target headcount for this block.
    pub qty_needed: u32,
    /// Staff members assigned to this block. Membership is a set: an id
    /// appears at most once.
    pub assigned_staff_ids: Vec<Uuid>,
    /// External locum covers attached to this block.
    pub external_covers: Vec<ExternalCover>,
}

impl ScheduleBlock {
    /// Returns the current fill count: assigned staff plus external covers.
    pub fn fill_count(&self) -> usize {
        self.assigned_staff_ids.len() + self.external_covers.len()
    }

    /// Returns true if no staff or cover fills the block yet.
    pub fn is_unfilled(&self) -> bool {
        self.fill_count() == 0
    }

    /// Returns true if the fill count has reached the target headcount.
    pub fn is_filled(&self) -> bool {
        self.fill_count() >= self.qty_needed as usize
    }

    /// Returns true if the given staff member is assigned to this block.
    pub fn has_staff(&self, staff_id: Uuid) -> bool {
        self.assigned_staff_ids.contains(&staff_id)
    }
}
