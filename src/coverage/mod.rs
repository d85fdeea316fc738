//! Coverage block management.
//!
//! This module owns the coverage-first scheduling model: schedule blocks as
//! units of staffing demand, and the two ways of filling them — staff
//! assignment and external locum cover. Fill mutations run through the
//! store's atomic block update, so concurrent callers cannot lose writes.

mod blocks;
mod fill;

pub use blocks::{
    create_block, delete_block, list_blocks, update_block, BlockChanges, BlockFilter, NewBlock,
};
pub use fill::{assign_staff, cover_block, CoverAction, FillAction, NewCover};
