//! Lane classification and pagination
//!
//! - `WorkingSet`: recent/older/archive lanes derived from a snapshot
//! - `SharedWorkingSet`: reference-swap publication between refresher and scheduler
//! - `paging`: page counts, slices and index clamping

pub mod paging;
pub mod working_set;

pub use paging::{clamp_index, max_pages, next_sequential, page_slice};
pub use working_set::{SharedWorkingSet, WorkingSet};
