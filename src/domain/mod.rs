//! Domain types for Signwall
//!
//! - Entry: one displayable record, plus its tolerant wire form
//! - Snapshot: a complete answer from a snapshot source
//! - Lane: the categories competing for screen time

pub mod entry;
pub mod lane;
pub mod snapshot;

pub use entry::{Entry, WireEntry};
pub use lane::Lane;
pub use snapshot::Snapshot;
