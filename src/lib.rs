//! Signwall - a rotating community wall for unattended displays
//!
//! A background refresher keeps a classified Working Set of entries
//! (recent, older, archive) up to date, and a rotation scheduler picks which
//! page of which lane to show on every tick, interleaving an instruction page
//! on a fixed cadence.

pub mod config;
pub mod display;
pub mod domain;
pub mod error;
pub mod lanes;
pub mod refresh;
pub mod rotation;
pub mod source;

pub use error::{Result, SignwallError};
