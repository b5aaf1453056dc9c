//! Rotation engine
//!
//! This module provides:
//! - `RotationState` / `RenderedPage`: what the scheduler tracks and produces
//! - `tick` / `render`: the pure per-tick state machine
//! - `RotationScheduler`: owned state + config + randomness for a display
//! - `RandomSource`: injectable randomness (`StdRng`, `ScriptedRandom`)
//! - `LaneTally`: lane frequencies over a run of ticks

pub mod random;
pub mod scheduler;
pub mod state;
pub mod tally;

pub use random::{RandomSource, ScriptedRandom};
pub use scheduler::{RotationScheduler, is_instruction_tick, render, resolve_lane, select_lane, tick};
pub use state::{InstructionReason, RenderedPage, RotationState};
pub use tally::LaneTally;
