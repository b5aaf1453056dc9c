//! Rotation state and the pages a tick produces

use serde::{Deserialize, Serialize};

use crate::domain::{Entry, Lane};

/// Transient scheduler state; rebuilt from `default()` whenever the display starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RotationState {
    /// Ticks since start, never reset
    pub page_counter: u64,
    pub current_lane: Lane,
    /// Carried across lanes; only entering `Instruction` resets it
    pub current_page_index: usize,
}

impl RotationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State after an instruction tick
    pub fn instruction(page_counter: u64) -> Self {
        Self {
            page_counter,
            current_lane: Lane::Instruction,
            current_page_index: 0,
        }
    }
}

/// Why the instruction page is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionReason {
    /// Regular every-Nth-page interrupt
    Scheduled,
    /// No lane had anything to show
    EmptyWorkingSet,
}

/// What one tick puts on screen
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedPage {
    Entries {
        lane: Lane,
        page_index: usize,
        max_pages: usize,
        entries: Vec<Entry>,
    },
    Instruction {
        total_entries: usize,
        recent_entries: usize,
        reason: InstructionReason,
    },
}

impl RenderedPage {
    /// Lane shown, `Lane::Instruction` for the instruction page
    pub fn lane(&self) -> Lane {
        match self {
            RenderedPage::Entries { lane, .. } => *lane,
            RenderedPage::Instruction { .. } => Lane::Instruction,
        }
    }

    pub fn is_instruction(&self) -> bool {
        matches!(self, RenderedPage::Instruction { .. })
    }

    /// Entries on the page; empty for the instruction page
    pub fn entries(&self) -> &[Entry] {
        match self {
            RenderedPage::Entries { entries, .. } => entries,
            RenderedPage::Instruction { .. } => &[],
        }
    }

    pub fn page_index(&self) -> Option<usize> {
        match self {
            RenderedPage::Entries { page_index, .. } => Some(*page_index),
            RenderedPage::Instruction { .. } => None,
        }
    }
}
