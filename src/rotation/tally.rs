//! Counts of what a run of ticks put on screen

use std::collections::HashMap;

use super::state::RenderedPage;
use crate::domain::Lane;

#[derive(Debug, Clone, Default)]
pub struct LaneTally {
    counts: HashMap<Lane, u64>,
    ticks: u64,
}

impl LaneTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, page: &RenderedPage) {
        *self.counts.entry(page.lane()).or_insert(0) += 1;
        self.ticks += 1;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn count(&self, lane: Lane) -> u64 {
        self.counts.get(&lane).copied().unwrap_or(0)
    }

    /// Fraction of all ticks that showed `lane`
    pub fn share(&self, lane: Lane) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.count(lane) as f64 / self.ticks as f64
    }

    /// Fraction of entry-page ticks that showed `lane`, ignoring instruction pages
    pub fn entry_share(&self, lane: Lane) -> f64 {
        let entry_ticks = self.ticks - self.count(Lane::Instruction);
        if entry_ticks == 0 || !lane.is_entry_lane() {
            return 0.0;
        }
        self.count(lane) as f64 / entry_ticks as f64
    }
}
