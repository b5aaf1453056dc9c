//! Display application state
//!
//! Holds the scheduler, the Working Set it last saw and the page on screen.
//! The runner feeds it rotation ticks, new Working Sets and key presses; the
//! views only ever read it through a `Screen`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossterm::event::KeyEvent;
use rand::rngs::StdRng;

use super::input::is_quit_key;
use super::views::Screen;
use crate::config::DisplayConfig;
use crate::lanes::WorkingSet;
use crate::rotation::{InstructionReason, RandomSource, RenderedPage, RotationScheduler};

pub struct DisplayApp<R: RandomSource = StdRng> {
    scheduler: RotationScheduler<R>,
    working_set: Arc<WorkingSet>,
    page: RenderedPage,
    page_started: Instant,
    display: DisplayConfig,
    should_quit: bool,
}

impl<R: RandomSource> DisplayApp<R> {
    pub fn new(scheduler: RotationScheduler<R>, display: DisplayConfig, working_set: Arc<WorkingSet>) -> Self {
        let page = scheduler.current_page(&working_set);
        Self {
            scheduler,
            working_set,
            page,
            page_started: Instant::now(),
            display,
            should_quit: false,
        }
    }

    pub fn page(&self) -> &RenderedPage {
        &self.page
    }

    pub fn scheduler(&self) -> &RotationScheduler<R> {
        &self.scheduler
    }

    pub fn working_set(&self) -> &Arc<WorkingSet> {
        &self.working_set
    }

    pub fn page_started(&self) -> Instant {
        self.page_started
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Nothing has been fetched yet
    pub fn is_loading(&self) -> bool {
        !self.working_set.is_loaded()
    }

    /// Rotation timer fired: move to the next page
    pub fn on_rotation_tick(&mut self) {
        self.page = self.scheduler.advance(&self.working_set);
        self.page_started = Instant::now();
    }

    /// The refresher published a new Working Set.
    ///
    /// The page on screen stays until the next tick, unless there was nothing
    /// to show before: then the new data goes up straight away.
    pub fn on_working_set(&mut self, set: Arc<WorkingSet>) {
        let waiting = self.is_loading()
            || matches!(
                self.page,
                RenderedPage::Instruction {
                    reason: InstructionReason::EmptyWorkingSet,
                    ..
                }
            );

        self.working_set = set;
        if waiting {
            self.page = self.scheduler.current_page(&self.working_set);
            self.page_started = Instant::now();
        }
    }

    /// Handle a key press; quit keys end the display loop
    pub fn handle_key(&mut self, key: KeyEvent) {
        if is_quit_key(&key) {
            self.should_quit = true;
        }
    }

    /// Cards revealed so far on the current page
    pub fn visible_cards(&self, now: Instant) -> usize {
        let total = self.page.entries().len();
        let stagger = Duration::from_millis(self.display.stagger_ms);
        if stagger.is_zero() {
            return total;
        }
        let elapsed = now.saturating_duration_since(self.page_started);
        let revealed = (elapsed.as_millis() / stagger.as_millis()) as usize + 1;
        revealed.min(total)
    }

    /// Everything the views need for one frame
    pub fn screen(&self, now: Instant, wall_clock: DateTime<Utc>) -> Screen<'_> {
        Screen {
            title: &self.display.title,
            page: &self.page,
            set: &self.working_set,
            display: &self.display,
            loading: self.is_loading(),
            visible_cards: self.visible_cards(now),
            now: wall_clock,
        }
    }
}
