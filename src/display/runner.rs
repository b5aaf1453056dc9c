//! Display Runner - main event loop.
//!
//! The `DisplayRunner` owns the terminal, app, and event handler. It spawns
//! the refresher and runs the main loop: render → wait for a rotation tick,
//! a new Working Set or a key → repeat. Leaving the loop stops the refresher
//! too, so no timer outlives the display.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use eyre::Result;
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Interval, MissedTickBehavior};

use super::Tui;
use super::app::DisplayApp;
use super::events::{Event, EventHandler};
use super::views::render;
use crate::config::Config;
use crate::lanes::{SharedWorkingSet, WorkingSet};
use crate::refresh::Refresher;
use crate::rotation::RotationScheduler;

/// Refresher task tied to the display's lifetime
pub struct RefreshTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Spawn `refresher` on the runtime
    pub fn start(refresher: Refresher) -> Self {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = refresher.spawn(shutdown_rx);
        Self { shutdown, handle }
    }

    /// Signal shutdown and wait for the task to finish
    pub async fn stop(self) {
        if self.shutdown.send(true).is_err() {
            debug!("Refresher already gone");
        }
        if let Err(e) = self.handle.await {
            warn!("Refresher task ended abnormally: {}", e);
        }
    }
}

/// Rotation timer whose first tick comes one full period from now
pub fn rotation_timer(period: Duration) -> Interval {
    let mut rotation = time::interval_at(time::Instant::now() + period, period);
    rotation.set_missed_tick_behavior(MissedTickBehavior::Delay);
    rotation
}

/// Main display runner that owns the event loop.
pub struct DisplayRunner {
    /// The terminal instance
    terminal: Tui,
    /// Rotation and page state
    app: DisplayApp,
    /// Working Set the refresher publishes into
    working_set: SharedWorkingSet,
    /// Event handler for keyboard and redraw events
    event_handler: EventHandler,
    /// How long each page stays up
    page_display_time: Duration,
}

impl DisplayRunner {
    /// Create a new display runner.
    pub fn new(terminal: Tui, config: &Config, working_set: SharedWorkingSet) -> Self {
        let scheduler = RotationScheduler::new(config.rotation.clone());
        let app = DisplayApp::new(scheduler, config.display.clone(), working_set.current());
        Self {
            terminal,
            app,
            working_set,
            event_handler: EventHandler::new(config.display.redraw_ms),
            page_display_time: config.rotation.page_display_time(),
        }
    }

    /// Run until quit, with `refresher` feeding the Working Set.
    pub async fn run(mut self, refresher: Refresher) -> Result<()> {
        // Subscribe before the first fetch can land
        let updates = self.working_set.subscribe();
        let refresh_task = RefreshTask::start(refresher);

        let result = self.event_loop(updates).await;
        refresh_task.stop().await;

        result
    }

    async fn event_loop(&mut self, mut updates: watch::Receiver<Arc<WorkingSet>>) -> Result<()> {
        info!(
            "Starting display loop: page every {:?}, redraw every {:?}",
            self.page_display_time,
            self.event_handler.tick_rate()
        );

        // First page is already up; the first tick replaces it one period later
        let mut rotation = rotation_timer(self.page_display_time);

        loop {
            // 1. Render current state
            let screen = self.app.screen(std::time::Instant::now(), Utc::now());
            self.terminal.draw(|f| render(f, &screen))?;

            // 2. Wait for whatever happens next
            tokio::select! {
                _ = rotation.tick() => {
                    self.app.on_rotation_tick();
                    debug!("Page {:?} (counter {})", self.app.page().lane(), self.app.scheduler().state().page_counter);
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        warn!("Working set channel closed");
                        break;
                    }
                    let set = updates.borrow_and_update().clone();
                    self.app.on_working_set(set);
                    debug!("Working set {}", self.app.working_set().short_fingerprint());
                }
                event = self.event_handler.next() => match event {
                    Some(Event::Key(key)) => self.app.handle_key(key),
                    Some(Event::Tick) | Some(Event::Resize(_, _)) => {
                        // Redraw on next iteration
                    }
                    None => {
                        warn!("Terminal event reader stopped");
                        break;
                    }
                },
            }

            // 3. Check for quit
            if self.app.should_quit() {
                break;
            }
        }

        info!("Display loop ended");
        Ok(())
    }
}
