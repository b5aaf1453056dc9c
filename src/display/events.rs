//! Event handling for the display.
//!
//! This module provides:
//! - `Event`: The unified event type (keyboard, redraw tick, resize)
//! - `EventHandler`: Async event stream fed by a blocking terminal reader

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use log::debug;
use std::time::Duration;
use tokio::sync::mpsc;

/// Unified event type for the display.
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),
    /// Periodic redraw tick
    Tick,
    /// Terminal resize
    Resize(u16, u16),
}

/// Translate a raw terminal event; anything uninteresting becomes a tick.
pub fn translate(event: CrosstermEvent) -> Event {
    match event {
        // Only handle key press events, not release
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
        CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
        _ => Event::Tick,
    }
}

/// Handles keyboard and redraw events.
///
/// A blocking task polls the terminal with the tick rate as timeout and
/// forwards events over a channel, so waiting for input can sit in a
/// `tokio::select!` next to the rotation timer without losing keys.
pub struct EventHandler {
    /// Tick rate
    tick_rate: Duration,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start reading terminal events with the given tick rate.
    pub fn new(tick_rate_ms: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms);
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || {
            loop {
                let event = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(raw) => translate(raw),
                        Err(e) => {
                            debug!("Terminal read failed: {}", e);
                            break;
                        }
                    },
                    // Timeout - generate tick
                    Ok(false) => Event::Tick,
                    Err(e) => {
                        debug!("Terminal poll failed: {}", e);
                        break;
                    }
                };

                // Receiver gone: the display has shut down
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { tick_rate, rx }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Get the next event; `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
