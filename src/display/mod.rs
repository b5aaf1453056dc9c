//! Terminal display surface for Signwall.
//!
//! A full-screen, unattended view that shows whatever the rotation scheduler
//! last produced:
//! - **Entries**: one page of a lane, cards fading in one after another
//! - **Instruction**: how to participate, plus aggregate counts
//! - **Loading**: until the first snapshot lands
//!
//! The display owns both timers. Rotation ticks run in the display loop;
//! the refresher runs as a separate task and both stop together on exit.

mod app;
mod events;
mod input;
mod runner;
mod views;

pub use app::DisplayApp;
pub use events::{Event, EventHandler};
pub use input::is_quit_key;
pub use runner::DisplayRunner;
pub use views::{Screen, render};

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use ratatui::prelude::*;
use std::io::{Stdout, stdout};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for display mode.
///
/// Enables raw mode, switches to the alternate screen and hides the cursor.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(Hide)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    stdout().execute(Show)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Display palette.
pub mod colors {
    use ratatui::style::Color;

    use crate::domain::Lane;

    pub const RECENT: Color = Color::Rgb(74, 222, 128); // Green
    pub const OLDER: Color = Color::Rgb(96, 165, 250); // Blue
    pub const ARCHIVE: Color = Color::Rgb(147, 197, 253); // Light blue
    pub const HEADER: Color = Color::White;
    pub const ACCENT: Color = Color::Rgb(96, 165, 250);
    pub const TEXT: Color = Color::Rgb(241, 245, 249);
    pub const DIM: Color = Color::Rgb(148, 163, 184);
    pub const BORDER: Color = Color::Rgb(51, 65, 85);

    /// Indicator color for a lane
    pub fn lane(lane: Lane) -> Color {
        match lane {
            Lane::Recent => RECENT,
            Lane::Older => OLDER,
            Lane::Archive => ARCHIVE,
            Lane::Instruction => HEADER,
        }
    }
}
