//! Keyboard input for the display
//!
//! The display is unattended, so the only meaningful keys are the ones that
//! take it down for maintenance.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// `q`, `Esc` or `Ctrl+C`
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
