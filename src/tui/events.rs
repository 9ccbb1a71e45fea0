//! Keyboard input for the picker.
//!
//! Key presses are decoded into [`Action`]s here so the picker itself never
//! sees a terminal event:
//!
//! | Key | Action |
//! |---|---|
//! | Enter | commit |
//! | Down / Up | next / previous |
//! | Left / Right | open or close directory |
//! | Space | toggle selection |
//! | Backspace / Delete | drop last query character |
//! | Esc / Ctrl+C | quit |
//! | other printable character | append to query |

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use thiserror::Error;

use crate::picker::Action;

/// Error type for event handling.
#[derive(Debug, Error)]
pub enum EventError {
    /// Reading from the terminal failed.
    #[error("failed to read terminal event: {0}")]
    Io(#[from] io::Error),
}

/// Translate one key event. Releases and repeats are ignored, and so are
/// chords with Ctrl or Alt other than Ctrl+C.
pub fn map_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let chord = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        _ if chord => None,
        KeyCode::Enter => Some(Action::Commit),
        KeyCode::Down => Some(Action::Next),
        KeyCode::Up => Some(Action::Previous),
        KeyCode::Left | KeyCode::Right => Some(Action::ToggleExpansion),
        KeyCode::Char(' ') => Some(Action::ToggleSelection),
        KeyCode::Backspace | KeyCode::Delete => Some(Action::DeleteChar),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c) if !c.is_control() => Some(Action::InsertChar(c)),
        _ => None,
    }
}

/// Polls crossterm for key presses.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Wait up to `timeout` for an event and decode it. Returns `None` on
    /// timeout and for events that carry no action (resize, mouse, focus).
    pub fn poll(&self, timeout: Duration) -> Result<Option<Action>, EventError> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) => {
                let action = map_key(key);
                log::trace!("{:?} -> {:?}", key.code, action);
                Ok(action)
            }
            _ => Ok(None),
        }
    }
}
