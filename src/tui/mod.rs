//! Terminal front end for the picker.
//!
//! - [`events`]: key presses to [`Action`](crate::picker::Action)s
//! - [`ui`]: ratatui rendering of a [`Picker`](crate::picker::Picker)
//! - [`run`]: terminal setup, the event loop and the commit step
//!
//! Data flows one way: terminal event, action, picker state, frame.

pub mod events;
pub mod run;
pub mod ui;

pub use events::{map_key, EventError, EventHandler};
pub use run::{commit, run_tui, Outcome, TuiError, TuiResult};
pub use ui::render;
