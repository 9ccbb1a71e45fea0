//! TUI main loop.
//!
//! Takes over the terminal (raw mode, alternate screen, hidden cursor), runs
//! draw, poll and handle until the user commits or quits, and puts the
//! terminal back afterwards. The terminal is restored on error and on panic
//! as well.

use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use thiserror::Error;

use super::events::{EventError, EventHandler};
use super::ui::render;
use crate::clipboard::Clipboard;
use crate::error::PickFsError;
use crate::logging::suspend_stderr;
use crate::picker::{Action, MessageKind, Picker, Step};
use crate::source::FileSource;
use crate::writer::{Document, XmlWriter};

/// Event poll timeout.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// How long the success message stays up before the picker closes.
const SUCCESS_DELAY: Duration = Duration::from_millis(300);

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// I/O error from terminal operations.
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(#[from] EventError),

    /// The selection could not be serialized.
    #[error("commit failed: {0}")]
    Commit(#[from] PickFsError),
}

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// How the session ended.
#[derive(Debug)]
pub enum Outcome {
    /// The document was copied to the clipboard
    Committed(Document),
    /// The user left without copying
    Cancelled,
}

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Run the interactive picker until it commits or is cancelled.
pub fn run_tui(
    picker: &mut Picker,
    writer: &XmlWriter,
    source: &dyn FileSource,
    clipboard: &dyn Clipboard,
) -> TuiResult<Outcome> {
    let _stderr = suspend_stderr();
    with_restore_on_panic(|| {
        let result = run_tui_inner(picker, writer, source, clipboard);
        restore_terminal();
        result
    })
}

/// Run `f` with a panic hook that restores the terminal before delegating to
/// the hook that was installed before. That hook is put back afterwards.
fn with_restore_on_panic<T>(f: impl FnOnce() -> T) -> T {
    let original = Arc::new(panic::take_hook());
    let chained = Arc::clone(&original);
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        (*chained)(panic_info);
    }));

    let result = f();

    // dropping our hook releases `chained`
    let _ = panic::take_hook();
    match Arc::try_unwrap(original) {
        Ok(hook) => panic::set_hook(hook),
        Err(shared) => panic::set_hook(Box::new(move |panic_info| (*shared)(panic_info))),
    }
    result
}

fn run_tui_inner(
    picker: &mut Picker,
    writer: &XmlWriter,
    source: &dyn FileSource,
    clipboard: &dyn Clipboard,
) -> TuiResult<Outcome> {
    let mut terminal = setup_terminal()?;
    let events = EventHandler::new();

    loop {
        terminal.draw(|frame| render(frame, picker))?;

        let Some(action) = events.poll(POLL_TIMEOUT)? else {
            continue;
        };
        if action != Action::Commit {
            picker.clear_message();
        }

        match picker.handle(action) {
            Step::Continue => {}
            Step::Quit => {
                log::info!("Picker cancelled");
                return Ok(Outcome::Cancelled);
            }
            Step::Commit => {
                if let Some(document) = commit(picker, writer, source, clipboard)? {
                    terminal.draw(|frame| render(frame, picker))?;
                    thread::sleep(SUCCESS_DELAY);
                    return Ok(Outcome::Committed(document));
                }
            }
        }
    }
}

/// Serialize the selection and hand it to the clipboard.
///
/// A clipboard failure is not fatal: it is shown in the status line and
/// `None` is returned so the session can go on.
pub fn commit(
    picker: &mut Picker,
    writer: &XmlWriter,
    source: &dyn FileSource,
    clipboard: &dyn Clipboard,
) -> TuiResult<Option<Document>> {
    let document = picker.serialize(writer, source)?;

    match clipboard.copy_to_clipboard(&document.content) {
        Ok(()) => {
            log::info!(
                "Copied {} files ({} bytes) to {}",
                document.file_count,
                document.content.len(),
                clipboard.name()
            );
            picker.set_message(
                MessageKind::Success,
                format!(
                    "Copied {} file{} to {}",
                    document.file_count,
                    if document.file_count == 1 { "" } else { "s" },
                    clipboard.name()
                ),
            );
            Ok(Some(document))
        }
        Err(e) => {
            log::info!("Clipboard write failed: {}", e);
            picker.set_message(MessageKind::Error, format!("Clipboard write failed: {}", e));
            Ok(None)
        }
    }
}

fn setup_terminal() -> TuiResult<Terminal> {
    log::debug!("Setting up terminal");
    terminal::enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    Ok(terminal)
}

/// Best effort: every step runs even if an earlier one failed.
fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardError;
    use crate::tree::{fixtures::sample, Tree};
    use std::cell::RefCell;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedContent;

    impl FileSource for FixedContent {
        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            Ok("content".to_string())
        }
    }

    #[derive(Default)]
    struct Recorder {
        copied: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Clipboard for Recorder {
        fn copy_to_clipboard(&self, text: &str) -> crate::clipboard::Result<()> {
            if self.fail {
                return Err(ClipboardError::NoClipboardFound);
            }
            self.copied.borrow_mut().push(text.to_string());
            Ok(())
        }

        fn name(&self) -> String {
            "recorder".to_string()
        }
    }

    fn picker_with_readme() -> Picker {
        let mut picker = Picker::new(Tree::new("/p", sample()));
        picker.handle(Action::Next);
        picker.handle(Action::Next);
        picker.handle(Action::ToggleSelection);
        picker
    }

    #[test]
    fn test_commit_copies_document() {
        let mut picker = picker_with_readme();
        let clipboard = Recorder::default();
        let document = commit(&mut picker, &XmlWriter::new(), &FixedContent, &clipboard)
            .unwrap()
            .unwrap();

        assert_eq!(document.file_count, 1);
        assert_eq!(*clipboard.copied.borrow(), vec![document.content.clone()]);
        let message = picker.message().unwrap();
        assert_eq!(message.kind, MessageKind::Success);
        assert_eq!(message.text, "Copied 1 file to recorder");
    }

    #[test]
    fn test_commit_with_empty_selection() {
        let mut picker = Picker::new(Tree::new("/p", sample()));
        let clipboard = Recorder::default();
        let document = commit(&mut picker, &XmlWriter::new(), &FixedContent, &clipboard)
            .unwrap()
            .unwrap();
        assert_eq!(document.file_count, 0);
        assert!(document.content.contains("<files>"));
    }

    #[test]
    fn test_clipboard_failure_keeps_session_open() {
        let mut picker = picker_with_readme();
        let clipboard = Recorder {
            fail: true,
            ..Default::default()
        };
        let result = commit(&mut picker, &XmlWriter::new(), &FixedContent, &clipboard).unwrap();

        assert!(result.is_none());
        let message = picker.message().unwrap();
        assert_eq!(message.kind, MessageKind::Error);
        assert!(message.text.starts_with("Clipboard write failed"));
        assert_eq!(picker.selection().len(), 1);
    }

    #[test]
    fn test_previous_panic_hook_is_put_back() {
        static CUSTOM_HOOK_RAN: AtomicBool = AtomicBool::new(false);

        panic::set_hook(Box::new(|_| CUSTOM_HOOK_RAN.store(true, Ordering::SeqCst)));
        assert_eq!(with_restore_on_panic(|| 7), 7);

        let caught = panic::catch_unwind(|| panic!("after the session"));
        // back to the default hook for the other tests
        let _ = panic::take_hook();

        assert!(caught.is_err());
        assert!(CUSTOM_HOOK_RAN.load(Ordering::SeqCst));
    }

    #[test]
    fn test_tui_error_display() {
        let err = TuiError::Io(io::Error::other("gone"));
        assert!(err.to_string().contains("terminal I/O error"));
        let err = TuiError::Commit(crate::error!(Writer, "bad"));
        assert_eq!(err.to_string(), "commit failed: Writer error: bad");
    }
}
