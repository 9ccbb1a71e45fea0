/*!
 * PickFS - Interactively pick files and folders and copy them as XML context for LLMs
 *
 * The directory is loaded into an in-memory tree that the user browses,
 * searches and selects from in the terminal. Committing serializes the
 * selection into one XML document and puts it on the clipboard.
 */

pub mod clipboard;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod navigation;
pub mod picker;
pub mod report;
pub mod selection;
pub mod source;
pub mod tree;
pub mod tui;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use clipboard::{Clipboard, SystemClipboard};
pub use config::Config;
pub use error::{PickFsError, Result};
pub use loader::Loader;
pub use picker::{Action, Picker, Step};
pub use report::{CommitReport, FileReportInfo, ReportFormat, Reporter};
pub use selection::Selection;
pub use source::{FileSource, LocalFs};
pub use tree::Tree;
pub use types::{Node, NodeKind};
pub use writer::{Document, XmlWriter};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
