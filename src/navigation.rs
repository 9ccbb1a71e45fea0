/*!
 * Cursor movement over the flattened view
 */

use std::path::{Path, PathBuf};

use crate::tree::{find, find_mut, flatten, subtree, Descent};
use crate::types::Node;

/// The "current item" pointer.
///
/// Holds an identity rather than an index so it stays meaningful while the
/// flattened view is rebuilt around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    current: Option<PathBuf>,
}

impl Cursor {
    pub fn new(current: Option<PathBuf>) -> Self {
        Self { current }
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    /// Move down. Steps into an open directory, otherwise advances one row
    /// and wraps to the top after the last one.
    pub fn next(&mut self, view: &[Node]) {
        let flat = flatten(view);
        if flat.is_empty() {
            return;
        }

        let Some(current) = self.current.clone() else {
            self.current = Some(flat[0].path.clone());
            return;
        };

        let Some(node) = find(view, &current, Descent::Visible) else {
            return;
        };
        if node.is_dir() && node.expanded {
            if let Some(first) = node.children.first() {
                self.current = Some(first.path.clone());
                return;
            }
        }

        if let Some(index) = flat.iter().position(|n| n.path == current) {
            let next = (index + 1) % flat.len();
            self.current = Some(flat[next].path.clone());
        }
    }

    /// Move up one row, wrapping to the bottom from the first one.
    pub fn previous(&mut self, view: &[Node]) {
        let flat = flatten(view);
        if flat.is_empty() {
            return;
        }
        let Some(current) = self.current.as_deref() else {
            return;
        };

        if let Some(index) = flat.iter().position(|n| n.path.as_path() == current) {
            let previous = (index + flat.len() - 1) % flat.len();
            self.current = Some(flat[previous].path.clone());
        }
    }

    /// Open or close the directory under the cursor. The cursor stays put.
    pub fn toggle_expansion(&self, view: &mut [Node]) -> bool {
        let Some(current) = self.current.as_deref() else {
            return false;
        };
        match find_mut(view, current, Descent::All) {
            Some(node) if node.is_dir() => {
                node.expanded = !node.expanded;
                true
            }
            _ => false,
        }
    }

    /// Reposition after the query changed.
    ///
    /// Without a query the cursor goes to the first top-level row. With one it
    /// goes to the first matching file: the first row itself when it is a
    /// file, otherwise the first file inside it. No file means no cursor.
    pub fn reset_for_query(&mut self, view: &[Node], query: &str) {
        self.current = match view.first() {
            None => None,
            Some(first) if query.is_empty() || !first.is_dir() => Some(first.path.clone()),
            Some(first) => subtree(first)
                .into_iter()
                .find(|n| !n.is_dir())
                .map(|n| n.path.clone()),
        };
    }
}
