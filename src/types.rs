/*!
 * Core types and data structures for the PickFS application
 */

use std::path::{Path, PathBuf};

/// Kind of a tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Regular file (or anything that is not a directory)
    File,
    /// Directory containing other entries
    Directory,
}

/// A single entry of the loaded tree.
///
/// The path doubles as the node identity: it is unique across the tree and
/// stable for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Base name
    pub name: String,
    /// Filesystem path, also used as identity and sort key
    pub path: PathBuf,
    /// File or directory
    pub kind: NodeKind,
    /// Sorted children, always empty for files
    pub children: Vec<Node>,
    /// Whether the directory is open in the view; ignored for files
    pub expanded: bool,
    /// Distance from the root, top-level entries are at depth 0
    pub depth: usize,
}

impl Node {
    /// Create a file node
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>, depth: usize) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::File,
            children: Vec::new(),
            expanded: false,
            depth,
        }
    }

    /// Create a collapsed directory node
    pub fn directory(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        depth: usize,
        children: Vec<Node>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: NodeKind::Directory,
            children,
            expanded: false,
            depth,
        }
    }

    /// Identity of the node
    pub fn id(&self) -> &Path {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}
