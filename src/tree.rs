/*!
 * In-memory tree model and traversal helpers
 *
 * Every lookup is a depth-first walk over a slice of top-level nodes. The
 * only thing that differs between "search the whole tree" and "search what
 * the user can currently see" is which directories the walk descends into,
 * expressed by [`Descent`].
 */

use std::path::{Path, PathBuf};

use crate::types::Node;

/// Which directories a traversal descends into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descent {
    /// Every directory, regardless of expansion state
    All,
    /// Only expanded directories
    Visible,
}

impl Descent {
    fn enters(self, node: &Node) -> bool {
        node.is_dir() && (self == Descent::All || node.expanded)
    }
}

/// The loaded tree: the scanned root and its top-level entries
#[derive(Debug, Clone, Default)]
pub struct Tree {
    root: PathBuf,
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root: impl Into<PathBuf>, nodes: Vec<Node>) -> Self {
        Self {
            root: root.into(),
            nodes,
        }
    }

    /// Directory the tree was loaded from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Top-level entries
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look a node up anywhere in the tree
    pub fn find(&self, id: &Path) -> Option<&Node> {
        find(&self.nodes, id, Descent::All)
    }

    /// Total number of nodes, expanded or not
    pub fn len(&self) -> usize {
        self.nodes.iter().map(|n| subtree(n).len()).sum()
    }
}

/// Depth-first lookup by identity
pub fn find<'a>(nodes: &'a [Node], id: &Path, descent: Descent) -> Option<&'a Node> {
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if descent.enters(node) {
            if let Some(found) = find(&node.children, id, descent) {
                return Some(found);
            }
        }
    }
    None
}

/// Mutable variant of [`find`]
pub fn find_mut<'a>(nodes: &'a mut [Node], id: &Path, descent: Descent) -> Option<&'a mut Node> {
    for node in nodes.iter_mut() {
        if node.path.as_path() == id {
            return Some(node);
        }
        if descent.enters(node) {
            if let Some(found) = find_mut(&mut node.children, id, descent) {
                return Some(found);
            }
        }
    }
    None
}

/// The node itself followed by all of its descendants in pre-order,
/// ignoring expansion state
pub fn subtree(node: &Node) -> Vec<&Node> {
    let mut out = Vec::new();
    collect(node, Descent::All, &mut out);
    out
}

/// Pre-order listing of what is visible: children of a directory are only
/// included when it is expanded
pub fn flatten(nodes: &[Node]) -> Vec<&Node> {
    let mut out = Vec::new();
    for node in nodes {
        collect(node, Descent::Visible, &mut out);
    }
    out
}

fn collect<'a>(node: &'a Node, descent: Descent, out: &mut Vec<&'a Node>) {
    out.push(node);
    if descent.enters(node) {
        for child in &node.children {
            collect(child, descent, out);
        }
    }
}

/// Change the expansion flag of one node. Descendants are left alone.
/// Returns false when the node does not exist or is not a directory.
pub fn set_expanded(nodes: &mut [Node], id: &Path, expanded: bool) -> bool {
    match find_mut(nodes, id, Descent::All) {
        Some(node) if node.is_dir() => {
            node.expanded = expanded;
            true
        }
        _ => false,
    }
}
