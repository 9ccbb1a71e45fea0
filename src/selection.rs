/*!
 * Selection state
 */

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::tree::{subtree, Tree};
use crate::types::Node;

/// Set of selected node identities. It references tree nodes by path and
/// owns none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: BTreeSet<PathBuf>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a node.
    ///
    /// Files flip membership. A directory is treated as all-or-nothing over
    /// itself and every descendant: if all of them are selected they are all
    /// removed, otherwise all of them are added. Selections outside the
    /// directory are never touched.
    pub fn toggle(&mut self, node: &Node) {
        if !node.is_dir() {
            if !self.items.remove(node.id()) {
                self.items.insert(node.id().to_path_buf());
            }
            return;
        }

        let members = subtree(node);
        if self.is_fully_selected(node) {
            for member in members {
                self.items.remove(member.id());
            }
        } else {
            for member in members {
                self.items.insert(member.id().to_path_buf());
            }
        }
    }

    /// Whether the node and all of its descendants are selected
    pub fn is_fully_selected(&self, node: &Node) -> bool {
        subtree(node)
            .iter()
            .all(|member| self.items.contains(member.id()))
    }

    pub fn contains(&self, id: &Path) -> bool {
        self.items.contains(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map the selected identities back to tree nodes, ordered by path
    /// string. Identities the tree no longer holds are skipped.
    pub fn resolve<'a>(&self, tree: &'a Tree) -> Vec<&'a Node> {
        let mut nodes: Vec<&Node> = self
            .items
            .iter()
            .filter_map(|id| {
                let node = tree.find(id);
                if node.is_none() {
                    log::debug!("Dropping stale selection {}", id.display());
                }
                node
            })
            .collect();
        nodes.sort_by(|a, b| a.path.to_string_lossy().cmp(&b.path.to_string_lossy()));
        nodes
    }
}
