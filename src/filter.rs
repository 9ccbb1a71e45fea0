/*!
 * Search filtering
 *
 * Filtering never touches the loaded tree. It builds a fresh copy holding
 * only matching files and the directories leading to them, with those
 * directories forced open, so the user's own expansion state survives any
 * number of query changes.
 */

use std::path::{Path, PathBuf};

use crate::types::{Node, NodeKind};

/// Derive the search view for `query`.
///
/// An empty query yields the nodes unchanged. Otherwise a file is kept when
/// its name contains the query (case-insensitive), and a directory is kept
/// when anything below it is kept.
pub fn filter(nodes: &[Node], query: &str) -> Vec<Node> {
    if query.is_empty() {
        return nodes.to_vec();
    }

    let needle = query.to_lowercase();
    let mut kept = filter_nodes(nodes, &needle);

    let mut matches = Vec::new();
    collect_files(&kept, &mut matches);
    for path in &matches {
        expand_parent_folders(&mut kept, path);
    }

    kept
}

fn filter_nodes(nodes: &[Node], needle: &str) -> Vec<Node> {
    nodes
        .iter()
        .filter_map(|node| match node.kind {
            NodeKind::Directory => {
                let children = filter_nodes(&node.children, needle);
                if children.is_empty() {
                    None
                } else {
                    Some(Node {
                        name: node.name.clone(),
                        path: node.path.clone(),
                        kind: NodeKind::Directory,
                        children,
                        expanded: true,
                        depth: node.depth,
                    })
                }
            }
            NodeKind::File => {
                if node.name.to_lowercase().contains(needle) {
                    Some(node.clone())
                } else {
                    None
                }
            }
        })
        .collect()
}

fn collect_files(nodes: &[Node], out: &mut Vec<PathBuf>) {
    for node in nodes {
        match node.kind {
            NodeKind::File => out.push(node.path.clone()),
            NodeKind::Directory => collect_files(&node.children, out),
        }
    }
}

/// Open every directory on the way down to `target`, and `target` itself if
/// it is a directory. Ancestry is decided per path component.
pub fn expand_parent_folders(nodes: &mut [Node], target: &Path) {
    for node in nodes.iter_mut() {
        if node.is_dir() && target.starts_with(&node.path) {
            node.expanded = true;
            expand_parent_folders(&mut node.children, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::sample;
    use crate::tree::flatten;

    fn visible(nodes: &[Node]) -> Vec<String> {
        flatten(nodes).iter().map(|n| n.name.clone()).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let mut nodes = sample();
        nodes[1].expanded = true;
        assert_eq!(filter(&nodes, ""), nodes);
    }

    #[test]
    fn test_only_matching_files_survive() {
        let nodes = vec![
            Node::file("a.txt", "/p/a.txt", 0),
            Node::file("b.md", "/p/b.md", 0),
        ];
        assert_eq!(visible(&filter(&nodes, "txt")), vec!["a.txt"]);
    }

    #[test]
    fn test_matches_are_case_insensitive() {
        let nodes = sample();
        assert_eq!(visible(&filter(&nodes, "README")), vec!["README.md"]);
        assert_eq!(visible(&filter(&nodes, "readme")), vec!["README.md"]);
    }

    #[test]
    fn test_ancestors_of_nested_match_are_open() {
        let nodes = sample();
        let view = filter(&nodes, "mod");
        assert_eq!(visible(&view), vec!["src", "util", "mod.rs"]);
        assert!(view[0].expanded && view[0].children[0].expanded);
    }

    #[test]
    fn test_directories_without_matches_are_dropped() {
        let nodes = sample();
        assert_eq!(visible(&filter(&nodes, ".rs")), vec!["src", "util", "mod.rs", "lib.rs"]);
        assert!(filter(&nodes, "zzz").is_empty());
    }

    #[test]
    fn test_directory_names_alone_do_not_match() {
        let nodes = sample();
        assert!(filter(&nodes, "docs").is_empty());
    }

    #[test]
    fn test_original_expansion_untouched() {
        let nodes = sample();
        let _ = filter(&nodes, "mod");
        assert!(nodes.iter().all(|n| !n.expanded));
    }

    #[test]
    fn test_expand_parent_folders_uses_components() {
        let mut nodes = vec![
            Node::directory("a", "/p/a", 0, vec![Node::file("x", "/p/a/x", 1)]),
            Node::directory(
                "ab",
                "/p/ab",
                0,
                vec![Node::directory(
                    "c",
                    "/p/ab/c",
                    1,
                    vec![Node::file("y", "/p/ab/c/y", 2)],
                )],
            ),
        ];
        expand_parent_folders(&mut nodes, Path::new("/p/ab/c/y"));
        assert!(!nodes[0].expanded, "/p/a is a string prefix, not an ancestor");
        assert!(nodes[1].expanded);
        assert!(nodes[1].children[0].expanded);
        assert_eq!(visible(&nodes), vec!["a", "ab", "c", "y"]);
    }
}
