/*!
 * Directory tree loading
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use indicatif::ProgressBar;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Result;
use crate::tree::Tree;
use crate::types::Node;
use crate::utils::{compare_names, is_excluded};

/// One listed directory entry
#[derive(Debug)]
struct Entry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// Loads a directory into a [`Tree`]
pub struct Loader {
    /// Loader configuration
    config: Config,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
}

impl Loader {
    /// Create a new loader
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Self {
        Self { config, progress }
    }

    /// Load the configured directory.
    ///
    /// Fails only when the root itself cannot be read. Entries below it that
    /// cannot be listed are skipped with a warning.
    pub fn load(&self) -> Result<Tree> {
        let target = &self.config.target_dir;
        let root = fs::canonicalize(target)
            .map_err(|e| crate::error!(Scan, "cannot open {}: {}", target.display(), e))?;
        fs::read_dir(&root)
            .map_err(|e| crate::error!(Scan, "cannot read {}: {}", root.display(), e))?;

        let mut ancestors = vec![root.clone()];
        let nodes = self.load_directory(&root, 0, &mut ancestors);
        let tree = Tree::new(root, nodes);

        log::info!(
            "Loaded {} entries from {}",
            tree.len(),
            tree.root().display()
        );
        Ok(tree)
    }

    /// Load the entries of `dir` as nodes at `depth`, sorted directories
    /// first and then by name
    fn load_directory(&self, dir: &Path, depth: usize, ancestors: &mut Vec<PathBuf>) -> Vec<Node> {
        self.progress
            .set_message(format!("Loading {}", dir.display()));

        let mut nodes = Vec::new();
        for entry in self.list_entries(dir) {
            self.progress.inc(1);

            if !entry.is_dir {
                nodes.push(Node::file(entry.name, entry.path, depth));
                continue;
            }

            let children = match self.descend_target(&entry.path, depth, ancestors) {
                Some(canonical) => {
                    ancestors.push(canonical);
                    let children = self.load_directory(&entry.path, depth + 1, ancestors);
                    ancestors.pop();
                    children
                }
                None => Vec::new(),
            };
            nodes.push(Node::directory(entry.name, entry.path, depth, children));
        }

        sort_nodes(&mut nodes);
        nodes
    }

    /// Canonical path of `dir` when it may be descended into: not past the
    /// depth limit and not a directory we are already inside of
    fn descend_target(&self, dir: &Path, depth: usize, ancestors: &[PathBuf]) -> Option<PathBuf> {
        if let Some(max_depth) = self.config.max_depth {
            if depth + 1 >= max_depth {
                log::debug!("Depth limit reached at {}", dir.display());
                return None;
            }
        }

        let canonical = match fs::canonicalize(dir) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Skipping contents of {}: {}", dir.display(), e);
                return None;
            }
        };

        if ancestors.contains(&canonical) {
            log::warn!(
                "Not descending into {}: it links back to {}",
                dir.display(),
                canonical.display()
            );
            return None;
        }

        Some(canonical)
    }

    /// List the direct children of `dir`, minus excluded names
    fn list_entries(&self, dir: &Path) -> Vec<Entry> {
        let entries = if self.config.respect_gitignore {
            self.list_with_gitignore(dir)
        } else {
            self.list_plain(dir)
        };

        entries
            .into_iter()
            .filter(|e| !is_excluded(&e.name, &self.config.exclude_patterns))
            .collect()
    }

    fn list_plain(&self, dir: &Path) -> Vec<Entry> {
        WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(Entry {
                    name: entry.file_name().to_string_lossy().to_string(),
                    path: entry.path().to_path_buf(),
                    is_dir: entry.file_type().is_dir(),
                }),
                Err(e) => {
                    log::warn!("Skipping entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .collect()
    }

    fn list_with_gitignore(&self, dir: &Path) -> Vec<Entry> {
        let mut walker = WalkBuilder::new(dir);
        walker
            .max_depth(Some(1))
            .follow_links(true)
            .hidden(false)
            .require_git(false);

        walker
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.depth() == 0 => None,
                Ok(entry) => Some(Entry {
                    name: entry.file_name().to_string_lossy().to_string(),
                    path: entry.path().to_path_buf(),
                    is_dir: entry.file_type().map_or(false, |ft| ft.is_dir()),
                }),
                Err(e) => {
                    log::warn!("Skipping entry in {}: {}", dir.display(), e);
                    None
                }
            })
            .collect()
    }
}

/// Directories before files, then by name
pub fn sort_nodes(nodes: &mut [Node]) {
    nodes.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| compare_names(&a.name, &b.name))
    });
}
