/*!
 * Configuration handling for PickFS
 */

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::error::Result;
use crate::utils::DEFAULT_EXCLUDE;

/// Command-line arguments for PickFS
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "pickfs",
    version = env!("CARGO_PKG_VERSION"),
    about = "Interactively pick files and folders and copy them as XML context for LLMs",
    long_about = "Opens an interactive tree of the target directory. Navigate with the arrow keys, type to search, press Space to select and Enter to copy the selection to the clipboard as a single XML document."
)]
pub struct Args {
    /// Directory to browse
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Comma-separated list of extra names or glob patterns to exclude
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Do not apply the built-in exclusion list
    #[clap(long)]
    pub no_default_excludes: bool,

    /// Also honor .gitignore files while loading the tree
    #[clap(long)]
    pub gitignore: bool,

    /// Maximum directory depth to load
    #[clap(long, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Also write the generated document to this file
    #[clap(long, short)]
    pub output: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[clap(long, short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[clap(long, short)]
    pub quiet: bool,

    /// Write log records to this file instead of stderr
    #[clap(long)]
    pub log_file: Option<String>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to load the tree from
    pub target_dir: PathBuf,

    /// Names or glob patterns that never become nodes
    pub exclude_patterns: Vec<String>,

    /// Whether to respect .gitignore files
    pub respect_gitignore: bool,

    /// Depth guard for the loader
    pub max_depth: Option<usize>,

    /// Optional file receiving a copy of the document
    pub output_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("."),
            exclude_patterns: DEFAULT_EXCLUDE.iter().map(|p| p.to_string()).collect(),
            respect_gitignore: false,
            max_depth: None,
            output_file: None,
        }
    }
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let mut exclude_patterns: Vec<String> = if args.no_default_excludes {
            Vec::new()
        } else {
            DEFAULT_EXCLUDE.iter().map(|p| p.to_string()).collect()
        };
        for pattern in args.exclude {
            let pattern = pattern.trim();
            if !pattern.is_empty() && !exclude_patterns.iter().any(|p| p == pattern) {
                exclude_patterns.push(pattern.to_string());
            }
        }

        Self {
            target_dir: PathBuf::from(args.directory_path),
            exclude_patterns,
            respect_gitignore: args.gitignore,
            max_depth: args.max_depth,
            output_file: args.output.map(PathBuf::from),
        }
    }

    /// Create a configuration for a directory with default settings
    pub fn for_dir(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        crate::ensure!(
            self.target_dir.is_dir(),
            Config,
            "Target directory not found: {}",
            self.target_dir.display()
        );

        if let Some(output) = &self.output_file {
            if let Some(parent) = output.parent() {
                crate::ensure!(
                    parent.as_os_str().is_empty() || parent.exists(),
                    Config,
                    "Output directory not found: {}",
                    parent.display()
                );
            }
        }

        crate::ensure!(
            self.max_depth != Some(0),
            Config,
            "--max-depth must be at least 1"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Config {
        Config::from_args(Args::parse_from(argv))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["pickfs"]);
        assert_eq!(config.target_dir, PathBuf::from("."));
        assert_eq!(config.exclude_patterns.len(), DEFAULT_EXCLUDE.len());
        assert!(config.exclude_patterns.contains(&"node_modules".to_string()));
        assert!(!config.respect_gitignore);
        assert!(config.output_file.is_none());
    }

    #[test]
    fn test_extra_excludes_are_appended_once() {
        let config = parse(&["pickfs", "--exclude", "target,*.lock,.git"]);
        assert!(config.exclude_patterns.contains(&"target".to_string()));
        assert!(config.exclude_patterns.contains(&"*.lock".to_string()));
        let git_count = config
            .exclude_patterns
            .iter()
            .filter(|p| p.as_str() == ".git")
            .count();
        assert_eq!(git_count, 1);
    }

    #[test]
    fn test_no_default_excludes() {
        let config = parse(&["pickfs", "--no-default-excludes", "--exclude", "tmp"]);
        assert_eq!(config.exclude_patterns, vec!["tmp".to_string()]);
    }

    #[test]
    fn test_validate_missing_directory() {
        let config = Config::for_dir("/definitely/not/here/pickfs");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Target directory not found"));
    }

    #[test]
    fn test_validate_output_parent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_dir(dir.path());
        config.output_file = Some(dir.path().join("missing").join("out.xml"));
        assert!(config.validate().is_err());

        config.output_file = Some(dir.path().join("out.xml"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_depth() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::for_dir(dir.path());
        config.max_depth = Some(0);
        assert!(config.validate().is_err());
    }
}
