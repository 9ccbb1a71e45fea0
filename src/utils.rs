/*!
 * Utility functions for PickFS
 */

use std::cmp::Ordering;

use glob_match::glob_match;
use once_cell::sync::Lazy;

/// Check whether an entry name matches any exclusion pattern
pub fn is_excluded(name: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern == name || glob_match(pattern, name))
}

/// Compare entry names the way people expect a listing to read:
/// case-insensitive first, byte order only to break ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Names that are never loaded into the tree unless disabled
pub static DEFAULT_EXCLUDE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "node_modules",
        ".git",
        "dist",
        "build",
        "coverage",
        "public",
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_excluded() {
        let patterns = vec!["node_modules".to_string(), "*.lock".to_string()];
        assert!(is_excluded("node_modules", &patterns));
        assert!(is_excluded("Cargo.lock", &patterns));
        assert!(!is_excluded("node_modules_backup", &patterns));
        assert!(!is_excluded("src", &patterns));
    }

    #[test]
    fn test_compare_names() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Zeta", "alpha"), Ordering::Greater);
        assert_eq!(compare_names("a", "a"), Ordering::Equal);
        assert_ne!(compare_names("A", "a"), Ordering::Equal);
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 bytes");
        assert_eq!(format_file_size(2048), "2.00 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.00 MB");
    }
}
