/*!
 * Reporting functionality for PickFS
 *
 * Prints what was copied after a commit, using the tabled library for
 * clean, consistent table rendering.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::utils::format_file_size;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines in the file
    pub lines: usize,
    /// Number of characters in the file
    pub chars: usize,
}

/// Statistics for a committed selection
#[derive(Debug, Clone)]
pub struct CommitReport {
    /// Where the document went
    pub destination: String,
    /// Time from start-up to commit
    pub duration: Duration,
    /// Number of files embedded
    pub files_copied: usize,
    /// Size of the document in bytes
    pub document_bytes: usize,
    /// Details for each file
    pub file_details: BTreeMap<String, FileReportInfo>,
}

impl CommitReport {
    pub fn total_lines(&self) -> usize {
        self.file_details.values().map(|f| f.lines).sum()
    }

    pub fn total_chars(&self) -> usize {
        self.file_details.values().map(|f| f.chars).sum()
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for commit results
pub struct Reporter {
    format: ReportFormat,
    root: Option<PathBuf>,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format, root: None }
    }

    /// Show file paths relative to this directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string based on commit statistics
    pub fn generate_report(&self, report: &CommitReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &CommitReport) {
        println!("\n{}", self.generate_report(report));
    }

    // Relative to the root when possible, truncated from the left otherwise
    fn format_path(&self, path: &str, max_len: usize) -> String {
        let rel_path = match &self.root {
            Some(root) => Path::new(path)
                .strip_prefix(root)
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_else(|_| path.to_string()),
            None => path.to_string(),
        };

        if rel_path.chars().count() <= max_len {
            return rel_path;
        }

        // Keep as many trailing segments as fit
        let mut segments = Vec::new();
        let mut current_len = 3; // "..."
        for part in rel_path.split('/').rev() {
            let part_len = part.chars().count() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let tail: String = rel_path
                .chars()
                .rev()
                .take(max_len.saturating_sub(3))
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    fn create_summary_table(&self, report: &CommitReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let rows = vec![
            SummaryRow {
                key: "📋 Copied To".to_string(),
                value: report.destination.clone(),
            },
            SummaryRow {
                key: "⏱️ Session Time".to_string(),
                value: format!("{:.2?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Copied".to_string(),
                value: self.format_number(report.files_copied),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(report.total_lines()),
            },
            SummaryRow {
                key: "💾 Document Size".to_string(),
                value: format_file_size(report.document_bytes as u64),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    self.format_number(report.total_chars() / 4)
                ),
            },
        ];

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &CommitReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        // Largest first
        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(_, a), (_, b)| b.chars.cmp(&a.chars));

        let files_to_show = if files.len() > 15 {
            &files[0..10]
        } else {
            &files[..]
        };

        let rows: Vec<FileRow> = files_to_show
            .iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                lines: self.format_number(info.lines),
                tokens: self.format_number(info.chars / 4),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &CommitReport) -> String {
        let summary_title = format!(
            "💾  Successfully copied {} file{}",
            report.files_copied,
            if report.files_copied == 1 { "" } else { "s" }
        );
        let summary_table = self.create_summary_table(report);

        if report.file_details.is_empty() {
            return format!("{}\n{}", summary_title, summary_table);
        }

        let files_title = if report.file_details.len() > 15 {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  COPIED FILES"
        };
        let files_table = self.create_files_table(report);

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}
