/*!
 * Command-line interface for PickFS
 */

use std::fs;
use std::io;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use pickfs::clipboard::{Clipboard, SystemClipboard};
use pickfs::config::{Args, Config};
use pickfs::error::ResultExt;
use pickfs::loader::Loader;
use pickfs::logging::init_logging;
use pickfs::picker::Picker;
use pickfs::report::{CommitReport, ReportFormat, Reporter};
use pickfs::source::LocalFs;
use pickfs::tui::{run_tui, Outcome};
use pickfs::writer::XmlWriter;

/// Exit status when the picker is left without copying
const EXIT_CANCELLED: i32 = 130;

fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    init_logging(
        args.verbose,
        args.quiet,
        args.log_file.as_deref().map(Path::new),
    )?;

    let config = Config::from_args(args);
    config.validate()?;

    let start_time = Instant::now();

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {pos} entries {wide_msg:.dim.white}")
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📂 Loading");

    let loader = Loader::new(config.clone(), Arc::new(progress.clone()));
    let tree = loader.load();
    progress.finish_and_clear();
    let tree = tree?;

    let root = tree.root().to_path_buf();
    let mut picker = Picker::new(tree);
    let writer = XmlWriter::new();
    let clipboard = SystemClipboard;

    let outcome = run_tui(&mut picker, &writer, &LocalFs, &clipboard)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    let document = match outcome {
        Outcome::Committed(document) => document,
        Outcome::Cancelled => process::exit(EXIT_CANCELLED),
    };

    let mut destination = clipboard.name();
    if let Some(output) = &config.output_file {
        fs::write(output, &document.content)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        log::info!("Wrote document to {}", output.display());
        destination = format!("{} + {}", destination, output.display());
    }

    let report = CommitReport {
        destination,
        duration: start_time.elapsed(),
        files_copied: document.file_count,
        document_bytes: document.content.len(),
        file_details: document.file_details,
    };
    Reporter::new(ReportFormat::ConsoleTable)
        .with_root(root)
        .print_report(&report);

    Ok(())
}
