//! Logging setup for PickFS.
//!
//! Records go through the `log` facade to an `env_logger` backend. The level
//! is picked in this order:
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. `--quiet` (errors only)
//! 3. `--verbose` count (warn, info, debug, trace)
//!
//! While the picker is on screen stderr belongs to the terminal UI. Records
//! meant for stderr are dropped as long as a [`StderrGuard`] is alive, and
//! `--log-file` sends everything to a file instead.
//!
//! ```rust,no_run
//! use pickfs::logging::init_logging;
//!
//! init_logging(1, false, None).expect("logging");
//! log::info!("Picker started");
//! ```

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

use crate::error::{Result, ResultExt};

/// Initialize logging from the command-line flags.
///
/// Calling it a second time leaves the first logger in place.
pub fn init_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        builder
            .target(Target::Pipe(Box::new(file)))
            .write_style(WriteStyle::Never);
    } else {
        builder.target(Target::Pipe(Box::new(GatedStderr(io::stderr()))));
    }

    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
        return Ok(());
    }

    if use_env {
        log::debug!("Logging configured from RUST_LOG={:?}", env::var("RUST_LOG").ok());
    } else {
        log::debug!("Logging at level {:?}", determine_level(verbose, quiet));
    }
    Ok(())
}

/// Number of live [`StderrGuard`]s
static STDERR_SUSPENDED: AtomicUsize = AtomicUsize::new(0);

/// Silences stderr logging until dropped. A log file is not affected.
#[must_use = "stderr logging resumes as soon as the guard is dropped"]
#[derive(Debug)]
pub struct StderrGuard(());

/// Stop writing log records to stderr, e.g. while the terminal UI owns it.
pub fn suspend_stderr() -> StderrGuard {
    STDERR_SUSPENDED.fetch_add(1, Ordering::SeqCst);
    StderrGuard(())
}

impl Drop for StderrGuard {
    fn drop(&mut self) {
        STDERR_SUSPENDED.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Log target that swallows output while stderr is suspended
struct GatedStderr<W>(W);

impl<W: Write> Write for GatedStderr<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if STDERR_SUSPENDED.load(Ordering::SeqCst) > 0 {
            return Ok(buf.len());
        }
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// Map the flags to a level. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);
        if verbose >= 2 {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} [{}] {}",
                buf.timestamp_seconds(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} {}",
                buf.timestamp_seconds(),
                level,
                record.args()
            )
        }
    });
}
