//! Global error handling for pickfs
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

/// Global error type for pickfs operations
#[derive(Error, Debug)]
pub enum PickFsError {
    /// Root directory could not be scanned
    #[error("Scan error: {0}")]
    Scan(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writer errors
    #[error("Writer error: {0}")]
    Writer(String),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Specialized Result type for pickfs operations
pub type Result<T> = std::result::Result<T, PickFsError>;

/// Creates a PickFsError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::PickFsError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            PickFsError::Unexpected(format!("{}: {}", context, e))
        })
    }
}

// main() returns io::Result, so errors surface through this conversion
impl From<PickFsError> for io::Error {
    fn from(err: PickFsError) -> Self {
        io::Error::new(io::ErrorKind::Other, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn must_be_positive(n: i32) -> Result<i32> {
        crate::ensure!(n > 0, Config, "expected a positive number, got {}", n);
        Ok(n)
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(must_be_positive(3).unwrap(), 3);
        let err = must_be_positive(-1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: expected a positive number, got -1"
        );
    }

    #[test]
    fn test_with_context() {
        let failed: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = failed.with_context(|| "reading notes.txt").unwrap_err();
        assert_eq!(err.to_string(), "Unexpected error: reading notes.txt: gone");
    }

    #[test]
    fn test_into_io_error() {
        let err: io::Error = crate::error!(Scan, "cannot read {}", "/nope").into();
        assert_eq!(err.to_string(), "Scan error: cannot read /nope");
    }
}
