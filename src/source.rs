/*!
 * File content access
 */

use std::fs;
use std::io;
use std::path::Path;

/// Where the writer gets file contents from
pub trait FileSource {
    /// Read the whole file as text. Only I/O failures are errors.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Reads straight from the local filesystem. Every call opens, reads and
/// closes the file; no handle outlives it. Bytes that are not valid UTF-8
/// come back as U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl FileSource for LocalFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
