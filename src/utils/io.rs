//! File I/O primitives with consistent error handling.

use crate::core::error::{Error, Result};
use std::fs;
use std::path::Path;

fn io_error(e: std::io::Error, path: &Path, operation: &str) -> Error {
    Error::Io(std::io::Error::new(
        e.kind(),
        format!("{} ({}): {}", operation, path.display(), e),
    ))
}

/// Read file contents with standardized error handling.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| io_error(e, path, operation))
}

/// Write content to file with standardized error handling.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| io_error(e, path, operation))
}
