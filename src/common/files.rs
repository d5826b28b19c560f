//! File operations with parent directory creation and transient-error retry.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::retry::{retry_io, RetryPolicy};
use crate::error::{BootstrapError, Result};

/// Create a directory and all parents. Existing directories are fine.
pub fn create_dir_all(path: &Path) -> Result<()> {
    retry_io(RetryPolicy::default(), "create_dir_all", || {
        fs::create_dir_all(path)
    })
    .map_err(|e| BootstrapError::fs(path, e))
}

/// Write a file, creating parent directories as needed.
///
/// Replaces any existing content.
pub fn write_file_with_dirs<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, content: C) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    retry_io(RetryPolicy::default(), "write", || fs::write(path, &content))
        .map_err(|e| BootstrapError::fs(path, e))
}

/// Append to a file, creating it if absent.
pub fn append_file(path: &Path, content: &str) -> Result<()> {
    retry_io(RetryPolicy::default(), "append", || {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(content.as_bytes())
    })
    .map_err(|e| BootstrapError::fs(path, e))
}

/// Read a text file, treating a missing file as empty.
pub fn read_file_or_empty(path: &Path) -> Result<String> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(BootstrapError::fs(path, e)),
    }
}
