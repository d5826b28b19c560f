//! Utilities for managing temporary work directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::files::create_dir_all;
use crate::error::{BootstrapError, Result};

/// Prepare a work directory, removing it if it exists and creating it fresh.
///
/// Leftovers from an interrupted run are discarded.
pub fn prepare_work_dir(parent_dir: &Path, name: &str) -> Result<PathBuf> {
    let work_dir = parent_dir.join(name);

    match fs::remove_dir_all(&work_dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(BootstrapError::fs(&work_dir, e)),
    }

    create_dir_all(&work_dir)?;
    Ok(work_dir)
}

/// Clean up a work directory after use. Missing directories are ignored.
pub fn cleanup_work_dir(path: &Path) {
    let _ = fs::remove_dir_all(path);
}
