//! Directory skeleton provisioning.

use std::io;
use std::path::PathBuf;

use log::{debug, warn};

use crate::common::create_dir_all;
use crate::error::{BootstrapError, Result};
use crate::paths::BootstrapPaths;

/// Outcome of provisioning every skeleton directory.
#[derive(Debug, Default)]
pub struct DirectoryReport {
    /// Directories that exist after the call.
    pub ready: Vec<PathBuf>,
    /// Directories that could not be created.
    pub failed: Vec<(PathBuf, io::Error)>,
}

impl DirectoryReport {
    pub fn all_ready(&self) -> bool {
        self.failed.is_empty()
    }

    /// Convert to an error listing every failed path.
    pub fn into_result(self) -> Result<Vec<PathBuf>> {
        if self.failed.is_empty() {
            Ok(self.ready)
        } else {
            Err(BootstrapError::Directories(self.failed))
        }
    }
}

/// Create the rootfs, tmp, home, config and dotfile directories.
///
/// Every directory is attempted; one failure does not stop the rest.
pub fn setup_directories(paths: &BootstrapPaths) -> DirectoryReport {
    let mut report = DirectoryReport::default();

    for dir in paths.skeleton() {
        match create_dir_all(dir) {
            Ok(()) => {
                debug!("directory ready: {}", dir.display());
                report.ready.push(dir.to_path_buf());
            }
            Err(BootstrapError::Filesystem { path, source }) => {
                warn!("failed to create {}: {}", path.display(), source);
                report.failed.push((path, source));
            }
            Err(other) => {
                warn!("failed to create {}: {}", dir.display(), other);
                report
                    .failed
                    .push((dir.to_path_buf(), io::Error::other(other.to_string())));
            }
        }
    }

    report
}
