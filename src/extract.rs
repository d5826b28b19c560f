//! Rootfs archive extraction.
//!
//! The archive is unpacked by `tar` into `tmp/rootfs-staging`, never straight
//! into the rootfs. Only after `tar` exits 0 is the staged tree merged into the
//! rootfs, file by file, the way `tar -C <rootfs>` would lay it down. A failed,
//! timed-out or cancelled extraction leaves the existing rootfs and the source
//! archive exactly as they were.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};

use crate::cancel::CancelToken;
use crate::common::{cleanup_work_dir, create_dir_all, prepare_work_dir};
use crate::error::{BootstrapError, ExtractionFailure, Result};
use crate::paths::{BootstrapPaths, STAGING_DIR_NAME};
use crate::process::Cmd;
use crate::timing::Timer;

/// How to run the decompression process.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// `tar` executable (default: `tar` from PATH).
    pub tar_program: String,
    /// Wall-clock limit for the whole extraction.
    pub timeout: Duration,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            tar_program: "tar".to_string(),
            timeout: Duration::from_secs(30 * 60),
        }
    }
}

/// Extract a gzip tar archive into the rootfs and delete the archive.
pub fn extract_rootfs(
    paths: &BootstrapPaths,
    archive: &Path,
    options: &ExtractOptions,
    cancel: &CancelToken,
) -> Result<()> {
    if !archive.is_file() {
        return Err(BootstrapError::fs(
            archive,
            io::Error::new(io::ErrorKind::NotFound, "rootfs archive not found"),
        ));
    }

    create_dir_all(paths.rootfs_dir())?;
    create_dir_all(paths.tmp_dir())?;
    let staging = prepare_work_dir(paths.tmp_dir(), STAGING_DIR_NAME)?;

    info!(
        "extracting {} into {}",
        archive.display(),
        paths.rootfs_dir().display()
    );
    let timer = Timer::start("rootfs extraction");

    let run = Cmd::new(&options.tar_program)
        .arg("xzf")
        .arg_path(archive)
        .arg("-C")
        .arg_path(&staging)
        .merge_stderr()
        .timeout(options.timeout)
        .cancel_token(cancel)
        .run();

    let result = match run {
        Ok(result) => result,
        Err(e) => {
            cleanup_work_dir(&staging);
            return Err(e);
        }
    };

    if !result.success() {
        cleanup_work_dir(&staging);
        return Err(BootstrapError::Extraction(ExtractionFailure {
            exit_code: result.code(),
            output: result.stdout,
        }));
    }

    let promoted = promote(&staging, paths.rootfs_dir());
    cleanup_work_dir(&staging);
    let moved = promoted?;
    timer.finish();
    info!("merged {} entries into rootfs", moved);

    if let Err(e) = fs::remove_file(archive) {
        warn!("extracted, but could not delete {}: {}", archive.display(), e);
    }

    Ok(())
}

/// Merge the staged tree into `rootfs`.
///
/// Directories present on both sides are descended into, so entries the
/// archive does not carry survive. Staged files and symlinks are renamed over
/// their counterparts. Returns the number of entries moved.
fn promote(staging: &Path, rootfs: &Path) -> Result<usize> {
    let entries = fs::read_dir(staging).map_err(|e| BootstrapError::fs(staging, e))?;
    let mut moved = 0;

    for entry in entries {
        let entry = entry.map_err(|e| BootstrapError::fs(staging, e))?;
        let source = entry.path();
        let target = rootfs.join(entry.file_name());
        let staged_dir = entry
            .file_type()
            .map_err(|e| BootstrapError::fs(&source, e))?
            .is_dir();

        if staged_dir && is_real_dir(&target) {
            moved += promote(&source, &target)?;
            continue;
        }

        // A directory in the way of a staged leaf, or a leaf in the way of a
        // staged directory, cannot be renamed over.
        if staged_dir || is_real_dir(&target) {
            remove_existing(&target)?;
        }
        fs::rename(&source, &target).map_err(|e| BootstrapError::fs(&target, e))?;
        moved += 1;
    }

    Ok(moved)
}

/// A directory that is not reached through a symlink.
fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.is_dir())
}

fn remove_existing(path: &Path) -> Result<()> {
    let removed = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => Err(e),
    };
    removed.map_err(|e| BootstrapError::fs(path, e))
}
