//! Cross-process lock on a provisioned tree: exclusive for writers, shared
//! for status probes.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use log::debug;

use crate::common::create_dir_all;
use crate::error::{BootstrapError, Result};

/// `flock` held for as long as the value lives.
#[derive(Debug)]
pub struct TreeLock {
    _file: File,
    path: PathBuf,
}

impl TreeLock {
    /// Take the writer lock without waiting. Fails with `Busy` if another
    /// open file description holds it in either mode.
    pub fn try_acquire(path: &Path) -> Result<Self> {
        Self::try_lock(path, libc::LOCK_EX)
    }

    /// Take a reader lock without waiting. Readers share the lock with each
    /// other; a held writer lock fails with `Busy`.
    pub fn try_acquire_shared(path: &Path) -> Result<Self> {
        Self::try_lock(path, libc::LOCK_SH)
    }

    fn try_lock(path: &Path, mode: libc::c_int) -> Result<Self> {
        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|e| BootstrapError::fs(path, e))?;

        let rc = unsafe { libc::flock(file.as_raw_fd(), mode | libc::LOCK_NB) };
        if rc != 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::EWOULDBLOCK) {
                return Err(BootstrapError::Busy {
                    lock: path.to_path_buf(),
                });
            }
            return Err(BootstrapError::fs(path, err));
        }

        debug!("acquired {}", path.display());
        Ok(Self {
            _file: file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
