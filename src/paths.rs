//! Fixed on-disk layout of a provisioned tree.
//!
//! Everything lives under one base directory (application-private storage):
//!
//! ```text
//! <base>/
//!   rootfs/ubuntu/          rootfs root, proot `-r` target
//!     bin/bash              completion marker
//!     root/.openclawd/      shim directory
//!     root/.bashrc          patched init file
//!   tmp/                    PROOT_TMP_DIR, extraction staging
//!   home/.openclawd/
//!   config/resolv.conf
//!   .bootstrap.lock         writer lock
//! ```

use std::path::{Path, PathBuf};

/// File name of the compatibility shim inside the rootfs.
pub const BYPASS_FILE_NAME: &str = "bionic-bypass.js";

/// Name of the extraction staging directory under `tmp/`.
pub const STAGING_DIR_NAME: &str = "rootfs-staging";

/// Path of the shim as seen from inside the sandbox.
pub const BYPASS_GUEST_PATH: &str = "/root/.openclawd/bionic-bypass.js";

/// Immutable set of paths derived from one base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPaths {
    base_dir: PathBuf,
    rootfs_dir: PathBuf,
    tmp_dir: PathBuf,
    home_dir: PathBuf,
    config_dir: PathBuf,
    dotfile_dir: PathBuf,
}

impl BootstrapPaths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let home_dir = base_dir.join("home");
        Self {
            rootfs_dir: base_dir.join("rootfs/ubuntu"),
            tmp_dir: base_dir.join("tmp"),
            config_dir: base_dir.join("config"),
            dotfile_dir: home_dir.join(".openclawd"),
            home_dir,
            base_dir,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn rootfs_dir(&self) -> &Path {
        &self.rootfs_dir
    }

    pub fn tmp_dir(&self) -> &Path {
        &self.tmp_dir
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn dotfile_dir(&self) -> &Path {
        &self.dotfile_dir
    }

    /// Directories created by provisioning, in creation order.
    pub fn skeleton(&self) -> [&Path; 5] {
        [
            &self.rootfs_dir,
            &self.tmp_dir,
            &self.home_dir,
            &self.config_dir,
            &self.dotfile_dir,
        ]
    }

    pub fn bin_bash(&self) -> PathBuf {
        self.rootfs_dir.join("bin/bash")
    }

    pub fn bypass_dir(&self) -> PathBuf {
        self.rootfs_dir.join("root/.openclawd")
    }

    pub fn bypass_file(&self) -> PathBuf {
        self.bypass_dir().join(BYPASS_FILE_NAME)
    }

    pub fn bashrc(&self) -> PathBuf {
        self.rootfs_dir.join("root/.bashrc")
    }

    pub fn resolv_conf(&self) -> PathBuf {
        self.config_dir.join("resolv.conf")
    }

    pub fn lock_file(&self) -> PathBuf {
        self.base_dir.join(".bootstrap.lock")
    }

    /// Staging directory for extraction. Same filesystem as the rootfs so
    /// entries can be renamed into place.
    pub fn staging_dir(&self) -> PathBuf {
        self.tmp_dir.join(STAGING_DIR_NAME)
    }
}
