//! Bootstrap lifecycle: create → extract → patch → verify.
//!
//! [`BootstrapManager`] is the only entry point that mutates a tree. Writers
//! (provisioning, extraction, patching, resolver) are serialized: in-process
//! through an `RwLock`, across processes through an exclusive `flock` on
//! `<base>/.bootstrap.lock`. Status probes share the read side of both, so
//! they may run alongside each other but never alongside a writer.
//!
//! All methods block. Call them from a worker thread.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use log::{debug, info, warn};

use crate::assets::{AssetProvider, DirAssets, EmbeddedAssets};
use crate::cancel::CancelToken;
use crate::config::Config;
use crate::error::{BootstrapError, Result};
use crate::extract::{self, ExtractOptions};
use crate::lock::TreeLock;
use crate::network;
use crate::patch::{self, PatchOutcome};
use crate::paths::BootstrapPaths;
use crate::provision;
use crate::sandbox::{ProotRunner, SandboxRunner};
use crate::status::{self, BootstrapStatus};
use crate::timing::Timer;

/// Probe outcome reason while another process holds the writer lock.
pub const TREE_BUSY: &str = "tree busy";

/// Held for the duration of one write operation.
struct WriterGuard<'a> {
    // Declared first so the file lock is released before the in-process lock.
    _tree_lock: TreeLock,
    _guard: RwLockWriteGuard<'a, ()>,
}

pub struct BootstrapManager {
    paths: BootstrapPaths,
    assets: Arc<dyn AssetProvider>,
    runner: Arc<dyn SandboxRunner>,
    extract: ExtractOptions,
    probe_timeout: Duration,
    tree: RwLock<()>,
}

impl BootstrapManager {
    pub fn new(
        paths: BootstrapPaths,
        assets: Arc<dyn AssetProvider>,
        runner: Arc<dyn SandboxRunner>,
    ) -> Self {
        Self {
            paths,
            assets,
            runner,
            extract: ExtractOptions::default(),
            probe_timeout: Duration::from_secs(crate::config::DEFAULT_PROBE_TIMEOUT_SECS),
            tree: RwLock::new(()),
        }
    }

    /// Manager wired to `proot`, with embedded or directory assets.
    pub fn from_config(config: &Config) -> Self {
        let paths = BootstrapPaths::new(&config.base_dir);
        let assets: Arc<dyn AssetProvider> = match &config.assets_dir {
            Some(dir) => Arc::new(DirAssets::new(dir)),
            None => Arc::new(EmbeddedAssets),
        };
        let runner = Arc::new(ProotRunner::new(paths.clone(), &config.proot_program));

        Self::new(paths, assets, runner)
            .with_extract_options(ExtractOptions {
                tar_program: config.tar_program.clone(),
                timeout: config.extract_timeout,
            })
            .with_probe_timeout(config.probe_timeout)
    }

    pub fn with_extract_options(mut self, options: ExtractOptions) -> Self {
        self.extract = options;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn paths(&self) -> &BootstrapPaths {
        &self.paths
    }

    fn writer(&self) -> Result<WriterGuard<'_>> {
        let guard = self.tree.write().unwrap_or_else(PoisonError::into_inner);
        let tree_lock = TreeLock::try_acquire(&self.paths.lock_file())?;
        Ok(WriterGuard {
            _tree_lock: tree_lock,
            _guard: guard,
        })
    }

    fn reader(&self) -> RwLockReadGuard<'_, ()> {
        self.tree.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create the directory skeleton. Returns the directories now present,
    /// or every path that could not be created.
    pub fn setup_directories(&self) -> Result<Vec<PathBuf>> {
        let _writer = self.writer()?;
        provision::setup_directories(&self.paths).into_result()
    }

    /// Unpack a gzip tar rootfs and delete the archive on success.
    pub fn extract_rootfs(&self, archive: &Path, cancel: &CancelToken) -> Result<()> {
        let _writer = self.writer()?;
        extract::extract_rootfs(&self.paths, archive, &self.extract, cancel)
    }

    /// Install the compatibility shim and patch `.bashrc` once.
    pub fn install_bionic_bypass(&self) -> Result<PatchOutcome> {
        let _writer = self.writer()?;
        patch::install_bionic_bypass(&self.paths, self.assets.as_ref())
    }

    /// Overwrite `config/resolv.conf` with the bundled template.
    pub fn write_resolv_conf(&self) -> Result<()> {
        let _writer = self.writer()?;
        network::write_resolv_conf(&self.paths, self.assets.as_ref())
    }

    /// Cheap filesystem-only completion check.
    pub fn is_bootstrap_complete(&self) -> bool {
        status::is_bootstrap_complete(&self.paths)
    }

    /// Fresh readiness snapshot including the sandbox probes.
    ///
    /// If another process is writing the tree, the probes are skipped and
    /// reported as indeterminate; the call never waits for that writer.
    pub fn bootstrap_status(&self, cancel: &CancelToken) -> BootstrapStatus {
        let _reader = self.reader();
        let _tree_lock = match self.shared_tree_lock() {
            Ok(lock) => lock,
            Err(BootstrapError::Busy { lock }) => {
                debug!("{} held by a writer, skipping probes", lock.display());
                return status::status_without_probes(&self.paths, TREE_BUSY);
            }
            Err(e) => {
                warn!("probing without tree lock: {}", e);
                None
            }
        };
        status::bootstrap_status(&self.paths, self.runner.as_ref(), self.probe_timeout, cancel)
    }

    /// Shared lock for readers. `None` while the base directory does not
    /// exist; status never creates the tree.
    fn shared_tree_lock(&self) -> Result<Option<TreeLock>> {
        if !self.paths.base_dir().is_dir() {
            return Ok(None);
        }
        TreeLock::try_acquire_shared(&self.paths.lock_file()).map(Some)
    }

    /// Full flow from an archive to a verified tree.
    pub fn install(&self, archive: &Path, cancel: &CancelToken) -> Result<BootstrapStatus> {
        let timer = Timer::start("bootstrap install");
        {
            let _writer = self.writer()?;

            info!("provisioning {}", self.paths.base_dir().display());
            provision::setup_directories(&self.paths).into_result()?;

            extract::extract_rootfs(&self.paths, archive, &self.extract, cancel)?;

            let outcome = patch::install_bionic_bypass(&self.paths, self.assets.as_ref())?;
            info!("bionic bypass: {:?}", outcome);

            network::write_resolv_conf(&self.paths, self.assets.as_ref())?;
        }

        let status = self.bootstrap_status(cancel);
        timer.finish();
        if !status.complete {
            return Err(BootstrapError::Incomplete {
                missing: status.missing_markers(),
            });
        }
        Ok(status)
    }
}
