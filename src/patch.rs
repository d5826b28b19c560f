//! Bionic compatibility shim installation.
//!
//! Node inside the rootfs is linked against glibc but runs on an Android
//! kernel under proot. The shim is force-loaded on every Node start through
//! `NODE_OPTIONS`, exported from root's `.bashrc`.
//!
//! Whether `.bashrc` is already patched is decided by an exact line match on
//! [`PATCH_MARKER`]. A line that merely mentions `bionic-bypass` does not
//! count.

use log::{debug, info};

use crate::assets::{read_asset, AssetProvider, BIONIC_BYPASS_ASSET};
use crate::common::{append_file, read_file_or_empty, write_file_with_dirs};
use crate::error::Result;
use crate::paths::{BootstrapPaths, BYPASS_GUEST_PATH};

/// Comment line that opens the patch block.
pub const PATCH_MARKER: &str = "# OpenClawd Bionic Bypass";

/// What `install_bionic_bypass` did to `.bashrc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    AlreadyPresent,
}

/// The `export` line added to `.bashrc`.
pub fn export_line() -> String {
    format!("export NODE_OPTIONS=\"--require {}\"", BYPASS_GUEST_PATH)
}

/// Whether `bashrc` already carries the patch block.
pub fn is_patched(bashrc: &str) -> bool {
    bashrc.lines().any(|line| line.trim() == PATCH_MARKER)
}

/// Copy the shim into the rootfs and patch `.bashrc` once.
///
/// The shim is rewritten on every call so it always matches the bundled copy.
pub fn install_bionic_bypass(
    paths: &BootstrapPaths,
    assets: &dyn AssetProvider,
) -> Result<PatchOutcome> {
    let shim = read_asset(assets, BIONIC_BYPASS_ASSET)?;
    let target = paths.bypass_file();
    write_file_with_dirs(&target, &shim)?;
    debug!("installed shim at {} ({} bytes)", target.display(), shim.len());

    let bashrc = paths.bashrc();
    let existing = read_file_or_empty(&bashrc)?;
    if is_patched(&existing) {
        debug!("{} already patched", bashrc.display());
        return Ok(PatchOutcome::AlreadyPresent);
    }

    append_file(&bashrc, &format!("\n{}\n{}\n", PATCH_MARKER, export_line()))?;
    info!("patched {}", bashrc.display());
    Ok(PatchOutcome::Applied)
}
