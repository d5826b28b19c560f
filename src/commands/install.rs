//! Install command - full bootstrap from an archive.

use anyhow::{Context, Result};
use std::path::Path;

use openclawd_bootstrap::{BootstrapManager, CancelToken};

/// Execute the install command.
pub fn cmd_install(manager: &BootstrapManager, archive: &Path) -> Result<()> {
    println!(
        "Bootstrapping {} from {}...",
        manager.paths().base_dir().display(),
        archive.display()
    );

    let status = manager
        .install(archive, &CancelToken::new())
        .context("Bootstrap failed")?;

    println!("Bootstrap complete: {}", status.rootfs_path);
    if !status.node_installed {
        println!("  Note: node not found inside the rootfs yet.");
    }
    if !status.openclaw_installed {
        println!("  Note: openclaw not found inside the rootfs yet.");
    }
    Ok(())
}
