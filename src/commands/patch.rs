//! Patch command - installs the bionic bypass shim.

use anyhow::{Context, Result};

use openclawd_bootstrap::{BootstrapManager, PatchOutcome};

/// Execute the patch command.
pub fn cmd_patch(manager: &BootstrapManager) -> Result<()> {
    let outcome = manager
        .install_bionic_bypass()
        .context("Failed to install bionic bypass")?;

    let bashrc = manager.paths().bashrc();
    println!("Shim: {}", manager.paths().bypass_file().display());
    match outcome {
        PatchOutcome::Applied => println!("Patched {}", bashrc.display()),
        PatchOutcome::AlreadyPresent => println!("{} already patched", bashrc.display()),
    }
    Ok(())
}
