//! Setup command - creates the directory skeleton.

use anyhow::{Context, Result};

use openclawd_bootstrap::BootstrapManager;

/// Execute the setup command.
pub fn cmd_setup(manager: &BootstrapManager) -> Result<()> {
    let base = manager.paths().base_dir().display().to_string();
    let dirs = manager
        .setup_directories()
        .with_context(|| format!("Failed to provision {}", base))?;

    for dir in &dirs {
        println!("  {}", dir.display());
    }
    println!("Provisioned {} directories under {}", dirs.len(), base);
    Ok(())
}

/// Execute the resolv command.
pub fn cmd_resolv(manager: &BootstrapManager) -> Result<()> {
    manager
        .write_resolv_conf()
        .context("Failed to write resolv.conf")?;
    println!("Wrote {}", manager.paths().resolv_conf().display());
    Ok(())
}
