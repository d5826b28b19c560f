//! Extract command - unpacks a rootfs archive.

use anyhow::{Context, Result};
use std::path::Path;

use openclawd_bootstrap::{BootstrapManager, CancelToken};

/// Execute the extract command.
pub fn cmd_extract(manager: &BootstrapManager, archive: &Path) -> Result<()> {
    println!(
        "Extracting {} to {}...",
        archive.display(),
        manager.paths().rootfs_dir().display()
    );
    manager
        .extract_rootfs(archive, &CancelToken::new())
        .with_context(|| format!("Failed to extract {}", archive.display()))?;
    println!("Extracted. Archive removed.");
    Ok(())
}
