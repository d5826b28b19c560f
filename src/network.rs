//! Static DNS resolver configuration.

use log::info;

use crate::assets::{read_asset, AssetProvider, RESOLV_CONF_ASSET};
use crate::common::write_file_with_dirs;
use crate::error::Result;
use crate::paths::BootstrapPaths;

/// Write the bundled resolver template to `config/resolv.conf`.
///
/// Any existing file is replaced entirely, never merged.
pub fn write_resolv_conf(paths: &BootstrapPaths, assets: &dyn AssetProvider) -> Result<()> {
    let content = read_asset(assets, RESOLV_CONF_ASSET)?;
    let target = paths.resolv_conf();
    write_file_with_dirs(&target, &content)?;
    info!("wrote {}", target.display());
    Ok(())
}
