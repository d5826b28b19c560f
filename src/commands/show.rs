//! Show command - displays configuration and layout.

use openclawd_bootstrap::{BootstrapPaths, Config};

/// Execute the show command.
pub fn cmd_show(config: &Config) {
    config.print();

    let paths = BootstrapPaths::new(&config.base_dir);
    println!();
    println!("Layout:");
    println!("  rootfs: {}", paths.rootfs_dir().display());
    println!("  tmp:    {}", paths.tmp_dir().display());
    println!("  home:   {}", paths.home_dir().display());
    println!("  config: {}", paths.config_dir().display());
    println!("  shim:   {}", paths.bypass_file().display());
}
