//! Preflight checks.
//!
//! Verifies host tools and the base directory before a bootstrap.
//! Run with `openclawd-bootstrap preflight`.

mod environment;
mod host_tools;
mod types;

use log::info;

use crate::config::Config;
use crate::paths::BootstrapPaths;

pub use types::{CheckResult, CheckStatus, PreflightReport};

/// Run all preflight checks.
pub fn run_preflight(config: &Config) -> PreflightReport {
    let mut checks = Vec::new();

    info!("checking host tools");
    checks.extend(host_tools::check_host_tools(
        &config.tar_program,
        &config.proot_program,
    ));

    info!("checking provisioned tree");
    checks.extend(environment::check_environment(&BootstrapPaths::new(
        &config.base_dir,
    )));

    PreflightReport { checks }
}
