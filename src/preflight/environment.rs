//! Provisioned tree checks (base directory, rootfs state).

use std::fs;

use crate::paths::BootstrapPaths;
use crate::status::is_bootstrap_complete;

use super::types::CheckResult;

pub fn check_environment(paths: &BootstrapPaths) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let base = paths.base_dir();

    let name = "base directory writable";
    let probe = base.join(".preflight-test");
    let writable = fs::create_dir_all(base).and_then(|_| fs::write(&probe, "test"));
    match writable {
        Ok(()) => {
            let _ = fs::remove_file(&probe);
            results.push(CheckResult::pass_with(name, base.display().to_string()));
        }
        Err(e) => {
            results.push(CheckResult::fail(
                name,
                format!("Cannot write to {}: {}", base.display(), e),
            ));
        }
    }

    if is_bootstrap_complete(paths) {
        results.push(CheckResult::pass("rootfs installed"));
    } else if paths.rootfs_dir().exists() {
        results.push(CheckResult::warn(
            "rootfs installed",
            "Rootfs present but incomplete - run `openclawd-bootstrap install <archive>`",
        ));
    } else {
        results.push(CheckResult::warn(
            "rootfs installed",
            "Not installed yet - run `openclawd-bootstrap install <archive>`",
        ));
    }

    results
}
