//! Readiness inspection.
//!
//! `complete` means exactly: rootfs directory, `bin/bash` and the installed
//! shim all exist. Whether Node or the openclaw CLI are present is reported
//! alongside but never gates completion.

use std::thread;
use std::time::Duration;

use log::debug;
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::paths::BootstrapPaths;
use crate::sandbox::{SandboxOutput, SandboxRunner};

/// Probe command for the Node runtime.
pub const NODE_PROBE: &str = "node --version";

/// Probe command for the openclaw CLI.
pub const OPENCLAW_PROBE: &str = "command -v openclaw";

/// Result of one sandboxed tool probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Installed,
    /// The probe ran and the tool is not there.
    Absent,
    /// The probe could not run; presence is unknown.
    Indeterminate(String),
}

impl ProbeOutcome {
    /// Display value: only a confirmed install counts.
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed)
    }
}

/// Point-in-time readiness snapshot. Never cached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapStatus {
    pub rootfs_exists: bool,
    pub bin_bash_exists: bool,
    pub node_installed: bool,
    pub openclaw_installed: bool,
    pub bypass_installed: bool,
    pub rootfs_path: String,
    pub complete: bool,
    #[serde(skip)]
    pub node_probe: ProbeOutcome,
    #[serde(skip)]
    pub openclaw_probe: ProbeOutcome,
}

impl BootstrapStatus {
    /// Names of the completion markers that are missing.
    pub fn missing_markers(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if !self.rootfs_exists {
            missing.push("rootfs".to_string());
        }
        if !self.bin_bash_exists {
            missing.push("bin/bash".to_string());
        }
        if !self.bypass_installed {
            missing.push("bionic-bypass.js".to_string());
        }
        missing
    }
}

/// The three cheap markers, in rootfs / bash / shim order.
fn markers(paths: &BootstrapPaths) -> (bool, bool, bool) {
    (
        paths.rootfs_dir().exists(),
        paths.bin_bash().exists(),
        paths.bypass_file().exists(),
    )
}

/// Filesystem-only completion check. Spawns nothing.
pub fn is_bootstrap_complete(paths: &BootstrapPaths) -> bool {
    let (rootfs, bash, bypass) = markers(paths);
    rootfs && bash && bypass
}

/// Full snapshot: markers plus the two tool probes, run concurrently.
pub fn bootstrap_status(
    paths: &BootstrapPaths,
    runner: &dyn SandboxRunner,
    probe_timeout: Duration,
    cancel: &CancelToken,
) -> BootstrapStatus {
    let (node_probe, openclaw_probe) = thread::scope(|s| {
        let node = s.spawn(|| {
            probe(runner, NODE_PROBE, probe_timeout, cancel, |out| {
                out.output.trim().starts_with('v')
            })
        });
        let openclaw = s.spawn(|| {
            probe(runner, OPENCLAW_PROBE, probe_timeout, cancel, |out| {
                !out.output.trim().is_empty()
            })
        });
        (join_probe(node), join_probe(openclaw))
    });

    snapshot(paths, node_probe, openclaw_probe)
}

/// Markers only. Both probes are reported `Indeterminate(reason)` and nothing
/// is spawned.
pub fn status_without_probes(paths: &BootstrapPaths, reason: &str) -> BootstrapStatus {
    snapshot(
        paths,
        ProbeOutcome::Indeterminate(reason.to_string()),
        ProbeOutcome::Indeterminate(reason.to_string()),
    )
}

fn snapshot(
    paths: &BootstrapPaths,
    node_probe: ProbeOutcome,
    openclaw_probe: ProbeOutcome,
) -> BootstrapStatus {
    let (rootfs_exists, bin_bash_exists, bypass_installed) = markers(paths);

    BootstrapStatus {
        rootfs_exists,
        bin_bash_exists,
        node_installed: node_probe.is_installed(),
        openclaw_installed: openclaw_probe.is_installed(),
        bypass_installed,
        rootfs_path: paths.rootfs_dir().to_string_lossy().into_owned(),
        complete: rootfs_exists && bin_bash_exists && bypass_installed,
        node_probe,
        openclaw_probe,
    }
}

fn probe(
    runner: &dyn SandboxRunner,
    command: &str,
    timeout: Duration,
    cancel: &CancelToken,
    installed: impl Fn(&SandboxOutput) -> bool,
) -> ProbeOutcome {
    match runner.run(command, timeout, cancel) {
        Ok(out) if installed(&out) => ProbeOutcome::Installed,
        Ok(_) => ProbeOutcome::Absent,
        Err(e) => {
            debug!("probe '{}' indeterminate: {}", command, e);
            ProbeOutcome::Indeterminate(e.to_string())
        }
    }
}

fn join_probe(handle: thread::ScopedJoinHandle<'_, ProbeOutcome>) -> ProbeOutcome {
    handle
        .join()
        .unwrap_or_else(|_| ProbeOutcome::Indeterminate("probe thread panicked".to_string()))
}
