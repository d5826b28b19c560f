//! Status commands - report readiness.

use anyhow::{Context, Result};

use openclawd_bootstrap::{BootstrapManager, BootstrapStatus, CancelToken, ProbeOutcome};

/// Execute the status command.
pub fn cmd_status(manager: &BootstrapManager, json: bool) -> Result<()> {
    let status = manager.bootstrap_status(&CancelToken::new());

    if json {
        let out = serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
        println!("{}", out);
    } else {
        print_status(&status);
    }
    Ok(())
}

/// Execute the check command. Returns whether the bootstrap is complete.
pub fn cmd_check(manager: &BootstrapManager) -> bool {
    let complete = manager.is_bootstrap_complete();
    if complete {
        println!("Bootstrap complete.");
    } else {
        println!("Bootstrap incomplete.");
    }
    complete
}

fn print_status(status: &BootstrapStatus) {
    println!("Rootfs: {}", status.rootfs_path);
    println!("  {} rootfs directory", mark(status.rootfs_exists));
    println!("  {} bin/bash", mark(status.bin_bash_exists));
    println!("  {} bionic bypass", mark(status.bypass_installed));
    println!("  {} node {}", mark(status.node_installed), probe_note(&status.node_probe));
    println!(
        "  {} openclaw {}",
        mark(status.openclaw_installed),
        probe_note(&status.openclaw_probe)
    );
    println!();
    if status.complete {
        println!("Bootstrap complete.");
    } else {
        println!("Bootstrap incomplete, missing: {}", status.missing_markers().join(", "));
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn probe_note(outcome: &ProbeOutcome) -> String {
    match outcome {
        ProbeOutcome::Indeterminate(reason) => format!("(unknown: {})", reason),
        _ => String::new(),
    }
}
