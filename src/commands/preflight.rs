//! Preflight command - runs preflight checks.

use anyhow::{bail, Context, Result};

use openclawd_bootstrap::{preflight, Config};

/// Execute the preflight command.
pub fn cmd_preflight(config: &Config, strict: bool, json: bool) -> Result<()> {
    let report = preflight::run_preflight(config);

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", out);
    } else {
        print!("{}", report);
    }

    if !report.all_passed() {
        if strict {
            bail!(
                "Preflight failed: {} check(s) failed. Fix the issues above before bootstrapping.",
                report.fail_count()
            );
        }
        println!("Some checks failed. Use --strict to exit non-zero.");
    }
    Ok(())
}
