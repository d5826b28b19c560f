//! Configuration management.
//!
//! Reads configuration from environment variables. `main` loads a `.env`
//! file into the environment first, so real environment variables win.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;

/// Default wall-clock limit for rootfs extraction.
pub const DEFAULT_EXTRACT_TIMEOUT_SECS: u64 = 30 * 60;

/// Default wall-clock limit for each sandbox probe.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Bootstrap configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory of the provisioned tree (default: <data dir>/openclawd)
    pub base_dir: PathBuf,
    /// Directory overriding the embedded assets, if set.
    pub assets_dir: Option<PathBuf>,
    /// `tar` executable used for extraction.
    pub tar_program: String,
    /// `proot` executable used for sandbox probes.
    pub proot_program: String,
    pub extract_timeout: Duration,
    pub probe_timeout: Duration,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Build configuration from a variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let base_dir = vars
            .get("OPENCLAWD_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_base_dir);

        let assets_dir = vars
            .get("OPENCLAWD_ASSETS_DIR")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let tar_program = vars
            .get("OPENCLAWD_TAR")
            .cloned()
            .unwrap_or_else(|| "tar".to_string());

        let proot_program = vars
            .get("OPENCLAWD_PROOT")
            .cloned()
            .unwrap_or_else(|| "proot".to_string());

        Self {
            base_dir,
            assets_dir,
            tar_program,
            proot_program,
            extract_timeout: secs(
                vars,
                "OPENCLAWD_EXTRACT_TIMEOUT_SECS",
                DEFAULT_EXTRACT_TIMEOUT_SECS,
            ),
            probe_timeout: secs(vars, "OPENCLAWD_PROBE_TIMEOUT_SECS", DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  OPENCLAWD_BASE_DIR: {}", self.base_dir.display());
        match &self.assets_dir {
            Some(dir) => println!("  OPENCLAWD_ASSETS_DIR: {}", dir.display()),
            None => println!("  OPENCLAWD_ASSETS_DIR: (embedded)"),
        }
        println!("  OPENCLAWD_TAR: {}", self.tar_program);
        println!("  OPENCLAWD_PROOT: {}", self.proot_program);
        println!(
            "  OPENCLAWD_EXTRACT_TIMEOUT_SECS: {}",
            self.extract_timeout.as_secs()
        );
        println!(
            "  OPENCLAWD_PROBE_TIMEOUT_SECS: {}",
            self.probe_timeout.as_secs()
        );
    }
}

fn default_base_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("openclawd")
}

fn secs(vars: &HashMap<String, String>, key: &str, default: u64) -> Duration {
    let value = match vars.get(key) {
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => n,
            _ => {
                warn!("ignoring invalid {}={:?}, using {}", key, raw, default);
                default
            }
        },
        None => default,
    };
    Duration::from_secs(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&HashMap::new());
        assert!(config.base_dir.ends_with("openclawd"));
        assert!(config.assets_dir.is_none());
        assert_eq!(config.tar_program, "tar");
        assert_eq!(config.proot_program, "proot");
        assert_eq!(config.extract_timeout, Duration::from_secs(1800));
        assert_eq!(config.probe_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(&vars(&[
            ("OPENCLAWD_BASE_DIR", "/data/files"),
            ("OPENCLAWD_ASSETS_DIR", "/opt/assets"),
            ("OPENCLAWD_PROOT", "/system/bin/proot"),
            ("OPENCLAWD_PROBE_TIMEOUT_SECS", "5"),
        ]));
        assert_eq!(config.base_dir, PathBuf::from("/data/files"));
        assert_eq!(config.assets_dir, Some(PathBuf::from("/opt/assets")));
        assert_eq!(config.proot_program, "/system/bin/proot");
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let config = Config::from_vars(&vars(&[
            ("OPENCLAWD_EXTRACT_TIMEOUT_SECS", "soon"),
            ("OPENCLAWD_PROBE_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(config.extract_timeout, Duration::from_secs(1800));
        assert_eq!(config.probe_timeout, Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn test_load_reads_process_env() {
        std::env::set_var("OPENCLAWD_TAR", "/usr/local/bin/gtar");
        let config = Config::load();
        std::env::remove_var("OPENCLAWD_TAR");
        assert_eq!(config.tar_program, "/usr/local/bin/gtar");
    }
}
