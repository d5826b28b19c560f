//! Shared test utilities for bootstrap tests.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use openclawd_bootstrap::assets::{BIONIC_BYPASS_ASSET, RESOLV_CONF_ASSET};
use openclawd_bootstrap::{
    BootstrapError, BootstrapManager, BootstrapPaths, CancelToken, MemoryAssets, Result,
    SandboxOutput, SandboxRunner,
};
use tempfile::TempDir;

pub const SHIM: &str = "// test shim\nrequire('os');\n";
pub const RESOLV: &str = "nameserver 10.0.0.53\n";

/// How a stubbed probe responds.
#[derive(Clone)]
pub enum Probe {
    Prints(i32, &'static str),
    Errors,
}

/// Sandbox runner answering the two status probes from a script.
pub struct StubRunner {
    pub node: Probe,
    pub openclaw: Probe,
}

impl StubRunner {
    pub fn failing() -> Self {
        Self {
            node: Probe::Errors,
            openclaw: Probe::Errors,
        }
    }

    pub fn installed() -> Self {
        Self {
            node: Probe::Prints(0, "v22.11.0\n"),
            openclaw: Probe::Prints(0, "/usr/local/bin/openclaw\n"),
        }
    }
}

impl SandboxRunner for StubRunner {
    fn run(&self, command: &str, _: Duration, _: &CancelToken) -> Result<SandboxOutput> {
        let probe = if command.starts_with("node") {
            &self.node
        } else {
            &self.openclaw
        };
        match probe {
            Probe::Prints(code, text) => Ok(SandboxOutput {
                exit_code: *code,
                output: text.to_string(),
            }),
            Probe::Errors => Err(BootstrapError::Spawn {
                program: "proot".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}

pub fn test_assets() -> MemoryAssets {
    MemoryAssets::new()
        .with(BIONIC_BYPASS_ASSET, SHIM)
        .with(RESOLV_CONF_ASSET, RESOLV)
}

/// Test environment with a temporary base directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Base directory of the provisioned tree
    pub base_dir: PathBuf,
    /// Scratch space for archives and fake tools, outside the tree
    pub scratch: PathBuf,
    pub paths: BootstrapPaths,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_dir = temp_dir.path().join("files");
        let scratch = temp_dir.path().join("scratch");
        fs::create_dir_all(&scratch).expect("Failed to create scratch dir");

        Self {
            paths: BootstrapPaths::new(&base_dir),
            _temp_dir: temp_dir,
            base_dir,
            scratch,
        }
    }

    pub fn manager(&self) -> BootstrapManager {
        self.manager_with(StubRunner::failing())
    }

    pub fn manager_with(&self, runner: StubRunner) -> BootstrapManager {
        BootstrapManager::new(self.paths.clone(), Arc::new(test_assets()), Arc::new(runner))
    }

    /// Build a gzip tarball from `files` (relative path, content).
    pub fn archive(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let src = self.scratch.join(format!("{}-src", name));
        for (rel, content) in files {
            let path = src.join(rel);
            fs::create_dir_all(path.parent().unwrap()).expect("Failed to create archive dir");
            fs::write(&path, content).expect("Failed to write archive file");
        }

        let archive = self.scratch.join(format!("{}.tar.gz", name));
        let status = Command::new("tar")
            .arg("czf")
            .arg(&archive)
            .arg("-C")
            .arg(&src)
            .arg(".")
            .status()
            .expect("Failed to run tar");
        assert!(status.success(), "tar czf failed");
        archive
    }

    /// An archive with the minimum a complete rootfs needs.
    pub fn ubuntu_archive(&self) -> PathBuf {
        self.archive(
            "ubuntu",
            &[
                ("bin/bash", "#!/bin/sh\n"),
                ("etc/os-release", "NAME=\"Ubuntu\"\n"),
                ("root/.bashrc", "# ~/.bashrc\nexport PS1='# '\n"),
            ],
        )
    }

    /// Write an executable shell script into scratch and return its path.
    pub fn script(&self, name: &str, body: &str) -> String {
        let path = self.scratch.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to set permissions");
        path.to_string_lossy().into_owned()
    }
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}

/// Assert that a directory exists.
pub fn assert_dir_exists(path: &Path) {
    assert!(path.is_dir(), "Expected directory to exist: {}", path.display());
}
