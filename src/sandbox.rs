//! Running commands inside the provisioned rootfs.
//!
//! The bootstrap does not sandbox anything itself. It consumes a
//! [`SandboxRunner`]: run one command line inside the tree, block until it
//! exits, hand back the output. [`ProotRunner`] is the default, root-less
//! implementation.

use std::time::Duration;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::paths::BootstrapPaths;
use crate::process::Cmd;

const GUEST_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Captured result of a sandboxed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxOutput {
    pub exit_code: i32,
    /// Captured stdout.
    pub output: String,
}

impl SandboxOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes command lines inside the provisioned tree.
///
/// `Err` means the command could not be run to completion (spawn failure,
/// timeout, cancellation). A command that ran and exited non-zero is `Ok`.
pub trait SandboxRunner: Send + Sync {
    fn run(&self, command: &str, timeout: Duration, cancel: &CancelToken)
        -> Result<SandboxOutput>;
}

/// Runs commands through `proot` with the rootfs as `/`.
#[derive(Debug, Clone)]
pub struct ProotRunner {
    paths: BootstrapPaths,
    proot_program: String,
}

impl ProotRunner {
    pub fn new(paths: BootstrapPaths, proot_program: impl Into<String>) -> Self {
        Self {
            paths,
            proot_program: proot_program.into(),
        }
    }

    fn command(&self, command: &str) -> Cmd {
        let mut cmd = Cmd::new(&self.proot_program)
            .args(["--link2symlink", "-0", "-r"])
            .arg_path(self.paths.rootfs_dir())
            .args(["-b", "/dev", "-b", "/proc", "-b", "/sys"]);

        let resolv = self.paths.resolv_conf();
        if resolv.is_file() {
            cmd = cmd
                .arg("-b")
                .arg(format!("{}:/etc/resolv.conf", resolv.display()));
        }

        cmd.args(["-w", "/root", "/usr/bin/env", "-i"])
            .arg("HOME=/root")
            .arg("LANG=C.UTF-8")
            .arg("TERM=xterm-256color")
            .arg(format!("PATH={}", GUEST_PATH))
            .args(["/bin/bash", "-lc", command])
            .env("PROOT_TMP_DIR", self.paths.tmp_dir().to_string_lossy())
    }
}

impl SandboxRunner for ProotRunner {
    fn run(
        &self,
        command: &str,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<SandboxOutput> {
        let result = self
            .command(command)
            .timeout(timeout)
            .cancel_token(cancel)
            .run()?;
        Ok(SandboxOutput {
            exit_code: result.code(),
            output: result.stdout,
        })
    }
}
