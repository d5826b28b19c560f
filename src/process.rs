//! Centralized command execution with timeout and cancellation.
//!
//! Every external process the bootstrap spawns (`tar`, `proot`) goes through
//! [`Cmd`], so all of them are bounded by a wall-clock limit and observe a
//! shared [`CancelToken`]. A timed-out or cancelled child is killed and reaped.

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::debug;

use crate::cancel::CancelToken;
use crate::error::{BootstrapError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of a command execution.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit status of the command.
    pub status: ExitStatus,
    /// Captured stdout, or stdout and stderr interleaved when merged.
    pub stdout: String,
    /// Captured stderr. Empty when merged into stdout.
    pub stderr: String,
}

impl CommandResult {
    /// Returns true if the command exited successfully.
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Get the exit code, or -1 if terminated by signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    /// Get stdout, trimmed of whitespace.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Get stderr, trimmed of whitespace.
    pub fn stderr_trimmed(&self) -> &str {
        self.stderr.trim()
    }
}

/// Builder for configuring command execution.
pub struct Cmd {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    current_dir: Option<PathBuf>,
    /// Send stderr into the same pipe as stdout.
    merge_stderr: bool,
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_string(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
            merge_stderr: false,
            timeout: None,
            cancel: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Add a path as an argument.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.to_string_lossy().into_owned());
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.envs
            .push((key.as_ref().to_string(), value.as_ref().to_string()));
        self
    }

    /// Set the working directory.
    pub fn dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Capture stdout and stderr as one interleaved stream.
    pub fn merge_stderr(mut self) -> Self {
        self.merge_stderr = true;
        self
    }

    /// Kill the command if it runs longer than `limit`.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Kill the command once `token` is cancelled.
    pub fn cancel_token(mut self, token: &CancelToken) -> Self {
        self.cancel = Some(token.clone());
        self
    }

    /// Run the command to completion and capture its output.
    ///
    /// A non-zero exit is not an error here; callers decide what it means.
    /// Errors are spawn failures, timeouts and cancellation.
    pub fn run(self) -> Result<CommandResult> {
        let program = self.program.clone();
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(BootstrapError::Cancelled { program });
        }

        let spawn_error = |source: io::Error| BootstrapError::Spawn {
            program: program.clone(),
            source,
        };

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }

        let mut merged = None;
        if self.merge_stderr {
            let (reader, writer) = io::pipe().map_err(spawn_error)?;
            cmd.stdout(writer.try_clone().map_err(spawn_error)?);
            cmd.stderr(writer);
            merged = Some(reader);
        } else {
            cmd.stdout(Stdio::piped());
            cmd.stderr(Stdio::piped());
        }

        debug!("running {} {}", self.program, self.args.join(" "));
        let spawned = cmd.spawn();
        // The builder holds the parent's copies of the pipe writer; the reader
        // only sees EOF once they are gone.
        drop(cmd);
        let mut child = spawned.map_err(spawn_error)?;

        let stdout_handle = match merged {
            Some(reader) => Some(drain(reader)),
            None => child.stdout.take().map(drain),
        };
        let stderr_handle = child.stderr.take().map(drain);

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(source) => {
                    kill_and_reap(&mut child);
                    return Err(spawn_error(source));
                }
            }

            if let Err(e) = self.check_limits(started) {
                kill_and_reap(&mut child);
                return Err(e);
            }

            thread::sleep(POLL_INTERVAL);
        };

        Ok(CommandResult {
            status,
            stdout: self.collect(stdout_handle, started)?,
            stderr: self.collect(stderr_handle, started)?,
        })
    }

    /// Cancelled or past the deadline.
    fn check_limits(&self, started: Instant) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(BootstrapError::Cancelled {
                program: self.program.clone(),
            });
        }
        if let Some(limit) = self.timeout {
            if started.elapsed() >= limit {
                return Err(BootstrapError::Timeout {
                    program: self.program.clone(),
                    after: limit,
                });
            }
        }
        Ok(())
    }

    /// Wait for a drain thread under the same limits as the child. A
    /// grandchild that inherited the pipe can keep it open after the child
    /// exits; it is abandoned, not waited for.
    fn collect(&self, handle: Option<JoinHandle<Vec<u8>>>, started: Instant) -> Result<String> {
        let Some(handle) = handle else {
            return Ok(String::new());
        };
        while !handle.is_finished() {
            self.check_limits(started)?;
            thread::sleep(POLL_INTERVAL);
        }
        let bytes = handle.join().unwrap_or_default();
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Read a pipe to EOF on a background thread.
fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    })
}

fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_success() {
        let result = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(result.success());
        assert_eq!(result.stdout_trimmed(), "hello");
    }

    #[test]
    fn test_run_captures_stderr() {
        // `ls` on a non-existent file writes to stderr
        let result = Cmd::new("ls")
            .arg("/nonexistent_path_12345")
            .run()
            .unwrap();

        assert!(!result.success());
        assert!(!result.stderr.is_empty());
        assert!(result.stdout.is_empty());
    }

    #[test]
    fn test_merge_stderr_into_stdout() {
        let result = Cmd::new("sh")
            .args(["-c", "echo out; echo err >&2; exit 3"])
            .merge_stderr()
            .run()
            .unwrap();

        assert_eq!(result.code(), 3);
        assert!(result.stdout.contains("out"));
        assert!(result.stdout.contains("err"));
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn test_nonzero_exit_is_not_an_error() {
        let result = Cmd::new("false").run().unwrap();
        assert!(!result.success());
        assert_eq!(result.code(), 1);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = Cmd::new("nonexistent_program_12345").run().unwrap_err();
        assert!(matches!(err, BootstrapError::Spawn { .. }));
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let err = Cmd::new("sleep")
            .arg("10")
            .timeout(Duration::from_millis(100))
            .run()
            .unwrap_err();

        assert!(matches!(err, BootstrapError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_inherited_pipe_does_not_outlive_timeout() {
        // The background sleep keeps stdout open after `sh` exits.
        let started = Instant::now();
        let err = Cmd::new("sh")
            .args(["-c", "sleep 10 & echo started"])
            .timeout(Duration::from_millis(300))
            .run()
            .unwrap_err();

        assert!(matches!(err, BootstrapError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_cancel_kills_child() {
        let token = CancelToken::new();
        let trigger = token.clone();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            trigger.cancel();
        });

        let started = Instant::now();
        let err = Cmd::new("sleep")
            .arg("10")
            .cancel_token(&token)
            .run()
            .unwrap_err();
        canceller.join().unwrap();

        assert!(matches!(err, BootstrapError::Cancelled { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_already_cancelled_never_spawns() {
        let token = CancelToken::new();
        token.cancel();
        let err = Cmd::new("nonexistent_program_12345")
            .cancel_token(&token)
            .run()
            .unwrap_err();
        assert!(matches!(err, BootstrapError::Cancelled { .. }));
    }

    #[test]
    fn test_env_and_dir() {
        let result = Cmd::new("sh")
            .args(["-c", "echo $GREETING; pwd"])
            .env("GREETING", "hi")
            .dir(Path::new("/tmp"))
            .run()
            .unwrap();
        assert!(result.stdout.contains("hi"));
        assert!(result.stdout.contains("tmp"));
    }

    #[test]
    fn test_cmd_args_iterator() {
        let args = vec!["one", "two", "three"];
        let result = Cmd::new("echo").args(args).run().unwrap();

        assert_eq!(result.stdout_trimmed(), "one two three");
    }
}
