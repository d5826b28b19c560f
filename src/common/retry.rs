//! Bounded retry for transient filesystem errors.
//!
//! Only errors that can clear on their own (interrupted syscalls, busy
//! resources) are retried. Anything else, and every process exit failure,
//! is returned immediately.

use std::io;
use std::thread;
use std::time::Duration;

use log::warn;

/// Retry configuration.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first (default: 3).
    pub attempts: u32,
    /// Delay before the first retry; doubles each retry (default: 50ms).
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_delay: Duration::from_millis(50),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self {
            attempts: 1,
            initial_delay: Duration::ZERO,
        }
    }
}

/// Whether an I/O error is worth retrying.
pub fn is_transient(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    ) {
        return true;
    }
    matches!(
        err.raw_os_error(),
        Some(libc::EBUSY) | Some(libc::EAGAIN) | Some(libc::EINTR)
    )
}

/// Run `op`, retrying transient failures with exponential backoff.
pub fn retry_io<T>(
    policy: RetryPolicy,
    what: &str,
    mut op: impl FnMut() -> io::Result<T>,
) -> io::Result<T> {
    let mut attempt = 1;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.attempts && is_transient(&err) => {
                let delay = policy.initial_delay * (1 << (attempt - 1).min(4));
                warn!(
                    "{} failed ({}), retry {}/{} in {:?}",
                    what,
                    err,
                    attempt,
                    policy.attempts - 1,
                    delay
                );
                thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
