//! Error types for bootstrap operations.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BootstrapError>;

/// A rootfs extraction that ran to completion but exited non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFailure {
    /// Exit code of the decompression process, or -1 if killed by a signal.
    pub exit_code: i32,
    /// Combined stdout and stderr.
    pub output: String,
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = self.output.trim();
        if output.is_empty() {
            write!(f, "rootfs extraction failed (exit code {})", self.exit_code)
        } else {
            write!(
                f,
                "rootfs extraction failed (exit code {}):\n{}",
                self.exit_code, output
            )
        }
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("{0}")]
    Extraction(ExtractionFailure),

    #[error("Failed to read bundled asset '{name}': {source}")]
    AssetRead {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directories: {}", format_failures(.0))]
    Directories(Vec<(PathBuf, io::Error)>),

    #[error("Failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' timed out after {after:?}")]
    Timeout { program: String, after: Duration },

    #[error("'{program}' was cancelled")]
    Cancelled { program: String },

    #[error("Provisioned tree is locked by another process ({})", lock.display())]
    Busy { lock: PathBuf },

    #[error("Bootstrap incomplete, missing: {}", missing.join(", "))]
    Incomplete { missing: Vec<String> },
}

impl BootstrapError {
    pub fn fs(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Exit code of a failed extraction, if this is one.
    pub fn extraction_exit_code(&self) -> Option<i32> {
        match self {
            Self::Extraction(failure) => Some(failure.exit_code),
            _ => None,
        }
    }
}

fn format_failures(failures: &[(PathBuf, io::Error)]) -> String {
    failures
        .iter()
        .map(|(path, err)| format!("{} ({})", path.display(), err))
        .collect::<Vec<_>>()
        .join(", ")
}
