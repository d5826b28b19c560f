//! Root-less rootfs bootstrap for the OpenClawd sandbox.
//!
//! Provisions a proot-able Ubuntu tree inside application-private storage:
//! directory skeleton, archive extraction, the bionic compatibility shim, a
//! static resolver file, and a readiness probe. [`BootstrapManager`] composes
//! them and enforces single-writer access to the tree.

pub mod assets;
pub mod cancel;
pub mod common;
pub mod config;
pub mod error;
pub mod extract;
pub mod lifecycle;
pub mod lock;
pub mod network;
pub mod patch;
pub mod paths;
pub mod preflight;
pub mod process;
pub mod provision;
pub mod sandbox;
pub mod status;
pub mod timing;

pub use assets::{AssetProvider, DirAssets, EmbeddedAssets, MemoryAssets};
pub use cancel::CancelToken;
pub use config::Config;
pub use error::{BootstrapError, ExtractionFailure, Result};
pub use lifecycle::BootstrapManager;
pub use patch::PatchOutcome;
pub use paths::BootstrapPaths;
pub use sandbox::{ProotRunner, SandboxOutput, SandboxRunner};
pub use status::{BootstrapStatus, ProbeOutcome};
