//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `setup` - Create the directory skeleton (`setup`) and write the resolver
//!   file (`resolv`)
//! - `extract` - Unpack a rootfs archive
//! - `patch` - Install the bionic bypass shim
//! - `status` - Report readiness (`status`, `check`)
//! - `install` - Full bootstrap from an archive
//! - `preflight` - Check host tools
//! - `show` - Display configuration

pub mod extract;
pub mod install;
pub mod patch;
mod preflight;
pub mod setup;
pub mod show;
pub mod status;

pub use extract::cmd_extract;
pub use install::cmd_install;
pub use patch::cmd_patch;
pub use preflight::cmd_preflight;
pub use setup::{cmd_resolv, cmd_setup};
pub use show::cmd_show;
pub use status::{cmd_check, cmd_status};
