//! openclawd-bootstrap - provisions the OpenClawd proot rootfs.
//!
//! Lays out application-private storage for a root-less Ubuntu tree:
//! - directory skeleton and static resolv.conf
//! - rootfs extraction from a gzip tarball
//! - bionic bypass shim for Node
//! - readiness status with sandbox probes

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use openclawd_bootstrap::{BootstrapManager, Config};

#[derive(Parser)]
#[command(name = "openclawd-bootstrap")]
#[command(about = "OpenClawd rootfs bootstrap")]
#[command(
    after_help = "QUICK START:\n  openclawd-bootstrap preflight               Check host tools\n  openclawd-bootstrap install ubuntu.tar.gz   Bootstrap everything\n  openclawd-bootstrap status                  Show readiness"
)]
struct Cli {
    /// Base directory of the provisioned tree (overrides OPENCLAWD_BASE_DIR)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full bootstrap: directories, extraction, shim, resolv.conf, verify
    Install {
        /// gzip-compressed rootfs tarball (deleted on success)
        archive: PathBuf,
    },

    /// Create the directory skeleton
    Setup,

    /// Extract a rootfs tarball (deleted on success)
    Extract {
        archive: PathBuf,
    },

    /// Install the bionic bypass shim and patch .bashrc
    Patch,

    /// Overwrite config/resolv.conf with the bundled template
    Resolv,

    /// Show readiness, including node/openclaw probes
    Status {
        /// Print the status mapping as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exit 0 if the bootstrap is complete, 1 otherwise (no probes)
    Check,

    /// Run preflight checks (host tools, base directory)
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration and layout
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();
    env_logger::init();

    let mut config = Config::load();
    if let Some(base_dir) = cli.base_dir {
        config.base_dir = base_dir;
    }
    let manager = BootstrapManager::from_config(&config);

    match cli.command {
        Commands::Install { archive } => commands::cmd_install(&manager, &archive)?,
        Commands::Setup => commands::cmd_setup(&manager)?,
        Commands::Extract { archive } => commands::cmd_extract(&manager, &archive)?,
        Commands::Patch => commands::cmd_patch(&manager)?,
        Commands::Resolv => commands::cmd_resolv(&manager)?,
        Commands::Status { json } => commands::cmd_status(&manager, json)?,
        Commands::Check => {
            if !commands::cmd_check(&manager) {
                std::process::exit(1);
            }
        }
        Commands::Preflight { strict, json } => commands::cmd_preflight(&config, strict, json)?,
        Commands::Config => commands::cmd_show(&config),
    }

    Ok(())
}
