//! Read-only bundled resources.
//!
//! The bootstrap copies two resources verbatim: the compatibility shim and the
//! resolver template. They are read through [`AssetProvider`] so the core has
//! no platform dependency. The binary embeds both at compile time; a directory
//! override and an in-memory provider exist for deployments and tests.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::{BootstrapError, Result};

/// Compatibility shim loaded by Node on startup.
pub const BIONIC_BYPASS_ASSET: &str = "bionic_bypass.js";

/// DNS resolver template written to `config/resolv.conf`.
pub const RESOLV_CONF_ASSET: &str = "resolv.conf";

/// Source of bundled resources.
pub trait AssetProvider: Send + Sync {
    fn open(&self, name: &str) -> io::Result<Vec<u8>>;
}

/// Read an asset, mapping any failure to [`BootstrapError::AssetRead`].
pub fn read_asset(assets: &dyn AssetProvider, name: &str) -> Result<Vec<u8>> {
    assets.open(name).map_err(|source| BootstrapError::AssetRead {
        name: name.to_string(),
        source,
    })
}

/// Assets compiled into the binary from `assets/`.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedAssets;

impl AssetProvider for EmbeddedAssets {
    fn open(&self, name: &str) -> io::Result<Vec<u8>> {
        let bytes: &[u8] = match name {
            BIONIC_BYPASS_ASSET => include_bytes!("../assets/bionic_bypass.js"),
            RESOLV_CONF_ASSET => include_bytes!("../assets/resolv.conf"),
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no embedded asset named '{}'", name),
                ))
            }
        };
        Ok(bytes.to_vec())
    }
}

/// Assets read from a directory at call time.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetProvider for DirAssets {
    fn open(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(name))
    }
}

/// Assets held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.to_string(), content.into());
        self
    }
}

impl AssetProvider for MemoryAssets {
    fn open(&self, name: &str) -> io::Result<Vec<u8>> {
        self.files.get(name).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no asset named '{}'", name),
            )
        })
    }
}
