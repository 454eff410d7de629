//! Subcommand implementations.

pub mod config;
pub mod heartbeat;
pub mod run;
pub mod verify;

use std::path::PathBuf;

use anyhow::Result;
use checkpoint_core::ConfigStore;

/// Config store for `--config`, or the default location.
pub fn config_store(path: Option<PathBuf>) -> Result<ConfigStore> {
    Ok(match path {
        Some(path) => ConfigStore::with_path(path),
        None => ConfigStore::new()?,
    })
}
