//! CLI-facing command drivers.
//!
//! Each driver wires the CLI arguments to the session or the mock store,
//! renders the outcome, and maps it to an exit code.

pub mod auth;
pub mod collection;
pub mod identify;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::store::{FileStorage, MockRemoteStore};

/// Build the mock store over the platform data directory.
pub fn open_store(config: &Config) -> Result<MockRemoteStore> {
    let dir = Config::data_dir().context("Failed to locate the data directory")?;
    Ok(MockRemoteStore::new(FileStorage::new(dir), config.latency()))
}
