//! Home-based storage paths for persisted plugin data.
//!
//! Everything lives under `~/.peerdraft/`:
//! - `data.json` - The settings record of this installation
//! - `operator.yaml` - Optional operator endpoint overrides
//!
//! The home can be moved with the `PEERDRAFT_HOME` environment variable.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// The name of the peerdraft directory.
const PEERDRAFT_DIR: &str = ".peerdraft";

/// Environment variable that replaces `~/.peerdraft/`.
pub const HOME_ENV: &str = "PEERDRAFT_HOME";

const DATA_FILENAME: &str = "data.json";
const OPERATOR_CONFIG_FILENAME: &str = "operator.yaml";

static HOME_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Returns the peerdraft home directory: `~/.peerdraft/`
///
/// Creates the directory if it doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - Home directory cannot be determined
/// - Directory creation fails
pub fn peerdraft_home_dir() -> Result<PathBuf> {
    let dir = resolve_home_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create peerdraft directory: {}", dir.display()))?;
    Ok(dir)
}

/// Returns the settings data file: `~/.peerdraft/data.json`
pub fn data_file_path() -> Result<PathBuf> {
    Ok(peerdraft_home_dir()?.join(DATA_FILENAME))
}

/// Returns the operator config file path if one has been placed in the home directory.
///
/// Only looks; the home directory is not created.
pub fn operator_config_path() -> Result<Option<PathBuf>> {
    let path = resolve_home_dir()?.join(OPERATOR_CONFIG_FILENAME);
    Ok(path.is_file().then_some(path))
}

fn resolve_home_dir() -> Result<PathBuf> {
    match home_override() {
        Some(dir) => Ok(dir),
        None => match std::env::var_os(HOME_ENV) {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(dirs::home_dir()
                .context("Could not determine home directory for settings storage")?
                .join(PEERDRAFT_DIR)),
        },
    }
}

fn home_override() -> Option<PathBuf> {
    HOME_OVERRIDE
        .read()
        .map(|guard| guard.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
}

/// Restores the previous home override when dropped.
#[cfg(test)]
pub struct HomeGuard {
    previous: Option<PathBuf>,
}

/// Points the peerdraft home at `path` until the returned guard is dropped.
///
/// Tests using this must be `#[serial]`.
#[cfg(test)]
pub fn set_home_for_test(path: PathBuf) -> HomeGuard {
    let mut slot = HOME_OVERRIDE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    HomeGuard {
        previous: slot.replace(path),
    }
}

#[cfg(test)]
impl Drop for HomeGuard {
    fn drop(&mut self) {
        let mut slot = HOME_OVERRIDE
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = self.previous.take();
    }
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
