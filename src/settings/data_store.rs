//! Blob persistence for the settings record.
//!
//! The host gives each plugin a single data slot: load one JSON value, save one
//! JSON value. [`DataStore`] is that contract; the settings layer enforces the
//! record's shape on top of it.

use crate::paths;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Whole-blob key-value persistence for one installation.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Loads the persisted blob, or `None` if nothing has been saved yet.
    async fn load(&self) -> Result<Option<Value>>;

    /// Replaces the persisted blob.
    async fn save(&self, data: &Value) -> Result<()>;
}

/// Stores the blob as pretty-printed JSON in a single file.
///
/// Saves go through a temporary file and a rename, so readers only ever see
/// the previous or the new record.
#[derive(Debug, Clone)]
pub struct FileDataStore {
    path: PathBuf,
}

impl FileDataStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// File store at the default location, `~/.peerdraft/data.json`.
    pub fn in_home() -> Result<Self> {
        Ok(Self::new(paths::data_file_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DataStore for FileDataStore {
    async fn load(&self) -> Result<Option<Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read settings file: {}", self.path.display())
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data = serde_json::from_str(&content).with_context(|| {
            format!(
                "Failed to parse settings file as JSON: {}",
                self.path.display()
            )
        })?;
        Ok(Some(data))
    }

    async fn save(&self, data: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content =
            serde_json::to_string_pretty(data).context("Failed to serialize settings")?;

        tokio::fs::write(&temp_path, &content)
            .await
            .with_context(|| {
                format!("Failed to write temp settings file: {}", temp_path.display())
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .with_context(|| format!("Failed to rename temp file to: {}", self.path.display()))?;

        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the blob in memory as serialized JSON text.
///
/// Holding the text rather than the value lets callers compare exactly what
/// was written.
#[derive(Debug, Default)]
pub struct MemoryDataStore {
    content: Mutex<Option<String>>,
}

impl MemoryDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `data`.
    pub fn with_data(data: &Value) -> Self {
        Self {
            content: Mutex::new(Some(data.to_string())),
        }
    }

    /// The serialized blob as last saved.
    pub fn raw(&self) -> Option<String> {
        self.content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    async fn load(&self) -> Result<Option<Value>> {
        match self.raw() {
            Some(content) => {
                let data =
                    serde_json::from_str(&content).context("Failed to parse stored settings")?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, data: &Value) -> Result<()> {
        let content = serde_json::to_string(data).context("Failed to serialize settings")?;
        *self
            .content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(content);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/data_store_tests.rs"]
mod tests;
