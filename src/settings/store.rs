//! Typed access to the persisted settings record.

use super::data_store::DataStore;
use super::identity::IdGenerator;
use super::migration::migrate_settings;
use super::types::{Plan, Settings};
use crate::config::OperatorConfig;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};

/// Settings store for one installation.
///
/// Every mutation reads the latest record, changes it and writes the whole
/// record back. Mutations are serialized so two writers in this process can't
/// lose each other's changes. Subscribers are notified after each save.
pub struct SettingsStore {
    data: Arc<dyn DataStore>,
    write_lock: Mutex<()>,
    changes: watch::Sender<Settings>,
}

impl SettingsStore {
    /// Migrates the persisted record and opens the store on top of it.
    pub async fn open(
        data: Arc<dyn DataStore>,
        operator: &OperatorConfig,
        ids: &dyn IdGenerator,
    ) -> Result<Self> {
        let settings = migrate_settings(data.as_ref(), operator, ids).await?;
        let (changes, _) = watch::channel(settings);
        Ok(Self {
            data,
            write_lock: Mutex::new(()),
            changes,
        })
    }

    /// Reads the persisted record.
    ///
    /// Reflects the last completed save, nothing fresher.
    pub async fn get(&self) -> Result<Settings> {
        let raw = self
            .data
            .load()
            .await
            .context("Failed to load settings")?
            .context("Settings are missing from storage - they should have been migrated on open")?;
        serde_json::from_value(raw).context("Persisted settings have an invalid shape")
    }

    /// Replaces the persisted record with `settings`.
    ///
    /// The owner id is fixed once migrated; a record carrying a different one is refused.
    pub async fn save(&self, settings: &Settings) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let persisted = self.get().await?;
        ensure_same_owner(&persisted, settings)?;
        self.persist(settings).await
    }

    /// Applies `change` to the latest record and saves the result.
    pub async fn update<F>(&self, change: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let persisted = self.get().await?;
        let mut settings = persisted.clone();
        change(&mut settings);
        ensure_same_owner(&persisted, &settings)?;
        self.persist(&settings).await?;
        Ok(settings)
    }

    pub async fn set_name(&self, name: &str) -> Result<Settings> {
        let name = name.to_string();
        self.update(move |settings| settings.name = name).await
    }

    /// Records the total collaboration time reported by the editing engine.
    pub async fn set_duration(&self, minutes: f64) -> Result<Settings> {
        if !minutes.is_finite() || minutes < 0.0 {
            anyhow::bail!("Duration must be a non-negative number of minutes, got {}", minutes);
        }
        self.update(move |settings| settings.duration = minutes).await
    }

    /// Replaces the plan wholesale.
    pub async fn set_plan(&self, plan: Plan) -> Result<Settings> {
        self.update(move |settings| settings.plan = plan).await
    }

    /// Returns a receiver that always holds the last saved record.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.changes.subscribe()
    }

    /// The last record saved through this store.
    pub fn current(&self) -> Settings {
        self.changes.borrow().clone()
    }

    async fn persist(&self, settings: &Settings) -> Result<()> {
        self.data.save(&settings.to_value()).await?;
        self.changes.send_replace(settings.clone());
        Ok(())
    }
}

fn ensure_same_owner(persisted: &Settings, candidate: &Settings) -> Result<()> {
    if candidate.oid != persisted.oid {
        anyhow::bail!(
            "Owner id cannot change (persisted '{}', got '{}')",
            persisted.oid,
            candidate.oid
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
