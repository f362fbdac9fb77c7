//! Migration of persisted settings to the current record shape.
//!
//! Migration merges three records in order of increasing precedence:
//! defaults, whatever was persisted, and the operator's forced endpoints.

use super::data_store::DataStore;
use super::identity::IdGenerator;
use super::merge::{merge_records, sanitize_record};
use super::types::{
    PartialRecord, Plan, Settings, BASE_PATH_KEY, CONNECT_API_KEY, OID_KEY, SIGNALING_KEY,
    SUBSCRIPTION_API_KEY,
};
use crate::config::OperatorConfig;
use anyhow::{Context, Result};
use serde_json::Value;

/// The settings a brand-new installation starts with.
pub fn default_settings(operator: &OperatorConfig, oid: String) -> Settings {
    Settings {
        signaling: operator.signaling.clone(),
        subscription_api: operator.subscription_api.clone(),
        connect_api: operator.connect_api.clone(),
        base_path: operator.base_path.clone(),
        name: String::new(),
        oid,
        plan: Plan::hobby(),
        duration: 0.0,
        extra: PartialRecord::new(),
    }
}

/// Fields that always take the operator's value, whatever was persisted.
pub fn forced_record(operator: &OperatorConfig) -> PartialRecord {
    let mut record = PartialRecord::new();
    record.insert(
        SIGNALING_KEY.to_string(),
        Value::from(operator.signaling.clone()),
    );
    record.insert(
        SUBSCRIPTION_API_KEY.to_string(),
        Value::from(operator.subscription_api.clone()),
    );
    record.insert(
        CONNECT_API_KEY.to_string(),
        Value::from(operator.connect_api.clone()),
    );
    record.insert(
        BASE_PATH_KEY.to_string(),
        Value::from(operator.base_path.clone()),
    );
    record
}

/// Upgrades a raw persisted blob to a complete settings record.
///
/// A new owner id is generated only when the blob doesn't carry a usable one.
/// Migrating an already migrated record returns it unchanged.
pub fn migrate_record(
    raw: Option<&Value>,
    operator: &OperatorConfig,
    ids: &dyn IdGenerator,
) -> Result<Settings> {
    let persisted = sanitize_record(raw);

    let oid = match persisted.get(OID_KEY).and_then(Value::as_str) {
        Some(oid) => oid.to_string(),
        None => {
            let oid = ids.generate();
            anyhow::ensure!(!oid.is_empty(), "Id generator returned an empty owner id");
            tracing::debug!("No owner id persisted, generated a new one");
            oid
        }
    };

    let records = [
        default_settings(operator, oid).to_record(),
        persisted,
        forced_record(operator),
    ];
    Settings::from_record(merge_records(&records))
        .context("Merged settings record is incomplete - this is a bug in the defaults")
}

/// Loads the persisted blob, migrates it and saves the result as the new
/// canonical record.
///
/// Must run once at startup before anything else reads settings.
pub async fn migrate_settings(
    data: &dyn DataStore,
    operator: &OperatorConfig,
    ids: &dyn IdGenerator,
) -> Result<Settings> {
    let raw = data.load().await.context("Failed to load persisted settings")?;
    let first_run = raw.is_none();

    let settings = migrate_record(raw.as_ref(), operator, ids)?;
    data.save(&settings.to_value())
        .await
        .context("Failed to save migrated settings")?;

    if first_run {
        tracing::info!("Created settings for a new installation");
    } else {
        tracing::debug!("Migrated persisted settings");
    }
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/migration_tests.rs"]
mod tests;
