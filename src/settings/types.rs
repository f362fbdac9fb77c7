//! Data types for the persisted settings record.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A partial, untyped settings record as found in storage or produced by merging.
pub type PartialRecord = Map<String, Value>;

pub const SIGNALING_KEY: &str = "signaling";
pub const SUBSCRIPTION_API_KEY: &str = "subscriptionAPI";
pub const CONNECT_API_KEY: &str = "connectAPI";
pub const BASE_PATH_KEY: &str = "basePath";
pub const NAME_KEY: &str = "name";
pub const OID_KEY: &str = "oid";
pub const PLAN_KEY: &str = "plan";
pub const DURATION_KEY: &str = "duration";

/// Subscription plan reported by the remote authority.
///
/// Serialized as `{"type": "hobby" | "professional", "email"?: string}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Plan {
    Hobby {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
    Professional {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl Plan {
    pub fn hobby() -> Self {
        Plan::Hobby { email: None }
    }

    pub fn professional(email: Option<String>) -> Self {
        Plan::Professional { email }
    }

    pub fn tier(&self) -> PlanTier {
        match self {
            Plan::Hobby { .. } => PlanTier::Hobby,
            Plan::Professional { .. } => PlanTier::Professional,
        }
    }

    /// The address the subscription was connected with, if any.
    pub fn email(&self) -> Option<&str> {
        match self {
            Plan::Hobby { email } | Plan::Professional { email } => email.as_deref(),
        }
    }
}

impl Default for Plan {
    fn default() -> Self {
        Plan::hobby()
    }
}

/// Plan tier without the attached email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanTier {
    Hobby,
    Professional,
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanTier::Hobby => write!(f, "hobby"),
            PlanTier::Professional => write!(f, "professional"),
        }
    }
}

/// The full settings record of one installation.
///
/// Keys not known to this version are kept in `extra` so that a record written
/// by a newer build survives a round trip through an older one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Signaling endpoints for the real-time transport, in preference order.
    pub signaling: Vec<String>,
    #[serde(rename = "subscriptionAPI")]
    pub subscription_api: String,
    #[serde(rename = "connectAPI")]
    pub connect_api: String,
    pub base_path: String,
    /// Display name shown to collaborators.
    pub name: String,
    /// Owner id. Generated once and never replaced.
    pub oid: String,
    pub plan: Plan,
    /// Minutes of collaboration so far, maintained by the editing engine.
    pub duration: f64,
    #[serde(flatten)]
    pub extra: PartialRecord,
}

impl Settings {
    /// Builds typed settings from a complete record.
    pub fn from_record(record: PartialRecord) -> Result<Self> {
        serde_json::from_value(Value::Object(record))
            .context("Settings record is missing fields or has invalid values")
    }

    /// Converts the settings back into an untyped record.
    pub fn to_record(&self) -> PartialRecord {
        match serde_json::to_value(self) {
            Ok(Value::Object(record)) => record,
            // A struct with string keys always serializes to an object.
            _ => PartialRecord::new(),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.to_record())
    }
}

/// Returns true if `value` is acceptable for the known settings field `key`.
///
/// Unknown keys are always accepted.
pub fn field_is_valid(key: &str, value: &Value) -> bool {
    match key {
        SIGNALING_KEY => serde_json::from_value::<Vec<String>>(value.clone())
            .map(|endpoints| !endpoints.is_empty())
            .unwrap_or(false),
        SUBSCRIPTION_API_KEY | CONNECT_API_KEY | BASE_PATH_KEY | NAME_KEY => value.is_string(),
        OID_KEY => value.as_str().is_some_and(|oid| !oid.is_empty()),
        PLAN_KEY => serde_json::from_value::<Plan>(value.clone()).is_ok(),
        DURATION_KEY => value
            .as_f64()
            .is_some_and(|minutes| minutes.is_finite() && minutes >= 0.0),
        _ => true,
    }
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
