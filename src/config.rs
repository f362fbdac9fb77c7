use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Endpoints owned by the operator of the collaboration service.
///
/// These values are forced onto every installation's settings during migration,
/// so changing them here (or in an operator YAML file) takes effect on next start.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OperatorConfig {
    /// Signaling servers for the real-time transport, in preference order.
    pub signaling: Vec<String>,
    /// Endpoint polled by the refresh flow.
    pub subscription_api: String,
    /// Endpoint used to bind an existing subscription to an owner id.
    pub connect_api: String,
    pub base_path: String,
    /// Checkout page; the owner id is appended as a query parameter.
    #[serde(default = "default_checkout_url")]
    pub checkout_url: String,
}

fn default_checkout_url() -> String {
    "https://peerdraft.app/checkout".to_string()
}

const URL_SCHEMES: &[&str] = &["https://", "http://", "wss://", "ws://"];

impl OperatorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read operator config: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse operator config as YAML: {}",
                path.display()
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise falls back to the embedded defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default_config()),
        }
    }

    pub fn default_config() -> Self {
        const DEFAULT_OPERATOR_YAML: &str = include_str!("../operator.yaml");

        serde_yaml::from_str(DEFAULT_OPERATOR_YAML)
            .expect("Failed to parse embedded operator.yaml - this is a bug in the operator.yaml file")
    }

    fn validate(&self) -> Result<()> {
        if self.signaling.is_empty() {
            anyhow::bail!("At least one signaling endpoint must be configured");
        }

        let named_urls = self
            .signaling
            .iter()
            .map(|url| ("signaling", url))
            .chain([
                ("subscription_api", &self.subscription_api),
                ("connect_api", &self.connect_api),
                ("base_path", &self.base_path),
                ("checkout_url", &self.checkout_url),
            ]);

        for (field, url) in named_urls {
            if !URL_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
                anyhow::bail!("Operator endpoint '{}' has no supported scheme: '{}'", field, url);
            }
        }

        Ok(())
    }

    /// Returns the checkout link for the given owner id.
    pub fn checkout_link(&self, oid: &str) -> String {
        format!("{}?oid={}", self.checkout_url, oid)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
