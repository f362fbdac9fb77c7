//! HTTP client for the subscription service.

use super::errors::ReconcileError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

const API_TIMEOUT: Duration = Duration::from_secs(15);

pub const BUILD_SHA: &str = env!("PEERDRAFT_GIT_SHA");

/// Transport used by the reconciler to talk to the subscription service.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// POSTs `body` as JSON to `url` and returns the parsed JSON response.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ReconcileError>;
}

/// [`SubscriptionApi`] backed by a blocking `ureq` agent.
///
/// Requests run on tokio's blocking pool.
#[derive(Clone)]
pub struct HttpSubscriptionApi {
    agent: ureq::Agent,
}

impl HttpSubscriptionApi {
    pub fn new() -> Self {
        Self::with_timeout(API_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }
}

impl Default for HttpSubscriptionApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionApi for HttpSubscriptionApi {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, ReconcileError> {
        let agent = self.agent.clone();
        let url = url.to_string();
        let payload = serde_json::to_string(body).map_err(|e| ReconcileError::Transport {
            message: format!("Failed to serialize request body: {}", e),
        })?;

        tokio::task::spawn_blocking(move || post_json_blocking(&agent, &url, payload))
            .await
            .map_err(|e| ReconcileError::Transport {
                message: format!("Request task failed: {}", e),
            })?
    }
}

fn post_json_blocking(
    agent: &ureq::Agent,
    url: &str,
    payload: String,
) -> Result<Value, ReconcileError> {
    tracing::debug!("POST {}", url);

    let body: String = agent
        .post(url)
        .header("Content-Type", "application/json")
        .header("Accept", "application/json")
        .header("User-Agent", &user_agent())
        .send(&payload)
        .map_err(classify_error)?
        .body_mut()
        .read_to_string()
        .map_err(|e| ReconcileError::Transport {
            message: format!("Failed to read response body: {}", e),
        })?;

    serde_json::from_str(&body).map_err(|e| ReconcileError::InvalidResponse {
        message: e.to_string(),
    })
}

fn classify_error(err: ureq::Error) -> ReconcileError {
    match err {
        ureq::Error::StatusCode(code) => ReconcileError::Status { code },
        other => ReconcileError::Transport {
            message: other.to_string(),
        },
    }
}

fn user_agent() -> String {
    let short_sha: String = BUILD_SHA.chars().take(7).collect();
    format!("peerdraft-settings/{} ({})", env!("CARGO_PKG_VERSION"), short_sha)
}

#[cfg(test)]
#[path = "tests/api_client_tests.rs"]
mod tests;
