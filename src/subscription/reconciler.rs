//! Keeps the local plan in step with the subscription service.
//!
//! Both flows follow the same sequence: read settings, call the service, adopt
//! the reported plan (if any) and persist it. The service is the authority on
//! plan tier; whatever it reports, upgrade or downgrade, is adopted as is.

use super::api_client::SubscriptionApi;
use super::errors::ReconcileError;
use super::types::{plan_from_response, ConnectRequest, ReconcileOutcome, RefreshRequest};
use crate::settings::{Plan, Settings, SettingsStore};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Runs connect and refresh round trips for one settings store.
pub struct SubscriptionReconciler<A: SubscriptionApi> {
    api: A,
    store: Arc<SettingsStore>,
    /// One lock per owner id; held for the whole read-call-write sequence.
    owner_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<A: SubscriptionApi> SubscriptionReconciler<A> {
    pub fn new(api: A, store: Arc<SettingsStore>) -> Self {
        Self {
            api,
            store,
            owner_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<SettingsStore> {
        &self.store
    }

    /// Binds an existing subscription, identified by `email`, to this installation.
    ///
    /// The email is passed through unvalidated; the service decides whether it matches.
    pub async fn connect(&self, email: &str) -> Result<ReconcileOutcome, ReconcileError> {
        let settings = self.store.get().await.map_err(ReconcileError::storage)?;
        let request = ConnectRequest {
            email: email.to_string(),
            oid: settings.oid.clone(),
        };
        let url = settings.connect_api.clone();
        self.reconcile("connect", settings, &url, &request).await
    }

    /// Pulls the current plan for this installation's owner id.
    ///
    /// Safe to call repeatedly, including right after [`connect`](Self::connect).
    pub async fn refresh(&self) -> Result<ReconcileOutcome, ReconcileError> {
        let settings = self.store.get().await.map_err(ReconcileError::storage)?;
        let request = RefreshRequest {
            oid: settings.oid.clone(),
        };
        let url = settings.subscription_api.clone();
        self.reconcile("refresh", settings, &url, &request).await
    }

    async fn reconcile<R: Serialize + Sync>(
        &self,
        flow: &str,
        settings: Settings,
        url: &str,
        request: &R,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let owner_lock = self.owner_lock(&settings.oid);
        let _in_flight = owner_lock.lock().await;

        let body = serde_json::to_value(request).map_err(|e| ReconcileError::Transport {
            message: format!("Failed to serialize {} request: {}", flow, e),
        })?;

        let response = match self.api.post_json(url, &body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Subscription {} failed: {}", flow, e);
                return Err(e);
            }
        };

        let plan = match plan_from_response(&response) {
            Ok(Some(plan)) => plan,
            Ok(None) => {
                tracing::debug!("Subscription {} returned no plan", flow);
                return Ok(ReconcileOutcome::NoMatch);
            }
            Err(e) => {
                tracing::warn!("Subscription {} rejected: {}", flow, e);
                return Err(e);
            }
        };

        self.adopt(flow, plan).await
    }

    async fn adopt(&self, flow: &str, plan: Plan) -> Result<ReconcileOutcome, ReconcileError> {
        let previous = self.store.current().plan.tier();
        let saved = self
            .store
            .set_plan(plan)
            .await
            .map_err(ReconcileError::storage)?;

        if previous != saved.plan.tier() {
            tracing::info!(
                "Plan changed from {} to {} after {}",
                previous,
                saved.plan.tier(),
                flow
            );
        }
        Ok(ReconcileOutcome::Adopted(saved.plan))
    }

    fn owner_lock(&self, oid: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .owner_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(oid.to_string()).or_default().clone()
    }
}

#[cfg(test)]
#[path = "tests/reconciler_tests.rs"]
mod tests;
