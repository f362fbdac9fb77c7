//! Reconciliation of the local plan with the remote subscription service.
//!
//! Two flows share one adopt-and-persist rule:
//! - connect: bind a subscription, found by email, to this installation's owner id
//! - refresh: pull the current plan for the owner id alone

pub mod api_client;
pub mod errors;
pub mod reconciler;
pub mod types;

pub use api_client::{HttpSubscriptionApi, SubscriptionApi};
pub use errors::ReconcileError;
pub use reconciler::SubscriptionReconciler;
pub use types::{ConnectRequest, ReconcileOutcome, RefreshRequest};
