//! Wire types for the subscription service.

use super::errors::ReconcileError;
use crate::settings::Plan;
use serde::Serialize;
use serde_json::Value;

/// Body of `POST {connectAPI}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectRequest {
    pub email: String,
    pub oid: String,
}

/// Body of `POST {subscriptionAPI}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshRequest {
    pub oid: String,
}

/// What a successful round trip did to the local plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The service reported a plan and it is now the local plan.
    Adopted(Plan),
    /// The service had no plan for this request; local state is unchanged.
    NoMatch,
}

/// Extracts the plan from a service response.
///
/// A missing or `null` `plan` means "no match yet" and is not an error.
pub fn plan_from_response(body: &Value) -> Result<Option<Plan>, ReconcileError> {
    let plan = match body.as_object().and_then(|fields| fields.get("plan")) {
        None | Some(Value::Null) => return Ok(None),
        Some(plan) => plan,
    };

    serde_json::from_value(plan.clone())
        .map(Some)
        .map_err(|e| ReconcileError::MalformedPlan {
            message: format!("{} in {}", e, plan),
        })
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
