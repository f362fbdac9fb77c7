//! Error types for subscription reconciliation.

use std::fmt::{Display, Formatter};

/// Errors that can occur while reconciling the local plan with the remote service.
///
/// None of these leave the persisted settings modified; the caller may retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// The request never produced a response (DNS, connect, timeout, I/O).
    Transport { message: String },
    /// The service answered with a non-success status.
    Status { code: u16 },
    /// The response body was not valid JSON.
    InvalidResponse { message: String },
    /// The response carried a `plan` that isn't a known plan variant.
    MalformedPlan { message: String },
    /// Reading or writing the local settings failed.
    Storage { message: String },
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "subscription request failed: {}", message),
            Self::Status { code } => write!(f, "subscription service returned status {}", code),
            Self::InvalidResponse { message } => {
                write!(f, "invalid subscription response: {}", message)
            }
            Self::MalformedPlan { message } => write!(f, "malformed plan in response: {}", message),
            Self::Storage { message } => write!(f, "settings storage failure: {}", message),
        }
    }
}

impl std::error::Error for ReconcileError {}

impl ReconcileError {
    pub(crate) fn storage(err: anyhow::Error) -> Self {
        Self::Storage {
            message: format!("{:#}", err),
        }
    }
}
