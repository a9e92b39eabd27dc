//! Outcome of evaluating a presented one-time code.

use serde::{Deserialize, Serialize};

/// Why a presented code was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// No outstanding record: never requested, already consumed, or superseded and purged
    NotFound,
    /// Record exists but its validity window has passed
    Expired,
    /// Record exists and is live, but the code differs
    Mismatch,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Expired => "expired",
            Self::Mismatch => "mismatch",
        }
    }
}

/// Decision of the verification evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum VerificationOutcome {
    Accepted,
    Rejected(RejectionReason),
}

impl VerificationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}
