//! Result types for the verification service

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{DeliveryReport, Identifier, VerificationOutcome};

/// Result of starting a verification
#[derive(Debug, Clone)]
pub struct StartVerificationResult {
    pub identifier: Identifier,
    /// When the issued code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// One entry per channel the code was dispatched to
    pub deliveries: Vec<DeliveryReport>,
}

impl StartVerificationResult {
    /// Whether at least one channel reported success
    pub fn any_delivered(&self) -> bool {
        self.deliveries.iter().any(|report| report.outcome.is_ok())
    }
}

/// Result of confirming a verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmVerificationResult {
    pub outcome: VerificationOutcome,
    /// True when the code was accepted and an account exists for the identifier
    pub account_activated: bool,
}
