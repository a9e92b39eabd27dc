use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use cc_core::domain::value_objects::{
    AccountSummary, DeliveryChannel, DeliveryReport, RejectionReason, VerificationOutcome,
};
use cc_core::services::verification::{ConfirmVerificationResult, StartVerificationResult};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Email address or E.164 phone number, e.g. "maker@example.com" or "+919876543210"
    #[validate(length(min = 1, max = 254))]
    pub identifier: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, max = 254))]
    pub identifier: String,

    /// 6-digit code; surrounding whitespace is ignored
    #[validate(length(min = 1, max = 16))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 254))]
    pub identifier: String,

    #[validate(length(min = 8, max = 72, message = "Password must be 8 to 72 characters"))]
    pub password: String,

    /// "artisan", "buyer" or "admin"
    #[validate(length(min = 1))]
    pub role: String,

    /// Phone number that also receives codes
    #[serde(default)]
    #[validate(length(min = 1, max = 20))]
    pub mobile: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub identifier: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Outcome of one delivery channel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryStatus {
    pub channel: DeliveryChannel,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<&DeliveryReport> for DeliveryStatus {
    fn from(report: &DeliveryReport) -> Self {
        Self {
            channel: report.channel,
            ok: report.outcome.is_ok(),
            reason: report.outcome.reason().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub expires_at: DateTime<Utc>,
    pub deliveries: Vec<DeliveryStatus>,
}

impl From<&StartVerificationResult> for SendOtpResponse {
    fn from(result: &StartVerificationResult) -> Self {
        Self {
            expires_at: result.expires_at,
            deliveries: result.deliveries.iter().map(DeliveryStatus::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub accepted: bool,
    /// `expired` or `invalid_code`; absent when accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub account_activated: bool,
}

impl From<ConfirmVerificationResult> for VerifyOtpResponse {
    fn from(result: ConfirmVerificationResult) -> Self {
        // Not found and mismatch look the same to the client, so the response
        // does not reveal whether a code is outstanding
        let reason = match result.outcome {
            VerificationOutcome::Accepted => None,
            VerificationOutcome::Rejected(RejectionReason::Expired) => Some("expired"),
            VerificationOutcome::Rejected(RejectionReason::NotFound)
            | VerificationOutcome::Rejected(RejectionReason::Mismatch) => Some("invalid_code"),
        };

        Self {
            accepted: result.outcome.is_accepted(),
            reason: reason.map(str::to_string),
            account_activated: result.account_activated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub account: AccountSummary,
    pub expires_at: DateTime<Utc>,
    pub deliveries: Vec<DeliveryStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub account: AccountSummary,
}
