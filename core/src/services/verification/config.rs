//! Configuration for the verification service

use cc_shared::config::VerificationConfig;
use chrono::Duration;

use crate::domain::entities::verification_record::DEFAULT_EXPIRATION_MINUTES;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Number of minutes an issued code stays valid
    pub code_expiration_minutes: i64,
}

impl VerificationServiceConfig {
    /// Validity window of an issued code
    pub fn code_ttl(&self) -> Duration {
        Duration::minutes(self.code_expiration_minutes)
    }
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            code_expiration_minutes: DEFAULT_EXPIRATION_MINUTES,
        }
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            code_expiration_minutes: config.ttl_minutes,
        }
    }
}
