//! One-time code verification configuration

use serde::{Deserialize, Serialize};

/// Canonical lifetime of an issued code
pub const DEFAULT_OTP_TTL_MINUTES: i64 = 10;

/// Where verification records are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map, development and tests only
    Memory,
    /// `verification_records` table
    Mysql,
    /// JSON records with key expiry
    Redis,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "mysql" => Ok(StoreBackend::Mysql),
            "redis" => Ok(StoreBackend::Redis),
            _ => Err(format!("Invalid verification store: {}", s)),
        }
    }
}

/// Verification workflow configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Code lifetime in minutes
    pub ttl_minutes: i64,

    /// Failed attempts allowed per identifier inside `attempt_window_minutes`; 0 disables the limit
    #[serde(default)]
    pub max_failed_attempts: u32,

    /// Window for counting failed attempts
    #[serde(default = "default_attempt_window")]
    pub attempt_window_minutes: i64,

    /// Record store backend
    pub store: StoreBackend,

    /// bcrypt cost for account credentials
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_OTP_TTL_MINUTES,
            max_failed_attempts: 0,
            attempt_window_minutes: default_attempt_window(),
            store: StoreBackend::Memory,
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl_minutes: std::env::var("OTP_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &i64| *v > 0)
                .unwrap_or(defaults.ttl_minutes),
            max_failed_attempts: std::env::var("OTP_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_failed_attempts),
            attempt_window_minutes: std::env::var("OTP_ATTEMPT_WINDOW_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.attempt_window_minutes),
            store: std::env::var("OTP_STORE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.store),
            bcrypt_cost: std::env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.bcrypt_cost),
        }
    }

    /// Whether a failed-attempt limit is configured
    pub fn limits_attempts(&self) -> bool {
        self.max_failed_attempts > 0
    }
}

fn default_attempt_window() -> i64 {
    DEFAULT_OTP_TTL_MINUTES
}

fn default_bcrypt_cost() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerificationConfig::default();
        assert_eq!(config.ttl_minutes, 10);
        assert!(!config.limits_attempts());
        assert_eq!(config.store, StoreBackend::Memory);
    }

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("MySQL".parse::<StoreBackend>().unwrap(), StoreBackend::Mysql);
        assert_eq!("redis".parse::<StoreBackend>().unwrap(), StoreBackend::Redis);
        assert!("mongo".parse::<StoreBackend>().is_err());
    }
}
