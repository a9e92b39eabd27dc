//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Prefix prepended to every key written by this service
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Connection attempts before giving up at startup
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between connection attempts (exponential backoff)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout: 5,
            key_prefix: default_key_prefix(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let key_prefix = std::env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| default_key_prefix());

        Self {
            url,
            key_prefix,
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Apply the configured prefix to a key
    pub fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

fn default_key_prefix() -> String {
    String::from("craftconnect:")
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        let config = CacheConfig::default();
        assert_eq!(config.prefixed("verification:a@b.co"), "craftconnect:verification:a@b.co");
    }
}
