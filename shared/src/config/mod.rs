//! Configuration module with business-specific sub-modules
//!
//! - `cache` - Redis connection configuration
//! - `database` - Database connection and pool configuration
//! - `delivery` - Email and SMS providers used to deliver one-time codes
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration
//! - `verification` - One-time code lifetime, attempt policy and record store

pub mod cache;
pub mod database;
pub mod delivery;
pub mod environment;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use delivery::{BrevoConfig, DeliveryConfig, EmailProvider, SmsProvider, TwilioConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};
pub use verification::{StoreBackend, VerificationConfig, DEFAULT_OTP_TTL_MINUTES};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub verification: VerificationConfig,
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            verification: VerificationConfig::default(),
            delivery: DeliveryConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            verification: VerificationConfig::from_env(),
            delivery: DeliveryConfig::from_env(),
            cors: CorsConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}
