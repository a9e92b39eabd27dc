//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for CraftConnect. It
//! provides concrete implementations of the core ports:
//!
//! - **Database**: MySQL account repository and verification record store (SQLx)
//! - **Cache**: Redis client and Redis-backed verification record store
//! - **Delivery**: code senders (console mock, Brevo email, Twilio SMS)
//! - **Factory**: builds the configured adapters from `AppConfig`
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-store`: Enable the Redis verification store (default)
//! - `twilio-sms`: Enable Twilio SMS delivery (default)

use cc_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and verification store
#[cfg(feature = "redis-store")]
pub mod cache;

/// Delivery module - Email and SMS senders
pub mod delivery;

/// Factories building adapters from configuration
pub mod factory;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stored data could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Email or SMS provider error
    #[error("Delivery error: {0}")]
    Delivery(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Http(_) | InfrastructureError::Delivery(_) => {
                DomainError::Dispatch {
                    message: err.to_string(),
                }
            }
            InfrastructureError::Config(_) => DomainError::Internal {
                message: err.to_string(),
            },
            InfrastructureError::Database(_)
            | InfrastructureError::Cache(_)
            | InfrastructureError::Serialization(_) => DomainError::Store {
                message: err.to_string(),
            },
        }
    }
}
