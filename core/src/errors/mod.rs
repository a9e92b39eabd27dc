//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, ValidationError};

use thiserror::Error;

/// Core domain errors
///
/// Expected verification outcomes (not found, expired, mismatch) are values,
/// not errors. Only malformed input and infrastructure faults end up here.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// Backing store unavailable or failing; safe to retry with backoff
    #[error("Store unavailable: {message}")]
    Store { message: String },

    #[error("Delivery failed: {message}")]
    Dispatch { message: String },

    #[error("Too many failed attempts, retry in {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Shorthand for a transient store failure
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Store { .. } | Self::Dispatch { .. } | Self::RateLimited { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
