//! Domain-specific error types for account and verification operations
//!
//! Messages here are the canonical English texts. The presentation layer maps
//! each variant to a stable error code and HTTP status.

use thiserror::Error;

/// Account authentication and registration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Account already exists")]
    AccountAlreadyExists,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Please verify your account with the one-time code before logging in")]
    AccountNotActivated,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Input validation errors
///
/// Raised before any store is touched and never retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid length: {field} (min: {min}, max: {max}, actual: {actual})")]
    InvalidLength {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Identifier must be an email address or an international phone number")]
    InvalidIdentifier,

    #[error("Verification code must be exactly {length} digits")]
    InvalidCode { length: usize },

    #[error("Unknown role: {value}")]
    UnknownRole { value: String },
}

impl ValidationError {
    /// Name of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::RequiredField { field }
            | Self::InvalidFormat { field }
            | Self::InvalidLength { field, .. } => Some(field),
            Self::InvalidIdentifier => Some("identifier"),
            Self::InvalidCode { .. } => Some("code"),
            Self::UnknownRole { .. } => Some("role"),
        }
    }
}
