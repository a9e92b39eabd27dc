//! # CraftConnect Core
//!
//! Core business logic and domain layer for the CraftConnect backend.
//! This crate contains the one-time code verification workflow, account
//! registration and login, the persistence and delivery ports they depend on,
//! and in-memory implementations of those ports.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    Account, AccountRole, AccountSummary, DeliveryChannel, DeliveryOutcome, DeliveryReport,
    Identifier, RejectionReason, VerificationOutcome, VerificationRecord,
};
pub use errors::{AuthError, DomainError, DomainResult, ValidationError};
pub use repositories::{AccountRepository, VerificationRecordStore};
pub use services::{AccountService, DeliveryDispatcher, DeliverySender, VerificationService};
