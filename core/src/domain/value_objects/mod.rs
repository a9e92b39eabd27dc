//! Value objects representing immutable domain concepts.

pub mod account_summary;
pub mod delivery;
pub mod identifier;
pub mod verification_outcome;

// Re-export commonly used types
pub use account_summary::AccountSummary;
pub use delivery::{DeliveryChannel, DeliveryOutcome, DeliveryReport};
pub use identifier::Identifier;
pub use verification_outcome::{RejectionReason, VerificationOutcome};
