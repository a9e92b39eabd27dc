//! Domain entities representing core business objects.

pub mod account;
pub mod verification_record;

// Re-export commonly used types
pub use account::{Account, AccountRole};
pub use verification_record::{VerificationRecord, CODE_LENGTH, DEFAULT_EXPIRATION_MINUTES};
