//! Persistence ports and their in-memory implementations.

pub mod account;
pub mod verification;

pub use account::{AccountRepository, InMemoryAccountRepository};
pub use verification::{InMemoryVerificationStore, VerificationRecordStore};
