//! MySQL repository implementations

pub mod account_repository;
pub mod verification_store;

pub use account_repository::MySqlAccountRepository;
pub use verification_store::MySqlVerificationStore;
