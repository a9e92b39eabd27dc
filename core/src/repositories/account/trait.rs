//! Account repository trait defining the interface for account persistence.

use async_trait::async_trait;

use crate::domain::entities::account::Account;
use crate::domain::value_objects::Identifier;
use crate::errors::DomainResult;

/// Repository trait for Account entity persistence operations
///
/// Accounts are looked up by their identifier. The verification workflow only
/// ever flips `activated`; it never deletes accounts.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by email or phone
    ///
    /// # Returns
    /// * `Ok(Some(Account))` - Account found
    /// * `Ok(None)` - No account registered for this identifier
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_identifier(&self, identifier: &Identifier) -> DomainResult<Option<Account>>;

    /// Create a new account
    ///
    /// Fails with `AuthError::AccountAlreadyExists` when the identifier is taken.
    async fn create(&self, account: Account) -> DomainResult<Account>;

    /// Update an existing account
    ///
    /// Fails with `DomainError::NotFound` when the account does not exist.
    async fn update(&self, account: Account) -> DomainResult<Account>;

    /// Set the activation flag for the account with this identifier
    ///
    /// Idempotent. Returns `false` when no account is registered for the
    /// identifier, `true` when the account exists and is now activated.
    async fn set_activated(&self, identifier: &Identifier) -> DomainResult<bool>;
}
