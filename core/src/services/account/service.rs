//! Account registration and login

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::account::Account;
use crate::domain::value_objects::{AccountSummary, Identifier};
use crate::errors::{AuthError, DomainError, DomainResult, ValidationError};
use crate::repositories::AccountRepository;

use super::types::{
    RegisterAccount, MAX_DISPLAY_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};

/// Default bcrypt cost
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Service for account registration and credential checks
///
/// Accounts start inactive. Activation belongs to the verification workflow;
/// this service only refuses logins until it has happened.
pub struct AccountService<A: AccountRepository> {
    accounts: Arc<A>,
    bcrypt_cost: u32,
}

impl<A: AccountRepository> AccountService<A> {
    pub fn new(accounts: Arc<A>, bcrypt_cost: u32) -> Self {
        Self {
            accounts,
            bcrypt_cost,
        }
    }

    /// Register an account pending verification
    ///
    /// An activated account for the identifier is a conflict. A pending one is
    /// overwritten with the new details, so a user who lost their code can
    /// simply sign up again.
    pub async fn register(&self, request: RegisterAccount) -> DomainResult<Account> {
        let display_name = Self::validate_display_name(&request.display_name)?;
        Self::validate_password(&request.password)?;
        if let Some(mobile) = &request.mobile {
            if !mobile.is_phone() {
                return Err(ValidationError::InvalidFormat {
                    field: "mobile".to_string(),
                }
                .into());
            }
        }

        let existing = self.accounts.find_by_identifier(&request.identifier).await?;
        if matches!(&existing, Some(account) if account.activated) {
            warn!(
                identifier = %request.identifier.masked(),
                event = "registration_conflict",
                "Registration for an already activated account"
            );
            return Err(AuthError::AccountAlreadyExists.into());
        }

        let credential_hash = self.hash_password(&request.password)?;

        let account = match existing {
            Some(mut pending) => {
                pending.replace_registration(
                    display_name,
                    credential_hash,
                    request.role,
                    request.mobile,
                );
                self.accounts.update(pending).await?
            }
            None => {
                let account = Account::new(
                    request.identifier,
                    display_name,
                    credential_hash,
                    request.role,
                )
                .with_mobile(request.mobile);
                self.accounts.create(account).await?
            }
        };

        info!(
            account_id = %account.id,
            identifier = %account.identifier.masked(),
            role = %account.role,
            event = "account_registered",
            "Account registered, pending verification"
        );

        Ok(account)
    }

    /// Check credentials of an activated account
    pub async fn authenticate(
        &self,
        identifier: &Identifier,
        password: &str,
    ) -> DomainResult<AccountSummary> {
        let mut account = self
            .accounts
            .find_by_identifier(identifier)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !account.activated {
            return Err(AuthError::AccountNotActivated.into());
        }

        let valid = bcrypt::verify(password, &account.credential_hash).map_err(|e| {
            DomainError::Internal {
                message: format!("Credential check failed: {}", e),
            }
        })?;
        if !valid {
            warn!(
                identifier = %identifier.masked(),
                event = "login_failed",
                "Invalid credentials"
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        account.record_login();
        let account = self.accounts.update(account).await?;

        info!(
            account_id = %account.id,
            event = "login_succeeded",
            "Account logged in"
        );

        Ok(AccountSummary::from(&account))
    }

    fn hash_password(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(|e| DomainError::Internal {
            message: format!("Password hashing failed: {}", e),
        })
    }

    fn validate_display_name(name: &str) -> Result<String, ValidationError> {
        let name = name.trim();
        let length = name.chars().count();
        if length == 0 {
            return Err(ValidationError::RequiredField {
                field: "name".to_string(),
            });
        }
        if length > MAX_DISPLAY_NAME_LENGTH {
            return Err(ValidationError::InvalidLength {
                field: "name".to_string(),
                min: 1,
                max: MAX_DISPLAY_NAME_LENGTH,
                actual: length,
            });
        }
        Ok(name.to_string())
    }

    fn validate_password(password: &str) -> Result<(), ValidationError> {
        if password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            });
        }
        let length = password.len();
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
            return Err(ValidationError::InvalidLength {
                field: "password".to_string(),
                min: MIN_PASSWORD_LENGTH,
                max: MAX_PASSWORD_LENGTH,
                actual: length,
            });
        }
        Ok(())
    }
}
