//! In-memory implementation of AccountRepository for development and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::account::Account;
use crate::domain::value_objects::Identifier;
use crate::errors::{AuthError, DomainError, DomainResult};

use super::trait_::AccountRepository;

/// Account repository keyed by identifier
#[derive(Clone)]
pub struct InMemoryAccountRepository {
    accounts: Arc<RwLock<HashMap<Identifier, Account>>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

impl Default for InMemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_identifier(&self, identifier: &Identifier) -> DomainResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(identifier).cloned())
    }

    async fn create(&self, account: Account) -> DomainResult<Account> {
        let mut accounts = self.accounts.write().await;

        if accounts.contains_key(&account.identifier) {
            return Err(AuthError::AccountAlreadyExists.into());
        }

        accounts.insert(account.identifier.clone(), account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> DomainResult<Account> {
        let mut accounts = self.accounts.write().await;

        match accounts.get(&account.identifier) {
            Some(existing) if existing.id == account.id => {
                accounts.insert(account.identifier.clone(), account.clone());
                Ok(account)
            }
            _ => Err(DomainError::NotFound {
                resource: "Account".to_string(),
            }),
        }
    }

    async fn set_activated(&self, identifier: &Identifier) -> DomainResult<bool> {
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(identifier) {
            Some(account) => {
                account.activate();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
