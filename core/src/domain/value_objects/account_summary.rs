//! Account summary returned after a successful login.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::account::{Account, AccountRole};

/// Public view of an account; never carries the credential hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub identifier: String,
    pub role: AccountRole,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.display_name.clone(),
            identifier: account.identifier.to_string(),
            role: account.role,
        }
    }
}
