//! Account entity representing a registered CraftConnect member.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::Identifier;
use crate::errors::ValidationError;

/// Role of an account in the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Seller listing crafts
    Artisan,
    /// Customer purchasing crafts
    Buyer,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artisan => "artisan",
            Self::Buyer => "buyer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artisan" => Ok(Self::Artisan),
            "buyer" => Ok(Self::Buyer),
            "admin" => Ok(Self::Admin),
            other => Err(ValidationError::UnknownRole {
                value: other.to_string(),
            }),
        }
    }
}

/// Account entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Email or phone the account signs in with; unique
    pub identifier: Identifier,

    pub display_name: String,

    /// bcrypt hash of the password
    pub credential_hash: String,

    pub role: AccountRole,

    /// Optional mobile number that also receives one-time codes
    pub mobile: Option<Identifier>,

    /// False until a one-time code is confirmed
    pub activated: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Creates a new, not yet activated account
    pub fn new(
        identifier: Identifier,
        display_name: String,
        credential_hash: String,
        role: AccountRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            identifier,
            display_name,
            credential_hash,
            role,
            mobile: None,
            activated: false,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    pub fn with_mobile(mut self, mobile: Option<Identifier>) -> Self {
        self.mobile = mobile;
        self
    }

    /// Marks the account as activated
    ///
    /// Returns `true` only on the transition from inactive to active.
    pub fn activate(&mut self) -> bool {
        if self.activated {
            return false;
        }
        self.activated = true;
        self.updated_at = Utc::now();
        true
    }

    /// Replaces registration details of an account still pending verification
    pub fn replace_registration(
        &mut self,
        display_name: String,
        credential_hash: String,
        role: AccountRole,
        mobile: Option<Identifier>,
    ) {
        self.display_name = display_name;
        self.credential_hash = credential_hash;
        self.role = role;
        self.mobile = mobile;
        self.updated_at = Utc::now();
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Mobile number that should receive codes in addition to the identifier
    pub fn secondary_destination(&self) -> Option<&Identifier> {
        self.mobile
            .as_ref()
            .filter(|mobile| *mobile != &self.identifier)
    }
}
