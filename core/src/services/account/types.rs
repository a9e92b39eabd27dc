//! Input types for the account service

use crate::domain::entities::account::AccountRole;
use crate::domain::value_objects::Identifier;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt only hashes the first 72 bytes
pub const MAX_PASSWORD_LENGTH: usize = 72;

pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Registration request, already parsed at the boundary
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub identifier: Identifier,
    pub display_name: String,
    pub password: String,
    pub role: AccountRole,
    /// Extra phone destination for codes
    pub mobile: Option<Identifier>,
}
