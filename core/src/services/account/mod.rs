//! Account registration and login

mod service;
mod types;

#[cfg(test)]
mod tests;

pub use service::{AccountService, DEFAULT_BCRYPT_COST};
pub use types::{RegisterAccount, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
