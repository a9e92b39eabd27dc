//! MySQL persistence: connection pool, account repository and verification store

pub mod connection;
pub mod mysql;


pub use connection::DatabasePool;
pub use mysql::{MySqlAccountRepository, MySqlVerificationStore};

/// Schema files in application order
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "001_create_accounts",
        include_str!("../../migrations/001_create_accounts.sql"),
    ),
    (
        "002_create_verification_records",
        include_str!("../../migrations/002_create_verification_records.sql"),
    ),
];
