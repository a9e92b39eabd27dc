//! Verification record entity: the outstanding one-time code for an identifier.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Identifier;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default validity window for a verification code (10 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: i64 = 10;

/// Outstanding one-time code for an identifier
///
/// At most one record exists per identifier; issuing a new code overwrites the
/// previous one. `expires_at` is fixed at issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Email or phone the code was issued against; unique key
    pub identifier: Identifier,

    /// The 6-digit code
    pub code: String,

    /// Timestamp when the code was issued
    pub issued_at: DateTime<Utc>,

    /// Timestamp after which the code is rejected
    pub expires_at: DateTime<Utc>,
}

impl VerificationRecord {
    /// Creates a record issued at `issued_at` and valid for `ttl`
    pub fn issue(
        identifier: Identifier,
        code: String,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            identifier,
            code,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// Whether the record is expired at `now`
    ///
    /// The boundary instant itself is still valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Seconds of validity left at `now`, zero once expired
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }
}
