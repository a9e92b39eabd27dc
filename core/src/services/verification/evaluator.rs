//! Verification evaluator: decides whether a presented code is acceptable

use std::sync::Arc;

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use tracing::{debug, info};

use crate::domain::entities::verification_record::{VerificationRecord, CODE_LENGTH};
use crate::domain::value_objects::{Identifier, RejectionReason, VerificationOutcome};
use crate::errors::{DomainResult, ValidationError};
use crate::repositories::VerificationRecordStore;

/// Trim a presented code and check it is `CODE_LENGTH` ASCII digits
pub fn normalize_code(presented: &str) -> Result<&str, ValidationError> {
    let code = presented.trim();
    if code.len() != CODE_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidCode {
            length: CODE_LENGTH,
        });
    }
    Ok(code)
}

/// Result of checking a presented code without consuming it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// The code matches a live record; it is still outstanding
    Matched(VerificationRecord),
    Rejected(RejectionReason),
}

/// Evaluates presented codes against the record store
///
/// Expected outcomes come back as values. Only malformed codes and store
/// faults are errors.
pub struct VerificationEvaluator<S: VerificationRecordStore> {
    store: Arc<S>,
}

impl<S: VerificationRecordStore> VerificationEvaluator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Check `presented` for `identifier` at time `now`; read only
    ///
    /// 1. Malformed code: validation error, the store is not touched
    /// 2. No record: `Rejected(NotFound)`
    /// 3. `now > expires_at`: `Rejected(Expired)`
    /// 4. Code differs: `Rejected(Mismatch)`, the record stays for further attempts
    /// 5. Otherwise `Matched` with the record that was read
    pub async fn evaluate(
        &self,
        identifier: &Identifier,
        presented: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Evaluation> {
        let code = normalize_code(presented)?;

        let Some(record) = self.store.find(identifier).await? else {
            debug!(identifier = %identifier.masked(), "No outstanding verification record");
            return Ok(Evaluation::Rejected(RejectionReason::NotFound));
        };

        if record.is_expired_at(now) {
            debug!(
                identifier = %identifier.masked(),
                expires_at = %record.expires_at,
                "Verification record expired"
            );
            return Ok(Evaluation::Rejected(RejectionReason::Expired));
        }

        if !constant_time_eq(code.as_bytes(), record.code.as_bytes()) {
            return Ok(Evaluation::Rejected(RejectionReason::Mismatch));
        }

        Ok(Evaluation::Matched(record))
    }

    /// Consume a matched record (single use)
    ///
    /// A code issued after the record was read must not be consumed here; in
    /// that case the presented code lost the race and is a `Mismatch`.
    pub async fn consume(&self, record: &VerificationRecord) -> DomainResult<VerificationOutcome> {
        if !self.store.delete_issued(record).await? {
            info!(
                identifier = %record.identifier.masked(),
                event = "verification_superseded",
                "Code was superseded during evaluation"
            );
            return Ok(VerificationOutcome::Rejected(RejectionReason::Mismatch));
        }

        Ok(VerificationOutcome::Accepted)
    }

    /// Evaluate and, on a match, consume in one step
    ///
    /// Callers with a side effect to apply before the code is spent use
    /// [`evaluate`](Self::evaluate) and [`consume`](Self::consume) instead.
    pub async fn verify(
        &self,
        identifier: &Identifier,
        presented: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<VerificationOutcome> {
        match self.evaluate(identifier, presented, now).await? {
            Evaluation::Matched(record) => self.consume(&record).await,
            Evaluation::Rejected(reason) => Ok(VerificationOutcome::Rejected(reason)),
        }
    }
}
