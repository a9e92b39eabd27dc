//! Verification record store trait.
//!
//! The store holds at most one record per identifier. Implementations must give
//! read-your-writes consistency for a single identifier: a `find` after an
//! `upsert` observes that upsert.

use async_trait::async_trait;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::domain::value_objects::Identifier;
use crate::errors::DomainResult;

/// Persistence port for outstanding verification records
///
/// Infrastructure faults are reported as `DomainError::Store` so that callers
/// can surface a retryable failure instead of silently succeeding.
///
/// # Example
/// ```no_run
/// # use cc_core::repositories::VerificationRecordStore;
/// # use cc_core::domain::{Identifier, VerificationRecord};
/// # async fn example(store: &impl VerificationRecordStore) -> Result<(), Box<dyn std::error::Error>> {
/// let identifier = Identifier::parse("user@example.com")?;
/// let record = VerificationRecord::issue(
///     identifier.clone(),
///     "482913".to_string(),
///     chrono::Utc::now(),
///     chrono::Duration::minutes(10),
/// );
///
/// store.upsert(record).await?;
/// assert!(store.find(&identifier).await?.is_some());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait VerificationRecordStore: Send + Sync {
    /// Write the record, replacing any existing record for the same identifier
    async fn upsert(&self, record: VerificationRecord) -> DomainResult<()>;

    /// Find the outstanding record for an identifier
    ///
    /// # Returns
    /// * `Ok(Some(record))` - A record exists (it may be expired)
    /// * `Ok(None)` - No record for this identifier
    /// * `Err(DomainError::Store)` - The store could not be reached
    async fn find(&self, identifier: &Identifier) -> DomainResult<Option<VerificationRecord>>;

    /// Delete the record for an identifier; no error if absent
    async fn delete(&self, identifier: &Identifier) -> DomainResult<()>;

    /// Delete the record only if it is still the one that was evaluated
    ///
    /// A code issued between the evaluation and the delete must survive.
    /// Returns whether a record was removed. The default implementation is a
    /// read followed by a delete; stores that can do it atomically override it.
    async fn delete_issued(&self, record: &VerificationRecord) -> DomainResult<bool> {
        match self.find(&record.identifier).await? {
            Some(current)
                if current.code == record.code && current.issued_at == record.issued_at =>
            {
                self.delete(&record.identifier).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Check that the store is reachable
    async fn health_check(&self) -> DomainResult<()> {
        Ok(())
    }
}
