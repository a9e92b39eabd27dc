//! In-memory verification record store for development and tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::domain::value_objects::Identifier;
use crate::errors::{DomainError, DomainResult};

use super::trait_::VerificationRecordStore;

/// Verification record store backed by a `HashMap`
///
/// Records are keyed by the normalized identifier, so the upsert-by-key
/// guarantee holds under the write lock.
#[derive(Clone)]
pub struct InMemoryVerificationStore {
    records: Arc<RwLock<HashMap<Identifier, VerificationRecord>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulate an outage: every operation fails with `DomainError::Store`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of outstanding records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn ensure_available(&self) -> DomainResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::store("in-memory store marked unavailable"));
        }
        Ok(())
    }
}

impl Default for InMemoryVerificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VerificationRecordStore for InMemoryVerificationStore {
    async fn upsert(&self, record: VerificationRecord) -> DomainResult<()> {
        self.ensure_available()?;
        let mut records = self.records.write().await;
        records.insert(record.identifier.clone(), record);
        Ok(())
    }

    async fn find(&self, identifier: &Identifier) -> DomainResult<Option<VerificationRecord>> {
        self.ensure_available()?;
        let records = self.records.read().await;
        Ok(records.get(identifier).cloned())
    }

    async fn delete(&self, identifier: &Identifier) -> DomainResult<()> {
        self.ensure_available()?;
        let mut records = self.records.write().await;
        records.remove(identifier);
        Ok(())
    }

    async fn delete_issued(&self, record: &VerificationRecord) -> DomainResult<bool> {
        self.ensure_available()?;
        let mut records = self.records.write().await;
        let still_current = records
            .get(&record.identifier)
            .map(|current| current.code == record.code && current.issued_at == record.issued_at)
            .unwrap_or(false);

        if still_current {
            records.remove(&record.identifier);
        }
        Ok(still_current)
    }

    async fn health_check(&self) -> DomainResult<()> {
        self.ensure_available()
    }
}
