//! MySQL verification record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{mysql::MySqlRow, MySqlPool, Row};
use tracing::info;

use cc_core::domain::entities::verification_record::VerificationRecord;
use cc_core::domain::value_objects::Identifier;
use cc_core::errors::{DomainError, DomainResult};
use cc_core::repositories::VerificationRecordStore;

use crate::InfrastructureError;

/// Verification records in the `verification_records` table
///
/// The identifier is the primary key, so `INSERT .. ON DUPLICATE KEY UPDATE`
/// gives an atomic upsert-by-key.
pub struct MySqlVerificationStore {
    pool: MySqlPool,
}

impl MySqlVerificationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Delete records that expired before `now`
    ///
    /// Expired records are already rejected by the evaluator; this only keeps
    /// the table small.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, InfrastructureError> {
        let result = sqlx::query("DELETE FROM verification_records WHERE expires_at < ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            info!(purged, "Purged expired verification records");
        }
        Ok(purged)
    }

    fn row_to_record(row: &MySqlRow) -> DomainResult<VerificationRecord> {
        let read = |e: sqlx::Error| {
            DomainError::store(format!("Failed to read verification record: {}", e))
        };
        let identifier: String = row.try_get("identifier").map_err(read)?;

        Ok(VerificationRecord {
            identifier: Identifier::parse(&identifier).map_err(|e| DomainError::Internal {
                message: format!("Corrupt verification_records.identifier: {}", e),
            })?,
            code: row.try_get("code").map_err(read)?,
            issued_at: row.try_get("issued_at").map_err(read)?,
            expires_at: row.try_get("expires_at").map_err(read)?,
        })
    }
}

#[async_trait]
impl VerificationRecordStore for MySqlVerificationStore {
    async fn upsert(&self, record: VerificationRecord) -> DomainResult<()> {
        let query = r#"
            INSERT INTO verification_records (identifier, code, issued_at, expires_at)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                code = VALUES(code),
                issued_at = VALUES(issued_at),
                expires_at = VALUES(expires_at)
        "#;

        sqlx::query(query)
            .bind(record.identifier.as_str())
            .bind(&record.code)
            .bind(record.issued_at)
            .bind(record.expires_at)
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        Ok(())
    }

    async fn find(&self, identifier: &Identifier) -> DomainResult<Option<VerificationRecord>> {
        let row = sqlx::query(
            r#"
            SELECT identifier, code, issued_at, expires_at
            FROM verification_records
            WHERE identifier = ?
            "#,
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(InfrastructureError::from)?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn delete(&self, identifier: &Identifier) -> DomainResult<()> {
        sqlx::query("DELETE FROM verification_records WHERE identifier = ?")
            .bind(identifier.as_str())
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        Ok(())
    }

    async fn delete_issued(&self, record: &VerificationRecord) -> DomainResult<bool> {
        let result = sqlx::query(
            "DELETE FROM verification_records WHERE identifier = ? AND code = ? AND issued_at = ?",
        )
        .bind(record.identifier.as_str())
        .bind(&record.code)
        .bind(record.issued_at)
        .execute(&self.pool)
        .await
        .map_err(InfrastructureError::from)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> DomainResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;
        Ok(())
    }
}
