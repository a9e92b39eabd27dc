//! Redis-backed verification record store
//!
//! Each record is a JSON document under `{prefix}verification:{identifier}`.
//! The key TTL only reclaims memory; expiry is still decided by the evaluator
//! from `expires_at`.

use async_trait::async_trait;
use chrono::Utc;
use redis::Script;
use tracing::debug;

use cc_core::domain::entities::verification_record::VerificationRecord;
use cc_core::domain::value_objects::Identifier;
use cc_core::errors::DomainResult;
use cc_core::repositories::VerificationRecordStore;

use crate::InfrastructureError;

use super::redis_client::RedisClient;

// Delete only while the stored record still carries the evaluated code
const DELETE_IF_CODE_MATCHES: &str = r#"
local value = redis.call('GET', KEYS[1])
if not value then
    return 0
end
local record = cjson.decode(value)
if record['code'] == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

/// Extra seconds a key outlives `expires_at`, so an expired record is still
/// reported as expired rather than missing for a short while
const KEY_GRACE_SECONDS: i64 = 60;

pub struct RedisVerificationStore {
    client: RedisClient,
    delete_script: Script,
}

impl RedisVerificationStore {
    pub fn new(client: RedisClient) -> Self {
        Self {
            client,
            delete_script: Script::new(DELETE_IF_CODE_MATCHES),
        }
    }

    fn key(&self, identifier: &Identifier) -> String {
        self.client.key(&record_key(identifier))
    }
}

/// Unprefixed key for an identifier's record
pub fn record_key(identifier: &Identifier) -> String {
    format!("verification:{}", identifier.as_str())
}

/// Key lifetime for a record written at `now`
fn key_ttl_seconds(record: &VerificationRecord, now: chrono::DateTime<Utc>) -> u64 {
    ((record.expires_at - now).num_seconds() + KEY_GRACE_SECONDS).max(1) as u64
}

#[async_trait]
impl VerificationRecordStore for RedisVerificationStore {
    async fn upsert(&self, record: VerificationRecord) -> DomainResult<()> {
        let key = self.key(&record.identifier);
        let payload = serde_json::to_string(&record).map_err(InfrastructureError::from)?;
        let ttl = key_ttl_seconds(&record, Utc::now());

        self.client.set_with_expiry(&key, &payload, ttl).await?;
        debug!(identifier = %record.identifier.masked(), ttl, "Stored verification record");
        Ok(())
    }

    async fn find(&self, identifier: &Identifier) -> DomainResult<Option<VerificationRecord>> {
        let key = self.key(identifier);
        match self.client.get(&key).await? {
            Some(payload) => {
                let record: VerificationRecord =
                    serde_json::from_str(&payload).map_err(InfrastructureError::from)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, identifier: &Identifier) -> DomainResult<()> {
        self.client.delete(&self.key(identifier)).await?;
        Ok(())
    }

    async fn delete_issued(&self, record: &VerificationRecord) -> DomainResult<bool> {
        let key = self.key(&record.identifier);
        let deleted = self
            .client
            .eval_script(&self.delete_script, &key, &[record.code.as_str()])
            .await?;
        Ok(deleted > 0)
    }

    async fn health_check(&self) -> DomainResult<()> {
        self.client.health_check().await?;
        Ok(())
    }
}
