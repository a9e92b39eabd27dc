//! Builds the configured adapters from `AppConfig`
//!
//! The record store backend is picked at startup, so the stores are wrapped in
//! enums that delegate to the selected implementation. Accounts live in MySQL
//! whenever a persistent record store is configured.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use cc_core::domain::entities::account::Account;
use cc_core::domain::entities::verification_record::VerificationRecord;
use cc_core::domain::value_objects::{DeliveryChannel, Identifier};
use cc_core::errors::DomainResult;
use cc_core::repositories::{
    AccountRepository, InMemoryAccountRepository, InMemoryVerificationStore,
    VerificationRecordStore,
};
use cc_core::services::verification::{AttemptLimiter, InMemoryAttemptLimiter, NoAttemptLimit};
use cc_core::services::DeliveryDispatcher;
use cc_shared::config::{
    AppConfig, DeliveryConfig, EmailProvider, SmsProvider, StoreBackend, VerificationConfig,
};

#[cfg(feature = "redis-store")]
use crate::cache::{RedisClient, RedisVerificationStore};
#[cfg(feature = "mysql")]
use crate::database::{DatabasePool, MySqlAccountRepository, MySqlVerificationStore};
use crate::delivery::{BrevoEmailSender, CodeMessage, MockDeliverySender};
use crate::InfrastructureError;

/// Verification record store selected by `StoreBackend`
pub enum RecordStore {
    Memory(InMemoryVerificationStore),
    #[cfg(feature = "mysql")]
    Mysql(MySqlVerificationStore),
    #[cfg(feature = "redis-store")]
    Redis(RedisVerificationStore),
}

impl RecordStore {
    pub fn backend_name(&self) -> &'static str {
        match self {
            RecordStore::Memory(_) => "memory",
            #[cfg(feature = "mysql")]
            RecordStore::Mysql(_) => "mysql",
            #[cfg(feature = "redis-store")]
            RecordStore::Redis(_) => "redis",
        }
    }

    /// Delete records that expired before `now`
    ///
    /// Only the MySQL table needs this; Redis keys expire on their own and the
    /// in-memory store is per process.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, InfrastructureError> {
        match self {
            #[cfg(feature = "mysql")]
            RecordStore::Mysql(store) => store.purge_expired(now).await,
            _ => Ok(0),
        }
    }

    fn inner(&self) -> &dyn VerificationRecordStore {
        match self {
            RecordStore::Memory(store) => store,
            #[cfg(feature = "mysql")]
            RecordStore::Mysql(store) => store,
            #[cfg(feature = "redis-store")]
            RecordStore::Redis(store) => store,
        }
    }
}

#[async_trait]
impl VerificationRecordStore for RecordStore {
    async fn upsert(&self, record: VerificationRecord) -> DomainResult<()> {
        self.inner().upsert(record).await
    }

    async fn find(&self, identifier: &Identifier) -> DomainResult<Option<VerificationRecord>> {
        self.inner().find(identifier).await
    }

    async fn delete(&self, identifier: &Identifier) -> DomainResult<()> {
        self.inner().delete(identifier).await
    }

    async fn delete_issued(&self, record: &VerificationRecord) -> DomainResult<bool> {
        self.inner().delete_issued(record).await
    }

    async fn health_check(&self) -> DomainResult<()> {
        self.inner().health_check().await
    }
}

/// Account repository paired with the record store
pub enum AccountStore {
    Memory(InMemoryAccountRepository),
    #[cfg(feature = "mysql")]
    Mysql(MySqlAccountRepository),
}

impl AccountStore {
    fn inner(&self) -> &dyn AccountRepository {
        match self {
            AccountStore::Memory(repo) => repo,
            #[cfg(feature = "mysql")]
            AccountStore::Mysql(repo) => repo,
        }
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_identifier(&self, identifier: &Identifier) -> DomainResult<Option<Account>> {
        self.inner().find_by_identifier(identifier).await
    }

    async fn create(&self, account: Account) -> DomainResult<Account> {
        self.inner().create(account).await
    }

    async fn update(&self, account: Account) -> DomainResult<Account> {
        self.inner().update(account).await
    }

    async fn set_activated(&self, identifier: &Identifier) -> DomainResult<bool> {
        self.inner().set_activated(identifier).await
    }
}

/// Stores built for the configured backend
pub struct Adapters {
    pub records: Arc<RecordStore>,
    pub accounts: Arc<AccountStore>,
    #[cfg(feature = "mysql")]
    pub database: Option<DatabasePool>,
}

impl Adapters {
    /// Process-local stores, used for development and tests
    pub fn in_memory() -> Self {
        Self {
            records: Arc::new(RecordStore::Memory(InMemoryVerificationStore::new())),
            accounts: Arc::new(AccountStore::Memory(InMemoryAccountRepository::new())),
            #[cfg(feature = "mysql")]
            database: None,
        }
    }
}

/// Connect the stores selected by `config.verification.store`
///
/// Persistent backends run the schema migrations before returning.
pub async fn build_adapters(config: &AppConfig) -> Result<Adapters, InfrastructureError> {
    match config.verification.store {
        StoreBackend::Memory => {
            info!("Using in-memory verification and account stores");
            Ok(Adapters::in_memory())
        }
        #[cfg(feature = "mysql")]
        StoreBackend::Mysql => {
            let database = DatabasePool::new(config.database.clone()).await?;
            database.run_migrations().await?;
            let pool = database.get_pool().clone();

            info!("Using MySQL verification and account stores");
            Ok(Adapters {
                records: Arc::new(RecordStore::Mysql(MySqlVerificationStore::new(pool.clone()))),
                accounts: Arc::new(AccountStore::Mysql(MySqlAccountRepository::new(pool))),
                database: Some(database),
            })
        }
        #[cfg(all(feature = "mysql", feature = "redis-store"))]
        StoreBackend::Redis => {
            let database = DatabasePool::new(config.database.clone()).await?;
            database.run_migrations().await?;
            let redis = RedisClient::new(config.cache.clone()).await?;

            info!("Using Redis verification store with MySQL accounts");
            Ok(Adapters {
                records: Arc::new(RecordStore::Redis(RedisVerificationStore::new(redis))),
                accounts: Arc::new(AccountStore::Mysql(MySqlAccountRepository::new(
                    database.get_pool().clone(),
                ))),
                database: Some(database),
            })
        }
        #[allow(unreachable_patterns)]
        other => Err(InfrastructureError::Config(format!(
            "Verification store {:?} is not compiled into this build",
            other
        ))),
    }
}

/// Register one sender per enabled channel
pub fn build_dispatcher(
    config: &DeliveryConfig,
    ttl_minutes: i64,
) -> Result<DeliveryDispatcher, InfrastructureError> {
    let message = CodeMessage::new(config.app_name.clone(), ttl_minutes);
    let timeout = Duration::from_secs(config.timeout_secs);
    let mut dispatcher = DeliveryDispatcher::new(timeout);

    match config.email_provider {
        EmailProvider::Mock => {
            dispatcher = dispatcher.with_sender(Arc::new(MockDeliverySender::new(
                DeliveryChannel::Email,
                message.clone(),
            )));
        }
        EmailProvider::Brevo => {
            let sender = BrevoEmailSender::new(config.brevo.clone(), message.clone(), timeout)?;
            dispatcher = dispatcher.with_sender(Arc::new(sender));
        }
        EmailProvider::Disabled => {}
    }

    match config.sms_provider {
        SmsProvider::Mock => {
            dispatcher = dispatcher.with_sender(Arc::new(MockDeliverySender::new(
                DeliveryChannel::Sms,
                message,
            )));
        }
        #[cfg(feature = "twilio-sms")]
        SmsProvider::Twilio => {
            let sender = crate::delivery::TwilioSmsSender::new(config.twilio.clone(), message)?;
            dispatcher = dispatcher.with_sender(Arc::new(sender));
        }
        #[cfg(not(feature = "twilio-sms"))]
        SmsProvider::Twilio => {
            return Err(InfrastructureError::Config(
                "SMS_PROVIDER=twilio needs the twilio-sms feature".to_string(),
            ));
        }
        SmsProvider::Disabled => {}
    }

    info!(channels = ?dispatcher.channels(), "Delivery dispatcher ready");
    Ok(dispatcher)
}

/// Failed-attempt limiter, or none when `max_failed_attempts` is 0
pub fn build_limiter(config: &VerificationConfig) -> Arc<dyn AttemptLimiter> {
    if config.limits_attempts() {
        Arc::new(InMemoryAttemptLimiter::new(
            config.max_failed_attempts,
            chrono::Duration::minutes(config.attempt_window_minutes),
        ))
    } else {
        Arc::new(NoAttemptLimit)
    }
}
