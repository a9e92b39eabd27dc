//! Shared fixtures for the HTTP tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use async_trait::async_trait;

use cc_api::AppState;
use cc_core::domain::entities::VerificationRecord;
use cc_core::domain::value_objects::{DeliveryChannel, Identifier};
use cc_core::errors::DomainResult;
use cc_core::repositories::{
    InMemoryAccountRepository, InMemoryVerificationStore, VerificationRecordStore,
};
use cc_core::services::{
    AccountService, DeliveryDispatcher, FixedCodeGenerator, RecordingDeliverySender,
    VerificationService, VerificationServiceConfig,
};

pub const TEST_CODE: &str = "482913";

/// bcrypt's minimum cost keeps the tests fast
const TEST_BCRYPT_COST: u32 = 4;

pub struct TestContext<S: VerificationRecordStore> {
    pub state: web::Data<AppState<S, InMemoryAccountRepository>>,
    pub records: Arc<S>,
    pub accounts: Arc<InMemoryAccountRepository>,
    pub email: Arc<RecordingDeliverySender>,
    pub sms: Arc<RecordingDeliverySender>,
}

pub fn memory_context() -> TestContext<InMemoryVerificationStore> {
    context_with(
        InMemoryVerificationStore::new(),
        RecordingDeliverySender::new(DeliveryChannel::Email),
        Duration::from_secs(5),
    )
}

pub fn context_with<S: VerificationRecordStore + 'static>(
    records: S,
    email: RecordingDeliverySender,
    request_timeout: Duration,
) -> TestContext<S> {
    let records = Arc::new(records);
    let accounts = Arc::new(InMemoryAccountRepository::new());
    let email = Arc::new(email);
    let sms = Arc::new(RecordingDeliverySender::new(DeliveryChannel::Sms));

    let dispatcher = DeliveryDispatcher::new(Duration::from_secs(1))
        .with_sender(email.clone())
        .with_sender(sms.clone());

    let verification = VerificationService::new(
        records.clone(),
        accounts.clone(),
        Arc::new(dispatcher),
        VerificationServiceConfig::default(),
    )
    .with_generator(Arc::new(FixedCodeGenerator::new(TEST_CODE)));
    let account_service = AccountService::new(accounts.clone(), TEST_BCRYPT_COST);

    let state = web::Data::new(AppState::new(
        Arc::new(verification),
        Arc::new(account_service),
        records.clone(),
        request_timeout,
    ));

    TestContext {
        state,
        records,
        accounts,
        email,
        sms,
    }
}

/// Record store whose writes take longer than any test request timeout
pub struct SlowStore {
    inner: InMemoryVerificationStore,
    delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: InMemoryVerificationStore::new(),
            delay,
        }
    }
}

#[async_trait]
impl VerificationRecordStore for SlowStore {
    async fn upsert(&self, record: VerificationRecord) -> DomainResult<()> {
        tokio::time::sleep(self.delay).await;
        self.inner.upsert(record).await
    }

    async fn find(&self, identifier: &Identifier) -> DomainResult<Option<VerificationRecord>> {
        self.inner.find(identifier).await
    }

    async fn delete(&self, identifier: &Identifier) -> DomainResult<()> {
        self.inner.delete(identifier).await
    }
}
