//! Unit tests for verification service

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::verification_record::VerificationRecord;
use crate::domain::value_objects::{DeliveryChannel, RejectionReason, VerificationOutcome};
use crate::errors::{DomainError, ValidationError};
use crate::repositories::{AccountRepository, VerificationRecordStore};
use crate::repositories::InMemoryVerificationStore;
use crate::services::delivery::{DeliveryDispatcher, RecordingDeliverySender};
use crate::services::verification::{
    FixedCodeGenerator, InMemoryAttemptLimiter, RandomCodeGenerator, VerificationService,
    VerificationServiceConfig,
};

use super::mocks::{
    email, mobile, pending_account, Fixture, FlakyActivationRepository, SequenceCodeGenerator,
};

#[tokio::test]
async fn test_start_verification_persists_and_delivers() {
    let fixture = Fixture::with_fixed_code("482913");

    let result = fixture.service.start_verification(&email()).await.unwrap();

    let record = fixture.store.find(&email()).await.unwrap().unwrap();
    assert_eq!(record.code, "482913");
    assert_eq!(record.expires_at, result.expires_at);
    assert_eq!(record.expires_at - record.issued_at, Duration::minutes(10));

    assert_eq!(result.deliveries.len(), 1);
    assert_eq!(result.deliveries[0].channel, DeliveryChannel::Email);
    assert!(result.any_delivered());
    assert_eq!(
        fixture.email_sender.last_code_for(&email()),
        Some("482913".to_string())
    );
}

#[tokio::test]
async fn test_second_issuance_supersedes_first() {
    let fixture = Fixture::new(Arc::new(SequenceCodeGenerator::new(&["111111", "222222"])));

    fixture.service.start_verification(&email()).await.unwrap();
    fixture.service.start_verification(&email()).await.unwrap();

    assert_eq!(fixture.store.len().await, 1);
    let record = fixture.store.find(&email()).await.unwrap().unwrap();
    assert_eq!(record.code, "222222");

    let stale = fixture
        .service
        .confirm_verification(&email(), "111111")
        .await
        .unwrap();
    assert_eq!(
        stale.outcome,
        VerificationOutcome::Rejected(RejectionReason::Mismatch)
    );

    let fresh = fixture
        .service
        .confirm_verification(&email(), "222222")
        .await
        .unwrap();
    assert_eq!(fresh.outcome, VerificationOutcome::Accepted);
}

#[tokio::test]
async fn test_confirm_with_issued_code_activates_account() {
    let fixture = Fixture::with_fixed_code("482913");
    fixture.accounts.create(pending_account(email())).await.unwrap();

    fixture.service.start_verification(&email()).await.unwrap();
    let result = fixture
        .service
        .confirm_verification(&email(), "482913")
        .await
        .unwrap();

    assert_eq!(result.outcome, VerificationOutcome::Accepted);
    assert!(result.account_activated);

    let account = fixture.accounts.find_by_identifier(&email()).await.unwrap().unwrap();
    assert!(account.activated);
    assert!(fixture.store.find(&email()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_activation_can_be_retried_with_same_code() {
    let store = Arc::new(InMemoryVerificationStore::new());
    let accounts = Arc::new(FlakyActivationRepository::new());
    accounts.inner.create(pending_account(email())).await.unwrap();
    let service = VerificationService::new(
        store.clone(),
        accounts.clone(),
        Arc::new(DeliveryDispatcher::default()),
        VerificationServiceConfig::default(),
    )
    .with_generator(Arc::new(FixedCodeGenerator::new("482913")));

    service.start_verification(&email()).await.unwrap();

    let first = service.confirm_verification(&email(), "482913").await;
    assert!(matches!(first, Err(DomainError::Store { .. })));
    // The code is not spent by a confirm that failed
    assert!(store.find(&email()).await.unwrap().is_some());

    let retry = service.confirm_verification(&email(), "482913").await.unwrap();
    assert_eq!(retry.outcome, VerificationOutcome::Accepted);
    assert!(retry.account_activated);
    assert!(store.find(&email()).await.unwrap().is_none());

    let account = accounts.inner.find_by_identifier(&email()).await.unwrap().unwrap();
    assert!(account.activated);
}

#[tokio::test]
async fn test_accept_without_account_reports_not_activated() {
    let fixture = Fixture::with_fixed_code("482913");

    fixture.service.start_verification(&email()).await.unwrap();
    let result = fixture
        .service
        .confirm_verification(&email(), "482913")
        .await
        .unwrap();

    assert_eq!(result.outcome, VerificationOutcome::Accepted);
    assert!(!result.account_activated);
}

#[tokio::test]
async fn test_wrong_code_keeps_record() {
    let fixture = Fixture::with_fixed_code("482913");
    fixture.service.start_verification(&email()).await.unwrap();

    let wrong = fixture
        .service
        .confirm_verification(&email(), "000000")
        .await
        .unwrap();
    assert_eq!(
        wrong.outcome,
        VerificationOutcome::Rejected(RejectionReason::Mismatch)
    );
    assert!(!wrong.account_activated);
    assert!(fixture.store.find(&email()).await.unwrap().is_some());

    let right = fixture
        .service
        .confirm_verification(&email(), "482913")
        .await
        .unwrap();
    assert_eq!(right.outcome, VerificationOutcome::Accepted);
}

#[tokio::test]
async fn test_expired_code_is_rejected() {
    let fixture = Fixture::with_fixed_code("482913");
    let now = Utc::now();
    fixture
        .store
        .upsert(VerificationRecord {
            identifier: email(),
            code: "482913".to_string(),
            issued_at: now - Duration::minutes(10) - Duration::seconds(1),
            expires_at: now - Duration::seconds(1),
        })
        .await
        .unwrap();

    let result = fixture
        .service
        .confirm_verification_at(&email(), "482913", now)
        .await
        .unwrap();

    assert_eq!(
        result.outcome,
        VerificationOutcome::Rejected(RejectionReason::Expired)
    );
}

#[tokio::test]
async fn test_code_is_single_use() {
    let fixture = Fixture::with_fixed_code("482913");
    fixture.service.start_verification(&email()).await.unwrap();

    let first = fixture
        .service
        .confirm_verification(&email(), "482913")
        .await
        .unwrap();
    let second = fixture
        .service
        .confirm_verification(&email(), "482913")
        .await
        .unwrap();

    assert_eq!(first.outcome, VerificationOutcome::Accepted);
    assert_eq!(
        second.outcome,
        VerificationOutcome::Rejected(RejectionReason::NotFound)
    );
}

#[tokio::test]
async fn test_never_requested_is_not_found() {
    let fixture = Fixture::with_fixed_code("482913");

    let result = fixture
        .service
        .confirm_verification(&mobile(), "482913")
        .await
        .unwrap();

    assert_eq!(
        result.outcome,
        VerificationOutcome::Rejected(RejectionReason::NotFound)
    );
}

#[tokio::test]
async fn test_code_is_trimmed_before_comparison() {
    let fixture = Fixture::with_fixed_code("482913");
    fixture.service.start_verification(&email()).await.unwrap();

    let result = fixture
        .service
        .confirm_verification(&email(), "  482913\n")
        .await
        .unwrap();

    assert_eq!(result.outcome, VerificationOutcome::Accepted);
}

#[tokio::test]
async fn test_malformed_code_never_touches_store() {
    let fixture = Fixture::with_fixed_code("482913");
    fixture.store.set_unavailable(true);

    for bad in ["48291", "4829134", "48a913", ""] {
        let result = fixture.service.confirm_verification(&email(), bad).await;
        assert!(matches!(
            result,
            Err(DomainError::ValidationErr(ValidationError::InvalidCode { .. }))
        ));
    }
}

#[tokio::test]
async fn test_store_outage_is_a_transient_error() {
    let fixture = Fixture::with_fixed_code("482913");
    fixture.store.set_unavailable(true);

    let start = fixture.service.start_verification(&email()).await;
    assert!(matches!(start, Err(DomainError::Store { .. })));
    assert!(fixture.email_sender.sent().is_empty());

    let confirm = fixture.service.confirm_verification(&email(), "482913").await;
    assert!(matches!(confirm, Err(DomainError::Store { .. })));
}

#[tokio::test]
async fn test_registered_mobile_receives_code_too() {
    let fixture = Fixture::with_fixed_code("482913");
    fixture
        .accounts
        .create(pending_account(email()).with_mobile(Some(mobile())))
        .await
        .unwrap();

    let result = fixture.service.start_verification(&email()).await.unwrap();

    assert_eq!(result.deliveries.len(), 2);
    assert_eq!(
        fixture.sms_sender.last_code_for(&mobile()),
        Some("482913".to_string())
    );
    assert_eq!(
        fixture.email_sender.last_code_for(&email()),
        Some("482913".to_string())
    );
}

#[tokio::test]
async fn test_failed_channel_still_leaves_code_valid() {
    let fixture = Fixture::with_sms_sender(
        Arc::new(RandomCodeGenerator),
        RecordingDeliverySender::failing(DeliveryChannel::Sms),
    );
    fixture
        .accounts
        .create(pending_account(email()).with_mobile(Some(mobile())))
        .await
        .unwrap();

    let result = fixture.service.start_verification(&email()).await.unwrap();

    let sms = result
        .deliveries
        .iter()
        .find(|d| d.channel == DeliveryChannel::Sms)
        .unwrap();
    assert!(!sms.outcome.is_ok());
    assert!(result.any_delivered());

    let code = fixture.email_sender.last_code_for(&email()).unwrap();
    let confirm = fixture
        .service
        .confirm_verification(&email(), &code)
        .await
        .unwrap();
    assert!(confirm.outcome.is_accepted());
    assert!(confirm.account_activated);
}

#[tokio::test]
async fn test_attempt_limiter_blocks_after_failures() {
    let fixture = Fixture::with_fixed_code("482913");
    let service = fixture
        .service
        .with_limiter(Arc::new(InMemoryAttemptLimiter::new(2, Duration::minutes(15))));

    service.start_verification(&email()).await.unwrap();
    service.confirm_verification(&email(), "000000").await.unwrap();
    service.confirm_verification(&email(), "111111").await.unwrap();

    let blocked = service.confirm_verification(&email(), "482913").await;
    assert!(matches!(blocked, Err(DomainError::RateLimited { .. })));

    // Other identifiers are unaffected
    let other = service.confirm_verification(&mobile(), "482913").await.unwrap();
    assert_eq!(
        other.outcome,
        VerificationOutcome::Rejected(RejectionReason::NotFound)
    );
}
