//! Unit tests for attempt limiters

use chrono::{Duration, Utc};

use crate::errors::DomainError;
use crate::services::verification::{AttemptLimiter, InMemoryAttemptLimiter, NoAttemptLimit};

use super::mocks::{email, mobile};

#[tokio::test]
async fn test_no_attempt_limit_never_blocks() {
    let limiter = NoAttemptLimit;
    for _ in 0..100 {
        limiter.record_failure(&email()).await.unwrap();
    }
    assert!(limiter.check(&email()).await.is_ok());
}

#[tokio::test]
async fn test_blocks_after_max_failures_within_window() {
    let limiter = InMemoryAttemptLimiter::new(3, Duration::minutes(15));
    let now = Utc::now();

    for _ in 0..2 {
        limiter.record_failure_at(&email(), now).await;
    }
    assert!(limiter.check_at(&email(), now).await.is_ok());

    limiter.record_failure_at(&email(), now).await;
    match limiter.check_at(&email(), now + Duration::minutes(5)).await {
        Err(DomainError::RateLimited { retry_after_secs }) => assert_eq!(retry_after_secs, 600),
        other => panic!("Expected rate limit, got {:?}", other),
    }

    assert!(limiter.check_at(&mobile(), now).await.is_ok());
}

#[tokio::test]
async fn test_window_expiry_clears_failures() {
    let limiter = InMemoryAttemptLimiter::new(1, Duration::minutes(15));
    let now = Utc::now();

    limiter.record_failure_at(&email(), now).await;
    assert!(limiter.check_at(&email(), now).await.is_err());
    assert!(limiter
        .check_at(&email(), now + Duration::minutes(15))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_reset_clears_failures() {
    let limiter = InMemoryAttemptLimiter::new(1, Duration::minutes(15));

    limiter.record_failure(&email()).await.unwrap();
    assert!(limiter.check(&email()).await.is_err());

    limiter.reset(&email()).await.unwrap();
    assert!(limiter.check(&email()).await.is_ok());
}

#[tokio::test]
async fn test_ended_windows_are_pruned() {
    let limiter = InMemoryAttemptLimiter::new(3, Duration::minutes(15));
    let now = Utc::now();

    limiter.record_failure_at(&email(), now).await;
    assert_eq!(limiter.tracked().await, 1);

    // The email window has ended and nobody checks it again
    limiter
        .record_failure_at(&mobile(), now + Duration::minutes(16))
        .await;
    assert_eq!(limiter.tracked().await, 1);
    assert!(limiter.check_at(&email(), now + Duration::minutes(16)).await.is_ok());
}
