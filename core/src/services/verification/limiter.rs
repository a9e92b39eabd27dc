//! Attempt policy wrapped around the verification evaluator

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::value_objects::Identifier;
use crate::errors::{DomainError, DomainResult};

/// Policy point consulted before and after each evaluation
#[async_trait]
pub trait AttemptLimiter: Send + Sync {
    /// Fail with `DomainError::RateLimited` when no further attempts are allowed
    async fn check(&self, identifier: &Identifier) -> DomainResult<()>;

    /// Record a mismatched code
    async fn record_failure(&self, identifier: &Identifier) -> DomainResult<()>;

    /// Clear state after a successful verification
    async fn reset(&self, identifier: &Identifier) -> DomainResult<()>;
}

/// Unlimited attempts; a mismatched code can be retried until it expires
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAttemptLimit;

#[async_trait]
impl AttemptLimiter for NoAttemptLimit {
    async fn check(&self, _identifier: &Identifier) -> DomainResult<()> {
        Ok(())
    }

    async fn record_failure(&self, _identifier: &Identifier) -> DomainResult<()> {
        Ok(())
    }

    async fn reset(&self, _identifier: &Identifier) -> DomainResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct FailureWindow {
    failures: u32,
    started_at: DateTime<Utc>,
}

/// Process-local fixed-window failure counter
///
/// After `max_failures` mismatches inside `window`, further attempts for the
/// identifier are refused until the window ends.
#[derive(Clone)]
pub struct InMemoryAttemptLimiter {
    max_failures: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<Identifier, FailureWindow>>>,
}

impl InMemoryAttemptLimiter {
    pub fn new(max_failures: u32, window: Duration) -> Self {
        Self {
            max_failures,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Check at an explicit instant
    pub async fn check_at(&self, identifier: &Identifier, now: DateTime<Utc>) -> DomainResult<()> {
        let mut windows = self.windows.lock().await;
        let Some(entry) = windows.get(identifier).copied() else {
            return Ok(());
        };

        let ends_at = entry.started_at + self.window;
        if now >= ends_at {
            windows.remove(identifier);
            return Ok(());
        }

        if entry.failures >= self.max_failures {
            warn!(
                identifier = %identifier.masked(),
                failures = entry.failures,
                event = "verification_attempts_exceeded",
                "Too many failed verification attempts"
            );
            return Err(DomainError::RateLimited {
                retry_after_secs: (ends_at - now).num_seconds().max(1) as u64,
            });
        }

        Ok(())
    }

    /// Record a failure at an explicit instant
    ///
    /// Windows that have ended are dropped here, so identifiers that never
    /// come back do not accumulate.
    pub async fn record_failure_at(&self, identifier: &Identifier, now: DateTime<Utc>) {
        let mut windows = self.windows.lock().await;
        let window = self.window;
        windows.retain(|_, entry| now < entry.started_at + window);

        let entry = windows.entry(identifier.clone()).or_insert(FailureWindow {
            failures: 0,
            started_at: now,
        });

        if now >= entry.started_at + self.window {
            *entry = FailureWindow {
                failures: 0,
                started_at: now,
            };
        }
        entry.failures += 1;
    }

    /// Number of identifiers with an open failure window
    pub async fn tracked(&self) -> usize {
        self.windows.lock().await.len()
    }
}

#[async_trait]
impl AttemptLimiter for InMemoryAttemptLimiter {
    async fn check(&self, identifier: &Identifier) -> DomainResult<()> {
        self.check_at(identifier, Utc::now()).await
    }

    async fn record_failure(&self, identifier: &Identifier) -> DomainResult<()> {
        self.record_failure_at(identifier, Utc::now()).await;
        Ok(())
    }

    async fn reset(&self, identifier: &Identifier) -> DomainResult<()> {
        self.windows.lock().await.remove(identifier);
        Ok(())
    }
}
