//! Main verification service implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::domain::entities::verification_record::VerificationRecord;
use crate::domain::value_objects::{Identifier, RejectionReason, VerificationOutcome};
use crate::errors::DomainResult;
use crate::repositories::{AccountRepository, VerificationRecordStore};
use crate::services::delivery::DeliveryDispatcher;

use super::config::VerificationServiceConfig;
use super::evaluator::{Evaluation, VerificationEvaluator};
use super::generator::{CodeGenerator, RandomCodeGenerator};
use super::limiter::{AttemptLimiter, NoAttemptLimit};
use super::types::{ConfirmVerificationResult, StartVerificationResult};

/// Verification service for issuing and confirming one-time codes
///
/// All coordination between concurrent requests goes through the record store:
/// the last issued code wins, and the service keeps no per-identifier state of
/// its own (the attempt limiter aside).
pub struct VerificationService<S: VerificationRecordStore, A: AccountRepository> {
    /// Store for outstanding codes
    store: Arc<S>,
    /// Accounts activated on success
    accounts: Arc<A>,
    /// Process-wide delivery dispatcher
    dispatcher: Arc<DeliveryDispatcher>,
    generator: Arc<dyn CodeGenerator>,
    limiter: Arc<dyn AttemptLimiter>,
    evaluator: VerificationEvaluator<S>,
    config: VerificationServiceConfig,
}

impl<S: VerificationRecordStore, A: AccountRepository> VerificationService<S, A> {
    /// Create a new verification service
    ///
    /// Uses random codes and no attempt limit until told otherwise.
    pub fn new(
        store: Arc<S>,
        accounts: Arc<A>,
        dispatcher: Arc<DeliveryDispatcher>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            evaluator: VerificationEvaluator::new(store.clone()),
            store,
            accounts,
            dispatcher,
            generator: Arc::new(RandomCodeGenerator),
            limiter: Arc::new(NoAttemptLimit),
            config,
        }
    }

    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_limiter(mut self, limiter: Arc<dyn AttemptLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a new code for an identifier and dispatch it
    ///
    /// This method:
    /// 1. Generates a new code
    /// 2. Upserts the record, superseding any previous code
    /// 3. Dispatches the code to the identifier and, for email identifiers of
    ///    registered accounts, to the account's mobile as well
    ///
    /// Delivery failures are reported per channel and never undo the upsert.
    ///
    /// # Returns
    ///
    /// * `Ok(StartVerificationResult)` - Expiry and per-channel delivery outcomes
    /// * `Err(DomainError::Store)` - The record could not be persisted
    pub async fn start_verification(
        &self,
        identifier: &Identifier,
    ) -> DomainResult<StartVerificationResult> {
        let code = self.generator.generate();
        let record = VerificationRecord::issue(
            identifier.clone(),
            code,
            Utc::now(),
            self.config.code_ttl(),
        );
        let expires_at = record.expires_at;

        self.store.upsert(record.clone()).await?;

        let destinations = self.destinations_for(identifier).await;
        let deliveries = self.dispatcher.dispatch_all(&destinations, &record.code).await;

        info!(
            identifier = %identifier.masked(),
            expires_at = %expires_at,
            channels = deliveries.len(),
            delivered = deliveries.iter().filter(|d| d.outcome.is_ok()).count(),
            event = "verification_started",
            "Verification code issued"
        );

        Ok(StartVerificationResult {
            identifier: identifier.clone(),
            expires_at,
            deliveries,
        })
    }

    /// Confirm a presented code for an identifier
    pub async fn confirm_verification(
        &self,
        identifier: &Identifier,
        code: &str,
    ) -> DomainResult<ConfirmVerificationResult> {
        self.confirm_verification_at(identifier, code, Utc::now()).await
    }

    /// Confirm a presented code at an explicit instant
    ///
    /// The account is activated before the record is consumed, so a confirm
    /// that fails or is cancelled part way can be retried with the same code.
    /// On `Accepted` the record is gone and the account, if any, is activated.
    /// On `Mismatch` the record stays and the attempt policy is told.
    pub async fn confirm_verification_at(
        &self,
        identifier: &Identifier,
        code: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<ConfirmVerificationResult> {
        self.limiter.check(identifier).await?;

        let evaluation = self.evaluator.evaluate(identifier, code, now).await?;
        let (outcome, account_activated) = match evaluation {
            Evaluation::Matched(record) => {
                // Idempotent, so repeating it on retry is harmless
                let activated = self.accounts.set_activated(identifier).await?;
                match self.evaluator.consume(&record).await? {
                    VerificationOutcome::Accepted => (VerificationOutcome::Accepted, activated),
                    superseded => (superseded, false),
                }
            }
            Evaluation::Rejected(reason) => (VerificationOutcome::Rejected(reason), false),
        };

        match outcome {
            VerificationOutcome::Accepted => {
                // The code is spent; a limiter fault must not turn this into an error
                if let Err(e) = self.limiter.reset(identifier).await {
                    warn!(
                        identifier = %identifier.masked(),
                        error = %e,
                        "Failed to reset attempt counter"
                    );
                }
                info!(
                    identifier = %identifier.masked(),
                    account_activated,
                    event = "verification_accepted",
                    "Verification code accepted"
                );
            }
            VerificationOutcome::Rejected(reason) => {
                if reason == RejectionReason::Mismatch {
                    self.limiter.record_failure(identifier).await?;
                }
                warn!(
                    identifier = %identifier.masked(),
                    reason = reason.as_str(),
                    event = "verification_rejected",
                    "Verification code rejected"
                );
            }
        }

        Ok(ConfirmVerificationResult {
            outcome,
            account_activated,
        })
    }

    /// Identifier first, then the account's mobile when it is a different destination
    async fn destinations_for(&self, identifier: &Identifier) -> Vec<Identifier> {
        let mut destinations = vec![identifier.clone()];

        match self.accounts.find_by_identifier(identifier).await {
            Ok(Some(account)) => {
                if let Some(mobile) = account.secondary_destination() {
                    destinations.push(mobile.clone());
                }
            }
            Ok(None) => {}
            // The record is already persisted; fall back to the primary channel
            Err(e) => warn!(
                identifier = %identifier.masked(),
                error = %e,
                "Account lookup failed, dispatching to primary channel only"
            ),
        }

        destinations
    }
}
