//! Integration tests for the signup, verification and login workflow

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cc_core::domain::{
        AccountRole, DeliveryChannel, Identifier, RejectionReason, VerificationOutcome,
    };
    use cc_core::errors::{AuthError, DomainError};
    use cc_core::repositories::{InMemoryAccountRepository, InMemoryVerificationStore};
    use cc_core::services::{
        AccountService, DeliveryDispatcher, FixedCodeGenerator, RecordingDeliverySender,
        RegisterAccount, VerificationService, VerificationServiceConfig,
    };

    struct Harness {
        accounts: AccountService<InMemoryAccountRepository>,
        verification: VerificationService<InMemoryVerificationStore, InMemoryAccountRepository>,
        email_sender: Arc<RecordingDeliverySender>,
    }

    fn harness(code: &str) -> Harness {
        let store = Arc::new(InMemoryVerificationStore::new());
        let account_repo = Arc::new(InMemoryAccountRepository::new());
        let email_sender = Arc::new(RecordingDeliverySender::new(DeliveryChannel::Email));
        let dispatcher = Arc::new(DeliveryDispatcher::default().with_sender(email_sender.clone()));

        Harness {
            accounts: AccountService::new(account_repo.clone(), 4),
            verification: VerificationService::new(
                store,
                account_repo,
                dispatcher,
                VerificationServiceConfig::default(),
            )
            .with_generator(Arc::new(FixedCodeGenerator::new(code))),
            email_sender,
        }
    }

    fn register(identifier: &Identifier) -> RegisterAccount {
        RegisterAccount {
            identifier: identifier.clone(),
            display_name: "Farhan Weaves".to_string(),
            password: "loomwork99".to_string(),
            role: AccountRole::Artisan,
            mobile: None,
        }
    }

    #[tokio::test]
    async fn test_signup_verify_login_flow() {
        let h = harness("482913");
        let identifier = Identifier::parse("user@example.com").unwrap();

        h.accounts.register(register(&identifier)).await.unwrap();
        h.verification.start_verification(&identifier).await.unwrap();

        let blocked = h.accounts.authenticate(&identifier, "loomwork99").await;
        assert!(matches!(
            blocked,
            Err(DomainError::Auth(AuthError::AccountNotActivated))
        ));

        let code = h.email_sender.last_code_for(&identifier).unwrap();
        assert_eq!(code, "482913");

        let confirmed = h
            .verification
            .confirm_verification(&identifier, &code)
            .await
            .unwrap();
        assert_eq!(confirmed.outcome, VerificationOutcome::Accepted);
        assert!(confirmed.account_activated);

        let summary = h.accounts.authenticate(&identifier, "loomwork99").await.unwrap();
        assert_eq!(summary.identifier, "user@example.com");
        assert_eq!(summary.role, AccountRole::Artisan);

        let replay = h
            .verification
            .confirm_verification(&identifier, &code)
            .await
            .unwrap();
        assert_eq!(
            replay.outcome,
            VerificationOutcome::Rejected(RejectionReason::NotFound)
        );

        let again = h.accounts.register(register(&identifier)).await;
        assert!(matches!(
            again,
            Err(DomainError::Auth(AuthError::AccountAlreadyExists))
        ));
    }

    #[tokio::test]
    async fn test_phone_identifier_without_sms_sender() {
        let h = harness("482913");
        let identifier = Identifier::parse("+14155552671").unwrap();

        let started = h.verification.start_verification(&identifier).await.unwrap();

        assert_eq!(started.deliveries.len(), 1);
        assert_eq!(started.deliveries[0].channel, DeliveryChannel::Sms);
        assert_eq!(
            started.deliveries[0].outcome.reason(),
            Some("channel not configured")
        );

        // The record was persisted regardless of delivery
        let confirmed = h
            .verification
            .confirm_verification(&identifier, "482913")
            .await
            .unwrap();
        assert!(confirmed.outcome.is_accepted());
        assert!(!confirmed.account_activated);
    }
}
