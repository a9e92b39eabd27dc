use std::sync::Arc;

use crate::domain::entities::account::AccountRole;
use crate::domain::value_objects::Identifier;
use crate::errors::{AuthError, DomainError, ValidationError};
use crate::repositories::{AccountRepository, InMemoryAccountRepository};

use super::{AccountService, RegisterAccount};

// Lowest cost bcrypt accepts, keeps the tests fast
const TEST_COST: u32 = 4;

fn service() -> (AccountService<InMemoryAccountRepository>, Arc<InMemoryAccountRepository>) {
    let accounts = Arc::new(InMemoryAccountRepository::new());
    (AccountService::new(accounts.clone(), TEST_COST), accounts)
}

fn identifier() -> Identifier {
    Identifier::parse("artisan@craftconnect.in").unwrap()
}

fn request(password: &str) -> RegisterAccount {
    RegisterAccount {
        identifier: identifier(),
        display_name: "  Kavya Pottery ".to_string(),
        password: password.to_string(),
        role: AccountRole::Artisan,
        mobile: None,
    }
}

#[tokio::test]
async fn test_register_creates_pending_account() {
    let (service, accounts) = service();

    let account = service.register(request("terracotta42")).await.unwrap();

    assert!(!account.activated);
    assert_eq!(account.display_name, "Kavya Pottery");
    assert_ne!(account.credential_hash, "terracotta42");
    assert!(bcrypt::verify("terracotta42", &account.credential_hash).unwrap());
    assert_eq!(accounts.len().await, 1);
}

#[tokio::test]
async fn test_register_replaces_pending_account() {
    let (service, accounts) = service();
    let first = service.register(request("terracotta42")).await.unwrap();

    let mut second_request = request("handloom2024");
    second_request.role = AccountRole::Buyer;
    second_request.mobile = Some(Identifier::parse("+919876543210").unwrap());
    let second = service.register(second_request).await.unwrap();

    assert_eq!(second.id, first.id);
    assert_eq!(second.role, AccountRole::Buyer);
    assert!(second.mobile.is_some());
    assert!(bcrypt::verify("handloom2024", &second.credential_hash).unwrap());
    assert_eq!(accounts.len().await, 1);
}

#[tokio::test]
async fn test_register_conflicts_with_activated_account() {
    let (service, accounts) = service();
    service.register(request("terracotta42")).await.unwrap();
    accounts.set_activated(&identifier()).await.unwrap();

    let result = service.register(request("another-password")).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::AccountAlreadyExists))
    ));
}

#[tokio::test]
async fn test_register_validates_input() {
    let (service, _) = service();

    let short = service.register(request("short")).await;
    assert!(matches!(
        short,
        Err(DomainError::ValidationErr(ValidationError::InvalidLength { .. }))
    ));

    let mut blank_name = request("terracotta42");
    blank_name.display_name = "   ".to_string();
    assert!(matches!(
        service.register(blank_name).await,
        Err(DomainError::ValidationErr(ValidationError::RequiredField { .. }))
    ));

    let mut email_mobile = request("terracotta42");
    email_mobile.mobile = Some(Identifier::parse("other@example.com").unwrap());
    assert!(matches!(
        service.register(email_mobile).await,
        Err(DomainError::ValidationErr(ValidationError::InvalidFormat { .. }))
    ));
}

#[tokio::test]
async fn test_login_requires_activation() {
    let (service, _) = service();
    service.register(request("terracotta42")).await.unwrap();

    let result = service.authenticate(&identifier(), "terracotta42").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::AccountNotActivated))
    ));
}

#[tokio::test]
async fn test_login_unknown_account() {
    let (service, _) = service();

    let result = service.authenticate(&identifier(), "terracotta42").await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::AccountNotFound))
    ));
}

#[tokio::test]
async fn test_login_checks_password_and_records_login() {
    let (service, accounts) = service();
    service.register(request("terracotta42")).await.unwrap();
    accounts.set_activated(&identifier()).await.unwrap();

    let wrong = service.authenticate(&identifier(), "wrong-password").await;
    assert!(matches!(
        wrong,
        Err(DomainError::Auth(AuthError::InvalidCredentials))
    ));

    let summary = service
        .authenticate(&identifier(), "terracotta42")
        .await
        .unwrap();
    assert_eq!(summary.name, "Kavya Pottery");
    assert_eq!(summary.identifier, "artisan@craftconnect.in");
    assert_eq!(summary.role, AccountRole::Artisan);

    let stored = accounts.find_by_identifier(&identifier()).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_some());
}
