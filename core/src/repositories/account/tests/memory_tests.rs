//! Unit tests for the in-memory account repository

use crate::domain::entities::account::{Account, AccountRole};
use crate::domain::value_objects::Identifier;
use crate::errors::{AuthError, DomainError};
use crate::repositories::account::{AccountRepository, InMemoryAccountRepository};

fn account(identifier: &str) -> Account {
    Account::new(
        Identifier::parse(identifier).unwrap(),
        "Meera".to_string(),
        "hash".to_string(),
        AccountRole::Buyer,
    )
}

#[tokio::test]
async fn test_create_and_find() {
    let repo = InMemoryAccountRepository::new();
    let created = repo.create(account("buyer@example.com")).await.unwrap();

    let found = repo
        .find_by_identifier(&created.identifier)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);
    assert!(!found.activated);
}

#[tokio::test]
async fn test_create_duplicate_identifier() {
    let repo = InMemoryAccountRepository::new();
    repo.create(account("buyer@example.com")).await.unwrap();

    let result = repo.create(account("BUYER@example.com")).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::AccountAlreadyExists))
    ));
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_update_unknown_account() {
    let repo = InMemoryAccountRepository::new();

    let result = repo.update(account("ghost@example.com")).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_set_activated_is_idempotent() {
    let repo = InMemoryAccountRepository::new();
    let created = repo.create(account("+919876543210")).await.unwrap();

    assert!(repo.set_activated(&created.identifier).await.unwrap());
    assert!(repo.set_activated(&created.identifier).await.unwrap());

    let found = repo
        .find_by_identifier(&created.identifier)
        .await
        .unwrap()
        .unwrap();
    assert!(found.activated);
}

#[tokio::test]
async fn test_set_activated_without_account() {
    let repo = InMemoryAccountRepository::new();
    let identifier = Identifier::parse("nobody@example.com").unwrap();

    assert!(!repo.set_activated(&identifier).await.unwrap());
    assert!(repo.is_empty().await);
}
