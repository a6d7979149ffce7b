//! Integration tests for the Accounts domain
//!
//! These tests run against a real PostgreSQL container with the schema migrated.

use domain_accounts::*;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

fn new_account(builder: &TestDataBuilder, local: &str) -> NewAccount {
    NewAccount {
        email: builder.email(local),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        provider: "google".to_string(),
        provider_account_id: builder.name("provider", local),
        thumbnail: Some("https://example.com/grace.png".to_string()),
    }
}

fn request(builder: &TestDataBuilder, local: &str) -> CreateOrGetAccountRequest {
    CreateOrGetAccountRequest {
        email: builder.email(local),
        name: "Grace Brewster Hopper".to_string(),
        provider: "google".to_string(),
        provider_account_id: builder.name("provider", local),
        thumbnail: None,
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_repository_create_and_lookup() {
    let db = TestDatabase::new().await;
    let repo = PgAccountRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("repository_create_and_lookup");

    let created = assert_some(
        repo.create(new_account(&builder, "grace")).await.unwrap(),
        "create should insert a fresh account",
    );
    assert!(created.is_active);
    assert!(created.last_login_at.is_none());

    let by_id = assert_some(repo.get_by_id(created.id).await.unwrap(), "get_by_id");
    assert_uuid_eq(by_id.id, created.id, "lookup by id");
    assert_eq!(by_id.thumbnail.as_deref(), Some("https://example.com/grace.png"));

    let by_email = assert_some(
        repo.get_by_email(&builder.email("grace")).await.unwrap(),
        "get_by_email",
    );
    assert_uuid_eq(by_email.id, created.id, "lookup by email");
}

#[tokio::test]
async fn test_repository_duplicate_email_returns_none() {
    let db = TestDatabase::new().await;
    let repo = PgAccountRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("repository_duplicate_email");

    repo.create(new_account(&builder, "dup")).await.unwrap();

    let mut second = new_account(&builder, "dup");
    second.provider_account_id = builder.name("provider", "other");
    let result = repo.create(second).await.unwrap();

    assert!(result.is_none(), "unique email must not insert a second row");
}

#[tokio::test]
async fn test_repository_get_by_ids_skips_unknown() {
    let db = TestDatabase::new().await;
    let repo = PgAccountRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("repository_get_by_ids");

    let a = repo.create(new_account(&builder, "a")).await.unwrap().unwrap();
    let b = repo.create(new_account(&builder, "b")).await.unwrap().unwrap();

    let found = repo
        .get_by_ids(vec![a.id, b.id, builder.account_id()])
        .await
        .unwrap();
    assert_eq!(found.len(), 2);

    let empty = repo.get_by_ids(Vec::new()).await.unwrap();
    assert!(empty.is_empty());
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
async fn test_service_create_or_get_is_idempotent() {
    let db = TestDatabase::new().await;
    let service = AccountService::new(PgAccountRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("service_create_or_get_idempotent");

    let first = service
        .create_or_get_account(request(&builder, "grace"))
        .await
        .unwrap();
    assert_eq!(first.first_name, "Grace");
    assert_eq!(first.last_name, "Brewster Hopper");

    let second = service
        .create_or_get_account(request(&builder, "grace"))
        .await
        .unwrap();
    assert_uuid_eq(second.id, first.id, "second sign-in returns the same account");
}

#[tokio::test]
async fn test_service_current_account_not_found() {
    let db = TestDatabase::new().await;
    let service = AccountService::new(PgAccountRepository::new(db.connection()));
    let builder = TestDataBuilder::from_test_name("service_current_account_not_found");

    let result = service.get_current_account(builder.account_id()).await;
    assert!(matches!(result, Err(AccountError::NotFound(_))));

    let found = service.find_account(builder.account_id()).await.unwrap();
    assert!(found.is_none());
}
