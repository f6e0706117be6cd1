//! Database integration tests
//!
//! These tests verify the identity stores through the `IdentityStore` trait,
//! using file-backed SQLite in a temp directory and the in-memory store.

use rstest::rstest;
use std::sync::Arc;
use tempfile::TempDir;
use todolist::{
    auth::password::{HashCost, PasswordHasher, PasswordPolicy},
    db::{Credentials, DatabaseProvider, IdentityStore, StoreError, TursoClient},
};

fn test_credentials() -> Credentials {
    let hasher = PasswordHasher::new(HashCost {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid params");
    Credentials::new(hasher, PasswordPolicy::default())
}

/// Test helper to open a SQLite store inside `dir`
async fn open_file_store(dir: &TempDir) -> TursoClient {
    let path = dir.path().join("nested").join("accounts.db");
    TursoClient::new_local(path.to_str().expect("utf-8 path"), test_credentials())
        .await
        .expect("Failed to create local database")
}

async fn store_for(provider: &str) -> (Arc<dyn IdentityStore>, Option<TempDir>) {
    match provider {
        "memory" => (
            DatabaseProvider::Memory
                .create_store(test_credentials())
                .await
                .expect("memory store"),
            None,
        ),
        _ => {
            let dir = TempDir::new().expect("temp dir");
            let store: Arc<dyn IdentityStore> = Arc::new(open_file_store(&dir).await);
            (store, Some(dir))
        }
    }
}

#[tokio::test]
async fn test_local_store_creates_parent_dir() {
    let dir = TempDir::new().expect("temp dir");
    let client = open_file_store(&dir).await;

    assert!(dir.path().join("nested").join("accounts.db").exists());
    assert_eq!(client.count_accounts().await.expect("count"), 0);
}

#[tokio::test]
async fn test_accounts_survive_reopen() {
    let dir = TempDir::new().expect("temp dir");

    {
        let client = open_file_store(&dir).await;
        client
            .create_account("a@x.com", "a@x.com", "Pw1!")
            .await
            .expect("should create");
    }

    let reopened = open_file_store(&dir).await;
    assert_eq!(reopened.count_accounts().await.expect("count"), 1);

    let account = reopened
        .find_by_email("a@x.com")
        .await
        .expect("lookup")
        .expect("account should exist");
    assert!(reopened
        .verify_password(&account, "Pw1!")
        .await
        .expect("verify"));
}

#[rstest]
#[case::memory("memory")]
#[case::sqlite("sqlite")]
#[tokio::test]
async fn test_create_and_find(#[case] provider: &str) {
    let (store, _dir) = store_for(provider).await;

    let created = store
        .create_account("a@x.com", "a@x.com", "Pw1!")
        .await
        .expect("should create");
    assert!(!created.id.is_empty());
    assert_ne!(created.password_hash, "Pw1!");

    let found = store
        .find_by_email("A@X.COM")
        .await
        .expect("lookup")
        .expect("case-insensitive match");
    assert_eq!(found.id, created.id);
    assert_eq!(found.username, "a@x.com");

    assert!(store.find_by_email("b@x.com").await.expect("lookup").is_none());
}

#[rstest]
#[case::memory("memory")]
#[case::sqlite("sqlite")]
#[tokio::test]
async fn test_verify_password(#[case] provider: &str) {
    let (store, _dir) = store_for(provider).await;

    let account = store
        .create_account("a@x.com", "a@x.com", "Pw1!")
        .await
        .expect("should create");

    assert!(store.verify_password(&account, "Pw1!").await.expect("verify"));
    assert!(!store.verify_password(&account, "pw1!").await.expect("verify"));
}

#[rstest]
#[case::memory("memory")]
#[case::sqlite("sqlite")]
#[tokio::test]
async fn test_duplicate_email_conflicts(#[case] provider: &str) {
    let (store, _dir) = store_for(provider).await;

    store
        .create_account("a@x.com", "a@x.com", "Pw1!")
        .await
        .expect("should create");

    let err = store
        .create_account("a@x.com", "a@x.com", "Pw1!")
        .await
        .expect_err("should conflict");

    match err {
        StoreError::Conflict(messages) => {
            assert!(messages.contains(&"Email 'a@x.com' is already taken.".to_string()));
            assert!(messages.contains(&"Username 'a@x.com' is already taken.".to_string()));
        }
        other => panic!("expected conflict, got {:?}", other),
    }
}

#[rstest]
#[case::memory("memory")]
#[case::sqlite("sqlite")]
#[tokio::test]
async fn test_policy_violation_rejected(#[case] provider: &str) {
    let (store, _dir) = store_for(provider).await;

    let err = store
        .create_account("a@x.com", "a@x.com", "abc")
        .await
        .expect_err("should reject");

    assert!(matches!(err, StoreError::Rejected(ref messages) if !messages.is_empty()));
    assert!(store.find_by_email("a@x.com").await.expect("lookup").is_none());
}
