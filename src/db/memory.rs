//! In-memory identity store.
//!
//! Keeps accounts in a map keyed by normalized email. Used by the test suite
//! and for throwaway local runs; nothing survives a restart.

use super::traits::{
    normalize, screen_new_account, Account, Credentials, IdentityStore, StoreResult,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    credentials: Credentials,
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryIdentityStore {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().get(&normalize(email)).cloned())
    }

    async fn verify_password(&self, account: &Account, password: &str) -> StoreResult<bool> {
        Ok(self
            .credentials
            .hasher
            .verify(password, &account.password_hash)?)
    }

    async fn verify_decoy(&self, password: &str) -> StoreResult<()> {
        self.credentials.verify_decoy(password)
    }

    async fn create_account(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> StoreResult<Account> {
        let violations = self.credentials.policy.check(password);
        let password_hash = if violations.is_empty() {
            self.credentials.hasher.hash(password)?
        } else {
            String::new()
        };

        let key = normalize(email);
        let normalized_username = normalize(username);

        // Uniqueness is decided under the write lock so concurrent registrations
        // of the same email cannot both succeed.
        let mut accounts = self.accounts.write();
        let email_taken = accounts.contains_key(&key);
        let username_taken = accounts
            .values()
            .any(|a| normalize(&a.username) == normalized_username);

        screen_new_account(email_taken, username_taken, email, username, violations)?;

        let now = Utc::now().timestamp();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_string(),
            username: username.trim().to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };
        accounts.insert(key, account.clone());

        Ok(account)
    }
}
