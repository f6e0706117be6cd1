//! Identity store abstraction
//!
//! `IdentityStore` is the capability the accounts service needs from the
//! system of record: look an account up by email, check a password against
//! it, and create new accounts. Password hashing and uniqueness are the
//! store's responsibility.
//!
//! # Example
//!
//! ```rust,ignore
//! use todolist::db::{DatabaseProvider, IdentityStore};
//!
//! // Ephemeral in-memory store (tests, local experiments)
//! let store = DatabaseProvider::Memory.create_store(Default::default()).await?;
//!
//! // File-based SQLite
//! let store = DatabaseProvider::SQLite { path: "data/accounts.db".into() }
//!     .create_store(Default::default())
//!     .await?;
//! ```

use crate::auth::password::{HashError, PasswordHasher, PasswordPolicy};
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};

/// Account record owned by the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub username: String,
    /// Argon2id PHC string
    pub password_hash: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Failures reported by an identity store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The email or username is already registered. Carries every message the
    /// store produced, including password rule violations found alongside.
    #[error("{}", .0.join(" "))]
    Conflict(Vec<String>),

    /// The account data broke a store rule (password policy).
    #[error("{}", .0.join(" "))]
    Rejected(Vec<String>),

    /// Unexpected backend fault.
    #[error("{0}")]
    Backend(String),
}

impl From<HashError> for StoreError {
    fn from(err: HashError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Abstract trait for identity store operations.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Looks an account up by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    /// Checks `password` against the account's stored hash.
    async fn verify_password(&self, account: &Account, password: &str) -> StoreResult<bool>;

    /// Performs the same hash work as [`verify_password`](Self::verify_password)
    /// against a decoy hash. Called when no account matches, so an unknown
    /// email costs as much as a wrong password.
    async fn verify_decoy(&self, password: &str) -> StoreResult<()>;

    /// Creates an account, hashing `password`.
    ///
    /// Fails with [`StoreError::Conflict`] when the email or username is taken
    /// and [`StoreError::Rejected`] when the password breaks the policy.
    async fn create_account(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> StoreResult<Account>;
}

/// Normalized form used for uniqueness checks.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Combines uniqueness conflicts and password rule violations into one outcome.
///
/// Conflicts win: when any are present every message is reported as a conflict.
pub fn screen_new_account(
    email_taken: bool,
    username_taken: bool,
    email: &str,
    username: &str,
    violations: Vec<String>,
) -> StoreResult<()> {
    let mut conflicts = Vec::new();
    if username_taken {
        conflicts.push(format!("Username '{}' is already taken.", username));
    }
    if email_taken {
        conflicts.push(format!("Email '{}' is already taken.", email));
    }

    if !conflicts.is_empty() {
        conflicts.extend(violations);
        return Err(StoreError::Conflict(conflicts));
    }
    if !violations.is_empty() {
        return Err(StoreError::Rejected(violations));
    }
    Ok(())
}

const DECOY_PASSWORD: &str = "decoy-password-never-matches";

/// Password handling shared by the store implementations.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub hasher: PasswordHasher,
    pub policy: PasswordPolicy,
    // Shared between clones; hashed with `hasher` so its cost matches real accounts.
    decoy_hash: Arc<OnceLock<String>>,
}

impl Credentials {
    pub fn new(hasher: PasswordHasher, policy: PasswordPolicy) -> Self {
        Self {
            hasher,
            policy,
            decoy_hash: Arc::default(),
        }
    }

    /// The decoy PHC hash, computed on first use.
    pub fn decoy_hash(&self) -> StoreResult<&str> {
        if let Some(hash) = self.decoy_hash.get() {
            return Ok(hash);
        }
        let hash = self.hasher.hash(DECOY_PASSWORD)?;
        Ok(self.decoy_hash.get_or_init(|| hash))
    }

    /// Verifies `password` against the decoy hash and discards the outcome.
    pub fn verify_decoy(&self, password: &str) -> StoreResult<()> {
        let hash = self.decoy_hash()?;
        self.hasher.verify(password, hash)?;
        Ok(())
    }
}

/// Database provider configuration
#[derive(Debug, Clone, Default)]
pub enum DatabaseProvider {
    /// In-memory store (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    #[cfg(feature = "local-db")]
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Create an identity store from this provider configuration
    pub async fn create_store(&self, credentials: Credentials) -> StoreResult<Arc<dyn IdentityStore>> {
        // Hash the decoy before serving so the first unknown-email login is not slower.
        credentials.decoy_hash()?;

        match self {
            DatabaseProvider::Memory => {
                Ok(Arc::new(super::memory::MemoryIdentityStore::new(credentials)))
            }
            #[cfg(feature = "local-db")]
            DatabaseProvider::SQLite { path } => {
                let client = super::turso::TursoClient::new_local(path, credentials).await?;
                Ok(Arc::new(client))
            }
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                let client =
                    super::turso::TursoClient::new_remote(url.clone(), auth_token.clone(), credentials)
                        .await?;
                Ok(Arc::new(client))
            }
        }
    }

    /// Short label for logs (never includes credentials).
    pub fn describe(&self) -> String {
        match self {
            DatabaseProvider::Memory => "memory".to_string(),
            #[cfg(feature = "local-db")]
            DatabaseProvider::SQLite { path } => format!("sqlite:{}", path),
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, .. } => format!("turso:{}", url),
        }
    }
}
