use super::traits::{
    normalize, screen_new_account, Account, Credentials, IdentityStore, StoreError, StoreResult,
};
use async_trait::async_trait;
use chrono::Utc;
use libsql::{Builder, Connection, Database};
use uuid::Uuid;

/// libsql-backed identity store (local SQLite file or remote Turso).
pub struct TursoClient {
    // Kept alive for the lifetime of the connection.
    _db: Database,
    conn: Connection,
    credentials: Credentials,
}

impl TursoClient {
    /// In-memory SQLite database. Uses a single connection so every query
    /// sees the same data.
    pub async fn new_memory(credentials: Credentials) -> StoreResult<Self> {
        Self::new_local(":memory:", credentials).await
    }

    pub async fn new_local(path: &str, credentials: Credentials) -> StoreResult<Self> {
        if path != ":memory:" {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        StoreError::Backend(format!("Failed to create database directory: {}", e))
                    })?;
                }
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to open database: {}", e)))?;

        Self::from_database(db, credentials).await
    }

    pub async fn new_remote(
        url: String,
        auth_token: String,
        credentials: Credentials,
    ) -> StoreResult<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db, credentials).await
    }

    async fn from_database(db: Database, credentials: Credentials) -> StoreResult<Self> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Backend(format!("Failed to get connection: {}", e)))?;

        let client = Self {
            _db: db,
            conn,
            credentials,
        };
        client.initialize_schema().await?;

        Ok(client)
    }

    async fn initialize_schema(&self) -> StoreResult<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS accounts (
                    id TEXT PRIMARY KEY,
                    email TEXT NOT NULL,
                    normalized_email TEXT UNIQUE NOT NULL,
                    username TEXT NOT NULL,
                    normalized_username TEXT UNIQUE NOT NULL,
                    password_hash TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to create accounts table: {}", e)))?;

        Ok(())
    }

    /// Number of stored accounts.
    pub async fn count_accounts(&self) -> StoreResult<i64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM accounts", ())
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to count accounts: {}", e)))?;

        match rows
            .next()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            Some(row) => row.get(0).map_err(|e| StoreError::Backend(e.to_string())),
            None => Ok(0),
        }
    }

    /// Explains a failed insert. A registration that committed between the
    /// uniqueness check and the insert shows up as a conflict with exact messages.
    async fn insert_failure(
        &self,
        normalized_email: &str,
        normalized_username: &str,
        email: &str,
        username: &str,
        cause: String,
    ) -> StoreError {
        match self.taken(normalized_email, normalized_username).await {
            Ok((email_taken, username_taken)) => {
                screen_new_account(email_taken, username_taken, email, username, Vec::new())
                    .err()
                    .unwrap_or_else(|| {
                        StoreError::Backend(format!("Failed to create account: {}", cause))
                    })
            }
            Err(e) => e,
        }
    }

    async fn taken(&self, normalized_email: &str, normalized_username: &str) -> StoreResult<(bool, bool)> {
        let mut rows = self
            .conn
            .query(
                "SELECT normalized_email, normalized_username FROM accounts
                 WHERE normalized_email = ? OR normalized_username = ?",
                (normalized_email, normalized_username),
            )
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to query accounts: {}", e)))?;

        let (mut email_taken, mut username_taken) = (false, false);
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            let email: String = row.get(0).map_err(|e| StoreError::Backend(e.to_string()))?;
            let username: String = row.get(1).map_err(|e| StoreError::Backend(e.to_string()))?;
            email_taken |= email == normalized_email;
            username_taken |= username == normalized_username;
        }

        Ok((email_taken, username_taken))
    }
}

#[async_trait]
impl IdentityStore for TursoClient {
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, email, username, password_hash, created_at, updated_at
                 FROM accounts WHERE normalized_email = ?",
                [normalize(email)],
            )
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to query account: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            Ok(Some(Account {
                id: row.get(0).map_err(|e| StoreError::Backend(e.to_string()))?,
                email: row.get(1).map_err(|e| StoreError::Backend(e.to_string()))?,
                username: row.get(2).map_err(|e| StoreError::Backend(e.to_string()))?,
                password_hash: row.get(3).map_err(|e| StoreError::Backend(e.to_string()))?,
                created_at: row.get(4).map_err(|e| StoreError::Backend(e.to_string()))?,
                updated_at: row.get(5).map_err(|e| StoreError::Backend(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
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
        let normalized_email = normalize(email);
        let normalized_username = normalize(username);

        let (email_taken, username_taken) =
            self.taken(&normalized_email, &normalized_username).await?;
        let violations = self.credentials.policy.check(password);
        screen_new_account(email_taken, username_taken, email, username, violations)?;

        let password_hash = self.credentials.hasher.hash(password)?;
        let now = Utc::now().timestamp();
        let account = Account {
            id: Uuid::new_v4().to_string(),
            email: email.trim().to_string(),
            username: username.trim().to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let inserted = self
            .conn
            .execute(
                "INSERT INTO accounts (id, email, normalized_email, username, normalized_username,
                    password_hash, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                (
                    account.id.as_str(),
                    account.email.as_str(),
                    normalized_email.as_str(),
                    account.username.as_str(),
                    normalized_username.as_str(),
                    account.password_hash.as_str(),
                    now,
                    now,
                ),
            )
            .await;

        if let Err(e) = inserted {
            return Err(self
                .insert_failure(&normalized_email, &normalized_username, email, username, e.to_string())
                .await);
        }

        Ok(account)
    }
}
