//! TOML-based configuration for the ToDoList accounts server
//!
//! Infrastructure settings live in a TOML file (`todolist.toml`). Secrets are
//! never written there: the file names the environment variables that hold
//! them, and they are resolved once at startup.

use crate::auth::password::{HashCost, HashError, PasswordHasher, PasswordPolicy};
use crate::auth::token::{KeyError, SigningKey, DEFAULT_TOKEN_LIFETIME_SECS};
use crate::db::{Credentials, DatabaseProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure loaded from todolist.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Default log filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Maximum request body size in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_body_limit() -> usize {
    64 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the token signing secret
    #[serde(default = "default_token_secret_env")]
    pub token_secret_env: String,

    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_secs: i64,
}

fn default_token_secret_env() -> String {
    "TODOLIST_TOKEN_SECRET".to_string()
}

/// Upper bound for `auth.token_lifetime_secs` (one year).
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

fn default_token_lifetime() -> i64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret_env: default_token_secret_env(),
            token_lifetime_secs: default_token_lifetime(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:` for the in-memory store
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Environment variable for Turso URL (optional cloud config)
    pub turso_url_env: Option<String>,

    /// Environment variable for Turso auth token
    pub turso_token_env: Option<String>,
}

fn default_database_url() -> String {
    "./data/todolist.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            turso_url_env: None,
            turso_token_env: None,
        }
    }
}

// ============= Accounts Configuration =============

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountsConfig {
    #[serde(default)]
    pub password: PasswordPolicy,

    #[serde(default)]
    pub hashing: HashCost,
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Signing secret in '{env}' rejected: {source}")]
    WeakSecret {
        env: String,
        #[source]
        source: KeyError,
    },

    #[error("Invalid password hashing settings: {0}")]
    Hashing(#[from] HashError),
}

impl AppConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML text without validating it.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate internal consistency and that referenced env vars are set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.signing_key()?;
        self.token_lifetime()?;

        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.body_limit_bytes must be positive".to_string(),
            ));
        }

        if let Some(ref env) = self.database.turso_url_env {
            self.validate_env_var(env)?;
        }
        if let Some(ref env) = self.database.turso_token_env {
            self.validate_env_var(env)?;
        }

        PasswordHasher::new(self.accounts.hashing)?;

        Ok(())
    }

    fn validate_env_var(&self, name: &str) -> Result<(), ConfigError> {
        std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))?;
        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// Build the signing key from the secret named by `auth.token_secret_env`.
    pub fn signing_key(&self) -> Result<SigningKey, ConfigError> {
        let env = &self.auth.token_secret_env;
        let secret = self
            .resolve_env(env)
            .ok_or_else(|| ConfigError::MissingEnvVar(env.clone()))?;

        SigningKey::from_secret(&secret).map_err(|source| ConfigError::WeakSecret {
            env: env.clone(),
            source,
        })
    }

    /// Token lifetime, between one second and [`MAX_TOKEN_LIFETIME_SECS`].
    pub fn token_lifetime(&self) -> Result<chrono::Duration, ConfigError> {
        let secs = self.auth.token_lifetime_secs;
        if !(1..=MAX_TOKEN_LIFETIME_SECS).contains(&secs) {
            return Err(ConfigError::ValidationError(format!(
                "auth.token_lifetime_secs must be between 1 and {}, got {}",
                MAX_TOKEN_LIFETIME_SECS, secs
            )));
        }

        chrono::Duration::try_seconds(secs).ok_or_else(|| {
            ConfigError::ValidationError(format!("auth.token_lifetime_secs {} is out of range", secs))
        })
    }

    /// Password hasher and policy for the identity store.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        Ok(Credentials::new(
            PasswordHasher::new(self.accounts.hashing)?,
            self.accounts.password.clone(),
        ))
    }

    /// Pick the identity store backend.
    ///
    /// Remote Turso wins when both of its env vars are configured (and the
    /// `turso` feature is enabled); otherwise `database.url` selects a local
    /// SQLite file or, for `:memory:`, the in-memory store.
    pub fn database_provider(&self) -> Result<DatabaseProvider, ConfigError> {
        #[cfg(feature = "turso")]
        {
            if let (Some(url_env), Some(token_env)) =
                (&self.database.turso_url_env, &self.database.turso_token_env)
            {
                let url = self
                    .resolve_env(url_env)
                    .ok_or_else(|| ConfigError::MissingEnvVar(url_env.clone()))?;
                let auth_token = self
                    .resolve_env(token_env)
                    .ok_or_else(|| ConfigError::MissingEnvVar(token_env.clone()))?;
                return Ok(DatabaseProvider::Turso { url, auth_token });
            }
        }

        if self.database.url.is_empty() || self.database.url == ":memory:" {
            return Ok(DatabaseProvider::Memory);
        }

        #[cfg(feature = "local-db")]
        return Ok(DatabaseProvider::SQLite {
            path: self.database.url.clone(),
        });

        #[cfg(not(feature = "local-db"))]
        return Err(ConfigError::ValidationError(format!(
            "database.url '{}' needs the 'local-db' feature",
            self.database.url
        )));
    }

    /// Socket address string for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
