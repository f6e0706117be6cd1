//! # todolist-server
//!
//! Accounts service for the ToDoList application: registration, credential
//! verification and issuance of signed bearer tokens.
//!
//! ## Overview
//!
//! The crate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `todolist-server` binary
//! 2. **As a library** - Mount the accounts router in your own Axum app
//!
//! ### Library Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use todolist::{
//!     auth::{AuthService, SigningKey, TokenIssuer},
//!     db::{Credentials, MemoryIdentityStore},
//!     AppState,
//! };
//!
//! let key = SigningKey::from_secret(&std::env::var("TODOLIST_TOKEN_SECRET")?)?;
//! let issuer = Arc::new(TokenIssuer::with_default_lifetime(&key));
//! let store = Arc::new(MemoryIdentityStore::new(Credentials::default()));
//! let state = AppState::new(store, issuer);
//!
//! let app = todolist::api::routes::create_router(state);
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - register/login flow, tokens, password hashing
//! - [`db`] - identity stores (in-memory, SQLite, Turso)
//! - [`types`] - request/response types and error handling
//! - [`utils`] - configuration and logging setup
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-db` | Local SQLite identity store (default) |
//! | `turso` | Remote Turso identity store |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui` |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication: accounts service, tokens, passwords.
pub mod auth;
/// Identity store implementations.
pub mod db;
/// CLI argument parsing and commands.
pub mod cli;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration and logging utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::{AuthService, SigningKey, TokenIssuer};
pub use db::IdentityStore;
pub use types::{AppError, Result};
pub use utils::toml_config::{AppConfig, ConfigError};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Register/login orchestration
    pub auth_service: Arc<AuthService>,
    /// Token issuer, also used by the auth middleware
    pub token_issuer: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(store: Arc<dyn IdentityStore>, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(store, token_issuer.clone())),
            token_issuer,
        }
    }
}
