//! Account authentication
//!
//! This module provides registration, login and bearer token handling for the
//! ToDoList API.
//!
//! # Module Structure
//!
//! - [`auth::service`](crate::auth::service) - register/login control flow
//! - [`auth::token`](crate::auth::token) - HS512 JWT issuance and verification
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and password rules
//! - [`auth::validation`](crate::auth::validation) - request format checks
//! - [`auth::middleware`](crate::auth::middleware) - Axum layer and extractor for protected routes
//!
//! # Tokens
//!
//! Tokens carry a single `username` claim plus `exp` and are valid for two
//! hours by default. They are stateless; there is no revocation, so logging
//! out is done client-side by discarding the token.
//!
//! ```ignore
//! use todolist::auth::token::{SigningKey, TokenIssuer};
//!
//! let key = SigningKey::from_secret(&secret)?;
//! let issuer = TokenIssuer::with_default_lifetime(&key);
//! let token = issuer.issue("a@x.com")?;
//! ```
//!
//! # Configuration
//!
//! Configure via `todolist.toml`:
//! ```toml
//! [auth]
//! token_secret_env = "TODOLIST_TOKEN_SECRET"  # env var holding the secret (>= 32 bytes)
//! token_lifetime_secs = 7200
//! ```

/// Axum middleware and extractors for protected routes.
pub mod middleware;
/// Argon2id password hashing and password rules.
pub mod password;
/// Register and login orchestration.
pub mod service;
/// Signing key and JWT issuance.
pub mod token;
/// Credential format validation.
pub mod validation;

pub use service::AuthService;
pub use token::{SigningKey, Token, TokenIssuer};
