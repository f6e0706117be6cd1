//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # API Endpoints
//!
//! ## Accounts (`/accounts`)
//! - `POST /accounts/register` - Create an account and receive a token
//! - `POST /accounts/login` - Exchange email and password for a token
//! - `GET /accounts/me` - Claims of the presented token (auth required)
//!
//! ## Health
//! - `GET /health` - Health check endpoint
//!
//! # Authentication
//!
//! Protected endpoints require a token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! The OpenAPI document is served at `/openapi.json`. When the `swagger-ui`
//! feature is enabled, interactive documentation is available at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
