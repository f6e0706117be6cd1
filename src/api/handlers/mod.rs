//! API request handlers.

/// Account handlers (register, login, token introspection).
pub mod accounts;
