//! Identity stores.
//!
//! This module provides the account system of record behind the accounts API:
//! - **Memory**: map-backed store for tests and throwaway runs
//! - **Turso/SQLite**: libsql-backed store, local file or remote Turso
//!
//! Enable backends via Cargo features:
//! ```toml
//! todolist-server = { version = "*", features = ["local-db", "turso"] }
//! ```

pub mod memory;
pub mod traits;
pub mod turso;

// Re-exports
pub use memory::MemoryIdentityStore;
pub use traits::{
    Account, Credentials, DatabaseProvider, IdentityStore, StoreError, StoreResult,
};
pub use turso::TursoClient;
