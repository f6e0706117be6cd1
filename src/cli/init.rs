//! Init command implementation
//!
//! Scaffolds a todolist-server deployment: `todolist.toml`, `.env.example`
//! and a `.gitignore` that keeps the secrets file and database out of git.

use super::output::{Output, Status};
use crate::auth::token::generate_secret;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (todolist.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing todolist-server");

    let base_path = &config.path;

    let config_path = base_path.join("todolist.toml");
    if config_path.exists() && !config.force {
        output.warning("todolist.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if let Err(e) = fs::create_dir_all(base_path.join("data")) {
        output.error(&format!("Failed to create data directory: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.status(Status::Wrote, "data/");

    if let Err(e) = write_file(&config_path, &generate_todolist_toml(&config), config.force) {
        output.error(&format!("Failed to create todolist.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.status(Status::Wrote, "todolist.toml");

    let env_example_path = base_path.join(".env.example");
    if let Err(e) = write_file(&env_example_path, &generate_env_example(), config.force) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.status(Status::Wrote, ".env.example");

    let gitignore_path = base_path.join(".gitignore");
    if gitignore_path.exists() {
        output.status(Status::Kept, ".gitignore (already exists)");
    } else if let Err(e) = write_file(&gitignore_path, &generate_gitignore(), false) {
        output.warning(&format!("Failed to create .gitignore: {}", e));
    } else {
        output.status(Status::Wrote, ".gitignore");
    }

    output.newline();
    output.success("todolist-server initialized");

    output.header("Next Steps");
    output.status(Status::Info, "1. cp .env.example .env");
    output.status(Status::Info, "2. todolist-server config --validate");
    output.status(Status::Info, "3. todolist-server");
    output.newline();

    output.hint(&format!(
        "Server will be available at http://{}:{}",
        config.host, config.port
    ));
    output.hint("API docs available at /swagger-ui/ (requires 'swagger-ui' feature)");

    InitResult::Success
}

fn write_file(path: &Path, content: &str, force: bool) -> std::io::Result<()> {
    if path.exists() && !force {
        return Ok(()); // Skip existing files unless force is true
    }
    fs::write(path, content)
}

fn generate_todolist_toml(config: &InitConfig) -> String {
    format!(
        r#"# todolist-server configuration
# Secrets are never stored here; values ending in _env name environment variables.

[server]
host = "{host}"
port = {port}
log_level = "info"
# "pretty" for development, "json" for log shippers
log_format = "pretty"
body_limit_bytes = 65536

[auth]
# Env var holding the token signing secret (at least 32 bytes)
token_secret_env = "TODOLIST_TOKEN_SECRET"
token_lifetime_secs = 7200

[database]
# Local SQLite file, or ":memory:" for a throwaway store
url = "./data/todolist.db"
# Remote Turso (requires the 'turso' feature)
# turso_url_env = "TURSO_URL"
# turso_token_env = "TURSO_AUTH_TOKEN"

[accounts.password]
min_length = 4
require_digit = true
require_lowercase = true
require_uppercase = true
require_non_alphanumeric = true

[accounts.hashing]
memory_kib = 19456
iterations = 2
parallelism = 1
"#,
        host = config.host,
        port = config.port,
    )
}

fn generate_env_example() -> String {
    format!(
        r#"# todolist-server environment variables
# Copy this file to .env and replace the values.

# REQUIRED: token signing secret (at least 32 bytes)
# Generate with: todolist-server secret
TODOLIST_TOKEN_SECRET={secret}

# Optional: log filter override (trace, debug, info, warn, error)
RUST_LOG=info,todolist=debug

# Optional: Turso cloud database
# TURSO_URL=libsql://your-db.turso.io
# TURSO_AUTH_TOKEN=your-token
"#,
        secret = generate_secret()
    )
}

fn generate_gitignore() -> String {
    r#"# todolist-server generated files
/data/
*.db
*.db-journal

# Environment
.env
.env.local
.env.*.local

# Rust
/target/

# OS
.DS_Store
Thumbs.db
"#
    .to_string()
}
