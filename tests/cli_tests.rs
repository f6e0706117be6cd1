//! CLI Integration Tests for todolist-server
//!
//! Runs the built binary for the init, secret and config commands.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to run todolist-server with arguments
fn run_server(args: &[&str], working_dir: &std::path::Path, envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_todolist-server"));
    cmd.args(args).arg("--no-color").current_dir(working_dir);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute command")
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_server(&["--help"], temp_dir.path(), &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("init"));
    assert!(stdout.contains("secret"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_version_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_server(&["--version"], temp_dir.path(), &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("todolist-server"));
}

// =============================================================================
// Init Command Tests
// =============================================================================

#[test]
fn test_init_creates_files() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_server(&["init", "--port", "4000"], temp_dir.path(), &[]);

    assert!(output.status.success());
    let toml = fs::read_to_string(temp_dir.path().join("todolist.toml")).expect("todolist.toml");
    assert!(toml.contains("port = 4000"));
    assert!(temp_dir.path().join(".env.example").exists());
    assert!(temp_dir.path().join(".gitignore").exists());
}

#[test]
fn test_init_keeps_existing_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("todolist.toml");
    fs::write(&config_path, "# hand written\n").expect("write");

    let output = run_server(&["init"], temp_dir.path(), &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("already exists"));
    assert_eq!(
        fs::read_to_string(&config_path).expect("read"),
        "# hand written\n"
    );
}

// =============================================================================
// Secret Command Tests
// =============================================================================

#[test]
fn test_secret_prints_hex() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_server(&["secret"], temp_dir.path(), &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let secret = stdout.trim();
    assert_eq!(secret.len(), 128);
    assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_validate_with_secret() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    run_server(&["init"], temp_dir.path(), &[]);

    let output = run_server(
        &["config", "--validate"],
        temp_dir.path(),
        &[(
            "TODOLIST_TOKEN_SECRET",
            "cli-test-secret-key-that-is-at-least-32-chars",
        )],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
}

#[test]
fn test_config_validate_rejects_short_secret() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    run_server(&["init"], temp_dir.path(), &[]);

    let output = run_server(
        &["config", "--validate"],
        temp_dir.path(),
        &[("TODOLIST_TOKEN_SECRET", "short")],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("TODOLIST_TOKEN_SECRET"));
}

#[test]
fn test_serve_without_config_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_server(&[], temp_dir.path(), &[]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("todolist-server init"));
}
