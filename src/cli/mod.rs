//! CLI module for todolist-server
//!
//! Provides command-line interface parsing and handling for the todolist-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ToDoList accounts server
///
/// Registration, login and bearer token issuance for the ToDoList API.
#[derive(Parser, Debug)]
#[command(
    name = "todolist-server",
    version,
    about = "ToDoList accounts server",
    long_about = "Registration, login and signed bearer token issuance for the ToDoList API.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a configuration.",
    after_help = "EXAMPLES:\n    \
                  todolist-server init                  # Scaffold todolist.toml and .env.example\n    \
                  todolist-server secret                # Print a fresh token signing secret\n    \
                  todolist-server config --validate     # Check the configuration\n    \
                  todolist-server                       # Start the server (requires todolist.toml)\n    \
                  todolist-server --config my.toml      # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "todolist.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a starter todolist.toml, .env.example and .gitignore
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Print a freshly generated token signing secret
    Secret,

    /// Show configuration information
    Config {
        /// Validate the configuration file (including referenced env vars)
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
