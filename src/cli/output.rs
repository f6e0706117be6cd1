//! Terminal output for the todolist-server CLI
//!
//! Every line is rendered to a `String` first and printed second, so the
//! plain rendering used with `--no-color` can be asserted on directly.

use owo_colors::OwoColorize;

/// Kind of status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Info,
    Warn,
    Error,
    /// A file or directory written by `init`
    Wrote,
    /// An existing file `init` left alone
    Kept,
}

impl Status {
    fn tag(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Info => "INFO",
            Status::Warn => "WARN",
            Status::Error => "ERROR",
            Status::Wrote => "WROTE",
            Status::Kept => "KEPT",
        }
    }
}

/// CLI printer. Errors go to stderr, everything else to stdout.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    colored: bool,
}

impl Output {
    pub fn new() -> Self {
        Self { colored: true }
    }

    pub fn no_color() -> Self {
        Self { colored: false }
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn banner_line(&self) -> String {
        let version = format!("v{}", env!("CARGO_PKG_VERSION"));
        if self.colored {
            format!(
                "\n   {} {}\n",
                "ToDoList accounts server".bright_white().bold(),
                version.dimmed()
            )
        } else {
            format!("\n   ToDoList accounts server {}\n", version)
        }
    }

    pub fn status_line(&self, status: Status, message: &str) -> String {
        if !self.colored {
            return format!("  [{}] {}", status.tag(), message);
        }
        match status {
            Status::Ok | Status::Wrote => {
                format!("  {} {}", "✓".green().bold(), message.green())
            }
            Status::Info => format!("  {} {}", "•".blue(), message),
            Status::Warn => format!("  {} {}", "⚠".yellow().bold(), message.yellow()),
            Status::Error => format!("  {} {}", "✗".red().bold(), message.red()),
            Status::Kept => format!("  {} {}", "○".yellow(), message.dimmed()),
        }
    }

    pub fn header_line(&self, title: &str) -> String {
        if self.colored {
            format!("\n  {}", title.bright_white().bold().underline())
        } else {
            format!("\n  === {} ===", title)
        }
    }

    pub fn kv_line(&self, key: &str, value: &str) -> String {
        if self.colored {
            format!("    {}: {}", key.dimmed(), value.bright_white())
        } else {
            format!("    {}: {}", key, value)
        }
    }

    pub fn hint_line(&self, message: &str) -> String {
        if self.colored {
            format!("  {} {}", "›".dimmed(), message.dimmed().italic())
        } else {
            format!("  [TIP] {}", message)
        }
    }

    pub fn status(&self, status: Status, message: &str) {
        let line = self.status_line(status, message);
        if status == Status::Error {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    pub fn success(&self, message: &str) {
        self.status(Status::Ok, message);
    }

    pub fn warning(&self, message: &str) {
        self.status(Status::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.status(Status::Error, message);
    }

    pub fn banner(&self) {
        println!("{}", self.banner_line());
    }

    pub fn header(&self, title: &str) {
        println!("{}", self.header_line(title));
    }

    pub fn kv(&self, key: &str, value: &str) {
        println!("{}", self.kv_line(key, value));
    }

    pub fn hint(&self, message: &str) {
        println!("{}", self.hint_line(message));
    }

    pub fn newline(&self) {
        println!();
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
