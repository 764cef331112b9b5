//! Shared types for CLI commands.

use serde::Serialize;
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::services::CatalogStore;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input was invalid or checks failed
    Validation = 1,
    /// File system, network or environment failure
    Io = 2,
}

impl ExitCode {
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Category of a CLI failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Io,
}

/// Error returned by command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CliError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: message.into(),
        }
    }

    /// Exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self.kind {
            ErrorKind::Validation => ExitCode::Validation,
            ErrorKind::Io => ExitCode::Io,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type of command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Global options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit config file (`--config`)
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

impl GlobalOptions {
    /// Loads the resolved configuration.
    pub fn load_config(&self) -> CliResult<Config> {
        Config::load(self.config.as_deref())
            .map_err(|e| CliError::io(format!("Failed to load configuration: {e:#}")))
    }
}

/// Catalog store for the configured paths.
#[must_use]
pub fn store(config: &Config) -> CatalogStore {
    CatalogStore::from_paths(&config.paths)
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Maps a library error to an I/O failure with context.
pub fn io_error(context: &str) -> impl FnOnce(anyhow::Error) -> CliError + '_ {
    move |e| CliError::io(format!("{context}: {e:#}"))
}

/// Fails with an I/O error when a required file is missing.
pub fn require_file(path: &Path, what: &str) -> CliResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::io(format!("{what} not found: {}", path.display())))
    }
}

/// Asks a yes/no question on stdin; end of input counts as no.
pub fn confirm(question: &str) -> CliResult<bool> {
    print!("{question} (y/n): ");
    io::stdout()
        .flush()
        .map_err(|e| CliError::io(format!("Failed to write output: {e}")))?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CliError::io(format!("Failed to read input: {e}")))?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Creates the tokio runtime for network commands.
pub fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io(format!("Failed to start async runtime: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(CliError::validation("x").exit_code().code(), 1);
        assert_eq!(CliError::io("x").exit_code().code(), 2);
    }

    #[test]
    fn test_io_error_context() {
        let err = io_error("Failed to load")(anyhow::anyhow!("boom"));
        assert_eq!(err.kind, ErrorKind::Io);
        assert_eq!(err.to_string(), "Failed to load: boom");
    }
}
