//! ScrapKit: convenience helpers for building web scrapers
//!
//! This crate bundles the small utilities that every scraping project ends up
//! rewriting: per-project directory scaffolding with a bound log file, a
//! rate-limit-aware HTTP fetcher (async and blocking), retry and burst-probe
//! helpers, NDJSON/temp-file writers, and thin wrappers around a local
//! Supabase/Postgres developer stack.

pub mod config;
pub mod db;
pub mod fetch;
pub mod output;
pub mod project;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for ScrapKit operations
#[derive(Debug, Error)]
pub enum ScrapkitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Database tooling error: {0}")]
    Db(#[from] DbError),
}

/// Errors raised while creating project directories or writing files
#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Project name {0:?} is empty after sanitization")]
    InvalidName(String),

    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the HTTP fetcher
///
/// HTTP-level error statuses (4xx/5xx) are NOT errors here; any received
/// response is a [`fetch::FetchResult`]. Only a malformed URL or a failure to
/// obtain a response at all is a `FetchError`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {0:?}")]
    InvalidUrl(String),

    #[error("Transport error for {url}: {cause}")]
    Transport { url: String, cause: TransportCause },
}

/// Network-layer failure classification
#[derive(Debug, Error)]
pub enum TransportCause {
    #[error("timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by the local database tooling
#[derive(Debug, Error)]
pub enum DbError {
    #[error("'{tool}' not found on PATH. {hint}")]
    CliMissing { tool: String, hint: String },

    #[error("'{tool}' timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    #[error("Command exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("No database URL available; start the instance first")]
    MissingDbUrl,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ScrapKit operations
pub type Result<T> = std::result::Result<T, ScrapkitError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for scaffolding and file-writing operations
pub type FsResult<T> = std::result::Result<T, FilesystemError>;

/// Result type alias for database tooling operations
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Renders an error as a single log-friendly line, newlines stripped.
///
/// Multi-line CLI stderr and HTML error bodies otherwise shred log output.
pub fn format_error(error: &dyn std::fmt::Display) -> String {
    error
        .to_string()
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

// Re-export commonly used types
pub use config::Config;
pub use fetch::{FetchResult, Fetcher, Method, RequestOptions, RetryPolicy};
pub use project::{ProjectScaffold, Stopwatch};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_strips_newlines() {
        let error = std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied\nby policy\r\nhere",
        );
        let formatted = format_error(&error);
        assert!(!formatted.contains('\n'));
        assert!(!formatted.contains('\r'));
        assert!(formatted.contains("denied"));
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Transport {
            url: "https://example.com/".to_string(),
            cause: TransportCause::Timeout,
        };
        assert_eq!(
            err.to_string(),
            "Transport error for https://example.com/: timeout"
        );
    }
}
