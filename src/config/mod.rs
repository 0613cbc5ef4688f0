//! Configuration module for ScrapKit
//!
//! Handles loading, parsing, and validating TOML configuration files. All
//! tables are optional; `Config::default()` is a fully usable configuration,
//! so a config file is only needed to override defaults.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DbConfig, FetchConfig, ProjectConfig, RetryConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::load_config;
