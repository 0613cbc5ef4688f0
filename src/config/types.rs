use serde::Deserialize;
use std::time::Duration;

/// User agent string sent when no override is configured
pub const DEFAULT_USER_AGENT: &str = concat!("scrapkit/", env!("CARGO_PKG_VERSION"));

/// Main configuration structure for ScrapKit
///
/// Every table is optional; omitted tables fall back to their defaults, so an
/// empty file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: Option<ProjectConfig>,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub db: DbConfig,
}

/// Project scaffolding configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Project name; directories are derived from its sanitized form
    pub name: String,

    /// Parent directory for the project root; defaults to the current directory
    #[serde(rename = "parent-dir")]
    pub parent_dir: Option<String>,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Default per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Retry behavior for `fetch_with_retry`
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in seconds
    #[serde(rename = "base-delay-secs", default = "default_base_delay_secs")]
    pub base_delay_secs: u64,

    /// Whether the delay doubles on each attempt
    #[serde(rename = "exponential-backoff", default)]
    pub exponential_backoff: bool,

    /// Upper bound on the delay in seconds
    #[serde(rename = "max-delay-secs", default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

/// Local database tooling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    /// Name of the Supabase CLI binary
    #[serde(rename = "supabase-cli", default = "default_supabase_cli")]
    pub supabase_cli: String,

    /// Name of the psql binary
    #[serde(rename = "psql-cli", default = "default_psql_cli")]
    pub psql_cli: String,

    /// Minutes between periodic backups
    #[serde(rename = "backup-interval-mins", default = "default_backup_interval_mins")]
    pub backup_interval_mins: u64,
}

impl FetchConfig {
    /// Default per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout as a [`Duration`]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl DbConfig {
    /// Backup interval as a [`Duration`]
    pub fn backup_interval(&self) -> Duration {
        Duration::from_secs(self.backup_interval_mins * 60)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_secs: default_base_delay_secs(),
            exponential_backoff: false,
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            supabase_cli: default_supabase_cli(),
            psql_cli: default_psql_cli(),
            backup_interval_mins: default_backup_interval_mins(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    45
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_secs() -> u64 {
    5
}

fn default_max_delay_secs() -> u64 {
    60
}

fn default_supabase_cli() -> String {
    "supabase".to_string()
}

fn default_psql_cli() -> String {
    "psql".to_string()
}

fn default_backup_interval_mins() -> u64 {
    60
}
