use crate::config::types::{Config, DbConfig, FetchConfig, ProjectConfig, RetryConfig};
use crate::project::sanitize;
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if let Some(project) = &config.project {
        validate_project_config(project)?;
    }
    validate_fetch_config(&config.fetch)?;
    validate_retry_config(&config.retry)?;
    validate_db_config(&config.db)?;
    Ok(())
}

/// Validates project configuration
fn validate_project_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "project name cannot be empty".to_string(),
        ));
    }

    // The name must survive filename sanitization, or scaffolding will fail
    if sanitize(&config.name).is_empty() {
        return Err(ConfigError::Validation(format!(
            "project name '{}' contains no usable characters",
            config.name
        )));
    }

    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 || config.connect_timeout_secs > config.timeout_secs {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be between 1 and timeout-secs ({}), got {}",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 20 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 20, got {}",
            config.max_attempts
        )));
    }

    if config.max_delay_secs < config.base_delay_secs {
        return Err(ConfigError::Validation(format!(
            "max-delay-secs ({}) must be >= base-delay-secs ({})",
            config.max_delay_secs, config.base_delay_secs
        )));
    }

    Ok(())
}

/// Validates database tooling configuration
fn validate_db_config(config: &DbConfig) -> Result<(), ConfigError> {
    if config.supabase_cli.trim().is_empty() {
        return Err(ConfigError::Validation(
            "supabase-cli cannot be empty".to_string(),
        ));
    }

    if config.psql_cli.trim().is_empty() {
        return Err(ConfigError::Validation(
            "psql-cli cannot be empty".to_string(),
        ));
    }

    if config.backup_interval_mins < 1 {
        return Err(ConfigError::Validation(format!(
            "backup-interval-mins must be >= 1, got {}",
            config.backup_interval_mins
        )));
    }

    Ok(())
}
