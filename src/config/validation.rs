use crate::config::types::{
    Config, OutputConfig, RpcConfig, ScheduleConfig, ServerConfig, SourceConfig, PAGE_PLACEHOLDER,
};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_source_config(&config.source)?;
    validate_rpc_config(&config.rpc)?;
    validate_schedule_config(&config.schedule)?;
    validate_server_config(&config.server)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates catalog source configuration
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    if !config.catalog_url.contains(PAGE_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "catalog_url must contain the {} placeholder, got '{}'",
            PAGE_PLACEHOLDER, config.catalog_url
        )));
    }

    let url = config
        .page_url(1)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid catalog_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "catalog_url must use HTTP or HTTPS, got '{}'",
            url.scheme()
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates parser service location
fn validate_rpc_config(config: &RpcConfig) -> Result<(), ConfigError> {
    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation("rpc host cannot be empty".to_string()));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation("rpc port must be non-zero".to_string()));
    }

    Ok(())
}

/// Longest accepted interval between runs: one year
const MAX_INTERVAL_MINUTES: f64 = 525_600.0;

fn validate_schedule_config(config: &ScheduleConfig) -> Result<(), ConfigError> {
    if !config.interval_minutes.is_finite() || config.interval_minutes <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "interval_minutes must be a positive number, got {}",
            config.interval_minutes
        )));
    }

    if config.interval_minutes > MAX_INTERVAL_MINUTES {
        return Err(ConfigError::Validation(format!(
            "interval_minutes must be at most {}, got {}",
            MAX_INTERVAL_MINUTES, config.interval_minutes
        )));
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > 256 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and 256, got {}",
            config.max_workers
        )));
    }

    if config.bind_host.trim().is_empty() {
        return Err(ConfigError::Validation(
            "bind_host cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation("csv_path cannot be empty".to_string()));
    }

    if config.json_path.is_empty() {
        return Err(ConfigError::Validation(
            "json_path cannot be empty".to_string(),
        ));
    }

    if config.csv_path == config.json_path {
        return Err(ConfigError::Validation(
            "csv_path and json_path must differ".to_string(),
        ));
    }

    Ok(())
}
