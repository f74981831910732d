use crate::config::types::{Config, OutputConfig, RpcConfig, ScheduleConfig, ServerConfig, SourceConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::str::FromStr;

/// Parser service host (optional, defaults to 127.0.0.1)
pub const ENV_PARSER_HOST: &str = "PARSER_HOST";
/// Parser service port (required)
pub const ENV_PARSER_PORT: &str = "PARSER_PORT";
/// Minutes between crawl runs (optional, defaults to 1)
pub const ENV_INTERVAL_MINUTES: &str = "INTERVAL_MINUTES";
/// Concurrent `Parse` calls the service accepts (optional, defaults to 10)
pub const ENV_MAX_WORKERS: &str = "PARSER_MAX_WORKERS";
/// Directory holding the CSV and JSON output (optional, defaults to `data`)
pub const ENV_OUTPUT_DIR: &str = "OUTPUT_DIR";
/// Catalog URL template (optional)
pub const ENV_CATALOG_URL: &str = "CATALOG_URL";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_harvester::config::load_config;
///
/// let config = load_config(Path::new("harvester.toml")).unwrap();
/// println!("Parser service: {}", config.rpc.endpoint());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs can be tied back to the exact file they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Builds the configuration from process environment variables
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    config_from_lookup(|name| std::env::var(name).ok())
}

/// Builds the configuration from a variable lookup function
///
/// Only `PARSER_PORT` is required; every other setting falls back to its default.
pub fn config_from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let port_raw = lookup(ENV_PARSER_PORT).ok_or(ConfigError::MissingEnv(ENV_PARSER_PORT))?;
    let port = parse_env(ENV_PARSER_PORT, &port_raw)?;

    let mut rpc = RpcConfig {
        host: "127.0.0.1".to_string(),
        port,
    };
    if let Some(host) = lookup(ENV_PARSER_HOST) {
        rpc.host = host;
    }

    let mut schedule = ScheduleConfig::default();
    if let Some(raw) = lookup(ENV_INTERVAL_MINUTES) {
        schedule.interval_minutes = parse_env(ENV_INTERVAL_MINUTES, &raw)?;
    }

    let mut server = ServerConfig::default();
    if let Some(raw) = lookup(ENV_MAX_WORKERS) {
        server.max_workers = parse_env(ENV_MAX_WORKERS, &raw)?;
    }

    let output = match lookup(ENV_OUTPUT_DIR) {
        Some(dir) => OutputConfig::in_dir(&dir),
        None => OutputConfig::default(),
    };

    let mut source = SourceConfig::default();
    if let Some(url) = lookup(ENV_CATALOG_URL) {
        source.catalog_url = url;
    }

    let config = Config {
        source,
        rpc,
        schedule,
        server,
        output,
    };
    validate(&config)?;
    Ok(config)
}

fn parse_env<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: raw.to_string(),
    })
}
