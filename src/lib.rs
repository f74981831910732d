//! Catalog-Harvester: a scheduled catalog scraper and its parser service
//!
//! The crawler side counts the catalog pages, collects item links from every
//! page concurrently, fetches every item detail page concurrently and ships the
//! resulting batch to the parser service in a single `Parse` call. The service
//! side normalizes, deduplicates and validates the batch and writes it out as
//! CSV and JSON.

pub mod config;
pub mod crawler;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod rpc;

use thiserror::Error;

/// Main error type for Catalog-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Record {row} has {found} fields, expected {expected}")]
    SchemaMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Record {row}: cannot convert {field} value {value:?}")]
    Coercion {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] pipeline::ValidationError),

    #[error("Parser service call failed ({code}): {detail}")]
    Transport { code: String, detail: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl HarvestError {
    /// Builds a parse error for the page at `url`
    pub fn parse(url: impl Into<String>, message: impl Into<String>) -> Self {
        HarvestError::Parse {
            url: url.into(),
            message: message.into(),
        }
    }
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

    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Result type alias for Catalog-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use pipeline::{process_batch, CleanTable};
pub use record::{CleanRecord, RawBatch, RawRecord};
