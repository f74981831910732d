//! Configuration module for Catalog-Harvester
//!
//! Configuration comes either from a TOML file or from environment variables.
//! Both sources are validated the same way before a [`Config`] is handed out.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvester::config::load_config_from_env;
//!
//! let config = load_config_from_env().unwrap();
//! println!("Crawling every {} minutes", config.schedule.interval_minutes);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, RpcConfig, ScheduleConfig, ServerConfig, SourceConfig, PAGE_PLACEHOLDER,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, config_from_lookup, load_config, load_config_from_env,
    load_config_with_hash, ENV_CATALOG_URL, ENV_INTERVAL_MINUTES, ENV_MAX_WORKERS,
    ENV_OUTPUT_DIR, ENV_PARSER_HOST, ENV_PARSER_PORT,
};
pub use validation::validate;
