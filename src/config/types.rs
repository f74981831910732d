use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Placeholder substituted with the 1-based page index in the catalog URL
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Main configuration structure for Catalog-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    pub rpc: RpcConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Catalog site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Catalog page URL with a `{page}` placeholder for the page index
    #[serde(rename = "catalog-url", default = "default_catalog_url")]
    pub catalog_url: String,

    /// User agent sent with every catalog request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout for catalog requests (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl SourceConfig {
    /// Builds the URL of the catalog page with the given 1-based index
    pub fn page_url(&self, page: u32) -> Result<Url, url::ParseError> {
        Url::parse(&self.catalog_url.replace(PAGE_PLACEHOLDER, &page.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Location of the parser service
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_host")]
    pub host: String,

    pub port: u16,
}

impl RpcConfig {
    /// Base URL the crawler uses to reach the parser service
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Crawl trigger configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes between two crawl runs (fractions allowed)
    #[serde(rename = "interval-minutes", default = "default_interval_minutes")]
    pub interval_minutes: f64,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval_minutes * 60.0)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
        }
    }
}

/// Parser service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the service binds to; the port comes from `[rpc]`
    #[serde(rename = "bind-host", default = "default_bind_host")]
    pub bind_host: String,

    /// Maximum number of `Parse` calls processed at the same time
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: default_bind_host(),
            max_workers: default_max_workers(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV table
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,

    /// Path to the JSON records file
    #[serde(rename = "json-path", default = "default_json_path")]
    pub json_path: String,
}

impl OutputConfig {
    /// Places both output files under `dir` with their default file names
    pub fn in_dir(dir: &str) -> Self {
        let dir = dir.trim_end_matches('/');
        Self {
            csv_path: format!("{}/books-data.csv", dir),
            json_path: format!("{}/books-data.json", dir),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            json_path: default_json_path(),
        }
    }
}

fn default_catalog_url() -> String {
    "https://books.toscrape.com/catalogue/page-{page}.html".to_string()
}

fn default_user_agent() -> String {
    format!("catalog-harvester/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_interval_minutes() -> f64 {
    1.0
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_max_workers() -> usize {
    10
}

fn default_csv_path() -> String {
    "data/books-data.csv".to_string()
}

fn default_json_path() -> String {
    "data/books-data.json".to_string()
}
