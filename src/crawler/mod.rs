//! Crawler module for catalog harvesting
//!
//! This module contains the crawl side of the system, including:
//! - HTTP fetching of catalog and item pages
//! - HTML extraction of page counts, item links and item records
//! - Concurrent fan-out and ordered aggregation of a crawl run
//! - Interval scheduling of runs

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{fan_out, run_crawl, Coordinator, RunReport};
pub use fetcher::{build_http_client, collect_links, count_pages, fetch_detail, fetch_page};
pub use parser::{parse_item_detail, parse_item_links, parse_page_count, parse_pagination_text};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::Result;
use std::sync::Arc;

/// Runs crawls on the configured interval until the process is stopped
///
/// Only setup errors are returned; failures of individual runs are logged.
pub async fn run_scheduled(config: Config) -> Result<()> {
    let interval = config.schedule.interval();
    let coordinator = Coordinator::new(Arc::new(config))?;
    Scheduler::new(coordinator, interval).run_forever().await;
    Ok(())
}
