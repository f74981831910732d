//! Crawler coordinator - main crawl orchestration logic
//!
//! One crawl run:
//! 1. Count the catalog pages
//! 2. Collect item links from every page concurrently
//! 3. Fetch every item detail page concurrently
//! 4. Send the whole batch to the parser service in one call
//!
//! Any failure aborts the run; nothing is sent for a partial crawl.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, collect_links, count_pages, fetch_detail};
use crate::record::RawBatch;
use crate::rpc::ParserClient;
use crate::{HarvestError, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Outcome of a completed crawl run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub pages: u32,
    pub links: usize,
    pub records: usize,
    pub elapsed: Duration,
    /// Message returned by the parser service
    pub response: String,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    parser: ParserClient,
}

impl Coordinator {
    /// Creates a coordinator with its HTTP client and parser service stub
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = build_http_client(&config.source).map_err(|e| HarvestError::Fetch {
            url: config.source.catalog_url.clone(),
            message: format!("failed to build HTTP client: {}", e),
        })?;
        let parser = ParserClient::new(&config.rpc.endpoint())?;

        Ok(Self {
            config,
            client,
            parser,
        })
    }

    /// Runs one full crawl and ships the batch to the parser service
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        let start = Instant::now();
        tracing::info!("Started scraping.");

        let (pages, links, batch) = self.harvest().await?;

        let data = serde_json::to_string(&batch)?;
        tracing::debug!(
            "Sending {} records ({} bytes) to {}",
            batch.len(),
            data.len(),
            self.parser.parse_url()
        );
        let response = self.parser.parse(data).await?;

        let report = RunReport {
            started_at,
            pages,
            links,
            records: batch.len(),
            elapsed: start.elapsed(),
            response,
        };
        tracing::info!(
            "Finished. {} pages, {} records, response {}. Time: {:.2}s.",
            report.pages,
            report.records,
            report.response,
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }

    /// Crawls the catalog without calling the parser service
    ///
    /// Returns the page count, the number of links found and the batch in link order.
    pub async fn harvest(&self) -> Result<(u32, usize, RawBatch)> {
        let pages = count_pages(&self.client, &self.config.source).await?;
        tracing::info!("Catalog has {} pages", pages);

        let page_urls = (1..=pages)
            .map(|page| self.config.source.page_url(page))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let client = self.client.clone();
        let links: Vec<_> = fan_out(page_urls, move |url| collect_links(client.clone(), url))
            .await?
            .into_iter()
            .flatten()
            .collect();
        let link_count = links.len();
        tracing::info!("Collected {} item links", link_count);

        let client = self.client.clone();
        let batch = fan_out(links, move |url| fetch_detail(client.clone(), url)).await?;
        tracing::info!("Fetched {} item records", batch.len());

        Ok((pages, link_count, batch))
    }
}

/// Runs `task` on every input concurrently and returns results in input order
///
/// All tasks are spawned before any is awaited. Each result lands in the slot
/// of its input index, so completion order does not matter. The first error
/// (or panic) fails the whole call; dropping the set aborts the tasks still
/// in flight.
pub async fn fan_out<I, T, F, Fut>(inputs: Vec<I>, task: F) -> Result<Vec<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let mut slots: Vec<Option<T>> = (0..inputs.len()).map(|_| None).collect();
    let mut tasks = JoinSet::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let fut = task(input);
        tasks.spawn(async move { (index, fut.await) });
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        slots[index] = Some(result?);
    }

    Ok(slots.into_iter().flatten().collect())
}

/// Runs a single crawl with a freshly built coordinator
///
/// # Example
///
/// ```no_run
/// use catalog_harvester::config::load_config_from_env;
/// use catalog_harvester::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config_from_env()?;
/// let report = run_crawl(config).await?;
/// println!("{} records sent", report.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<RunReport> {
    let coordinator = Coordinator::new(Arc::new(config))?;
    coordinator.run().await
}
