//! HTTP fetching for catalog and item pages
//!
//! This module handles all catalog-site requests, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests with status classification
//! - The three crawl operations: page count, link collection, detail fetch

use crate::config::SourceConfig;
use crate::crawler::parser::{parse_item_detail, parse_item_links, parse_page_count};
use crate::record::RawRecord;
use crate::{HarvestError, Result};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use catalog_harvester::config::SourceConfig;
/// use catalog_harvester::crawler::build_http_client;
///
/// let client = build_http_client(&SourceConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &SourceConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// Network failures and non-success statuses become [`HarvestError::Fetch`].
/// There is no retry: the caller decides what a failure means for the run.
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| HarvestError::Fetch {
            url: url.to_string(),
            message: classify_request_error(&e),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Fetch {
            url: url.to_string(),
            message: format!("HTTP {}", status.as_u16()),
        });
    }

    response.text().await.map_err(|e| HarvestError::Fetch {
        url: url.to_string(),
        message: format!("failed to read body: {}", e),
    })
}

fn classify_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    }
}

/// Fetches the first catalog page and returns the total number of pages
pub async fn count_pages(client: &Client, source: &SourceConfig) -> Result<u32> {
    let first_page = source.page_url(1)?;
    let body = fetch_page(client, &first_page).await?;
    parse_page_count(&body, first_page.as_str())
}

/// Fetches a catalog page and returns its item links in document order
pub async fn collect_links(client: Client, page_url: Url) -> Result<Vec<Url>> {
    let body = fetch_page(&client, &page_url).await?;
    let links = parse_item_links(&body, &page_url)?;
    tracing::debug!("{} item links on {}", links.len(), page_url);
    Ok(links)
}

/// Fetches an item detail page and returns its raw record
pub async fn fetch_detail(client: Client, item_url: Url) -> Result<RawRecord> {
    let body = fetch_page(&client, &item_url).await?;
    parse_item_detail(&body, item_url.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer) -> SourceConfig {
        SourceConfig {
            catalog_url: format!("{}/catalogue/page-{{page}}.html", server.uri()),
            user_agent: "TestHarvester/1.0".to_string(),
            request_timeout_secs: 5,
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&SourceConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_count_pages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalogue/page-1.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><ul class="pager"><li class="current">Page 1 of 3</li></ul></body></html>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server);
        let client = build_http_client(&source).unwrap();
        assert_eq!(count_pages(&client, &source).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = source_for(&server);
        let client = build_http_client(&source).unwrap();
        let err = count_pages(&client, &source).await.unwrap_err();

        match err {
            HarvestError::Fetch { message, .. } => assert_eq!(message, "HTTP 503"),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_fetch_error() {
        let source = SourceConfig {
            catalog_url: "http://127.0.0.1:1/page-{page}.html".to_string(),
            ..SourceConfig::default()
        };
        let client = build_http_client(&source).unwrap();
        let err = count_pages(&client, &source).await.unwrap_err();
        assert!(matches!(err, HarvestError::Fetch { .. }));
    }

    #[tokio::test]
    async fn test_collect_links_and_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/catalogue/page-2.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><h3><a href="item_9/index.html">Nine</a></h3></body></html>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/catalogue/item_9/index.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><h1>Nine</h1><table class="table table-striped">
                   <tr><th>UPC</th><td>999</td></tr></table></body></html>"#,
            ))
            .mount(&server)
            .await;

        let source = source_for(&server);
        let client = build_http_client(&source).unwrap();

        let links = collect_links(client.clone(), source.page_url(2).unwrap())
            .await
            .unwrap();
        assert_eq!(links.len(), 1);

        let record = fetch_detail(client, links[0].clone()).await.unwrap();
        assert_eq!(record.get("Name"), Some("Nine"));
        assert_eq!(record.get("UPC"), Some("999"));
    }
}
