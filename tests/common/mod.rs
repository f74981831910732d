//! Mock catalog site shared by the integration tests

#![allow(dead_code)]

use catalog_harvester::config::{
    Config, OutputConfig, RpcConfig, ScheduleConfig, ServerConfig, SourceConfig,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One item of the mock catalog
pub struct Item {
    pub slug: String,
    pub name: String,
    pub upc: String,
    pub product_type: String,
}

impl Item {
    pub fn book(slug: &str, name: &str, upc: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            upc: upc.to_string(),
            product_type: "Books".to_string(),
        }
    }
}

pub fn catalog_page_html(page: usize, pages: usize, items: &[Item]) -> String {
    let links: String = items
        .iter()
        .map(|item| {
            format!(
                r#"<li><article class="product_pod"><h3><a href="{}/index.html" title="{}">{}</a></h3></article></li>"#,
                item.slug, item.name, item.name
            )
        })
        .collect();

    format!(
        r#"<html><body><ol class="row">{}</ol>
        <ul class="pager"><li class="current">
            Page {} of {}
        </li></ul></body></html>"#,
        links, page, pages
    )
}

pub fn detail_page_html(item: &Item) -> String {
    format!(
        r#"<html><body><div class="product_main"><h1>{}</h1></div>
        <table class="table table-striped">
          <tr><th>UPC</th><td>{}</td></tr>
          <tr><th>Product Type</th><td>{}</td></tr>
          <tr><th>Price (excl. tax)</th><td>£10.00</td></tr>
          <tr><th>Price (incl. tax)</th><td>£12.00</td></tr>
          <tr><th>Tax</th><td>£2.00</td></tr>
          <tr><th>Availability</th><td>In stock (3 available)</td></tr>
          <tr><th>Number of reviews</th><td>5</td></tr>
        </table></body></html>"#,
        item.name, item.upc, item.product_type
    )
}

/// Mounts a catalog whose page `i + 1` lists `pages[i]`
///
/// `delays[i]`, when present, delays the response of page `i + 1`.
pub async fn mount_catalog(server: &MockServer, pages: &[Vec<Item>], delays: &[u64]) {
    for (index, items) in pages.iter().enumerate() {
        let page = index + 1;
        let delay = Duration::from_millis(delays.get(index).copied().unwrap_or(0));

        Mock::given(method("GET"))
            .and(path(format!("/catalogue/page-{}.html", page)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(catalog_page_html(page, pages.len(), items))
                    .insert_header("content-type", "text/html")
                    .set_delay(delay),
            )
            .mount(server)
            .await;

        for item in items {
            Mock::given(method("GET"))
                .and(path(format!("/catalogue/{}/index.html", item.slug)))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_string(detail_page_html(item))
                        .insert_header("content-type", "text/html"),
                )
                .mount(server)
                .await;
        }
    }
}

/// Creates a configuration pointing at the mock catalog and a parser service port
pub fn create_test_config(catalog: &MockServer, rpc_port: u16, output: OutputConfig) -> Config {
    Config {
        source: SourceConfig {
            catalog_url: format!("{}/catalogue/page-{{page}}.html", catalog.uri()),
            user_agent: "TestHarvester/1.0".to_string(),
            request_timeout_secs: 10,
        },
        rpc: RpcConfig {
            host: "127.0.0.1".to_string(),
            port: rpc_port,
        },
        schedule: ScheduleConfig::default(),
        server: ServerConfig::default(),
        output,
    }
}

/// Port of a wiremock server
pub fn port_of(server: &MockServer) -> u16 {
    server.address().port()
}
