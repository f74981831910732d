//! HTML extraction for catalog and item pages
//!
//! This module turns fetched markup into crawl data:
//! - the total page count from the pagination marker
//! - item detail links from a catalog page
//! - the flat label/value record from an item detail page

use crate::record::RawRecord;
use crate::{HarvestError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use url::Url;

const PAGINATION_SELECTOR: &str = "li.current";
const ITEM_LINK_SELECTOR: &str = "h3 a";
const HEADING_SELECTOR: &str = "h1";
const ATTRIBUTE_TABLE_SELECTOR: &str = "table.table.table-striped";

fn pagination_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^Page\s+(\d+)\s+of\s+(\d+)$").expect("pagination pattern is valid")
    })
}

fn selector(css: &str) -> Selector {
    // Only called with the constant selectors above
    Selector::parse(css).expect("static selector is valid")
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts `N` from a pagination text of the form `Page X of N`
///
/// Surrounding whitespace and runs of inner whitespace are accepted.
pub fn parse_pagination_text(text: &str) -> Option<u32> {
    let captures = pagination_pattern().captures(text.trim())?;
    captures.get(2)?.as_str().parse().ok()
}

/// Reads the total number of catalog pages from a catalog page
///
/// # Arguments
///
/// * `html` - Markup of any catalog page
/// * `url` - The page URL, used in error messages
///
/// # Returns
///
/// * `Ok(u32)` - The `N` of the `Page X of N` marker
/// * `Err(HarvestError::Parse)` - The marker is missing or malformed
pub fn parse_page_count(html: &str, url: &str) -> Result<u32> {
    let document = Html::parse_document(html);

    let marker = document
        .select(&selector(PAGINATION_SELECTOR))
        .next()
        .ok_or_else(|| HarvestError::parse(url, "pagination marker not found"))?;

    let text = element_text(marker);
    parse_pagination_text(&text).ok_or_else(|| {
        HarvestError::parse(url, format!("unexpected pagination text {:?}", text))
    })
}

/// Extracts the item detail links of a catalog page, in document order
///
/// Every `href` is resolved against `page_url`.
pub fn parse_item_links(html: &str, page_url: &Url) -> Result<Vec<Url>> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for anchor in document.select(&selector(ITEM_LINK_SELECTOR)) {
        let href = anchor
            .value()
            .attr("href")
            .ok_or_else(|| HarvestError::parse(page_url.as_str(), "item link without href"))?;

        let link = page_url.join(href.trim()).map_err(|e| {
            HarvestError::parse(page_url.as_str(), format!("bad item link {:?}: {}", href, e))
        })?;
        links.push(link);
    }

    Ok(links)
}

/// Extracts the record of an item detail page
///
/// The heading becomes the `Name` field; every attribute table row then adds
/// its header cell as label and its data cell as value.
pub fn parse_item_detail(html: &str, url: &str) -> Result<RawRecord> {
    let document = Html::parse_document(html);

    let heading = document
        .select(&selector(HEADING_SELECTOR))
        .next()
        .ok_or_else(|| HarvestError::parse(url, "item heading not found"))?;
    let mut record = RawRecord::with_name(element_text(heading));

    let table = document
        .select(&selector(ATTRIBUTE_TABLE_SELECTOR))
        .next()
        .ok_or_else(|| HarvestError::parse(url, "attribute table not found"))?;

    let header_cell = selector("th");
    let data_cell = selector("td");
    for (index, row) in table.select(&selector("tr")).enumerate() {
        let label = row
            .select(&header_cell)
            .next()
            .ok_or_else(|| HarvestError::parse(url, format!("row {} has no header cell", index)))?;
        let value = row
            .select(&data_cell)
            .next()
            .ok_or_else(|| HarvestError::parse(url, format!("row {} has no data cell", index)))?;

        record.insert(element_text(label), element_text(value));
    }

    Ok(record)
}
