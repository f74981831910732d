//! Positional renaming and type coercion of raw records

use crate::record::{CleanRecord, RawRecord, CANONICAL_FIELDS};
use crate::{HarvestError, Result};
use regex::Regex;
use std::sync::OnceLock;

const CURRENCY_SYMBOL: char = '£';

fn digit_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"))
}

/// Normalizes every record of a batch, keeping batch order
///
/// Fails on the first record that does not have exactly eight fields or whose
/// values cannot be coerced.
pub fn normalize(batch: &[RawRecord]) -> Result<Vec<CleanRecord>> {
    batch
        .iter()
        .enumerate()
        .map(|(row, record)| normalize_record(row, record))
        .collect()
}

/// Renames the eight fields of `record` positionally and coerces their values
///
/// Labels are ignored: the n-th field becomes the n-th canonical column.
pub fn normalize_record(row: usize, record: &RawRecord) -> Result<CleanRecord> {
    if record.len() != CANONICAL_FIELDS.len() {
        return Err(HarvestError::SchemaMismatch {
            row,
            expected: CANONICAL_FIELDS.len(),
            found: record.len(),
        });
    }

    let values: Vec<&str> = record.values().collect();

    Ok(CleanRecord {
        name: values[0].to_string(),
        upc: values[1].to_string(),
        product_type: values[2].to_string(),
        price: parse_price(row, "price", values[3])?,
        price_with_tax: parse_price(row, "price_with_tax", values[4])?,
        tax: parse_price(row, "tax", values[5])?,
        availability: parse_first_integer(row, "availability", values[6])?,
        reviews: parse_integer(row, "reviews", values[7])?,
    })
}

/// `"£12.34"` → `12.34`
fn parse_price(row: usize, field: &'static str, value: &str) -> Result<f64> {
    value
        .replace(CURRENCY_SYMBOL, "")
        .trim()
        .parse()
        .map_err(|_| coercion(row, field, value))
}

/// `"In stock (22 available)"` → `22`
fn parse_first_integer(row: usize, field: &'static str, value: &str) -> Result<i64> {
    digit_run()
        .find(value)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| coercion(row, field, value))
}

fn parse_integer(row: usize, field: &'static str, value: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| coercion(row, field, value))
}

fn coercion(row: usize, field: &'static str, value: &str) -> HarvestError {
    HarvestError::Coercion {
        row,
        field,
        value: value.to_string(),
    }
}
