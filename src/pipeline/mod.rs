//! Cleaning pipeline run by the parser service
//!
//! A batch goes through three steps, all or nothing:
//! - normalization (positional rename and type coercion)
//! - deduplication by `upc` and by `name`
//! - schema validation
//!
//! # Example
//!
//! ```
//! use catalog_harvester::pipeline::process_batch;
//!
//! let data = r#"[{"Name":"A","UPC":"1","Product Type":"Books",
//!     "Price (excl. tax)":"£10.00","Price (incl. tax)":"£12.00","Tax":"£2.00",
//!     "Availability":"In stock (3 available)","Number of reviews":"5"}]"#;
//! let table = process_batch(data).unwrap();
//! assert_eq!(table[0].availability, 3);
//! ```

mod dedupe;
mod normalize;
mod validate;

pub use dedupe::dedupe;
pub use normalize::{normalize, normalize_record};
pub use validate::{Check, Column, DataType, Schema, ValidationError, ViolationKind};

use crate::record::{CleanRecord, RawBatch};
use crate::Result;

/// Deduplicated, validated rows ready for persistence
pub type CleanTable = Vec<CleanRecord>;

/// Runs normalization, deduplication and validation over a decoded batch
pub fn clean_batch(batch: &RawBatch) -> Result<CleanTable> {
    let records = normalize(batch)?;
    let table = dedupe(records);
    Schema::books().validate(&table)?;
    Ok(table)
}

/// Decodes a wire payload (JSON array of string maps) and cleans it
pub fn process_batch(data: &str) -> Result<CleanTable> {
    let batch: RawBatch = serde_json::from_str(data)?;
    clean_batch(&batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HarvestError;

    fn payload(rows: &[(&str, &str, &str)]) -> String {
        let records: Vec<String> = rows
            .iter()
            .map(|(name, upc, product_type)| {
                format!(
                    r#"{{"Name":"{}","UPC":"{}","Product Type":"{}","Price (excl. tax)":"£10.00","Price (incl. tax)":"£12.00","Tax":"£2.00","Availability":"In stock (3 available)","Number of reviews":"5"}}"#,
                    name, upc, product_type
                )
            })
            .collect();
        format!("[{}]", records.join(","))
    }

    #[test]
    fn test_scenario_row() {
        let table = process_batch(&payload(&[("A", "1", "Books")])).unwrap();
        assert_eq!(
            table,
            vec![CleanRecord {
                name: "A".to_string(),
                upc: "1".to_string(),
                product_type: "Books".to_string(),
                price: 10.0,
                price_with_tax: 12.0,
                tax: 2.0,
                availability: 3,
                reviews: 5,
            }]
        );
    }

    #[test]
    fn test_duplicates_removed_before_validation() {
        let table = process_batch(&payload(&[
            ("B", "2", "Books"),
            ("A", "2", "Books"),
            ("C", "3", "Books"),
        ]))
        .unwrap();

        let names: Vec<&str> = table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_non_book_rejects_batch() {
        let err = process_batch(&payload(&[("A", "1", "Books"), ("B", "2", "Music")]))
            .unwrap_err();
        match err {
            HarvestError::Validation(v) => assert_eq!(v.field, "product_type"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_idempotent() {
        let data = payload(&[("B", "2", "Books"), ("A", "1", "Books"), ("A", "3", "Books")]);
        let first = serde_json::to_string(&process_batch(&data).unwrap()).unwrap();
        let second = serde_json::to_string(&process_batch(&data).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_batch() {
        assert!(process_batch("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            process_batch("{\"not\": \"an array\"}"),
            Err(HarvestError::Json(_))
        ));
        assert!(matches!(process_batch("not json"), Err(HarvestError::Json(_))));
    }
}
