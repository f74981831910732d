//! Duplicate removal over normalized records

use crate::record::CleanRecord;
use std::collections::HashSet;

/// Sorts by `(name, upc)` and drops repeated identifiers
///
/// Two independent passes run in sequence: the first keeps only the first row
/// of every `upc`, the second keeps only the first remaining row of every
/// `name`. A row dropped in the first pass no longer shadows its name in the
/// second pass.
pub fn dedupe(mut records: Vec<CleanRecord>) -> Vec<CleanRecord> {
    records.sort_by(|a, b| (&a.name, &a.upc).cmp(&(&b.name, &b.upc)));

    let records = keep_first_by(records, |r| r.upc.clone());
    keep_first_by(records, |r| r.name.clone())
}

fn keep_first_by<F>(records: Vec<CleanRecord>, key: F) -> Vec<CleanRecord>
where
    F: Fn(&CleanRecord) -> String,
{
    let mut seen = HashSet::new();
    records.into_iter().filter(|r| seen.insert(key(r))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, upc: &str) -> CleanRecord {
        CleanRecord {
            name: name.to_string(),
            upc: upc.to_string(),
            product_type: "Books".to_string(),
            price: 1.0,
            price_with_tax: 1.0,
            tax: 0.0,
            availability: 1,
            reviews: 0,
        }
    }

    fn keys(records: &[CleanRecord]) -> Vec<(&str, &str)> {
        records
            .iter()
            .map(|r| (r.name.as_str(), r.upc.as_str()))
            .collect()
    }

    #[test]
    fn test_sorted_by_name_then_upc() {
        let out = dedupe(vec![record("b", "2"), record("a", "3"), record("c", "1")]);
        assert_eq!(keys(&out), vec![("a", "3"), ("b", "2"), ("c", "1")]);
    }

    #[test]
    fn test_same_upc_keeps_first_sorted() {
        let out = dedupe(vec![record("Zeta", "42"), record("Alpha", "42")]);
        assert_eq!(keys(&out), vec![("Alpha", "42")]);
    }

    #[test]
    fn test_same_name_keeps_lowest_upc() {
        let out = dedupe(vec![record("Same", "9"), record("Same", "1")]);
        assert_eq!(keys(&out), vec![("Same", "1")]);
    }

    #[test]
    fn test_passes_are_independent() {
        // ("B","1") is dropped for its upc; ("B","2") then survives the name pass
        // because its name partner is already gone.
        let out = dedupe(vec![
            record("A", "1"),
            record("B", "1"),
            record("B", "2"),
        ]);
        assert_eq!(keys(&out), vec![("A", "1"), ("B", "2")]);
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let out = dedupe(vec![record("A", "1"), record("A", "1"), record("A", "1")]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_empty() {
        assert!(dedupe(Vec::new()).is_empty());
    }
}
