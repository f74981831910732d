//! Comma-separated table output

use crate::output::traits::TableOutput;
use crate::record::{CleanRecord, CANONICAL_FIELDS};
use crate::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes a header row followed by one row per record
pub struct CsvOutput {
    path: PathBuf,
}

impl CsvOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableOutput for CsvOutput {
    fn format(&self) -> &'static str {
        "csv"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, table: &[CleanRecord], out: &mut dyn Write) -> Result<()> {
        // The header is written by hand so an empty table still gets one
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(out);

        writer.write_record(CANONICAL_FIELDS)?;
        for record in table {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(table: &[CleanRecord]) -> String {
        let mut buffer = Vec::new();
        CsvOutput::new("unused.csv")
            .render(table, &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_and_row() {
        let table = vec![CleanRecord {
            name: "A".to_string(),
            upc: "1".to_string(),
            product_type: "Books".to_string(),
            price: 10.0,
            price_with_tax: 12.0,
            tax: 2.0,
            availability: 3,
            reviews: 5,
        }];

        assert_eq!(
            render(&table),
            "name,upc,product_type,price,price_with_tax,tax,availability,reviews\n\
             A,1,Books,10.0,12.0,2.0,3,5\n"
        );
    }

    #[test]
    fn test_empty_table_keeps_header() {
        assert_eq!(
            render(&[]),
            "name,upc,product_type,price,price_with_tax,tax,availability,reviews\n"
        );
    }

    #[test]
    fn test_quotes_names_with_commas() {
        let table = vec![CleanRecord {
            name: "Sapiens: A Brief History, Vol. 1".to_string(),
            upc: "x".to_string(),
            product_type: "Books".to_string(),
            price: 54.23,
            price_with_tax: 54.23,
            tax: 0.0,
            availability: 20,
            reviews: 0,
        }];

        assert!(render(&table).contains("\"Sapiens: A Brief History, Vol. 1\",x,Books,54.23"));
    }
}
