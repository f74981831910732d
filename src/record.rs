//! Record types shared by the crawler and the parser service
//!
//! A [`RawRecord`] is what the crawler scrapes off an item page: free-text
//! labels mapped to free-text values, in the order they appear on the page.
//! A [`CleanRecord`] is the typed row the parser service persists.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Label under which the item heading is stored
pub const NAME_LABEL: &str = "Name";

/// Canonical column names, in output order
pub const CANONICAL_FIELDS: [&str; 8] = [
    "name",
    "upc",
    "product_type",
    "price",
    "price_with_tax",
    "tax",
    "availability",
    "reviews",
];

/// One scraped item: label/value pairs in scrape order
///
/// Serializes as a JSON object whose keys keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(String, String)>,
}

impl RawRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record holding only the `Name` field
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.insert(NAME_LABEL, name);
        record
    }

    /// Sets `label` to `value`
    ///
    /// A label that is already present keeps its position and takes the new value.
    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(label, value)` pairs in scrape order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    /// Iterates over values in scrape order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (label, value) in iter {
            record.insert(label, value);
        }
        record
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (label, value) in &self.fields {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

struct RawRecordVisitor;

impl<'de> Visitor<'de> for RawRecordVisitor {
    type Value = RawRecord;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping field labels to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawRecord, A::Error> {
        let mut record = RawRecord::new();
        while let Some((label, value)) = access.next_entry::<String, String>()? {
            record.insert(label, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RawRecordVisitor)
    }
}

/// All records scraped in one crawl run, in link order
pub type RawBatch = Vec<RawRecord>;

/// Typed, normalized catalog row
///
/// Field order matches [`CANONICAL_FIELDS`] and is the column order of every
/// persisted representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub name: String,
    pub upc: String,
    pub product_type: String,
    pub price: f64,
    pub price_with_tax: f64,
    pub tax: f64,
    pub availability: i64,
    pub reviews: i64,
}

/// A single cell of a [`CleanRecord`], used by the schema checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Str(&'a str),
    Float(f64),
    Int(i64),
}

impl CleanRecord {
    /// Returns the cell for a canonical column name
    pub fn cell(&self, field: &str) -> Option<CellValue<'_>> {
        let value = match field {
            "name" => CellValue::Str(&self.name),
            "upc" => CellValue::Str(&self.upc),
            "product_type" => CellValue::Str(&self.product_type),
            "price" => CellValue::Float(self.price),
            "price_with_tax" => CellValue::Float(self.price_with_tax),
            "tax" => CellValue::Float(self.tax),
            "availability" => CellValue::Int(self.availability),
            "reviews" => CellValue::Int(self.reviews),
            _ => return None,
        };
        Some(value)
    }
}

impl fmt::Display for CellValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Str(s) => write!(f, "{:?}", s),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Int(v) => write!(f, "{}", v),
        }
    }
}
