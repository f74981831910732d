//! Declarative table schema and its checks
//!
//! A [`Schema`] lists the expected columns, each with a data type and a set of
//! value [`Check`]s, plus the column tuples that must be unique across the
//! table. Validation stops at the first violation.

use crate::record::{CellValue, CleanRecord};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Expected type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Str,
    Float,
    Int,
}

impl DataType {
    fn of(cell: &CellValue<'_>) -> Self {
        match cell {
            CellValue::Str(_) => DataType::Str,
            CellValue::Float(_) => DataType::Float,
            CellValue::Int(_) => DataType::Int,
        }
    }
}

/// Value constraint applied to every cell of a column
#[derive(Debug, Clone, PartialEq)]
pub enum Check {
    EqualTo(String),
    GreaterThan(f64),
    GreaterThanOrEqualTo(f64),
}

impl Check {
    /// Returns true when `cell` satisfies the constraint
    ///
    /// Order checks never pass on strings or NaN; equality only applies to strings.
    pub fn passes(&self, cell: &CellValue<'_>) -> bool {
        match (self, numeric(cell)) {
            (Check::EqualTo(expected), _) => matches!(cell, CellValue::Str(s) if *s == expected.as_str()),
            (Check::GreaterThan(bound), Some(v)) => v > *bound,
            (Check::GreaterThanOrEqualTo(bound), Some(v)) => v >= *bound,
            (_, None) => false,
        }
    }
}

fn numeric(cell: &CellValue<'_>) -> Option<f64> {
    match cell {
        CellValue::Float(v) => Some(*v),
        CellValue::Int(v) => Some(*v as f64),
        CellValue::Str(_) => None,
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::EqualTo(v) => write!(f, "equal_to({:?})", v),
            Check::GreaterThan(v) => write!(f, "greater_than({})", v),
            Check::GreaterThanOrEqualTo(v) => write!(f, "greater_than_or_equal_to({})", v),
        }
    }
}

/// What went wrong in a [`ValidationError`]
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    MissingColumn,
    WrongType { expected: DataType, found: DataType },
    CheckFailed { check: Check, value: String },
    Duplicate { value: String },
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::MissingColumn => write!(f, "column missing"),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "expected {:?}, found {:?}", expected, found)
            }
            ViolationKind::CheckFailed { check, value } => {
                write!(f, "check {} failed for value {}", check, value)
            }
            ViolationKind::Duplicate { value } => write!(f, "duplicate value {}", value),
        }
    }
}

/// First schema violation found in a table
#[derive(Debug, Clone, PartialEq, Error)]
#[error("column '{field}' row {row}: {kind}")]
pub struct ValidationError {
    pub kind: ViolationKind,
    pub field: String,
    pub row: usize,
}

/// One expected column
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub dtype: DataType,
    pub checks: Vec<Check>,
}

impl Column {
    pub fn new(name: &'static str, dtype: DataType) -> Self {
        Self {
            name,
            dtype,
            checks: Vec::new(),
        }
    }

    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }
}

/// Column definitions plus table-level uniqueness constraints
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub columns: Vec<Column>,
    pub unique: Vec<Vec<&'static str>>,
}

impl Schema {
    /// The schema every persisted catalog table must satisfy
    pub fn books() -> Self {
        Schema {
            columns: vec![
                Column::new("name", DataType::Str),
                Column::new("upc", DataType::Str),
                Column::new("product_type", DataType::Str)
                    .check(Check::EqualTo("Books".to_string())),
                Column::new("price_with_tax", DataType::Float).check(Check::GreaterThan(0.0)),
                Column::new("price", DataType::Float).check(Check::GreaterThan(0.0)),
                Column::new("tax", DataType::Float).check(Check::GreaterThanOrEqualTo(0.0)),
                Column::new("availability", DataType::Int)
                    .check(Check::GreaterThanOrEqualTo(0.0)),
                Column::new("reviews", DataType::Int).check(Check::GreaterThanOrEqualTo(0.0)),
            ],
            unique: vec![vec!["name"], vec!["upc"]],
        }
    }

    /// Checks every row against the columns, then the uniqueness constraints
    ///
    /// Rows are visited in table order and columns in schema order; the first
    /// violation is returned.
    pub fn validate(&self, table: &[CleanRecord]) -> Result<(), ValidationError> {
        for (row, record) in table.iter().enumerate() {
            for column in &self.columns {
                self.validate_cell(row, record, column)?;
            }
        }

        for key in &self.unique {
            check_unique(table, key)?;
        }

        Ok(())
    }

    fn validate_cell(
        &self,
        row: usize,
        record: &CleanRecord,
        column: &Column,
    ) -> Result<(), ValidationError> {
        let violation = |kind| ValidationError {
            kind,
            field: column.name.to_string(),
            row,
        };

        let cell = record
            .cell(column.name)
            .ok_or_else(|| violation(ViolationKind::MissingColumn))?;

        let found = DataType::of(&cell);
        if found != column.dtype {
            return Err(violation(ViolationKind::WrongType {
                expected: column.dtype,
                found,
            }));
        }

        if let Some(check) = column.checks.iter().find(|c| !c.passes(&cell)) {
            return Err(violation(ViolationKind::CheckFailed {
                check: check.clone(),
                value: cell.to_string(),
            }));
        }

        Ok(())
    }
}

fn check_unique(table: &[CleanRecord], key: &[&'static str]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();

    for (row, record) in table.iter().enumerate() {
        let values: Vec<String> = key
            .iter()
            .map(|field| {
                record
                    .cell(field)
                    .map(|c| c.to_string())
                    .unwrap_or_default()
            })
            .collect();

        if !seen.insert(values.clone()) {
            return Err(ValidationError {
                kind: ViolationKind::Duplicate {
                    value: values.join(", "),
                },
                field: key.join(","),
                row,
            });
        }
    }

    Ok(())
}
