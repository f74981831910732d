//! Output module for persisting clean tables
//!
//! This module handles:
//! - Writing the table as CSV
//! - Writing the table as pretty-printed JSON records
//! - Replacing previous output files as a whole

mod csv_output;
mod json_output;
mod traits;

pub use csv_output::CsvOutput;
pub use json_output::JsonOutput;
pub use traits::{stage_table, Backup, StagedTable, TableOutput};

use crate::config::OutputConfig;
use crate::record::CleanRecord;
use crate::Result;

/// Writes every validated table to all configured outputs
///
/// Each call rewrites the outputs completely; nothing is appended.
pub struct Sink {
    outputs: Vec<Box<dyn TableOutput>>,
}

impl Sink {
    pub fn new(outputs: Vec<Box<dyn TableOutput>>) -> Self {
        Self { outputs }
    }

    /// Builds the CSV + JSON sink described by the configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        let outputs: Vec<Box<dyn TableOutput>> = vec![
            Box::new(CsvOutput::new(&config.csv_path)),
            Box::new(JsonOutput::new(&config.json_path)),
        ];
        Self::new(outputs)
    }

    /// Persists `table` to every output, all or nothing
    ///
    /// Every output is rendered before any destination is touched. If a
    /// rename fails, the outputs already replaced get their previous content
    /// back.
    pub fn persist(&self, table: &[CleanRecord]) -> Result<()> {
        let staged = self
            .outputs
            .iter()
            .map(|output| stage_table(output.as_ref(), table))
            .collect::<Result<Vec<_>>>()?;

        let backups = staged
            .iter()
            .map(|pending| Backup::take(pending.path()))
            .collect::<Result<Vec<_>>>()?;

        for (committed, pending) in staged.into_iter().enumerate() {
            if let Err(e) = pending.commit() {
                for backup in backups.into_iter().take(committed) {
                    if let Err(restore_err) = backup.restore() {
                        tracing::error!("Failed to restore previous output: {}", restore_err);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}
