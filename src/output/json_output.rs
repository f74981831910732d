//! Pretty-printed JSON records output

use crate::output::traits::TableOutput;
use crate::record::CleanRecord;
use crate::Result;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the table as a JSON array of objects, two-space indented
pub struct JsonOutput {
    path: PathBuf,
}

impl JsonOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableOutput for JsonOutput {
    fn format(&self) -> &'static str {
        "json"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, table: &[CleanRecord], out: &mut dyn Write) -> Result<()> {
        let mut writer = BufWriter::new(out);
        serde_json::to_writer_pretty(&mut writer, table)?;
        writer.flush()?;
        Ok(())
    }
}
