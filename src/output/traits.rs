//! Table output trait and the shared file replacement logic

use crate::record::CleanRecord;
use crate::Result;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A persisted representation of a clean table
///
/// Implementations render the whole table; the file itself is replaced by
/// [`StagedTable::commit`], so partial output is never visible at `path()`.
pub trait TableOutput: Send + Sync {
    /// Short format name used in logs
    fn format(&self) -> &'static str;

    /// Destination file
    fn path(&self) -> &Path;

    /// Renders the table with columns in canonical order
    fn render(&self, table: &[CleanRecord], out: &mut dyn Write) -> Result<()>;
}

/// A fully rendered table waiting in a temp file next to its destination
pub struct StagedTable<'a> {
    output: &'a dyn TableOutput,
    file: NamedTempFile,
    rows: usize,
}

impl StagedTable<'_> {
    pub fn path(&self) -> &Path {
        self.output.path()
    }

    /// Renames the temp file over the destination
    pub fn commit(self) -> Result<()> {
        let path = self.output.path();
        self.file.persist(path).map_err(|e| e.error)?;

        tracing::debug!(
            "Wrote {} rows as {} to {}",
            self.rows,
            self.output.format(),
            path.display()
        );
        Ok(())
    }
}

/// Renders `table` into a temp file in the destination directory
///
/// Missing parent directories are created. A destination that exists but is
/// not a regular file is refused before anything is rendered.
pub fn stage_table<'a>(
    output: &'a dyn TableOutput,
    table: &[CleanRecord],
) -> Result<StagedTable<'a>> {
    let path = output.path();
    if path.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} is a directory", path.display()),
        )
        .into());
    }
    std::fs::create_dir_all(parent_dir(path))?;

    let mut file = NamedTempFile::new_in(parent_dir(path))?;
    output.render(table, file.as_file_mut())?;
    file.as_file_mut().flush()?;

    Ok(StagedTable {
        output,
        file,
        rows: table.len(),
    })
}

/// Copy of a destination taken before it is replaced
///
/// `restore` puts the previous content back, or removes the file when there
/// was none.
pub struct Backup {
    path: PathBuf,
    saved: Option<NamedTempFile>,
}

impl Backup {
    pub fn take(path: &Path) -> Result<Self> {
        let saved = if path.is_file() {
            let copy = NamedTempFile::new_in(parent_dir(path))?;
            std::fs::copy(path, copy.path())?;
            Some(copy)
        } else {
            None
        };

        Ok(Self {
            path: path.to_path_buf(),
            saved,
        })
    }

    pub fn restore(self) -> Result<()> {
        match self.saved {
            Some(copy) => {
                copy.persist(&self.path).map_err(|e| e.error)?;
            }
            None => match std::fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
