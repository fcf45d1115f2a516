//! Staged CSV writer with atomic publication.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::error::OutputError;
use super::row::{HEADER, OutputRow, encode_record};

/// Byte order mark written before the header so spreadsheet tools detect UTF-8.
pub const UTF8_BOM: &str = "\u{feff}";

const STAGING_PREFIX: &str = ".channel-puller-";
const STAGING_SUFFIX: &str = ".csv.part";

/// Anything rows can be streamed into.
pub trait RowSink {
    /// Appends one row.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if the row cannot be written.
    fn write_row(&mut self, row: &OutputRow) -> Result<(), OutputError>;
}

/// Streams rows to a temporary file beside the destination and renames it
/// into place on [`publish`](Self::publish).
///
/// Dropping the writer without publishing deletes the staged file.
#[derive(Debug)]
pub struct StagedCsvWriter {
    staged: BufWriter<NamedTempFile>,
    destination: PathBuf,
    rows: usize,
    line: String,
}

impl StagedCsvWriter {
    /// Creates the staging file and writes the BOM and header.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Stage`] if the staging file cannot be created and
    /// [`OutputError::Write`] if the header cannot be written.
    pub fn create(destination: impl Into<PathBuf>) -> Result<Self, OutputError> {
        let destination = destination.into();
        let dir = staging_dir(&destination);
        let file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(STAGING_SUFFIX)
            .tempfile_in(&dir)
            .map_err(|e| OutputError::stage(&dir, e))?;
        debug!(staged = %file.path().display(), destination = %destination.display(), "staging output");

        let mut writer = Self {
            staged: BufWriter::new(file),
            destination,
            rows: 0,
            line: String::new(),
        };
        writer.line.push_str(UTF8_BOM);
        encode_record(HEADER, &mut writer.line);
        writer.flush_line()?;
        Ok(writer)
    }

    /// Final path the output is published to.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Number of data rows written so far.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes, syncs and renames the staged file over the destination.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Publish`] if any step fails. The staged file is
    /// removed and the destination is left untouched in that case.
    pub fn publish(self) -> Result<PathBuf, OutputError> {
        let Self {
            staged,
            destination,
            rows,
            ..
        } = self;
        let file = staged
            .into_inner()
            .map_err(|e| OutputError::publish(&destination, e.into_error()))?;
        file.as_file()
            .sync_all()
            .map_err(|e| OutputError::publish(&destination, e))?;
        file.persist(&destination)
            .map_err(|e| OutputError::publish(&destination, e.error))?;
        info!(path = %destination.display(), rows, "output published");
        Ok(destination)
    }

    fn flush_line(&mut self) -> Result<(), OutputError> {
        let result = self.staged.write_all(self.line.as_bytes());
        self.line.clear();
        result.map_err(|e| OutputError::write(&self.destination, e))
    }
}

impl RowSink for StagedCsvWriter {
    fn write_row(&mut self, row: &OutputRow) -> Result<(), OutputError> {
        encode_record(row.fields(), &mut self.line);
        self.flush_line()?;
        self.rows += 1;
        Ok(())
    }
}

fn staging_dir(destination: &Path) -> PathBuf {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
