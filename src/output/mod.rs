//! Result output: CSV rows staged in a temporary file and published atomically.
//!
//! # Overview
//!
//! - [`OutputRow`] - one result line per input item
//! - [`StagedCsvWriter`] - writes rows beside the destination, renames on publish
//! - [`RowSink`] - the writing seam the batch driver depends on
//!
//! # Example
//!
//! ```no_run
//! use channel_puller::output::{OutputRow, RowSink, StagedCsvWriter};
//!
//! # fn main() -> Result<(), channel_puller::output::OutputError> {
//! let mut writer = StagedCsvWriter::create("channels.csv")?;
//! writer.write_row(&OutputRow::failure("https://example.com/", "Not YouTube URL"))?;
//! writer.publish()?;
//! # Ok(())
//! # }
//! ```

mod error;
mod row;
mod writer;

pub use error::OutputError;
pub use row::{FORMULA_ESCAPE, HEADER, OutputRow, escape_formula};
pub use writer::{RowSink, StagedCsvWriter, UTF8_BOM};
