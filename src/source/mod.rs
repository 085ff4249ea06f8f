//! Data source abstraction for loading the dataset under analysis.
//!
//! A source turns bytes (a delimited text file, a spreadsheet or an
//! in-memory upload) into a typed [`Table`]. Sources are polled: they hand
//! out a table when new data is available, and remember the last read or
//! decode error so the UI can show it instead of a partial result.

mod bytes;
mod file;
mod reader;
mod spreadsheet;
mod table;

pub use bytes::BytesSource;
pub use file::FileSource;
pub use reader::read_table;
pub use spreadsheet::read_spreadsheet;
pub use table::{Column, ColumnData, Table};

use std::fmt::Debug;

/// Trait for receiving tables from various sources.
///
/// # Example
///
/// ```
/// use gapwatch::{BytesSource, DataSource};
///
/// let csv = b"time,value\n2024-01-01 00:00:00,1\n".to_vec();
/// let mut source = BytesSource::new(csv, "upload.csv");
/// if let Some(table) = source.poll() {
///     println!("Got {} rows", table.height());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest table.
    ///
    /// Returns `Some(table)` if new data is available, `None` otherwise.
    /// This method should not block beyond reading local bytes.
    fn poll(&mut self) -> Option<Table>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the error message from the last poll, if it failed.
    fn error(&self) -> Option<&str>;

    /// Make the next poll hand out the current data again, even if unchanged.
    fn refresh(&mut self) {}
}
