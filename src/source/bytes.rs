//! In-memory data source.
//!
//! Wraps bytes that were uploaded or piped in rather than read from a path.

use super::{read_table, DataSource, Table};

/// A data source over a byte buffer, decoded once on the first poll.
///
/// # Example
///
/// ```
/// use gapwatch::{BytesSource, DataSource};
///
/// let mut source = BytesSource::new(b"time\n2024-01-01\n".to_vec(), "upload.csv");
/// assert!(source.poll().is_some());
/// assert!(source.poll().is_none());
/// ```
#[derive(Debug)]
pub struct BytesSource {
    bytes: Option<Vec<u8>>,
    name: String,
    description: String,
    last_error: Option<String>,
}

impl BytesSource {
    /// Create a source over `bytes`; `name` is the original file name and
    /// selects the separator and format checks.
    pub fn new(bytes: Vec<u8>, name: &str) -> Self {
        Self {
            bytes: Some(bytes),
            name: name.to_string(),
            description: format!("upload: {}", name),
            last_error: None,
        }
    }
}

impl DataSource for BytesSource {
    fn poll(&mut self) -> Option<Table> {
        let bytes = self.bytes.take()?;
        match read_table(&bytes, &self.name) {
            Ok(table) => Some(table),
            Err(e) => {
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
