//! File-based data source.
//!
//! Reads a delimited text file and re-reads it whenever it changes.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{read_table, DataSource, Table};

/// A data source that reads a table from a file on disk.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated, so the analysis re-runs
/// whenever the user overwrites the file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forget the modification time so the next poll re-reads the file.
    pub fn invalidate(&mut self) {
        self.last_modified = None;
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&mut self) -> Option<Table> {
        let name = self.path.to_string_lossy();
        match fs::read(&self.path) {
            Ok(bytes) => match read_table(&bytes, &name) {
                Ok(table) => {
                    self.last_error = None;
                    Some(table)
                }
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "failed to decode file"
                    );
                    self.last_error = Some(e.to_string());
                    None
                }
            },
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<Table> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep the last table
            (Some(last), Some(current)) => current > last,
        };

        if file_changed {
            let table = self.read_file();
            // Remember the attempt even on failure so a broken file is not
            // re-parsed on every tick; a new write clears it.
            self.last_modified = current_modified;
            return table;
        }

        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn refresh(&mut self) {
        self.invalidate();
    }
}
