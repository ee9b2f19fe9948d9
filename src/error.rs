//! Error handling for table parsing operations.
//!
//! Fatal errors abort a parse and carry the file, row and offending value
//! needed to diagnose them. Recoverable per-row failures are not errors of
//! this type; see [`crate::app::services::table_parser::RowError`].

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Conflicting or invalid parse options
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// File could not be opened or read
    #[error("Failed to parse {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A selected column is absent from the resolved column set
    #[error(
        "Column '{column}' not found in {} (available columns: {})",
        path.display(),
        available.join(", ")
    )]
    ColumnNotFound {
        column: String,
        path: PathBuf,
        available: Vec<String>,
    },

    /// The header row of a file names the same column twice
    #[error("Duplicate column '{column}' in header row of {}", path.display())]
    DuplicateColumn { column: String, path: PathBuf },

    /// A logical row could not be decoded by the CSV dialect
    #[error("CSV error in {} at row {row}: {source}", path.display())]
    Csv {
        path: PathBuf,
        row: usize,
        #[source]
        source: csv::Error,
    },

    /// Configuration file missing or malformed
    #[error("Config file error in {}: {message}", path.display())]
    ConfigFile { path: PathBuf, message: String },
}

impl Error {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error for the given file
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a column lookup error
    pub fn column_not_found(
        column: impl Into<String>,
        path: impl AsRef<Path>,
        available: &[String],
    ) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
            path: path.as_ref().to_path_buf(),
            available: available.to_vec(),
        }
    }

    /// Create a duplicate header error
    pub fn duplicate_column(column: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self::DuplicateColumn {
            column: column.into(),
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a CSV decoding error
    pub fn csv(path: impl AsRef<Path>, row: usize, source: csv::Error) -> Self {
        Self::Csv {
            path: path.as_ref().to_path_buf(),
            row,
            source,
        }
    }

    /// Create a config file error
    pub fn config_file(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::ConfigFile {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// True for errors raised before any I/O was attempted
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
