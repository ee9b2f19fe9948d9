//! Recoverable row failures and their observers
//!
//! A row that cannot be projected or converted is dropped from the result.
//! Each such failure becomes a [`RowError`], which is kept in the parse
//! statistics and handed to a [`RowErrorObserver`] unless errors are ignored.

use serde::Serialize;
use tracing::warn;

/// Why a row was dropped
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowErrorKind {
    /// A converter rejected a field
    #[error("couldn't convert {value:?} in column {}: {reason}", column.as_deref().unwrap_or("?"))]
    Conversion {
        /// Output column name, absent for tables without column names
        column: Option<String>,
        position: usize,
        value: String,
        reason: String,
    },

    /// A selected column lies past the end of the row
    #[error("row has no value for column '{column}' (position {position})")]
    MissingField { column: String, position: usize },
}

/// A dropped row with everything needed to find it again
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Row {row} (line {line}): {kind}; raw data {raw:?}")]
pub struct RowError {
    /// 0-based logical row index within the file
    pub row: usize,

    /// 1-based physical line where the row starts
    pub line: u64,

    /// Fields of the row as read, before projection
    pub raw: Vec<String>,

    pub kind: RowErrorKind,
}

impl RowError {
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

/// Receives every recoverable row failure as it happens
pub trait RowErrorObserver {
    fn on_row_error(&mut self, error: &RowError);
}

impl<F> RowErrorObserver for F
where
    F: FnMut(&RowError),
{
    fn on_row_error(&mut self, error: &RowError) {
        self(error)
    }
}

/// Default observer: one warning per dropped row
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl RowErrorObserver for LogObserver {
    fn on_row_error(&mut self, error: &RowError) {
        warn!(
            row = error.row,
            line = error.line,
            "Row {} dropped: {}; raw data {:?}",
            error.row,
            error.reason(),
            error.raw
        );
    }
}
