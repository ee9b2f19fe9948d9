//! Parsing statistics and result structures
//!
//! This module provides types for tracking how many rows a parse examined,
//! kept, and dropped, plus the result returned to callers.

use serde::Serialize;

use super::observer::RowError;
use crate::app::models::Record;
use crate::constants::SUCCESS_RATE_THRESHOLD;

/// Records produced by one parse with basic statistics
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// Output column names (empty for tuple records)
    pub columns: Vec<String>,

    /// Parsed records in file order
    pub records: Vec<Record>,

    pub stats: ParseStats,
}

/// Why a parse ended before the end of the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// A blank row was met with `stop_on_blank_lines` set
    BlankLine { row: usize },
    /// The record limit was reached
    MaxEntries,
}

/// Simple parsing statistics
#[derive(Debug, Clone, Serialize)]
pub struct ParseStats {
    /// Non-blank data rows examined
    pub total_rows: usize,

    /// Records successfully built
    pub records_parsed: usize,

    /// Rows dropped due to row errors
    pub rows_skipped: usize,

    /// Blank rows met after the header row
    pub blank_rows: usize,

    /// Every dropped row, in file order
    pub errors: Vec<RowError>,

    /// Set when parsing ended early
    pub stop_reason: Option<StopReason>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            total_rows: 0,
            records_parsed: 0,
            rows_skipped: 0,
            blank_rows: 0,
            errors: Vec::new(),
            stop_reason: None,
        }
    }

    /// Calculate success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Check if parsing was mostly successful (>90% success rate)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > SUCCESS_RATE_THRESHOLD
    }

    pub fn stopped_early(&self) -> bool {
        self.stop_reason.is_some()
    }
}

impl Default for ParseStats {
    fn default() -> Self {
        Self::new()
    }
}
