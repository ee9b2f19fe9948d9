//! Typed, column-selecting, error-tolerant parser for delimited text files
//!
//! This module reads a delimited file into an ordered list of records. The
//! first non-blank row can name the columns, a selection can restrict and
//! reorder them, and per-column converters can type the values. Rows that
//! fail conversion are dropped and reported without aborting the parse.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`parser`] - Parse orchestration and file handling
//! - [`options`] - Parse options and combination rules
//! - [`row_reader`] - Quote-aware grouping of lines into logical rows
//! - [`column_mapping`] - Header resolution and row projection
//! - [`converters`] - Built-in and custom field converters
//! - [`observer`] - Recoverable row failures and their observers
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```no_run
//! use tabparse::app::services::table_parser::{Converter, ParseOptions, TableParser};
//!
//! # fn example() -> tabparse::Result<()> {
//! let options = ParseOptions::new()
//!     .with_select(["name", "price"])
//!     .with_types([Converter::string(), Converter::float()]);
//!
//! let result = TableParser::new(options)?.parse("portfolio.csv")?;
//! println!(
//!     "Parsed {} records from {} rows",
//!     result.stats.records_parsed, result.stats.total_rows
//! );
//! # Ok(())
//! # }
//! ```

pub mod column_mapping;
pub mod converters;
pub mod observer;
pub mod options;
pub mod parser;
pub mod row_reader;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::ColumnMapping;
pub use converters::{ConversionError, Converter};
pub use observer::{LogObserver, RowError, RowErrorKind, RowErrorObserver};
pub use options::ParseOptions;
pub use parser::{TableParser, clean_field, is_blank, parse_table};
pub use stats::{ParseResult, ParseStats, StopReason};
