//! tabparse Library
//!
//! A Rust library for reading delimited text files into typed records.
//!
//! This library provides tools for:
//! - Parsing CSV-like files with or without a header row
//! - Selecting and reordering columns by name
//! - Converting fields with built-in or custom converters
//! - Tolerating bad rows while reporting each failure to an observer
//! - Parsing loosely formatted dates
//! - Suppressing records whose key value was already seen

pub mod config;
pub mod constants;
pub mod error;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod date_parser;
        pub mod deduplication;
        pub mod table_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{Field, NamedRecord, Record, Value};
pub use app::services::date_parser::parse_date;
pub use app::services::deduplication::SeenValues;
pub use app::services::table_parser::{
    Converter, ParseOptions, ParseResult, ParseStats, RowError, RowErrorObserver, TableParser,
    parse_table,
};
pub use config::ParseConfig;
pub use error::{Error, Result};
