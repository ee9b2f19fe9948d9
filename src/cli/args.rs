//! Command-line argument definitions for tabparse
//!
//! This module defines the CLI interface using the clap derive API. Every
//! parse setting can also come from a configuration file; flags given here
//! override the file.

use crate::app::models::Field;
use crate::config::ParseConfig;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the tabparse table reader
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tabparse",
    version,
    about = "Read delimited text files into typed records",
    long_about = "Reads CSV and other delimited files into typed records. Columns can be \
                  selected and reordered by name, fields converted to integers, floats, \
                  booleans or dates, and malformed rows skipped with a report instead of \
                  aborting the whole file."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a file and print its records
    Parse(ParseArgs),
    /// Print the column names a file resolves to
    Columns(ColumnsArgs),
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Delimited file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Columns to keep, in output order
    #[arg(
        short = 's',
        long = "select",
        value_name = "COLUMNS",
        value_delimiter = ',',
        help = "Comma-separated list of columns to keep"
    )]
    pub select: Vec<String>,

    /// Converters per output column
    ///
    /// Comma-separated converter names: str, int, float, bool, date. An empty
    /// entry or "raw" leaves that column untouched, e.g. "str,,float".
    #[arg(
        short = 't',
        long = "types",
        value_name = "LIST",
        help = "Comma-separated converters per column (str, int, float, bool, date)"
    )]
    pub types: Option<String>,

    /// Treat the first row as data
    #[arg(long = "no-headers", help = "The file has no header row")]
    pub no_headers: bool,

    /// Column names for a file without a header row
    #[arg(
        long = "headers",
        value_name = "NAMES",
        value_delimiter = ',',
        requires = "no_headers",
        help = "Comma-separated column names to use with --no-headers"
    )]
    pub headers: Vec<String>,

    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        help = "Field separator (default ',')"
    )]
    pub delimiter: Option<char>,

    /// Drop bad rows without reporting them
    #[arg(long = "ignore-errors", help = "Do not report rows that fail conversion")]
    pub ignore_errors: bool,

    #[arg(
        short = 'n',
        long = "max-entries",
        value_name = "COUNT",
        help = "Stop after this many records (0 for no limit)"
    )]
    pub max_entries: Option<usize>,

    #[arg(
        long = "stop-on-blank-lines",
        help = "Stop at the first blank row after the header"
    )]
    pub stop_on_blank_lines: bool,

    /// Keep only the first record for each value of a field
    ///
    /// A column name, or a zero-based position for files without headers.
    #[arg(
        short = 'u',
        long = "unique-by",
        value_name = "FIELD",
        help = "Drop records whose value in FIELD was already seen"
    )]
    pub unique_by: Option<String>,

    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for records"
    )]
    pub output_format: OutputFormat,

    /// Path to configuration file
    ///
    /// TOML configuration file with default parse settings. If not specified,
    /// looks for tabparse/config.toml in the user config directory.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the columns command
#[derive(Debug, Clone, Parser)]
pub struct ColumnsArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(long = "no-headers", help = "The file has no header row")]
    pub no_headers: bool,

    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        help = "Field separator (default ',')"
    )]
    pub delimiter: Option<char>,

    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the column list"
    )]
    pub output_format: OutputFormat,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table for terminals
    Human,
    /// One JSON document with columns, records and statistics
    Json,
    /// One JSON value per record per line
    Jsonl,
}

impl ParseArgs {
    /// Validate the parse command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let Some(field) = &self.unique_by {
            if field.trim().is_empty() {
                return Err(Error::configuration("--unique-by needs a field name"));
            }
        }

        Ok(())
    }

    /// Apply command-line overrides on top of file settings
    pub fn apply_to(&self, config: &mut ParseConfig) {
        if !self.select.is_empty() {
            config.select = self.select.clone();
        }
        if let Some(types) = &self.types {
            config.types = types.split(',').map(|s| s.trim().to_string()).collect();
        }
        if self.no_headers {
            config.has_headers = false;
        }
        if !self.headers.is_empty() {
            config.headers = Some(self.headers.clone());
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.ignore_errors {
            config.ignore_errors = true;
        }
        if let Some(max_entries) = self.max_entries {
            config.max_entries = i64::try_from(max_entries).unwrap_or(i64::MAX);
        }
        if self.stop_on_blank_lines {
            config.stop_on_blank_lines = true;
        }
    }

    /// Field to deduplicate on
    ///
    /// With named columns the value is always a column name. Otherwise
    /// digits select a position.
    pub fn unique_field(&self, named_columns: bool) -> Option<Field> {
        self.unique_by.as_deref().map(str::trim).map(|field| {
            if named_columns {
                return Field::Name(field.to_string());
            }
            field
                .parse::<usize>()
                .map(Field::Position)
                .unwrap_or_else(|_| Field::Name(field.to_string()))
        })
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            verbosity_level(self.verbose)
        }
    }

    /// True when neither -v nor -q was given
    pub fn uses_default_verbosity(&self) -> bool {
        !self.quiet && self.verbose == 0
    }
}

impl ColumnsArgs {
    pub fn apply_to(&self, config: &mut ParseConfig) {
        if self.no_headers {
            config.has_headers = false;
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
    }

    pub fn get_log_level(&self) -> &'static str {
        verbosity_level(self.verbose)
    }
}

fn verbosity_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
