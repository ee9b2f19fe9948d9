//! Parse options and their validation
//!
//! Options are validated as a whole before any file is opened, so an
//! inconsistent combination never costs I/O.

use std::collections::HashSet;

use super::converters::Converter;
use crate::constants::{DEFAULT_DELIMITER, DEFAULT_HAS_HEADERS, QUOTE_CHAR, UNBOUNDED_ENTRIES};
use crate::{Error, Result};

/// Options controlling a single parse
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Column names to keep, in output order (empty keeps every column)
    pub select: Vec<String>,

    /// Converters aligned with the output columns; `None` keeps the raw text
    pub types: Vec<Option<Converter>>,

    /// Consume the first non-blank row as the header row
    pub has_headers: bool,

    /// Single ASCII field separator
    pub delimiter: char,

    /// Skip failing rows without notifying the error observer
    pub ignore_errors: bool,

    /// Explicit column names for files without a header row
    pub headers: Option<Vec<String>>,

    /// Maximum number of records to return (0 = unbounded)
    pub max_entries: usize,

    /// Stop at the first blank row instead of skipping it
    pub stop_on_blank_lines: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            select: Vec::new(),
            types: Vec::new(),
            has_headers: DEFAULT_HAS_HEADERS,
            delimiter: DEFAULT_DELIMITER,
            ignore_errors: false,
            headers: None,
            max_entries: UNBOUNDED_ENTRIES,
            stop_on_blank_lines: false,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only these columns, in this order
    pub fn with_select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Convert every output column, position by position
    pub fn with_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = Converter>,
    {
        self.types = types.into_iter().map(Some).collect();
        self
    }

    /// Convert selected positions only; `None` leaves a column as raw text
    pub fn with_optional_types(mut self, types: Vec<Option<Converter>>) -> Self {
        self.types = types;
        self
    }

    pub fn with_has_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Treat the first row as data
    pub fn without_headers(self) -> Self {
        self.with_has_headers(false)
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_ignore_errors(mut self, ignore_errors: bool) -> Self {
        self.ignore_errors = ignore_errors;
        self
    }

    /// Name the columns of a file without a header row
    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = Some(headers.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn with_stop_on_blank_lines(mut self, stop: bool) -> Self {
        self.stop_on_blank_lines = stop;
        self
    }

    /// Explicit headers that actually name something
    pub fn explicit_headers(&self) -> Option<&[String]> {
        self.headers
            .as_deref()
            .filter(|headers| !headers.is_empty())
    }

    /// Record limit, if any
    pub fn entry_limit(&self) -> Option<usize> {
        (self.max_entries != UNBOUNDED_ENTRIES).then_some(self.max_entries)
    }

    /// Delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        let delimiter = self.delimiter;
        if !delimiter.is_ascii() {
            return Err(Error::configuration(format!(
                "delimiter must be a single ASCII character, got '{}'",
                delimiter
            )));
        }
        if delimiter == QUOTE_CHAR || delimiter == '\n' || delimiter == '\r' {
            return Err(Error::configuration(format!(
                "delimiter cannot be {:?}",
                delimiter
            )));
        }
        Ok(delimiter as u8)
    }

    /// Check the option combination
    pub fn validate(&self) -> Result<()> {
        let explicit_headers = self.explicit_headers();

        if !self.select.is_empty() && explicit_headers.is_some() {
            return Err(Error::configuration(
                "'select' and 'headers' cannot be combined; specify one or the other",
            ));
        }

        if !self.select.is_empty() && !self.has_headers {
            return Err(Error::configuration(
                "'select' is only allowed when 'has_headers' is true",
            ));
        }

        if explicit_headers.is_some() && self.has_headers {
            return Err(Error::configuration(
                "'headers' can only be specified when 'has_headers' is false",
            ));
        }

        check_unique("select", &self.select)?;
        if let Some(headers) = explicit_headers {
            check_unique("headers", headers)?;
        }

        self.delimiter_byte()?;
        Ok(())
    }
}

fn check_unique(option: &str, names: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(Error::configuration(format!(
                "'{}' lists column '{}' more than once",
                option, name
            )));
        }
    }
    Ok(())
}
