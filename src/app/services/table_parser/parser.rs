//! Core table parser implementation
//!
//! This module provides the parse orchestration: option validation, file
//! handling, header resolution, and the per-row projection, conversion and
//! record building loop.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, error, info};

use super::column_mapping::ColumnMapping;
use super::observer::{LogObserver, RowError, RowErrorKind, RowErrorObserver};
use super::options::ParseOptions;
use super::row_reader::{LogicalRows, RawRow};
use super::stats::{ParseResult, ParseStats, StopReason};
use crate::app::models::{NamedRecord, Record, Value};
use crate::constants::{BOM, BOM_MOJIBAKE, QUOTE_CHAR};
use crate::{Error, Result};

/// Read buffer for splitting one logical row; longer rows refill it
const ROW_BUFFER_CAPACITY: usize = 1024;

/// Parser for delimited text files
///
/// The parser holds only validated options; every call to [`parse`] opens,
/// reads and closes its own file, so one parser can serve many files and
/// threads.
///
/// [`parse`]: TableParser::parse
#[derive(Debug, Clone)]
pub struct TableParser {
    options: ParseOptions,
    delimiter: u8,
}

impl TableParser {
    /// Create a parser, rejecting invalid option combinations
    pub fn new(options: ParseOptions) -> Result<Self> {
        options.validate()?;
        let delimiter = options.delimiter_byte()?;
        Ok(Self { options, delimiter })
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse a file, reporting dropped rows through log warnings
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<ParseResult> {
        self.parse_with_observer(path, &mut LogObserver)
    }

    /// Parse a file, reporting dropped rows to `observer`
    ///
    /// The observer is not called when `ignore_errors` is set; dropped rows
    /// are recorded in the statistics either way.
    pub fn parse_with_observer(
        &self,
        path: impl AsRef<Path>,
        observer: &mut dyn RowErrorObserver,
    ) -> Result<ParseResult> {
        let path = path.as_ref();
        info!("Parsing table file: {}", path.display());

        let mut rows = self.open(path)?;
        let csv_builder = self.csv_builder();
        let mut stats = ParseStats::new();

        let columns = self.resolve_columns(&mut rows, &csv_builder, path)?;
        let mapping = ColumnMapping::resolve(columns, &self.options.select, path)?;
        let (total_cols, output_cols) = mapping.stats();
        debug!(
            "Column mapping: {} total, {} selected",
            total_cols, output_cols
        );

        let limit = self.options.entry_limit();
        let mut records = Vec::new();

        while let Some(row) = next_row(&mut rows, path)? {
            let fields = split_fields(&csv_builder, &row, path)?;

            if is_blank(&fields) {
                stats.blank_rows += 1;
                if self.options.stop_on_blank_lines {
                    debug!("Blank row {} ends parse of {}", row.index, path.display());
                    stats.stop_reason = Some(StopReason::BlankLine { row: row.index });
                    break;
                }
                continue;
            }

            stats.total_rows += 1;
            match self.build_record(&mapping, &row, fields) {
                Ok(record) => {
                    records.push(record);
                    stats.records_parsed += 1;

                    if limit.is_some_and(|max| records.len() >= max) {
                        debug!("Record limit reached at row {}", row.index);
                        stats.stop_reason = Some(StopReason::MaxEntries);
                        break;
                    }
                }
                Err(row_error) => {
                    stats.rows_skipped += 1;
                    debug!("Skipped row {}: {}", row_error.row, row_error.kind);
                    if !self.options.ignore_errors {
                        observer.on_row_error(&row_error);
                    }
                    stats.errors.push(row_error);
                }
            }
        }

        info!(
            "Parsed {} records from {} rows ({} skipped)",
            stats.records_parsed, stats.total_rows, stats.rows_skipped
        );

        Ok(ParseResult {
            columns: mapping.output.to_vec(),
            records,
            stats,
        })
    }

    /// Resolve the output column names without reading any data rows
    pub fn read_columns(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let path = path.as_ref();
        let mut rows = self.open(path)?;
        let columns = self.resolve_columns(&mut rows, &self.csv_builder(), path)?;
        let mapping = ColumnMapping::resolve(columns, &self.options.select, path)?;
        Ok(mapping.output.to_vec())
    }

    fn open(&self, path: &Path) -> Result<LogicalRows<BufReader<File>>> {
        let file = File::open(path).map_err(|e| {
            error!("Failed to parse {}: {}", path.display(), e);
            Error::io(path, e)
        })?;
        Ok(LogicalRows::new(
            BufReader::new(file),
            self.options.delimiter,
            QUOTE_CHAR,
        ))
    }

    fn csv_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(QUOTE_CHAR as u8)
            .buffer_capacity(ROW_BUFFER_CAPACITY);
        builder
    }

    /// Header row from the file, explicit headers, or nothing
    fn resolve_columns<R: BufRead>(
        &self,
        rows: &mut LogicalRows<R>,
        csv_builder: &csv::ReaderBuilder,
        path: &Path,
    ) -> Result<Vec<String>> {
        if !self.options.has_headers {
            return Ok(self
                .options
                .explicit_headers()
                .map(<[String]>::to_vec)
                .unwrap_or_default());
        }

        while let Some(row) = next_row(rows, path)? {
            let fields = split_fields(csv_builder, &row, path)?;
            if is_blank(&fields) {
                continue;
            }
            debug!("Header row found at row {}", row.index);
            return Ok(fields
                .iter()
                .map(|field| clean_field(field).to_string())
                .collect());
        }

        debug!("No header row found in {}", path.display());
        Ok(Vec::new())
    }

    fn build_record(
        &self,
        mapping: &ColumnMapping,
        row: &RawRow,
        fields: Vec<String>,
    ) -> std::result::Result<Record, RowError> {
        let projected = match mapping.project(&fields) {
            Ok(projected) => projected,
            Err((column, position)) => {
                return Err(RowError {
                    row: row.index,
                    line: row.line,
                    raw: fields,
                    kind: RowErrorKind::MissingField { column, position },
                });
            }
        };

        let mut values = Vec::with_capacity(projected.len());
        for (position, raw) in projected.into_iter().enumerate() {
            let converter = self.options.types.get(position).and_then(Option::as_ref);
            let value = match converter {
                None => Value::Str(raw),
                Some(converter) => match converter.convert(clean_field(&raw)) {
                    Ok(value) => value,
                    Err(e) => {
                        return Err(RowError {
                            row: row.index,
                            line: row.line,
                            kind: RowErrorKind::Conversion {
                                column: mapping.output_column(position).map(str::to_string),
                                position,
                                value: raw,
                                reason: e.to_string(),
                            },
                            raw: fields,
                        });
                    }
                },
            };
            values.push(value);
        }

        Ok(if mapping.is_named() {
            Record::Named(NamedRecord::new(mapping.output.clone(), values))
        } else {
            Record::Tuple(values)
        })
    }
}

/// Parse a file into records in one call
pub fn parse_table(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Vec<Record>> {
    TableParser::new(options.clone())?
        .parse(path)
        .map(|result| result.records)
}

/// Strip byte-order-mark artifacts and surrounding whitespace
pub fn clean_field(raw: &str) -> &str {
    let is_junk = |c: char| c == BOM || c.is_whitespace();
    let trimmed = raw.trim_matches(is_junk);
    let trimmed = trimmed.strip_prefix(BOM_MOJIBAKE).unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(BOM_MOJIBAKE).unwrap_or(trimmed);
    trimmed.trim_matches(is_junk)
}

/// A row with no fields, or only empty ones
///
/// Whitespace is data: a row of spaces is not blank.
pub fn is_blank(fields: &[String]) -> bool {
    fields.iter().all(String::is_empty)
}

fn next_row<R: BufRead>(rows: &mut LogicalRows<R>, path: &Path) -> Result<Option<RawRow>> {
    rows.next_row().map_err(|e| {
        error!("Failed to parse {}: {}", path.display(), e);
        Error::io(path, e)
    })
}

fn split_fields(
    csv_builder: &csv::ReaderBuilder,
    row: &RawRow,
    path: &Path,
) -> Result<Vec<String>> {
    let mut reader = csv_builder.from_reader(row.text.as_bytes());
    let mut record = csv::StringRecord::new();
    let found = reader
        .read_record(&mut record)
        .map_err(|e| Error::csv(path, row.index, e))?;

    Ok(if found {
        record.iter().map(str::to_string).collect()
    } else {
        Vec::new()
    })
}
