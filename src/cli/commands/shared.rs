//! Shared components for CLI commands
//!
//! Logging setup, configuration loading and record output used by more than
//! one command.

use anyhow::{Context, anyhow};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::app::models::Record;
use crate::config::ParseConfig;

/// Set up structured logging on stderr
///
/// `RUST_LOG` wins over `level` when set.
pub fn setup_logging(level: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tabparse={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))?;

    debug!("Logging initialized at level: {}", level);
    Ok(())
}

/// Load configuration from an explicit file or the per-user default
pub fn load_configuration(config_file: Option<&Path>) -> anyhow::Result<ParseConfig> {
    ParseConfig::load_layered(config_file).context("Failed to load configuration")
}

/// Log level from the command line, falling back to the config file
pub fn resolve_log_level<'a>(
    cli_level: &'a str,
    explicit: bool,
    config: &'a ParseConfig,
) -> &'a str {
    if explicit {
        return cli_level;
    }
    config.logging.level.as_deref().unwrap_or(cli_level)
}

/// Print records as an aligned table with a highlighted header
pub fn write_table(
    out: &mut impl Write,
    columns: &[String],
    records: &[Record],
) -> anyhow::Result<()> {
    let width = records.iter().map(Record::len).max().unwrap_or(0).max(columns.len());
    let headers: Vec<String> = (0..width)
        .map(|i| columns.get(i).cloned().unwrap_or_else(|| i.to_string()))
        .collect();

    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|record| record.values().iter().map(ToString::to_string).collect())
        .collect();

    let widths: Vec<usize> = (0..width)
        .map(|i| {
            cells
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(headers[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(name, &w)| format!("{:>w$}", name, w = w))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{}", header_line.bold())?;

    let rule = widths
        .iter()
        .map(|&w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{}", rule)?;

    for row in &cells {
        let line = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| format!("{:>w$}", row.get(i).map(String::as_str).unwrap_or(""), w = w))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Print a value as one pretty JSON document
pub fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out)?;
    Ok(())
}

/// Print one compact JSON value per record
pub fn write_jsonl(out: &mut impl Write, records: &[Record]) -> anyhow::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record).context("Failed to serialize record")?;
        writeln!(out)?;
    }
    Ok(())
}
