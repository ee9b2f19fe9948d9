//! Parse command implementation
//!
//! Reads one file with the layered settings, optionally drops records with a
//! repeated key, and prints the result in the requested format.

use anyhow::Context;
use colored::Colorize;
use std::io::{self, Write};
use std::time::Instant;
use tracing::{debug, info};

use super::shared::{
    load_configuration, resolve_log_level, setup_logging, write_json, write_jsonl, write_table,
};
use crate::app::services::deduplication::SeenValues;
use crate::app::services::table_parser::{ParseResult, ParseStats, TableParser};
use crate::cli::args::{OutputFormat, ParseArgs};

/// Run the parse command
pub fn run_parse(args: ParseArgs) -> anyhow::Result<ParseStats> {
    let start_time = Instant::now();
    args.validate()?;

    let mut config = load_configuration(args.config_file.as_deref())?;
    let level = resolve_log_level(args.get_log_level(), !args.uses_default_verbosity(), &config);
    setup_logging(level)?;
    debug!("Command line arguments: {:?}", args);

    args.apply_to(&mut config);

    let options = config.into_options().context("Invalid parse settings")?;
    let parser = TableParser::new(options)?;
    debug!("Parse options: {:?}", parser.options());

    let mut result = parser
        .parse(&args.file)
        .with_context(|| format!("Could not read records from {}", args.file.display()))?;

    let options = parser.options();
    let named_columns = options.has_headers || options.explicit_headers().is_some();
    if let Some(field) = args.unique_field(named_columns) {
        let before = result.records.len();
        let mut seen = SeenValues::new();
        result.records = seen.filter(result.records, field.clone()).collect();
        info!(
            "Kept {} of {} records unique by {}",
            result.records.len(),
            before,
            field
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human => {
            write_table(&mut out, &result.columns, &result.records)?;
            if !args.quiet {
                print_summary(&mut out, &result)?;
            }
        }
        OutputFormat::Json => write_json(&mut out, &result)?,
        OutputFormat::Jsonl => write_jsonl(&mut out, &result.records)?,
    }
    out.flush()?;

    info!("Completed in {:.2?}", start_time.elapsed());
    Ok(result.stats)
}

fn print_summary(out: &mut impl Write, result: &ParseResult) -> anyhow::Result<()> {
    let stats = &result.stats;
    writeln!(out)?;
    writeln!(
        out,
        "{} {} records from {} rows",
        "Parsed".green().bold(),
        result.records.len(),
        stats.total_rows
    )?;
    if stats.rows_skipped > 0 {
        writeln!(
            out,
            "{} {} rows ({:.1}% success)",
            "Skipped".yellow().bold(),
            stats.rows_skipped,
            stats.success_rate()
        )?;
    }
    if let Some(reason) = &stats.stop_reason {
        writeln!(out, "{} {:?}", "Stopped early:".cyan(), reason)?;
    }
    Ok(())
}
