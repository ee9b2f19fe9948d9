//! Columns command implementation

use anyhow::Context;
use std::io::{self, Write};

use super::shared::{load_configuration, resolve_log_level, setup_logging, write_json};
use crate::app::services::table_parser::TableParser;
use crate::cli::args::{ColumnsArgs, OutputFormat};

/// Print the column names the file resolves to, one per line
pub fn run_columns(args: ColumnsArgs) -> anyhow::Result<Vec<String>> {
    let mut config = load_configuration(args.config_file.as_deref())?;
    setup_logging(resolve_log_level(args.get_log_level(), args.verbose > 0, &config))?;

    args.apply_to(&mut config);
    // Selection only affects records; the column listing shows the whole file.
    config.select.clear();

    let parser = TableParser::new(config.into_options().context("Invalid parse settings")?)?;
    let columns = parser
        .read_columns(&args.file)
        .with_context(|| format!("Could not read columns from {}", args.file.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.output_format {
        OutputFormat::Human | OutputFormat::Jsonl => {
            for (i, column) in columns.iter().enumerate() {
                writeln!(out, "{:>3}  {}", i, column)?;
            }
        }
        OutputFormat::Json => write_json(&mut out, &columns)?,
    }
    out.flush()?;

    Ok(columns)
}
