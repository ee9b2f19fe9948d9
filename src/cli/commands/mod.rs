//! Command implementations for the tabparse CLI
//!
//! Each command is implemented in its own module:
//! - `parse`: read a file into records and print them
//! - `columns`: list the columns a file resolves to

pub mod columns;
pub mod parse;
pub mod shared;

use crate::cli::args::{Args, Commands};

/// Dispatch to the subcommand named in `args`
///
/// Callers handle the no-subcommand case before calling this.
pub fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Some(Commands::Parse(parse_args)) => parse::run_parse(parse_args).map(|_| ()),
        Some(Commands::Columns(columns_args)) => columns::run_columns(columns_args).map(|_| ()),
        None => Err(anyhow::anyhow!("No command given; see --help")),
    }
}
