use clap::Parser;
use colored::Colorize;
use std::process;
use tabparse::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("{} {:#}", "Error:".red().bold(), error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("tabparse - typed reader for delimited text files");
    println!("================================================");
    println!();
    println!("USAGE:");
    println!("    tabparse <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    parse       Parse a file and print its records");
    println!("    columns     Print the column names a file resolves to");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Keep two columns and type them:");
    println!("    tabparse parse portfolio.csv --select name,price --types str,float");
    println!();
    println!("    # Headerless file with names supplied, as JSON lines:");
    println!("    tabparse parse data.csv --no-headers --headers name,shares --format jsonl");
    println!();
    println!("    # First record per name only:");
    println!("    tabparse parse portfolio.csv --unique-by name");
    println!();
    println!("For detailed help on any command, use:");
    println!("    tabparse <COMMAND> --help");
}
