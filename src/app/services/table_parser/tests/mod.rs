//! Test utilities for table parser testing
//!
//! This module provides sample files and helper functions used across the
//! different test modules.

use std::io::Write;
use tempfile::NamedTempFile;

use super::observer::RowError;

mod parser_tests;

/// Portfolio file with a header row and typed columns
pub fn create_portfolio_csv() -> String {
    r#"name,shares,price
"AA",100,32.20
"IBM",50,91.10
"CAT",150,83.44
"MSFT",200,51.23
"GE",95,40.37
"MSFT",50,65.10
"IBM",100,70.44"#
        .to_string()
}

/// Same data without a header row
pub fn create_headerless_csv() -> String {
    r#"AA,100,32.20
IBM,50,91.10
CAT,150,83.44"#
        .to_string()
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{}", content).unwrap();
    temp_file
}

/// Helper to create a temporary file from lines, joined exactly as given
pub fn create_temp_file_from_lines(lines: &[&str]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(temp_file, "{}", line).unwrap();
    }
    temp_file
}

/// Observer that keeps every error it is shown
#[derive(Debug, Default)]
pub struct CollectingObserver {
    pub seen: Vec<RowError>,
}

impl super::observer::RowErrorObserver for CollectingObserver {
    fn on_row_error(&mut self, error: &RowError) {
        self.seen.push(error.clone());
    }
}
