//! Tests for the main table parser functionality

use super::*;
use crate::Error;
use crate::app::models::{Record, Value};
use crate::app::services::table_parser::{
    Converter, ParseOptions, RowErrorKind, StopReason, TableParser, parse_table,
};

fn parser(options: ParseOptions) -> TableParser {
    TableParser::new(options).unwrap()
}

fn str_values(record: &Record) -> Vec<String> {
    record.values().iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_header_row_becomes_column_set() {
    let temp_file = create_temp_file(&create_portfolio_csv());
    let result = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();

    assert_eq!(result.columns, vec!["name", "shares", "price"]);
    assert_eq!(result.records.len(), 7);
    assert_eq!(result.stats.records_parsed, 7);
    assert_eq!(result.stats.total_rows, 7);

    let first = result.records[0].as_named().unwrap();
    assert_eq!(first.get("name"), Some(&Value::from("AA")));
    assert_eq!(first.get("shares"), Some(&Value::from("100")));
    assert_eq!(first.get("price"), Some(&Value::from("32.20")));
}

#[test]
fn test_header_fields_are_trimmed_and_bom_stripped() {
    let temp_file = create_temp_file_from_lines(&["\u{feff} name , shares ,price", "AA,1,2"]);
    let result = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();
    assert_eq!(result.columns, vec!["name", "shares", "price"]);

    let temp_file = create_temp_file_from_lines(&["\u{ef}\u{bb}\u{bf}name,shares", "AA,1"]);
    let result = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();
    assert_eq!(result.columns, vec!["name", "shares"]);
}

#[test]
fn test_select_controls_key_order() {
    let temp_file = create_temp_file_from_lines(&["a,b,c", "1,2,3", "4,5,6"]);
    let result = parser(ParseOptions::new().with_select(["b", "a"]))
        .parse(temp_file.path())
        .unwrap();

    assert_eq!(result.columns, vec!["b", "a"]);
    for record in &result.records {
        let keys: Vec<&str> = record.as_named().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
    assert_eq!(str_values(&result.records[0]), vec!["2", "1"]);
    assert_eq!(str_values(&result.records[1]), vec!["5", "4"]);
}

#[test]
fn test_select_with_headers_fails_before_io() {
    let options = ParseOptions::new()
        .without_headers()
        .with_headers(["a", "b"])
        .with_select(["a"]);

    let err = parse_table("/definitely/not/here.csv", &options).unwrap_err();
    assert!(err.is_configuration(), "unexpected error: {}", err);
}

#[test]
fn test_max_entries_returns_first_records() {
    let mut lines = vec!["n".to_string()];
    lines.extend((1..=10).map(|i| i.to_string()));
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let temp_file = create_temp_file_from_lines(&lines);

    let result = parser(ParseOptions::new().with_max_entries(3))
        .parse(temp_file.path())
        .unwrap();

    assert_eq!(result.records.len(), 3);
    let values: Vec<String> = result.records.iter().flat_map(str_values).collect();
    assert_eq!(values, vec!["1", "2", "3"]);
    assert_eq!(result.stats.stop_reason, Some(StopReason::MaxEntries));
}

#[test]
fn test_stop_on_blank_lines() {
    let temp_file = create_temp_file_from_lines(&["v", "r1", "r2", "", "r3"]);

    let stopped = parser(ParseOptions::new().with_stop_on_blank_lines(true))
        .parse(temp_file.path())
        .unwrap();
    let values: Vec<String> = stopped.records.iter().flat_map(str_values).collect();
    assert_eq!(values, vec!["r1", "r2"]);
    assert_eq!(
        stopped.stats.stop_reason,
        Some(StopReason::BlankLine { row: 3 })
    );

    let skipped = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();
    let values: Vec<String> = skipped.records.iter().flat_map(str_values).collect();
    assert_eq!(values, vec!["r1", "r2", "r3"]);
    assert_eq!(skipped.stats.blank_rows, 1);
    assert!(!skipped.stats.stopped_early());
}

#[test]
fn test_rows_of_empty_fields_are_blank() {
    let temp_file = create_temp_file_from_lines(&["a,b", "1,2", ",", "  , ", "3,4"]);

    let result = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();
    assert_eq!(result.records.len(), 3);
    assert_eq!(result.stats.blank_rows, 1);
    assert_eq!(result.records[1].get("a"), Some(&Value::from("  ")));

    let result = parser(ParseOptions::new().with_stop_on_blank_lines(true))
        .parse(temp_file.path())
        .unwrap();
    assert_eq!(result.records.len(), 1);
}

#[test]
fn test_carriage_return_line_endings() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), b"name,shares\rAA,1\rIBM,2\rCAT,3\r").unwrap();
    let result = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();
    assert_eq!(result.columns, vec!["name", "shares"]);
    assert_eq!(result.records.len(), 3);

    std::fs::write(temp_file.path(), "name,shares\nAA,1\rIBM,2\r\nCAT,3\n").unwrap();
    let result = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();
    let names: Vec<String> = result
        .records
        .iter()
        .map(|r| r.get("name").unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["AA", "IBM", "CAT"]);
    assert!(result.stats.errors.is_empty());
}

#[test]
fn test_whitespace_row_does_not_stop_parse() {
    let temp_file = create_temp_file_from_lines(&["a", "x", "   ", "y"]);

    let result = parser(
        ParseOptions::new()
            .without_headers()
            .with_stop_on_blank_lines(true),
    )
    .parse(temp_file.path())
    .unwrap();

    let values: Vec<String> = result.records.iter().flat_map(str_values).collect();
    assert_eq!(values, vec!["a", "x", "   ", "y"]);
    assert!(!result.stats.stopped_early());
}

#[test]
fn test_conversion_failure_drops_only_that_row() {
    let mut lines = vec!["id".to_string()];
    lines.extend((1..=10).map(|i| {
        if i == 5 {
            "bad".to_string()
        } else {
            i.to_string()
        }
    }));
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    let temp_file = create_temp_file_from_lines(&lines);

    let mut observer = CollectingObserver::default();
    let result = parser(ParseOptions::new().with_types([Converter::int()]))
        .parse_with_observer(temp_file.path(), &mut observer)
        .unwrap();

    assert_eq!(result.records.len(), 9);
    assert!(
        result
            .records
            .iter()
            .all(|r| r.get("id").and_then(Value::as_i64) != Some(5))
    );

    assert_eq!(observer.seen.len(), 1);
    let error = &observer.seen[0];
    assert_eq!(error.row, 5);
    assert_eq!(error.line, 6);
    assert_eq!(error.raw, vec!["bad"]);
    match &error.kind {
        RowErrorKind::Conversion {
            column,
            value,
            reason,
            ..
        } => {
            assert_eq!(column.as_deref(), Some("id"));
            assert_eq!(value, "bad");
            assert!(reason.contains("invalid literal for int"));
        }
        other => panic!("unexpected error kind: {:?}", other),
    }
    assert!(error.to_string().starts_with("Row 5"));

    assert_eq!(result.stats.rows_skipped, 1);
    assert_eq!(result.stats.errors, observer.seen);
    assert_eq!(result.stats.success_rate(), 90.0);
}

#[test]
fn test_ignore_errors_silences_observer() {
    let temp_file = create_temp_file_from_lines(&["n", "1", "x", "3"]);
    let mut calls = 0;

    let result = parser(
        ParseOptions::new()
            .with_types([Converter::int()])
            .with_ignore_errors(true),
    )
    .parse_with_observer(temp_file.path(), &mut |_: &RowError| calls += 1)
    .unwrap();

    assert_eq!(result.records.len(), 2);
    assert_eq!(calls, 0);
    assert_eq!(result.stats.errors.len(), 1);
}

#[test]
fn test_missing_selected_column() {
    let temp_file = create_temp_file(&create_portfolio_csv());
    let err = parser(ParseOptions::new().with_select(["name", "date"]))
        .parse(temp_file.path())
        .unwrap_err();

    match err {
        Error::ColumnNotFound {
            column, available, ..
        } => {
            assert_eq!(column, "date");
            assert_eq!(available, vec!["name", "shares", "price"]);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_typed_columns() {
    let temp_file = create_temp_file(&create_portfolio_csv());
    let result = parser(ParseOptions::new().with_types([
        Converter::string(),
        Converter::int(),
        Converter::float(),
    ]))
    .parse(temp_file.path())
    .unwrap();

    let total: f64 = result
        .records
        .iter()
        .map(|r| {
            let shares = r.get("shares").and_then(Value::as_i64).unwrap() as f64;
            let price = r.get("price").and_then(Value::as_f64).unwrap();
            shares * price
        })
        .sum();
    assert!((total - 44671.15).abs() < 1e-6);
}

#[test]
fn test_missing_converters_keep_raw_text() {
    let temp_file = create_temp_file_from_lines(&["name,shares,price", "AA, 100 , 32.20 "]);

    let result = parser(ParseOptions::new().with_optional_types(vec![
        None,
        Some(Converter::int()),
    ]))
    .parse(temp_file.path())
    .unwrap();

    let record = result.records[0].as_named().unwrap();
    assert_eq!(record.get("name"), Some(&Value::from("AA")));
    assert_eq!(record.get("shares"), Some(&Value::Int(100)));
    assert_eq!(record.get("price"), Some(&Value::from(" 32.20 ")));
}

#[test]
fn test_headerless_file_yields_tuples() {
    let temp_file = create_temp_file(&create_headerless_csv());
    let result = parser(
        ParseOptions::new()
            .without_headers()
            .with_types([Converter::string(), Converter::int(), Converter::float()]),
    )
    .parse(temp_file.path())
    .unwrap();

    assert!(result.columns.is_empty());
    assert_eq!(result.records.len(), 3);
    assert_eq!(
        result.records[0],
        Record::Tuple(vec![Value::from("AA"), Value::Int(100), Value::Float(32.2)])
    );
}

#[test]
fn test_explicit_headers_name_columns() {
    let temp_file = create_temp_file(&create_headerless_csv());
    let result = parser(
        ParseOptions::new()
            .without_headers()
            .with_headers(["name", "shares", "price"]),
    )
    .parse(temp_file.path())
    .unwrap();

    assert_eq!(result.records.len(), 3);
    assert_eq!(result.records[1].get("name"), Some(&Value::from("IBM")));
}

#[test]
fn test_quoted_fields() {
    let temp_file = create_temp_file_from_lines(&[
        "name,note",
        "\"Smith, J\",\"first line",
        "second line\"",
        "\"O\"\"Brien\",plain",
    ]);
    let result = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.records[0].get("name"), Some(&Value::from("Smith, J")));
    assert_eq!(
        result.records[0].get("note"),
        Some(&Value::from("first line\nsecond line"))
    );
    assert_eq!(result.records[1].get("name"), Some(&Value::from("O\"Brien")));
}

#[test]
fn test_custom_delimiter() {
    let temp_file = create_temp_file_from_lines(&["a;b", "1;2"]);
    let result = parser(ParseOptions::new().with_delimiter(';'))
        .parse(temp_file.path())
        .unwrap();
    assert_eq!(result.columns, vec!["a", "b"]);
    assert_eq!(str_values(&result.records[0]), vec!["1", "2"]);

    let temp_file = create_temp_file_from_lines(&["a\tb", "1\t2"]);
    let result = parser(ParseOptions::new().with_delimiter('\t'))
        .parse(temp_file.path())
        .unwrap();
    assert_eq!(result.columns, vec!["a", "b"]);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = parser(ParseOptions::default())
        .parse("/definitely/not/here.csv")
        .unwrap_err();
    match err {
        Error::Io { path, .. } => assert!(path.ends_with("here.csv")),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_short_row_under_selection_is_dropped() {
    let temp_file = create_temp_file_from_lines(&["a,b,c", "1,2,3", "4", "7,8,9"]);
    let result = parser(ParseOptions::new().with_select(["c"]))
        .parse(temp_file.path())
        .unwrap();

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.stats.errors.len(), 1);
    assert_eq!(
        result.stats.errors[0].kind,
        RowErrorKind::MissingField {
            column: "c".to_string(),
            position: 2
        }
    );
}

#[test]
fn test_short_row_without_selection_has_fewer_keys() {
    let temp_file = create_temp_file_from_lines(&["a,b,c", "1", "1,2,3,4"]);
    let result = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();

    assert_eq!(result.records[0].len(), 1);
    assert_eq!(result.records[1].len(), 3);
}

#[test]
fn test_duplicate_header_names() {
    let temp_file = create_temp_file_from_lines(&["a,b,a", "1,2,3"]);
    let err = parser(ParseOptions::default())
        .parse(temp_file.path())
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateColumn { ref column, .. } if column == "a"));
}

#[test]
fn test_leading_blank_rows_before_header() {
    let temp_file = create_temp_file_from_lines(&["", "", "n", "1", "oops"]);
    let result = parser(ParseOptions::new().with_types([Converter::int()]))
        .parse(temp_file.path())
        .unwrap();

    assert_eq!(result.columns, vec!["n"]);
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.stats.errors[0].row, 4);
    assert_eq!(result.stats.blank_rows, 0);
}

#[test]
fn test_read_columns() {
    let temp_file = create_temp_file(&create_portfolio_csv());
    let columns = parser(ParseOptions::new().with_select(["price", "name"]))
        .read_columns(temp_file.path())
        .unwrap();
    assert_eq!(columns, vec!["price", "name"]);
}

#[test]
fn test_empty_file() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let result = parser(ParseOptions::default()).parse(temp_file.path()).unwrap();
    assert!(result.columns.is_empty());
    assert!(result.records.is_empty());
    assert_eq!(result.stats.success_rate(), 0.0);
}

#[test]
fn test_parse_table_returns_records() {
    let temp_file = create_temp_file(&create_portfolio_csv());
    let records = parse_table(
        temp_file.path(),
        &ParseOptions::new().with_select(["name"]).with_max_entries(2),
    )
    .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].get("name"), Some(&Value::from("IBM")));
}
