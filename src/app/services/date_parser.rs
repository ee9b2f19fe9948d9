//! Date parsing against a fixed, ordered list of layouts
//!
//! Layouts use strptime-style directives. The first layout that matches the
//! whole input and yields a real calendar date wins. Layouts without a year
//! take a default year (the current one unless a caller supplies its own).

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, trace};

/// Supported layouts, tried in this order
pub const DATE_FORMATS: &[&str] = &[
    "%m-%d-%Y", "%m-%d-%y", "%m/%d/%Y", "%m/%d/%y", "%m%d%Y", "%m%d%y", "%m/%d", "%m-%d", "%m%d",
    "%Y%m%d", "%Y-%m-%d", "%Y/%m/%d", "%y%m%d",
];

// Directive patterns follow strptime: unpadded month/day are accepted and
// alternatives are ordered so that two-digit forms are preferred.
const MONTH_PATTERN: &str = "(?P<m>1[0-2]|0[1-9]|[1-9])";
const DAY_PATTERN: &str = "(?P<d>3[01]|[12][0-9]|0[1-9]|[1-9])";
const FULL_YEAR_PATTERN: &str = "(?P<Y>[0-9]{4})";
const SHORT_YEAR_PATTERN: &str = "(?P<y>[0-9]{2})";

/// Two-digit years below this pivot belong to the 2000s
const SHORT_YEAR_PIVOT: i32 = 69;

struct DateLayout {
    format: &'static str,
    pattern: Regex,
}

static DATE_LAYOUTS: Lazy<Vec<DateLayout>> = Lazy::new(|| {
    DATE_FORMATS
        .iter()
        .map(|&format| DateLayout {
            format,
            pattern: compile_layout(format),
        })
        .collect()
});

/// Translate a strptime-style layout into an anchored regex
fn compile_layout(format: &str) -> Regex {
    let mut pattern = String::from("^");
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            pattern.push_str(&regex::escape(&c.to_string()));
            continue;
        }
        match chars.next() {
            Some('m') => pattern.push_str(MONTH_PATTERN),
            Some('d') => pattern.push_str(DAY_PATTERN),
            Some('Y') => pattern.push_str(FULL_YEAR_PATTERN),
            Some('y') => pattern.push_str(SHORT_YEAR_PATTERN),
            Some(other) => pattern.push_str(&regex::escape(&format!("%{}", other))),
            None => pattern.push_str("%"),
        }
    }
    pattern.push('$');

    Regex::new(&pattern).expect("date layouts compile to valid patterns")
}

/// Parse a date using the current year for year-less layouts
///
/// Returns `None` for empty input, and logs an error before returning `None`
/// when no layout matches.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    parse_date_with_year(input, Local::now().year())
}

/// Parse a date, filling year-less layouts with `default_year`
pub fn parse_date_with_year(input: &str, default_year: i32) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }

    for layout in DATE_LAYOUTS.iter() {
        if let Some(date) = match_layout(layout, input, default_year) {
            trace!("Parsed date '{}' with layout '{}'", input, layout.format);
            return Some(date);
        }
    }

    error!("Failed to parse date '{}'", input);
    None
}

fn match_layout(layout: &DateLayout, input: &str, default_year: i32) -> Option<NaiveDate> {
    let captures = layout.pattern.captures(input)?;

    let month: u32 = captures.name("m")?.as_str().parse().ok()?;
    let day: u32 = captures.name("d")?.as_str().parse().ok()?;
    let year = if let Some(full) = captures.name("Y") {
        full.as_str().parse().ok()?
    } else if let Some(short) = captures.name("y") {
        expand_short_year(short.as_str().parse().ok()?)
    } else {
        default_year
    };

    // Matching digits can still name an impossible date (02-30)
    NaiveDate::from_ymd_opt(year, month, day)
}

fn expand_short_year(year: i32) -> i32 {
    if year < SHORT_YEAR_PIVOT {
        2000 + year
    } else {
        1900 + year
    }
}
