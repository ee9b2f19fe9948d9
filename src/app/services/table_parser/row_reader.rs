//! Logical row reading
//!
//! The `csv` reader silently drops empty lines, but blank rows matter here
//! (they are counted, and can end a parse). [`LogicalRows`] groups physical
//! lines into logical rows, keeping line breaks that fall inside quoted
//! fields, and hands each row's text to the CSV dialect for field splitting.

use std::io::{self, BufRead};

use crate::constants::BOM;

/// One logical row of the input, without its line terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 0-based index over every logical row of the file, blank ones included
    pub index: usize,

    /// 1-based physical line on which the row starts
    pub line: u64,

    pub text: String,
}

/// Quoting state while scanning a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Iterator over the logical rows of a buffered reader
///
/// Rows end at an unquoted `\n`, `\r\n` or bare `\r`.
#[derive(Debug)]
pub struct LogicalRows<R> {
    reader: R,
    delimiter: char,
    quote: char,
    /// Last chunk read from `reader`, consumed up to `pos`
    pending: String,
    pos: usize,
    next_index: usize,
    next_line: u64,
}

impl<R: BufRead> LogicalRows<R> {
    pub fn new(reader: R, delimiter: char, quote: char) -> Self {
        Self {
            reader,
            delimiter,
            quote,
            pending: String::new(),
            pos: 0,
            next_index: 0,
            next_line: 1,
        }
    }

    /// Read the next logical row, or `None` at end of input
    pub fn next_row(&mut self) -> io::Result<Option<RawRow>> {
        let line = self.next_line;
        let mut text = String::new();
        let mut state = ScanState::FieldStart;
        let mut started = false;

        loop {
            if self.pos >= self.pending.len() {
                self.pending.clear();
                self.pos = 0;
                if self.reader.read_line(&mut self.pending)? == 0 {
                    break;
                }
            }
            started = true;

            let segment = &self.pending[self.pos..];
            let scanned = scan_segment(segment, self.delimiter, self.quote, &mut state);
            text.push_str(&segment[..scanned.content_len]);
            self.pos += scanned.consumed;
            self.next_line += scanned.line_breaks;
            if scanned.terminated {
                break;
            }
        }

        if !started {
            return Ok(None);
        }

        if self.next_index == 0 && text.starts_with(BOM) {
            text.replace_range(..BOM.len_utf8(), "");
        }

        let index = self.next_index;
        self.next_index += 1;
        Ok(Some(RawRow { index, line, text }))
    }
}

impl<R: BufRead> Iterator for LogicalRows<R> {
    type Item = io::Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

/// Outcome of scanning part of a chunk
struct Scanned {
    /// Bytes belonging to the row, terminator excluded
    content_len: usize,
    /// Bytes consumed, terminator included
    consumed: usize,
    line_breaks: u64,
    terminated: bool,
}

fn scan_segment(segment: &str, delimiter: char, quote: char, state: &mut ScanState) -> Scanned {
    let bytes = segment.as_bytes();
    let mut line_breaks = 0;

    for (i, c) in segment.char_indices() {
        if c == '\n' || c == '\r' {
            let crlf = c == '\r' && bytes.get(i + 1) == Some(&b'\n');
            if *state != ScanState::Quoted {
                return Scanned {
                    content_len: i,
                    consumed: i + if crlf { 2 } else { 1 },
                    line_breaks: line_breaks + 1,
                    terminated: true,
                };
            }
            // `\r\n` counts once, on its `\n`
            if !crlf {
                line_breaks += 1;
            }
            continue;
        }
        *state = advance(*state, c, delimiter, quote);
    }

    Scanned {
        content_len: segment.len(),
        consumed: segment.len(),
        line_breaks,
        terminated: false,
    }
}

fn advance(state: ScanState, c: char, delimiter: char, quote: char) -> ScanState {
    match state {
        ScanState::FieldStart if c == quote => ScanState::Quoted,
        ScanState::FieldStart | ScanState::Unquoted if c == delimiter => ScanState::FieldStart,
        ScanState::FieldStart | ScanState::Unquoted => ScanState::Unquoted,
        ScanState::Quoted if c == quote => ScanState::QuoteInQuoted,
        ScanState::Quoted => ScanState::Quoted,
        ScanState::QuoteInQuoted if c == quote => ScanState::Quoted,
        ScanState::QuoteInQuoted if c == delimiter => ScanState::FieldStart,
        ScanState::QuoteInQuoted => ScanState::Unquoted,
    }
}
