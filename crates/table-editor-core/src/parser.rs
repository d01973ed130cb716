//! Table parser
//!
//! Turns raw lines into a [`Table`]. Parsing never fails: a line without any structure still
//! yields a single-cell row, and ragged or delimiter-less tables are normalized later by
//! [`complete_table`](crate::formatter::complete_table).

use std::collections::BTreeSet;

use regex::Regex;

use crate::options::Options;
use crate::table::{Cell, Row, Table};

/// Recognizes table rows and left margins for a given set of margin characters.
#[derive(Debug, Clone)]
pub struct RowMatcher {
    row: Regex,
    margin: Regex,
}

impl RowMatcher {
    /// Build a matcher allowing whitespace plus `left_margin_chars` before the first `|`.
    pub fn new(left_margin_chars: &BTreeSet<char>) -> Self {
        let class = margin_class(left_margin_chars);
        Self {
            row: Regex::new(&format!(r"^{class}*\|")).expect("valid table row regex"),
            margin: Regex::new(&format!(r"^{class}*$")).expect("valid margin regex"),
        }
    }

    /// Build a matcher from options.
    pub fn from_options(options: &Options) -> Self {
        Self::new(&options.left_margin_chars)
    }

    /// Returns `true` if `line` looks like a table row.
    pub fn is_table_row(&self, line: &str) -> bool {
        self.row.is_match(line)
    }

    /// Returns `true` if `text` consists only of margin characters.
    pub fn is_margin(&self, text: &str) -> bool {
        self.margin.is_match(text)
    }
}

fn margin_class(chars: &BTreeSet<char>) -> String {
    let mut class = String::from(r"[\s");
    for ch in chars {
        if matches!(ch, '|' | '\\' | '`') {
            continue;
        }
        class.push_str(&format!(r"\x{{{:x}}}", *ch as u32));
    }
    class.push(']');
    class
}

/// Split a line on unescaped `|`.
///
/// A `|` preceded by `\` or inside a closed code span does not split; both are kept verbatim in
/// the cell text.
pub fn split_cells(text: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut buf = String::new();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        match ch {
            '`' => {
                let fence = backtick_run(rest);
                match code_span_len(&rest[fence..], fence) {
                    Some(len) => {
                        buf.push_str(&rest[..fence + len]);
                        rest = &rest[fence + len..];
                    }
                    None => {
                        buf.push('`');
                        rest = &rest[1..];
                    }
                }
            }
            '\\' => {
                let escaped = rest[1..].chars().next().map_or(0, char::len_utf8);
                buf.push_str(&rest[..1 + escaped]);
                rest = &rest[1 + escaped..];
            }
            '|' => {
                cells.push(std::mem::take(&mut buf));
                rest = &rest[1..];
            }
            _ => {
                buf.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    cells.push(buf);
    cells
}

fn backtick_run(text: &str) -> usize {
    text.bytes().take_while(|&b| b == b'`').count()
}

/// Byte length of a code span body up to and including a closing run of exactly `fence`
/// backticks.
fn code_span_len(text: &str, fence: usize) -> Option<usize> {
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let run = backtick_run(rest);
        if run > 0 {
            pos += run;
            if run == fence {
                return Some(pos);
            }
        } else {
            pos += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    None
}

/// Parse a single line into a row.
pub fn read_row(text: &str, matcher: &RowMatcher) -> Row {
    let mut cells = split_cells(text);

    let margin_left = if cells.first().is_some_and(|first| matcher.is_margin(first)) {
        cells.remove(0)
    } else {
        String::new()
    };

    let has_margin_right = cells.len() > 1 && cells.last().is_some_and(|c| c.trim().is_empty());
    let margin_right = if has_margin_right {
        cells.pop().unwrap_or_default()
    } else {
        String::new()
    };

    Row::new(
        cells.into_iter().map(Cell::new).collect(),
        margin_left,
        margin_right,
    )
}

/// Parse lines into a table. Alignment is left to the delimiter row; no row is rejected.
pub fn read_table<S: AsRef<str>>(lines: &[S], options: &Options) -> Table {
    let matcher = RowMatcher::from_options(options);
    Table::new(
        lines
            .iter()
            .map(|line| read_row(line.as_ref(), &matcher))
            .collect(),
    )
}
