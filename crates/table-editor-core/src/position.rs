//! Screen positions and logical table focus.

use std::cmp::Ordering;

/// A position in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Zero-based line index.
    pub row: usize,
    /// Zero-based column in characters within the line.
    pub column: usize,
}

impl Point {
    /// Create a new point.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A half-open range `[start, end)` in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// Inclusive start.
    pub start: Point,
    /// Exclusive end.
    pub end: Point,
}

impl Range {
    /// Create a new range.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// A logical cursor position inside a table.
///
/// - `row == -1` is above the table, `row == 0` the header, `row == 1` the delimiter row.
/// - `column == -1` is the left margin (before the first `|`).
/// - `offset` is a character offset into the focused cell's raw text, or into the line when
///   `column == -1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Focus {
    /// Row index.
    pub row: isize,
    /// Column index.
    pub column: isize,
    /// Character offset within the cell.
    pub offset: usize,
}

impl Focus {
    /// Create a new focus.
    pub fn new(row: isize, column: isize, offset: usize) -> Self {
        Self {
            row,
            column,
            offset,
        }
    }

    /// Returns `true` if both foci point at the same cell, ignoring the offset.
    pub fn pos_equals(&self, other: &Focus) -> bool {
        self.row == other.row && self.column == other.column
    }

    /// Copy with a different row.
    pub fn with_row(self, row: isize) -> Self {
        Self { row, ..self }
    }

    /// Copy with a different column.
    pub fn with_column(self, column: isize) -> Self {
        Self { column, ..self }
    }

    /// Copy with a different offset.
    pub fn with_offset(self, offset: usize) -> Self {
        Self { offset, ..self }
    }

    /// Row index as `usize`, if it points into the table.
    pub(crate) fn row_index(&self) -> Option<usize> {
        usize::try_from(self.row).ok()
    }

    /// Column index as `usize`, if it points at a cell.
    pub(crate) fn column_index(&self) -> Option<usize> {
        usize::try_from(self.column).ok()
    }
}
