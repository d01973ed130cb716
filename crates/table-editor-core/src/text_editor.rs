//! Host editor capability interface.
//!
//! The table engine reads and writes the document only through [`TextEditor`]. Terminal UIs,
//! IDE plugins and test harnesses each provide one implementation; the engine never inspects
//! which one it holds. [`TextBuffer`](crate::TextBuffer) is the in-memory implementation.

use crate::error::EditorError;
use crate::position::{Point, Range};

/// Line-based access to a host document, plus cursor and transaction control.
///
/// Rows are zero-based line indices; columns are counted in `char`s.
pub trait TextEditor {
    /// Current cursor position.
    fn cursor_position(&self) -> Point;

    /// Move the cursor, clearing any selection.
    fn set_cursor_position(&mut self, pos: Point);

    /// Select `range`.
    fn set_selection_range(&mut self, range: Range);

    /// Index of the last line.
    fn last_row(&self) -> usize;

    /// Returns `false` if the host forbids table editing on `row` (e.g. inside a code block).
    fn accepts_table_edit(&self, row: usize) -> bool;

    /// Text of line `row` without its line terminator, or `None` past the end.
    fn line(&self, row: usize) -> Option<String>;

    /// Insert `line` so that it becomes line `row`.
    fn insert_line(&mut self, row: usize, line: &str) -> Result<(), EditorError>;

    /// Delete line `row`.
    fn delete_line(&mut self, row: usize) -> Result<(), EditorError> {
        self.replace_lines(row, row + 1, &[])
    }

    /// Replace lines `start..end` with `lines`.
    fn replace_lines(&mut self, start: usize, end: usize, lines: &[String])
    -> Result<(), EditorError>;

    /// Run `f` as one logical edit.
    ///
    /// If `f` fails, implementations must not leave any of its line changes visible. The
    /// default implementation provides no rollback and suits hosts whose edits are already
    /// grouped by the caller.
    fn transact<F>(&mut self, f: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut Self) -> Result<(), EditorError>,
        Self: Sized,
    {
        f(self)
    }
}
