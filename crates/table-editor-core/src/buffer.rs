//! In-memory host document
//!
//! [`TextBuffer`] implements [`TextEditor`] over a [`Rope`]. It is the reference host used by the
//! tests and a starting point for embedding the engine in tools without their own buffer.
//!
//! Line semantics match a typical editor: `N` newlines make `N + 1` lines, and a trailing
//! newline yields a final empty line. Written lines use the line ending detected when the buffer
//! was created.

use std::cell::OnceCell;
use std::sync::LazyLock;

use regex::Regex;
use ropey::Rope;

use crate::error::EditorError;
use crate::line_ending::LineEnding;
use crate::position::{Point, Range};
use crate::text_editor::TextEditor;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(`{3,}|~{3,})").expect("valid code fence regex"));

/// Marks every row that is a fence line or lies inside a fenced code block.
///
/// A block is closed only by a fence of the same character that is at least as long as the
/// opening one.
fn fenced_rows(rope: &Rope) -> Vec<bool> {
    let mut open: Option<(u8, usize)> = None;
    rope.lines()
        .map(|line| {
            let line = String::from(line);
            let fence = FENCE
                .captures(&line)
                .and_then(|caps| caps.get(1))
                .map(|m| (m.as_str().as_bytes()[0], m.len()));
            match (open, fence) {
                (None, Some(fence)) => {
                    open = Some(fence);
                    true
                }
                (Some((marker, len)), Some((closing, closing_len)))
                    if marker == closing && closing_len >= len =>
                {
                    open = None;
                    true
                }
                (Some(_), _) => true,
                (None, None) => false,
            }
        })
        .collect()
}

/// A line operation performed on a [`TextBuffer`], recorded in its edit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferEdit {
    /// A line was inserted at `row`.
    InsertLine {
        /// Row of the new line.
        row: usize,
    },
    /// Line `row` was deleted.
    DeleteLine {
        /// Deleted row.
        row: usize,
    },
    /// Lines `start..end` were replaced with `count` lines.
    ReplaceLines {
        /// First replaced row.
        start: usize,
        /// Exclusive end row.
        end: usize,
        /// Number of replacement lines.
        count: usize,
    },
}

/// Rope-backed document with a cursor, an optional selection and transactional edits.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    rope: Rope,
    cursor: Point,
    selection: Option<Range>,
    edit_log: Vec<BufferEdit>,
    /// Remaining successful writes before writes start failing.
    write_budget: Option<usize>,
    line_ending: LineEnding,
    /// Fence state per row, rebuilt lazily after each edit.
    fenced: OnceCell<Vec<bool>>,
}

impl TextBuffer {
    /// Create a buffer from text.
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Point::default(),
            selection: None,
            edit_log: Vec::new(),
            write_budget: None,
            line_ending: LineEnding::detect(text),
            fenced: OnceCell::new(),
        }
    }

    /// Create a buffer from lines joined with `\n`.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let text = lines
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(&text)
    }

    /// Full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// All lines, without terminators.
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count())
            .filter_map(|row| self.line(row))
            .collect()
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line ending used for written lines.
    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Current selection, if any.
    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    /// Line operations performed so far.
    pub fn edit_log(&self) -> &[BufferEdit] {
        &self.edit_log
    }

    /// Forget recorded line operations.
    pub fn clear_edit_log(&mut self) {
        self.edit_log.clear();
    }

    /// Make every write after the next `writes` successful ones fail with a host error.
    pub fn fail_after_writes(&mut self, writes: usize) {
        self.write_budget = Some(writes);
    }

    fn check_write(&mut self) -> Result<(), EditorError> {
        match self.write_budget.as_mut() {
            Some(0) => Err(EditorError::Host("buffer is read-only".into())),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn splice_lines(&mut self, start: usize, end: usize, lines: &[String]) {
        self.fenced.take();
        let line_count = self.rope.len_lines();
        let newline = self.line_ending.as_str();
        let joined = self.line_ending.join(lines);

        if start == line_count {
            if !lines.is_empty() {
                self.rope
                    .insert(self.rope.len_chars(), &format!("{newline}{joined}"));
            }
            return;
        }

        let start_char = self.rope.line_to_char(start);
        if end < line_count {
            let end_char = self.rope.line_to_char(end);
            self.rope.remove(start_char..end_char);
            if !lines.is_empty() {
                self.rope.insert(start_char, &format!("{joined}{newline}"));
            }
            return;
        }

        // Replacing through the last line: the preceding line break goes too when nothing
        // replaces the removed lines.
        let end_char = self.rope.len_chars();
        if lines.is_empty() && start > 0 {
            let mut break_start = start_char - 1;
            if break_start > 0 && self.rope.char(break_start - 1) == '\r' {
                break_start -= 1;
            }
            self.rope.remove(break_start..end_char);
        } else {
            self.rope.remove(start_char..end_char);
            self.rope.insert(start_char, &joined);
        }
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextEditor for TextBuffer {
    fn cursor_position(&self) -> Point {
        self.cursor
    }

    fn set_cursor_position(&mut self, pos: Point) {
        self.cursor = pos;
        self.selection = None;
    }

    fn set_selection_range(&mut self, range: Range) {
        self.cursor = range.end;
        self.selection = Some(range);
    }

    fn last_row(&self) -> usize {
        self.rope.len_lines().saturating_sub(1)
    }

    fn accepts_table_edit(&self, row: usize) -> bool {
        self.fenced
            .get_or_init(|| fenced_rows(&self.rope))
            .get(row)
            .is_some_and(|fenced| !fenced)
    }

    fn line(&self, row: usize) -> Option<String> {
        let line = self.rope.get_line(row)?;
        let mut text = String::from(line);
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    fn insert_line(&mut self, row: usize, line: &str) -> Result<(), EditorError> {
        let line_count = self.rope.len_lines();
        if row > line_count {
            return Err(EditorError::RowOutOfRange {
                row,
                last_row: self.last_row(),
            });
        }
        self.check_write()?;
        self.splice_lines(row, row, &[line.to_string()]);
        self.edit_log.push(BufferEdit::InsertLine { row });
        Ok(())
    }

    fn delete_line(&mut self, row: usize) -> Result<(), EditorError> {
        if row >= self.rope.len_lines() {
            return Err(EditorError::RowOutOfRange {
                row,
                last_row: self.last_row(),
            });
        }
        self.check_write()?;
        self.splice_lines(row, row + 1, &[]);
        self.edit_log.push(BufferEdit::DeleteLine { row });
        Ok(())
    }

    fn replace_lines(
        &mut self,
        start: usize,
        end: usize,
        lines: &[String],
    ) -> Result<(), EditorError> {
        if start > end || end > self.rope.len_lines() {
            return Err(EditorError::InvalidRange { start, end });
        }
        self.check_write()?;
        self.splice_lines(start, end, lines);
        self.edit_log.push(BufferEdit::ReplaceLines {
            start,
            end,
            count: lines.len(),
        });
        Ok(())
    }

    fn transact<F>(&mut self, f: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut Self) -> Result<(), EditorError>,
    {
        let rope = self.rope.clone();
        let cursor = self.cursor;
        let selection = self.selection;
        let log_len = self.edit_log.len();

        let result = f(self);
        if result.is_err() {
            self.rope = rope;
            self.cursor = cursor;
            self.selection = selection;
            self.edit_log.truncate(log_len);
            self.fenced.take();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_lines_and_last_row() {
        let buffer = TextBuffer::new("a\r\nb\nc");
        assert_eq!(buffer.lines(), vec!["a", "b", "c"]);
        assert_eq!(buffer.last_row(), 2);
        assert_eq!(buffer.line(3), None);

        let trailing = TextBuffer::new("a\n");
        assert_eq!(trailing.lines(), vec!["a", ""]);
    }

    #[test]
    fn test_insert_line() {
        let mut buffer = TextBuffer::from_lines(&["a", "c"]);
        buffer.insert_line(1, "b").unwrap();
        buffer.insert_line(3, "d").unwrap();
        buffer.insert_line(0, "_").unwrap();
        assert_eq!(buffer.lines(), vec!["_", "a", "b", "c", "d"]);
        assert!(buffer.insert_line(9, "x").is_err());
    }

    #[test]
    fn test_delete_line() {
        let mut buffer = TextBuffer::from_lines(&["a", "b", "c"]);
        buffer.delete_line(2).unwrap();
        assert_eq!(buffer.text(), "a\nb");
        buffer.delete_line(0).unwrap();
        assert_eq!(buffer.text(), "b");
        buffer.delete_line(0).unwrap();
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_replace_lines() {
        let mut buffer = TextBuffer::from_lines(&["a", "b", "c", "d"]);
        buffer.replace_lines(1, 3, &strings(&["x"])).unwrap();
        assert_eq!(buffer.lines(), vec!["a", "x", "d"]);

        buffer.replace_lines(1, 3, &strings(&["y", "z", "w"])).unwrap();
        assert_eq!(buffer.lines(), vec!["a", "y", "z", "w"]);

        buffer.replace_lines(2, 2, &strings(&["k"])).unwrap();
        assert_eq!(buffer.lines(), vec!["a", "y", "k", "z", "w"]);

        assert!(buffer.replace_lines(3, 2, &[]).is_err());
        assert!(buffer.replace_lines(0, 9, &[]).is_err());
        assert_eq!(buffer.edit_log().len(), 3);
    }

    #[test]
    fn test_code_fences_reject_table_edits() {
        let buffer = TextBuffer::from_lines(&["| a |", "```", "| b |", "```", "| c |"]);
        assert!(buffer.accepts_table_edit(0));
        assert!(!buffer.accepts_table_edit(1));
        assert!(!buffer.accepts_table_edit(2));
        assert!(!buffer.accepts_table_edit(3));
        assert!(buffer.accepts_table_edit(4));
        assert!(!buffer.accepts_table_edit(5));
    }

    #[test]
    fn test_fences_close_on_matching_marker() {
        let buffer = TextBuffer::from_lines(&["```", "~~~", "| a |", "````", "| b |"]);
        assert!(!buffer.accepts_table_edit(1));
        assert!(!buffer.accepts_table_edit(2));
        assert!(!buffer.accepts_table_edit(3));
        assert!(buffer.accepts_table_edit(4));

        let buffer = TextBuffer::from_lines(&["````", "```", "| a |", "````", "| b |"]);
        assert!(!buffer.accepts_table_edit(2));
        assert!(buffer.accepts_table_edit(4));
    }

    #[test]
    fn test_fence_state_follows_edits() {
        let mut buffer = TextBuffer::from_lines(&["| a |", "| b |"]);
        assert!(buffer.accepts_table_edit(1));

        buffer.insert_line(1, "```").unwrap();
        assert!(!buffer.accepts_table_edit(2));

        buffer.delete_line(1).unwrap();
        assert!(buffer.accepts_table_edit(1));
    }

    #[test]
    fn test_crlf_is_preserved() {
        let mut buffer = TextBuffer::new("a\r\nb\r\nc");
        assert_eq!(buffer.line_ending(), LineEnding::Crlf);

        buffer.replace_lines(1, 2, &strings(&["x", "y"])).unwrap();
        buffer.insert_line(4, "z").unwrap();
        assert_eq!(buffer.text(), "a\r\nx\r\ny\r\nc\r\nz");

        buffer.delete_line(4).unwrap();
        buffer.replace_lines(2, 4, &[]).unwrap();
        assert_eq!(buffer.text(), "a\r\nx");
    }

    #[test]
    fn test_format_keeps_crlf_line_endings() {
        use crate::options::Options;
        use crate::table_editor::{TableCommand, TableEditor};

        let mut buffer = TextBuffer::new("x\r\n| a | b |\r\n| 1 | 2 |\r\ny");
        buffer.set_cursor_position(Point::new(1, 2));
        let mut editor = TableEditor::new(buffer);
        editor
            .execute(TableCommand::Format, &Options::default())
            .unwrap();

        assert_eq!(
            editor.editor().text(),
            "x\r\n| a   | b   |\r\n| --- | --- |\r\n| 1   | 2   |\r\ny"
        );
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let mut buffer = TextBuffer::from_lines(&["a", "b"]);
        buffer.set_cursor_position(Point::new(1, 1));
        buffer.fail_after_writes(1);

        let result = buffer.transact(|buffer| {
            buffer.insert_line(0, "x")?;
            buffer.set_cursor_position(Point::new(0, 0));
            buffer.insert_line(0, "y")
        });

        assert!(matches!(result, Err(EditorError::Host(_))));
        assert_eq!(buffer.lines(), vec!["a", "b"]);
        assert_eq!(buffer.cursor_position(), Point::new(1, 1));
        assert!(buffer.edit_log().is_empty());
    }

    #[test]
    fn test_selection_moves_cursor() {
        let mut buffer = TextBuffer::new("abc");
        let range = Range::new(Point::new(0, 1), Point::new(0, 2));
        buffer.set_selection_range(range);
        assert_eq!(buffer.selection(), Some(range));
        assert_eq!(buffer.cursor_position(), Point::new(0, 2));
        buffer.set_cursor_position(Point::new(0, 0));
        assert_eq!(buffer.selection(), None);
    }
}
