//! Table editing commands
//!
//! [`TableEditor`] wraps a host [`TextEditor`] and runs one [`TableCommand`] at a time:
//!
//! 1. locate the contiguous run of table rows around the cursor ([`TableEditor::find_table`]);
//! 2. complete, transform and format the table, and compute the new focus;
//! 3. write the new lines as a minimal edit script and place the cursor, in one transaction.
//!
//! A command issued while the cursor is not in a table does nothing and returns
//! [`CommandResult::NoTable`].
//!
//! # Example
//!
//! ```rust
//! use table_editor_core::{Options, Point, TableCommand, TableEditor, TextBuffer, TextEditor};
//!
//! let mut buffer = TextBuffer::from_lines(&["| a | b |", "| 1 | 22 |"]);
//! buffer.set_cursor_position(Point::new(0, 2));
//!
//! let mut editor = TableEditor::new(buffer);
//! editor.execute(TableCommand::Format, &Options::default()).unwrap();
//!
//! assert_eq!(
//!     editor.editor().lines(),
//!     vec!["| a   | b   |", "| --- | --- |", "| 1   | 22  |"]
//! );
//! ```

use tracing::debug;

use crate::edit_script::{apply_edit_script, shortest_edit_script};
use crate::error::EditorError;
use crate::focus::{self, Growth, SmartCursor, compute_new_offset};
use crate::formatter::{
    alter_alignment, complete_table, delete_column, delete_row, format_table, insert_column,
    insert_row, move_column, move_row,
};
use crate::options::Options;
use crate::parser::{RowMatcher, read_table};
use crate::position::{Focus, Point, Range};
use crate::table::{Alignment, Cell, Row, Table};
use crate::text_editor::TextEditor;

/// Table commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCommand {
    /// Complete and format the table, keeping the cursor in place.
    Format,
    /// Format the table and move the cursor to the line after it.
    Escape,
    /// Set the alignment of the focused column.
    AlignColumn(Alignment),
    /// Format and select the focused cell's content.
    SelectCell,
    /// Move the focus by whole cells, clamped to the table.
    MoveFocus {
        /// Rows to move (negative is up).
        row_offset: isize,
        /// Columns to move (negative is left).
        column_offset: isize,
    },
    /// Move to the next cell, growing the table when leaving its last cell.
    NextCell,
    /// Move to the previous cell.
    PreviousCell,
    /// Move to the next row, growing the table when leaving its last row.
    NextRow,
    /// Insert an empty row at the focus.
    InsertRow,
    /// Delete the focused row.
    DeleteRow,
    /// Move the focused row by an offset.
    MoveRow(isize),
    /// Insert an empty column at the focus.
    InsertColumn,
    /// Delete the focused column.
    DeleteColumn,
    /// Move the focused column by an offset.
    MoveColumn(isize),
}

/// Command execution result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// The command ran and its changes were applied.
    Applied,
    /// The cursor was not in a table; nothing was changed.
    NoTable,
}

/// A table located in the host document. Built per command and then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    /// Range covering the table lines.
    pub range: Range,
    /// Table lines as read from the document.
    pub lines: Vec<String>,
    /// The parsed table.
    pub table: Table,
    /// Focus derived from the cursor position.
    pub focus: Focus,
}

/// Command layer over a host editor.
#[derive(Debug)]
pub struct TableEditor<E> {
    editor: E,
    smart_cursor: SmartCursor,
}

fn shift_for_delimiter(focus: Focus, delimiter_inserted: bool) -> Focus {
    if delimiter_inserted && focus.row > 0 {
        focus.with_row(focus.row + 1)
    } else {
        focus
    }
}

fn grow(table: &Table, growth: Growth, options: &Options) -> Table {
    match growth {
        Growth::None => table.clone(),
        Growth::Row => insert_row(table, table.height(), Row::empty(table.header_width())),
        Growth::Column => insert_column(
            table,
            table.header_width(),
            &vec![Cell::empty(); table.height().saturating_sub(1)],
            options,
        ),
    }
}

fn update_lines<E: TextEditor>(
    editor: &mut E,
    start_row: usize,
    end_row: usize,
    new_lines: &[String],
    old_lines: &[String],
    max_distance: usize,
) -> Result<(), EditorError> {
    match shortest_edit_script(old_lines, new_lines, max_distance) {
        Some(script) => apply_edit_script(editor, &script, start_row),
        None => {
            debug!(
                start_row,
                end_row,
                max_distance,
                "edit distance exceeds bound, replacing table lines"
            );
            editor.replace_lines(start_row, end_row, new_lines)
        }
    }
}

fn move_to_focus<E: TextEditor>(editor: &mut E, start_row: usize, table: &Table, focus: &Focus) {
    if let Some(pos) = table.position_of_focus(focus, start_row) {
        editor.set_cursor_position(pos);
    }
}

fn select_focus<E: TextEditor>(editor: &mut E, start_row: usize, table: &Table, focus: &Focus) {
    match table.selection_range_of_focus(focus, start_row) {
        Some(range) => editor.set_selection_range(range),
        None => move_to_focus(editor, start_row, table, focus),
    }
}

/// How the cursor is placed after the new lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Move,
    Select,
}

impl Placement {
    fn from_moved(moved: bool) -> Self {
        if moved {
            Placement::Select
        } else {
            Placement::Move
        }
    }
}

impl<E: TextEditor> TableEditor<E> {
    /// Wrap a host editor.
    pub fn new(editor: E) -> Self {
        Self {
            editor,
            smart_cursor: SmartCursor::Inactive,
        }
    }

    /// The host editor.
    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Mutable access to the host editor.
    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.editor
    }

    /// Unwrap the host editor.
    pub fn into_inner(self) -> E {
        self.editor
    }

    /// Current smart cursor state.
    pub fn smart_cursor(&self) -> &SmartCursor {
        &self.smart_cursor
    }

    /// Forget the smart cursor's remembered column.
    pub fn reset_smart_cursor(&mut self) {
        if self.smart_cursor.is_active() {
            debug!("smart cursor reset");
        }
        self.smart_cursor.reset();
    }

    /// Returns `true` if the cursor is on a table row the host accepts edits on.
    pub fn cursor_is_in_table(&self, options: &Options) -> bool {
        let matcher = RowMatcher::from_options(options);
        let row = self.editor.cursor_position().row;
        self.editor.accepts_table_edit(row)
            && self
                .editor
                .line(row)
                .is_some_and(|line| matcher.is_table_row(&line))
    }

    /// Locate the table around the cursor.
    pub fn find_table(&self, options: &Options) -> Option<TableInfo> {
        let matcher = RowMatcher::from_options(options);
        let table_line = |row: usize| -> Option<String> {
            if !self.editor.accepts_table_edit(row) {
                return None;
            }
            self.editor
                .line(row)
                .filter(|line| matcher.is_table_row(line))
        };

        let pos = self.editor.cursor_position();
        let Some(current) = table_line(pos.row) else {
            debug!(row = pos.row, "no table at cursor");
            return None;
        };

        let mut start_row = pos.row;
        let mut lines = Vec::new();
        while start_row > 0 {
            match table_line(start_row - 1) {
                Some(line) => {
                    lines.push(line);
                    start_row -= 1;
                }
                None => break,
            }
        }
        lines.reverse();
        lines.push(current);

        let last_row = self.editor.last_row();
        let mut end_row = pos.row;
        while end_row < last_row {
            match table_line(end_row + 1) {
                Some(line) => {
                    lines.push(line);
                    end_row += 1;
                }
                None => break,
            }
        }

        let end_column = lines.last().map_or(0, |line| line.chars().count());
        let range = Range::new(Point::new(start_row, 0), Point::new(end_row, end_column));
        let table = read_table(&lines, options);
        let focus = table.focus_of_position(pos, start_row)?;
        debug!(start_row, end_row, ?focus, "found table");

        Some(TableInfo {
            range,
            lines,
            table,
            focus,
        })
    }

    /// Locate the table, then complete and format it. The focus offset is adjusted to the
    /// formatted table; `lines` are still the document lines.
    fn find_completed_table(&self, options: &Options) -> Option<TableInfo> {
        let info = self.find_table(options)?;
        let completed = complete_table(&info.table, options);
        let focus = shift_for_delimiter(info.focus, completed.delimiter_inserted);
        let formatted = format_table(&completed.table, options);
        let focus =
            focus.with_offset(compute_new_offset(&focus, &completed.table, &formatted, false));
        Some(TableInfo {
            table: formatted.table,
            focus,
            ..info
        })
    }

    /// Write `table` over the lines of `info` and place the cursor at `focus`, in one
    /// transaction.
    fn commit(
        &mut self,
        info: &TableInfo,
        table: &Table,
        focus: &Focus,
        placement: Placement,
        options: &Options,
    ) -> Result<(), EditorError> {
        let new_lines = table.to_lines();
        let start_row = info.range.start.row;
        let end_row = info.range.end.row + 1;
        let max_distance = options.max_edit_distance;

        self.editor.transact(|editor| {
            update_lines(
                editor,
                start_row,
                end_row,
                &new_lines,
                &info.lines,
                max_distance,
            )?;
            match placement {
                Placement::Move => move_to_focus(editor, start_row, table, focus),
                Placement::Select => select_focus(editor, start_row, table, focus),
            }
            Ok(())
        })
    }

    /// Run `command`.
    pub fn execute(
        &mut self,
        command: TableCommand,
        options: &Options,
    ) -> Result<CommandResult, EditorError> {
        match command {
            TableCommand::Format => self.format(options),
            TableCommand::Escape => self.escape(options),
            TableCommand::AlignColumn(alignment) => self.align_column(alignment, options),
            TableCommand::SelectCell => self.select_cell(options),
            TableCommand::MoveFocus {
                row_offset,
                column_offset,
            } => self.move_focus(row_offset, column_offset, options),
            TableCommand::NextCell => self.next_cell(options),
            TableCommand::PreviousCell => self.previous_cell(options),
            TableCommand::NextRow => self.next_row(options),
            TableCommand::InsertRow => self.insert_row(options),
            TableCommand::DeleteRow => self.delete_row(options),
            TableCommand::MoveRow(offset) => self.move_row(offset, options),
            TableCommand::InsertColumn => self.insert_column(options),
            TableCommand::DeleteColumn => self.delete_column(options),
            TableCommand::MoveColumn(offset) => self.move_column(offset, options),
        }
    }

    /// Complete and format the table, keeping the cursor at the same content position.
    pub fn format(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let completed = complete_table(&info.table, options);
        let focus = shift_for_delimiter(info.focus, completed.delimiter_inserted);
        let formatted = format_table(&completed.table, options);
        let focus =
            focus.with_offset(compute_new_offset(&focus, &completed.table, &formatted, false));

        self.commit(&info, &formatted.table, &focus, Placement::Move, options)?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }

    /// Format the table and move the cursor to the start of the line after it, adding an empty
    /// line if the table ends the document.
    pub fn escape(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let completed = complete_table(&info.table, options);
        let formatted = format_table(&completed.table, options);
        let new_lines = formatted.table.to_lines();

        let start_row = info.range.start.row;
        let end_row = info.range.end.row + 1;
        let next_row = start_row + new_lines.len();
        let max_distance = options.max_edit_distance;

        self.editor.transact(|editor| {
            update_lines(
                editor,
                start_row,
                end_row,
                &new_lines,
                &info.lines,
                max_distance,
            )?;
            if next_row > editor.last_row() {
                editor.insert_line(next_row, "")?;
            }
            editor.set_cursor_position(Point::new(next_row, 0));
            Ok(())
        })?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }

    /// Set the alignment of the focused column.
    pub fn align_column(
        &mut self,
        alignment: Alignment,
        options: &Options,
    ) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_completed_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let altered = match info.focus.column_index() {
            Some(column) => alter_alignment(&info.table, column, alignment, options),
            None => info.table.clone(),
        };
        let formatted = format_table(&altered, options);
        let focus = info.focus.with_offset(compute_new_offset(
            &info.focus,
            &info.table,
            &formatted,
            false,
        ));

        self.commit(&info, &formatted.table, &focus, Placement::Move, options)?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }

    /// Format and select the focused cell's content.
    pub fn select_cell(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_completed_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        self.commit(&info, &info.table, &info.focus, Placement::Select, options)?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }

    /// Move the focus by `row_offset` rows and `column_offset` columns.
    ///
    /// Selects the new cell if the focus moved; otherwise only re-formats.
    pub fn move_focus(
        &mut self,
        row_offset: isize,
        column_offset: isize,
        options: &Options,
    ) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_completed_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let focus = focus::move_focus(info.focus, &info.table, row_offset, column_offset);
        let moved = !focus.pos_equals(&info.focus);
        let formatted = format_table(&info.table, options);
        let focus = focus.with_offset(compute_new_offset(&focus, &info.table, &formatted, moved));

        self.commit(
            &info,
            &formatted.table,
            &focus,
            Placement::from_moved(moved),
            options,
        )?;
        if moved {
            self.reset_smart_cursor();
        }
        Ok(CommandResult::Applied)
    }

    /// Move to the next cell and select it.
    pub fn next_cell(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        if self
            .smart_cursor
            .invalidate_if_moved(info.range.start, &info.focus)
        {
            debug!("smart cursor reset: cursor moved");
        }

        let completed = complete_table(&info.table, options);
        let start_focus = shift_for_delimiter(info.focus, completed.delimiter_inserted);
        let (focus, growth) = focus::next_cell(start_focus, &completed.table, options.smart_cursor);
        let altered = grow(&completed.table, growth, options);
        let formatted = format_table(&altered, options);
        let focus = focus.with_offset(compute_new_offset(&focus, &altered, &formatted, true));

        self.commit(&info, &formatted.table, &focus, Placement::Select, options)?;
        if options.smart_cursor {
            self.record_navigation(&info, start_focus, focus, &formatted.table);
        }
        Ok(CommandResult::Applied)
    }

    /// Move to the previous cell and select it.
    pub fn previous_cell(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let completed = complete_table(&info.table, options);
        let start_focus = shift_for_delimiter(info.focus, completed.delimiter_inserted);
        let focus = focus::previous_cell(start_focus, &completed.table);
        let moved = !focus.pos_equals(&start_focus);
        let formatted = format_table(&completed.table, options);
        let focus =
            focus.with_offset(compute_new_offset(&focus, &completed.table, &formatted, moved));

        self.commit(
            &info,
            &formatted.table,
            &focus,
            Placement::from_moved(moved),
            options,
        )?;
        if moved {
            self.reset_smart_cursor();
        }
        Ok(CommandResult::Applied)
    }

    /// Move to the next row and select the cell.
    pub fn next_row(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        if self
            .smart_cursor
            .invalidate_if_moved(info.range.start, &info.focus)
        {
            debug!("smart cursor reset: cursor moved");
        }

        let completed = complete_table(&info.table, options);
        let start_focus = shift_for_delimiter(info.focus, completed.delimiter_inserted);
        let remembered = self.smart_cursor.start_column();
        let (focus, growth) = focus::next_row(
            start_focus,
            &completed.table,
            options.smart_cursor,
            remembered,
        );
        let altered = grow(&completed.table, growth, options);
        let formatted = format_table(&altered, options);
        let focus = focus.with_offset(compute_new_offset(&focus, &altered, &formatted, true));

        self.commit(&info, &formatted.table, &focus, Placement::Select, options)?;
        if options.smart_cursor {
            self.record_navigation(&info, start_focus, focus, &formatted.table);
        }
        Ok(CommandResult::Applied)
    }

    fn record_navigation(
        &mut self,
        info: &TableInfo,
        start_focus: Focus,
        focus: Focus,
        table: &Table,
    ) {
        let starting = !self.smart_cursor.is_active();
        self.smart_cursor
            .record(info.range.start, start_focus, focus, table.header_width());
        if starting {
            debug!(
                column = ?self.smart_cursor.start_column(),
                "smart cursor started"
            );
        }
    }

    /// Insert an empty row at the focused row (never above the first body row).
    pub fn insert_row(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_completed_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let focus = Focus::new(info.focus.row.max(2), 0, info.focus.offset);
        let index = focus.row_index().unwrap_or(2);
        let altered = insert_row(&info.table, index, Row::empty(info.table.header_width()));
        let formatted = format_table(&altered, options);
        let focus = focus.with_offset(compute_new_offset(&focus, &altered, &formatted, true));

        self.commit(&info, &formatted.table, &focus, Placement::Move, options)?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }

    /// Delete the focused row. The header is cleared instead; the delimiter row is kept.
    pub fn delete_row(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_completed_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let mut focus = info.focus;
        let mut altered = info.table.clone();
        let mut moved = false;

        if let Some(row) = focus.row_index().filter(|&row| row != 1) {
            altered = delete_row(&info.table, row);
            moved = true;
            if row >= altered.height() {
                focus = focus.with_row(if row == 2 { 0 } else { focus.row - 1 });
            }
        }
        let formatted = format_table(&altered, options);
        let focus = focus.with_offset(compute_new_offset(&focus, &altered, &formatted, moved));

        self.commit(
            &info,
            &formatted.table,
            &focus,
            Placement::from_moved(moved),
            options,
        )?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }

    /// Move the focused body row by `offset`, clamped to the body rows.
    pub fn move_row(
        &mut self,
        offset: isize,
        options: &Options,
    ) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_completed_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let mut focus = info.focus;
        let mut altered = info.table.clone();

        if focus.row > 1 {
            let last = (info.table.height() as isize - 1).max(2);
            let dest = (focus.row + offset).max(2).min(last);
            altered = move_row(&info.table, focus.row as usize, dest as usize);
            focus = focus.with_row(dest);
        }
        let formatted = format_table(&altered, options);
        let focus = focus.with_offset(compute_new_offset(&focus, &altered, &formatted, false));

        self.commit(&info, &formatted.table, &focus, Placement::Move, options)?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }

    /// Insert an empty column at the focused column.
    pub fn insert_column(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_completed_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let width = info.table.header_width();
        let row = if info.focus.row == 1 { 0 } else { info.focus.row };
        let column = info.focus.column.max(0).min(width as isize);
        let focus = Focus::new(row, column, info.focus.offset);

        let cells = vec![Cell::empty(); info.table.height().saturating_sub(1)];
        let altered = insert_column(&info.table, column as usize, &cells, options);
        let formatted = format_table(&altered, options);
        let focus = focus.with_offset(compute_new_offset(&focus, &altered, &formatted, true));

        self.commit(&info, &formatted.table, &focus, Placement::Move, options)?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }

    /// Delete the focused column. The last remaining column is kept.
    pub fn delete_column(&mut self, options: &Options) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_completed_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let width = info.table.header_width();
        let mut focus = info.focus;
        if focus.row == 1 {
            focus = focus.with_row(0);
        }
        let mut altered = info.table.clone();
        let mut moved = false;

        if let Some(column) = focus.column_index().filter(|&column| column < width) {
            altered = delete_column(&info.table, column);
            moved = altered.header_width() != width;
            let last = altered.header_width() as isize - 1;
            if focus.column > last {
                focus = focus.with_column(last);
            }
        }
        let formatted = format_table(&altered, options);
        let focus = focus.with_offset(compute_new_offset(&focus, &altered, &formatted, moved));

        self.commit(
            &info,
            &formatted.table,
            &focus,
            Placement::from_moved(moved),
            options,
        )?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }

    /// Move the focused column by `offset`, clamped to the header width.
    pub fn move_column(
        &mut self,
        offset: isize,
        options: &Options,
    ) -> Result<CommandResult, EditorError> {
        let Some(info) = self.find_completed_table(options) else {
            return Ok(CommandResult::NoTable);
        };
        let width = info.table.header_width();
        let mut focus = info.focus;
        let mut altered = info.table.clone();

        if let Some(column) = focus.column_index().filter(|&column| column < width) {
            let dest = (column as isize + offset).max(0).min(width as isize - 1);
            altered = move_column(&info.table, column, dest as usize);
            focus = focus.with_column(dest);
        }
        let formatted = format_table(&altered, options);
        let focus = focus.with_offset(compute_new_offset(&focus, &altered, &formatted, false));

        self.commit(&info, &formatted.table, &focus, Placement::Move, options)?;
        self.reset_smart_cursor();
        Ok(CommandResult::Applied)
    }
}
