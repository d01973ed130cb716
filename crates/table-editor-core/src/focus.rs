//! Focus navigation and smart cursor state
//!
//! The functions here compute where the focus lands for each navigation command, on a table that
//! has already been completed (it has a delimiter row and no short rows). They report whether the
//! table has to grow to make room for the new focus; the command layer performs the growth before
//! formatting so column widths account for the new cells.

use crate::formatter::FormattedTable;
use crate::position::{Focus, Point};
use crate::table::Table;

/// Table growth needed for a navigation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// The focus lands inside the table.
    None,
    /// Append an empty body row.
    Row,
    /// Append an empty column.
    Column,
}

/// Memory of the column a sequence of `NextCell` / `NextRow` commands started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmartCursor {
    /// No navigation sequence in progress.
    #[default]
    Inactive,
    /// A navigation sequence is in progress.
    Active {
        /// Position of the table's first line when the sequence started.
        table_start: Point,
        /// Focus the sequence started from, with out-of-range columns snapped to 0.
        start_focus: Focus,
        /// Focus left by the last navigation command.
        last_focus: Focus,
    },
}

impl SmartCursor {
    /// Returns `true` while a navigation sequence is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, SmartCursor::Active { .. })
    }

    /// The column remembered from the start of the sequence.
    pub fn start_column(&self) -> Option<isize> {
        match self {
            SmartCursor::Active { start_focus, .. } => Some(start_focus.column),
            SmartCursor::Inactive => None,
        }
    }

    pub(crate) fn reset(&mut self) {
        *self = SmartCursor::Inactive;
    }

    /// Reset if the table moved or the cursor was moved by other means since the last command.
    ///
    /// Returns `true` if the state was reset.
    pub(crate) fn invalidate_if_moved(&mut self, table_start: Point, focus: &Focus) -> bool {
        let moved = match self {
            SmartCursor::Active {
                table_start: start,
                last_focus,
                ..
            } => *start != table_start || !last_focus.pos_equals(focus),
            SmartCursor::Inactive => false,
        };
        if moved {
            self.reset();
        }
        moved
    }

    /// Record the result of a navigation command, starting a sequence if none is active.
    pub(crate) fn record(
        &mut self,
        table_start: Point,
        start_focus: Focus,
        new_focus: Focus,
        header_width: usize,
    ) {
        match self {
            SmartCursor::Active { last_focus, .. } => *last_focus = new_focus,
            SmartCursor::Inactive => {
                let start_focus = if column_in_range(start_focus.column, header_width) {
                    start_focus
                } else {
                    Focus::new(start_focus.row, 0, 0)
                };
                *self = SmartCursor::Active {
                    table_start,
                    start_focus,
                    last_focus: new_focus,
                };
            }
        }
    }
}

fn column_in_range(column: isize, width: usize) -> bool {
    column >= 0 && (column as usize) < width
}

fn last_column(table: &Table) -> isize {
    table.header_width() as isize - 1
}

fn last_row(table: &Table) -> isize {
    table.height() as isize - 1
}

/// Focus after `NextCell`.
///
/// From the delimiter row or the last header cell, moves to the first body row. Elsewhere moves
/// one cell right, growing a column when leaving the last one.
pub fn next_cell(focus: Focus, table: &Table, smart_cursor: bool) -> (Focus, Growth) {
    let width = table.header_width();
    let last = last_column(table);

    let to_body = focus.row == 1 || (focus.row == 0 && focus.column >= last);
    if to_body {
        let column = if focus.row == 1 && smart_cursor && column_in_range(focus.column, width) {
            focus.column
        } else {
            0
        };
        let next = Focus::new(2, column, focus.offset);
        let growth = if next.row > last_row(table) {
            Growth::Row
        } else {
            Growth::None
        };
        return (next, growth);
    }

    let column = (focus.column + 1).min(width as isize);
    let growth = if column > last {
        Growth::Column
    } else {
        Growth::None
    };
    (focus.with_column(column), growth)
}

/// Focus after `PreviousCell`: one cell left, wrapping to the last cell of the previous row.
/// Never leaves the header row upwards.
pub fn previous_cell(focus: Focus, table: &Table) -> Focus {
    let last = last_column(table);
    let wrap_to = |row: isize| Focus::new(row, last, focus.offset);

    match focus.row {
        row if row <= 0 => {
            if focus.column > 0 {
                focus.with_column((focus.column - 1).min(last))
            } else {
                focus
            }
        }
        1 => wrap_to(0),
        row => {
            if focus.column > 0 {
                focus.with_column((focus.column - 1).min(last))
            } else if row == 2 {
                wrap_to(0)
            } else {
                wrap_to(row - 1)
            }
        }
    }
}

/// Focus after `NextRow`.
///
/// Skips the delimiter row when leaving the header. The column is the smart cursor's remembered
/// column when a sequence is active, the current column when the smart cursor is enabled, and 0
/// otherwise.
pub fn next_row(
    focus: Focus,
    table: &Table,
    smart_cursor: bool,
    remembered_column: Option<isize>,
) -> (Focus, Growth) {
    let width = table.header_width();
    let row = if focus.row <= 0 { 2 } else { focus.row + 1 };

    let column = match remembered_column {
        Some(column) if smart_cursor && column_in_range(column, width) => column,
        _ if smart_cursor && column_in_range(focus.column, width) => focus.column,
        _ => 0,
    };

    let next = Focus::new(row, column, focus.offset);
    let growth = if row > last_row(table) {
        Growth::Row
    } else {
        Growth::None
    };
    (next, growth)
}

/// Focus after `MoveFocus`: rows are clamped to the table and never rest on the delimiter row;
/// columns are clamped to the header width and never wrap.
pub fn move_focus(focus: Focus, table: &Table, row_offset: isize, column_offset: isize) -> Focus {
    let mut next = focus;

    if row_offset != 0 {
        let target = focus.row + row_offset;
        let skip = if focus.row < 1 && target >= 1 {
            1
        } else if focus.row > 1 && target <= 1 {
            -1
        } else {
            0
        };
        let max_row = if table.height() <= 2 {
            0
        } else {
            last_row(table)
        };
        next = next.with_row((target + skip).max(0).min(max_row));
    }
    if next.row == 1 {
        next = next.with_row(if table.height() > 2 { 2 } else { 0 });
    }

    if column_offset != 0 {
        let last = last_column(table);
        let blocked =
            (next.column < 0 && column_offset < 0) || (next.column > last && column_offset > 0);
        if !blocked {
            next = next.with_column((next.column + column_offset).max(0).min(last));
        }
    }

    next
}

/// Cursor offset for `focus` in the formatted table.
///
/// When the focus moved to another cell, the cursor goes to the start of its content. Otherwise
/// the content-relative offset from before formatting is kept, clamped to the content length.
/// Focus outside any cell lands just after the left margin.
pub fn compute_new_offset(
    focus: &Focus,
    table: &Table,
    formatted: &FormattedTable,
    moved: bool,
) -> usize {
    let fallback = || {
        if focus.column < 0 {
            formatted.margin_left.chars().count()
        } else {
            0
        }
    };

    let Some(new_cell) = formatted.table.focused_cell(focus) else {
        return fallback();
    };
    if moved {
        return new_cell.raw_offset(0);
    }
    match table.focused_cell(focus) {
        Some(old_cell) => {
            let offset = old_cell.content_offset(focus.offset).min(new_cell.content_len());
            new_cell.raw_offset(offset)
        }
        None => fallback(),
    }
}
