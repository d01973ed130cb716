//! Table formatter
//!
//! Pure functions over [`Table`] values:
//!
//! - [`complete_table`] inserts a missing delimiter row and pads ragged rows.
//! - [`format_table`] computes column widths and re-renders every cell.
//! - Row/column transforms ([`insert_row`], [`delete_column`], ...) and [`alter_alignment`].
//!
//! Each function returns a new table; rows that are not touched are shared with the input.

use std::sync::Arc;

use crate::options::{DefaultAlignment, FormatType, HeaderAlignment, Options};
use crate::table::{Alignment, Cell, Row, Table};
use crate::text_width::{pad_text, text_width};

/// Result of [`complete_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedTable {
    /// The completed table.
    pub table: Table,
    /// `true` if a delimiter row was synthesized at index 1.
    pub delimiter_inserted: bool,
}

/// Result of [`format_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTable {
    /// The formatted table. Cell content is unchanged; raw text carries the padding.
    pub table: Table,
    /// Left margin used for every rendered row.
    pub margin_left: String,
}

/// Render a delimiter cell: `width` dashes with alignment colons in the margin positions.
pub fn delimiter_text(alignment: Alignment, width: usize) -> String {
    let bar = "-".repeat(width);
    match alignment {
        Alignment::None => format!(" {bar} "),
        Alignment::Left => format!(":{bar} "),
        Alignment::Right => format!(" {bar}:"),
        Alignment::Center => format!(":{bar}:"),
    }
}

/// Extend `row` to `width` cells.
///
/// The first added cell takes over the row's right margin text, so text typed after the last
/// `|` becomes the content of the new cell.
fn extend_row(row: &Arc<Row>, width: usize, fill: impl Fn(usize, &Row) -> Cell) -> Arc<Row> {
    if row.width() >= width {
        return Arc::clone(row);
    }
    let mut cells = row.cells().to_vec();
    for j in row.width()..width {
        cells.push(fill(j, row));
    }
    Arc::new(Row::new(cells, row.margin_left(), ""))
}

/// Insert a delimiter row if missing and pad every row to the header width.
///
/// Idempotent once the table has a delimiter row and no short rows.
pub fn complete_table(table: &Table, options: &Options) -> CompletedTable {
    let height = table.height();
    if height == 0 {
        return CompletedTable {
            table: table.clone(),
            delimiter_inserted: false,
        };
    }

    let width = table.header_width();
    let min_width = options.min_delimiter_width;
    let rows = table.shared_rows();
    let mut new_rows = Vec::with_capacity(height + 1);

    let margin_cell = |j: usize, row: &Row| {
        if j == row.width() {
            Cell::new(row.margin_right())
        } else {
            Cell::empty()
        }
    };

    new_rows.push(extend_row(&rows[0], width, margin_cell));

    let has_delimiter = table.delimiter_row().is_some();
    if has_delimiter {
        new_rows.push(extend_row(&rows[1], width, |j, row| {
            let dashes = if j == row.width() {
                min_width.max(row.margin_right().chars().count().saturating_sub(2))
            } else {
                min_width
            };
            Cell::new(delimiter_text(Alignment::None, dashes))
        }));
    } else {
        let cells = vec![Cell::new(delimiter_text(Alignment::None, min_width)); width];
        new_rows.push(Arc::new(Row::new(cells, "", "")));
    }

    let body_start = if has_delimiter { 2 } else { 1 };
    for row in &rows[body_start.min(height)..] {
        new_rows.push(extend_row(row, width, margin_cell));
    }

    CompletedTable {
        table: Table::from_shared(new_rows),
        delimiter_inserted: !has_delimiter,
    }
}

fn resolve_alignment(alignment: Alignment, default: DefaultAlignment) -> DefaultAlignment {
    match alignment {
        Alignment::None => default,
        Alignment::Left => DefaultAlignment::Left,
        Alignment::Right => DefaultAlignment::Right,
        Alignment::Center => DefaultAlignment::Center,
    }
}

fn header_alignment(alignment: Alignment, options: &Options) -> DefaultAlignment {
    match options.header_alignment {
        HeaderAlignment::Follow => resolve_alignment(alignment, options.default_alignment),
        HeaderAlignment::Left => DefaultAlignment::Left,
        HeaderAlignment::Right => DefaultAlignment::Right,
        HeaderAlignment::Center => DefaultAlignment::Center,
    }
}

/// Re-render every cell of `table` according to `options.format_type`.
pub fn format_table(table: &Table, options: &Options) -> FormattedTable {
    match options.format_type {
        FormatType::Normal => format_normal(table, options),
        FormatType::Weak => format_weak(table, options),
    }
}

/// Shortcut for degenerate tables. Returns `None` if the table has cells to format.
fn format_degenerate(table: &Table) -> Option<FormattedTable> {
    let header = table.row(0)?;
    if table.header_width() > 0 {
        return None;
    }
    let margin_left = header.margin_left().to_string();
    let rows = (0..table.height())
        .map(|_| Row::new(Vec::new(), margin_left.clone(), ""))
        .collect();
    Some(FormattedTable {
        table: Table::new(rows),
        margin_left,
    })
}

fn format_normal(table: &Table, options: &Options) -> FormattedTable {
    let Some(header) = table.row(0) else {
        return FormattedTable {
            table: table.clone(),
            margin_left: String::new(),
        };
    };
    if let Some(formatted) = format_degenerate(table) {
        return formatted;
    }

    let margin_left = header.margin_left().to_string();
    let delimiter = table.delimiter_row();
    let column_count = table.rows().map(Row::width).max().unwrap_or(0);

    let mut widths = vec![0usize; column_count];
    if let Some(delimiter) = delimiter {
        for width in widths.iter_mut().take(delimiter.width()) {
            *width = options.min_delimiter_width;
        }
    }
    for (i, row) in table.rows().enumerate() {
        if delimiter.is_some() && i == 1 {
            continue;
        }
        for (j, cell) in row.cells().iter().enumerate() {
            widths[j] = widths[j].max(text_width(&options.text_width, cell.content()));
        }
    }

    let mut alignments: Vec<Alignment> = delimiter
        .map(|row| {
            row.cells()
                .iter()
                .map(|cell| cell.alignment().unwrap_or_default())
                .collect()
        })
        .unwrap_or_default();
    alignments.resize(column_count, Alignment::None);

    let mut rows = Vec::with_capacity(table.height());
    rows.push(Row::new(
        header
            .cells()
            .iter()
            .enumerate()
            .map(|(j, cell)| {
                Cell::new(pad_text(
                    &options.text_width,
                    header_alignment(alignments[j], options),
                    widths[j],
                    cell.content(),
                ))
            })
            .collect(),
        margin_left.clone(),
        "",
    ));

    if let Some(delimiter) = delimiter {
        rows.push(Row::new(
            (0..delimiter.width())
                .map(|j| Cell::new(delimiter_text(alignments[j], widths[j])))
                .collect(),
            margin_left.clone(),
            "",
        ));
    }

    let body_start = if delimiter.is_some() { 2 } else { 1 };
    for row in table.rows().skip(body_start) {
        rows.push(Row::new(
            row.cells()
                .iter()
                .enumerate()
                .map(|(j, cell)| {
                    Cell::new(pad_text(
                        &options.text_width,
                        resolve_alignment(alignments[j], options.default_alignment),
                        widths[j],
                        cell.content(),
                    ))
                })
                .collect(),
            margin_left.clone(),
            row.margin_right(),
        ));
    }

    FormattedTable {
        table: Table::new(rows),
        margin_left,
    }
}

fn format_weak(table: &Table, options: &Options) -> FormattedTable {
    let Some(header) = table.row(0) else {
        return FormattedTable {
            table: table.clone(),
            margin_left: String::new(),
        };
    };
    if let Some(formatted) = format_degenerate(table) {
        return formatted;
    }

    let margin_left = header.margin_left().to_string();
    let delimiter = table.delimiter_row().is_some();
    let trim_cells = |row: &Row| -> Vec<Cell> {
        row.cells()
            .iter()
            .map(|cell| Cell::new(format!(" {} ", cell.content())))
            .collect()
    };

    let rows = table
        .rows()
        .enumerate()
        .map(|(i, row)| match i {
            0 => Row::new(trim_cells(row), margin_left.clone(), ""),
            1 if delimiter => Row::new(
                row.cells()
                    .iter()
                    .map(|cell| {
                        Cell::new(delimiter_text(
                            cell.alignment().unwrap_or_default(),
                            options.min_delimiter_width,
                        ))
                    })
                    .collect(),
                margin_left.clone(),
                "",
            ),
            _ => Row::new(trim_cells(row), margin_left.clone(), row.margin_right()),
        })
        .collect();

    FormattedTable {
        table: Table::new(rows),
        margin_left,
    }
}

/// Set the alignment of `column` in the delimiter row.
///
/// No-op if the table has no delimiter row or `column` is outside `[0, header_width)`.
pub fn alter_alignment(
    table: &Table,
    column: usize,
    alignment: Alignment,
    options: &Options,
) -> Table {
    let Some(delimiter) = table.delimiter_row() else {
        return table.clone();
    };
    if column >= table.header_width() || column >= delimiter.width() {
        return table.clone();
    }

    let mut cells = delimiter.cells().to_vec();
    cells[column] = Cell::new(delimiter_text(alignment, options.min_delimiter_width));

    let mut rows = table.shared_rows();
    rows[1] = Arc::new(Row::new(
        cells,
        delimiter.margin_left(),
        delimiter.margin_right(),
    ));
    Table::from_shared(rows)
}

/// Insert `row` at `index`. Rows are never inserted above the first body row.
pub fn insert_row(table: &Table, index: usize, row: Row) -> Table {
    let mut rows = table.shared_rows();
    let index = index.max(2).min(rows.len());
    rows.insert(index, Arc::new(row));
    Table::from_shared(rows)
}

/// Delete the row at `index`.
///
/// Deleting the header clears its cells instead; the delimiter row cannot be deleted.
pub fn delete_row(table: &Table, index: usize) -> Table {
    let mut rows = table.shared_rows();
    match index {
        1 => {}
        0 => {
            if let Some(header) = table.row(0) {
                rows[0] = Arc::new(Row::new(
                    vec![Cell::empty(); header.width()],
                    header.margin_left(),
                    header.margin_right(),
                ));
            }
        }
        _ if index < rows.len() => {
            rows.remove(index);
        }
        _ => {}
    }
    Table::from_shared(rows)
}

/// Move the body row at `from` to `to`, keeping the order of all other rows.
pub fn move_row(table: &Table, from: usize, to: usize) -> Table {
    let height = table.height();
    if from <= 1 || to <= 1 || from == to || from >= height || to >= height {
        return table.clone();
    }
    let mut rows = table.shared_rows();
    let row = rows.remove(from);
    rows.insert(to, row);
    Table::from_shared(rows)
}

/// Insert a column at `index`.
///
/// `column` holds the new header and body cells in row order, skipping the delimiter row, which
/// receives an unaligned delimiter cell. Missing entries are filled with empty cells.
pub fn insert_column(table: &Table, index: usize, column: &[Cell], options: &Options) -> Table {
    let has_delimiter = table.delimiter_row().is_some();
    let mut data = column.iter();

    let rows = table
        .rows()
        .enumerate()
        .map(|(i, row)| {
            let cell = if has_delimiter && i == 1 {
                Cell::new(delimiter_text(Alignment::None, options.min_delimiter_width))
            } else {
                data.next().cloned().unwrap_or_default()
            };
            let mut cells = row.cells().to_vec();
            cells.insert(index.min(cells.len()), cell);
            Row::new(cells, row.margin_left(), row.margin_right())
        })
        .collect();
    Table::new(rows)
}

/// Delete the column at `index`.
///
/// The last remaining column is never deleted: a table with a single column is returned
/// unchanged.
pub fn delete_column(table: &Table, index: usize) -> Table {
    if table.header_width() <= 1 || index >= table.header_width() {
        return table.clone();
    }
    let rows = table
        .shared_rows()
        .into_iter()
        .map(|row| {
            if index >= row.width() {
                return row;
            }
            let mut cells = row.cells().to_vec();
            cells.remove(index);
            Arc::new(Row::new(cells, row.margin_left(), row.margin_right()))
        })
        .collect();
    Table::from_shared(rows)
}

/// Move the column at `from` to `to` in every row, keeping the order of all other columns.
pub fn move_column(table: &Table, from: usize, to: usize) -> Table {
    if from == to {
        return table.clone();
    }
    let rows = table
        .shared_rows()
        .into_iter()
        .map(|row| {
            if from >= row.width() || to >= row.width() {
                return row;
            }
            let mut cells = row.cells().to_vec();
            let cell = cells.remove(from);
            cells.insert(to, cell);
            Arc::new(Row::new(cells, row.margin_left(), row.margin_right()))
        })
        .collect();
    Table::from_shared(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::read_table;
    use pretty_assertions::assert_eq;

    fn format_lines(lines: &[&str], options: &Options) -> Vec<String> {
        let table = read_table(lines, options);
        let completed = complete_table(&table, options);
        format_table(&completed.table, options).table.to_lines()
    }

    #[test]
    fn test_delimiter_text() {
        assert_eq!(delimiter_text(Alignment::None, 3), " --- ");
        assert_eq!(delimiter_text(Alignment::Left, 3), ":--- ");
        assert_eq!(delimiter_text(Alignment::Right, 3), " ---:");
        assert_eq!(delimiter_text(Alignment::Center, 3), ":---:");
    }

    #[test]
    fn test_complete_inserts_delimiter_row() {
        let options = Options::default();
        let table = read_table(&["| a | b |", "| 1 | 22 |"], &options);
        let completed = complete_table(&table, &options);
        assert!(completed.delimiter_inserted);
        assert_eq!(
            completed.table.to_lines(),
            vec!["| a | b |", "| --- | --- |", "| 1 | 22 |"]
        );

        let again = complete_table(&completed.table, &options);
        assert!(!again.delimiter_inserted);
        assert_eq!(again.table, completed.table);
    }

    #[test]
    fn test_complete_pads_short_rows() {
        let options = Options::default();
        let table = read_table(&["| a | b | c |", "|---|", "| 1 |", "| x | y"], &options);
        let completed = complete_table(&table, &options);
        assert!(!completed.delimiter_inserted);
        assert_eq!(
            completed.table.to_lines(),
            vec![
                "| a | b | c |",
                "|---| --- | --- |",
                "| 1 |||",
                "| x | y||",
            ]
        );
    }

    #[test]
    fn test_complete_moves_margin_text_into_new_cell() {
        let options = Options::default();
        let table = read_table(&["| a | b |", "| --- | --- |", "| 1 | 2 | x"], &options);
        // "x" after the last pipe is a cell of the body row, making it wider than the header.
        let completed = complete_table(&table, &options);
        assert_eq!(completed.table.row(2).unwrap().width(), 3);

        let table = read_table(&["| a | b |", "| --- | --- |", "| 1 |   "], &options);
        let completed = complete_table(&table, &options);
        assert_eq!(completed.table.to_lines()[2], "| 1 |   |");
    }

    #[test]
    fn test_complete_shares_untouched_rows() {
        let options = Options::default();
        let table = read_table(&["| a |", "| --- |", "| 1 |"], &options);
        let completed = complete_table(&table, &options);
        let before = table.shared_rows();
        let after = completed.table.shared_rows();
        assert!(before.iter().zip(&after).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    #[test]
    fn test_format_scenario() {
        let lines = format_lines(&["| a | b |", "| 1 | 22 |"], &Options::default());
        assert_eq!(lines, vec!["| a   | b   |", "| --- | --- |", "| 1   | 22  |"]);

        let narrow = Options::default().with_min_delimiter_width(1);
        let lines = format_lines(&["| a | b |", "| 1 | 22 |"], &narrow);
        assert_eq!(lines, vec!["| a | b  |", "| - | -- |", "| 1 | 22 |"]);
    }

    #[test]
    fn test_format_alignments() {
        let lines = format_lines(
            &["|left|right|center|none|", "|:-|-:|:-:|-|", "|a|b|c|d|"],
            &Options::default(),
        );
        assert_eq!(
            lines,
            vec![
                "| left | right | center | none |",
                "|:---- | -----:|:------:| ---- |",
                "| a    |     b |   c    | d    |",
            ]
        );
    }

    #[test]
    fn test_format_header_and_default_alignment() {
        let options = Options::default()
            .with_header_alignment(HeaderAlignment::Center)
            .with_default_alignment(DefaultAlignment::Right);
        let lines = format_lines(&["| a | bb |", "|---|:--|", "| long | x |"], &options);
        assert_eq!(
            lines,
            vec!["|  a   | bb  |", "| ---- |:--- |", "| long | x   |"]
        );
    }

    #[test]
    fn test_format_wide_characters() {
        let lines = format_lines(&["| 名前 | a |", "| x | 你好世界 |"], &Options::default());
        assert_eq!(
            lines,
            vec![
                "| 名前 | a        |",
                "| ---- | -------- |",
                "| x    | 你好世界 |",
            ]
        );
    }

    #[test]
    fn test_format_preserves_margins() {
        let lines = format_lines(&["  | a |", "  |---|", "| b |   "], &Options::default());
        assert_eq!(lines, vec!["  | a   |", "  | --- |", "  | b   |   "]);
    }

    #[test]
    fn test_format_is_idempotent() {
        let options = Options::default();
        let once = format_lines(&["|x|yy|", "|-:|", "|1|"], &options);
        let refs: Vec<&str> = once.iter().map(String::as_str).collect();
        let twice = format_lines(&refs, &options);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_format_keeps_cell_content() {
        let options = Options::default();
        let table = read_table(&["|  a  |", "|---|", "|bb|"], &options);
        let formatted = format_table(&table, &options);
        assert_eq!(formatted.table.content_at(0, 0), Some("a"));
        assert_eq!(formatted.table.cell_at(0, 0).unwrap().raw(), " a   ");
        assert_eq!(formatted.margin_left, "");
    }

    #[test]
    fn test_weak_format() {
        let options = Options::default().with_format_type(FormatType::Weak);
        let lines = format_lines(&["|a|bbb|", "|:-:|--|", "|  1|2|"], &options);
        assert_eq!(lines, vec!["| a | bbb |", "|:---:| --- |", "| 1 | 2 |"]);
    }

    #[test]
    fn test_format_degenerate_tables() {
        let options = Options::default();
        let formatted = format_table(&Table::default(), &options);
        assert_eq!(formatted.table.height(), 0);

        let table = Table::new(vec![Row::new(Vec::new(), " ", ""), Row::empty(0)]);
        let formatted = format_table(&table, &options);
        assert_eq!(formatted.table.to_lines(), vec![" ", " "]);
    }

    #[test]
    fn test_alter_alignment() {
        let options = Options::default();
        let table = read_table(&["| a | b |", "| --- | --- |"], &options);

        let altered = alter_alignment(&table, 1, Alignment::Right, &options);
        assert_eq!(altered.alignments(), vec![Alignment::None, Alignment::Right]);
        assert_eq!(altered.to_lines()[1], "| --- | ---:|");

        let unchanged = alter_alignment(&table, 2, Alignment::Right, &options);
        assert_eq!(unchanged.to_lines(), table.to_lines());
    }

    #[test]
    fn test_row_operations() {
        let options = Options::default();
        let table = read_table(&["|h|", "|-|", "|1|", "|2|", "|3|"], &options);

        let inserted = insert_row(&table, 0, Row::new(vec![Cell::new("x")], "", ""));
        assert_eq!(inserted.to_lines(), vec!["|h|", "|-|", "|x|", "|1|", "|2|", "|3|"]);

        let appended = insert_row(&table, 99, Row::empty(1));
        assert_eq!(appended.to_lines().last().unwrap(), "||");

        assert_eq!(delete_row(&table, 3).to_lines(), vec!["|h|", "|-|", "|1|", "|3|"]);
        assert_eq!(delete_row(&table, 1).to_lines(), table.to_lines());
        assert_eq!(delete_row(&table, 0).to_lines()[0], "||");

        assert_eq!(
            move_row(&table, 2, 4).to_lines(),
            vec!["|h|", "|-|", "|2|", "|3|", "|1|"]
        );
        assert_eq!(move_row(&table, 0, 3).to_lines(), table.to_lines());
    }

    #[test]
    fn test_deleting_all_body_rows() {
        let options = Options::default();
        let table = read_table(&["|h|", "|-|", "|1|"], &options);
        let deleted = delete_row(&table, 2);
        assert_eq!(deleted.to_lines(), vec!["|h|", "|-|"]);
    }

    #[test]
    fn test_column_operations() {
        let options = Options::default();
        let table = read_table(&["|a|b|c|", "|:-|-|-:|", "|1|2|3|"], &options);

        let inserted = insert_column(&table, 1, &[Cell::new("x"), Cell::new("y")], &options);
        assert_eq!(
            inserted.to_lines(),
            vec!["|a|x|b|c|", "|:-| --- |-|-:|", "|1|y|2|3|"]
        );
        assert_eq!(
            inserted.alignments(),
            vec![Alignment::Left, Alignment::None, Alignment::None, Alignment::Right]
        );

        let deleted = delete_column(&table, 0);
        assert_eq!(deleted.to_lines(), vec!["|b|c|", "|-|-:|", "|2|3|"]);

        let moved = move_column(&table, 0, 2);
        assert_eq!(moved.to_lines(), vec!["|b|c|a|", "|-|-:|:-|", "|2|3|1|"]);
    }

    #[test]
    fn test_delete_last_column_is_noop() {
        let options = Options::default();
        let table = read_table(&["|a|", "|-|", "|1|"], &options);
        let deleted = delete_column(&table, 0);
        assert_eq!(deleted.header_width(), 1);
        assert_eq!(deleted.to_lines(), table.to_lines());
    }
}
