//! Table data model
//!
//! A [`Table`] is an immutable sequence of [`Row`]s. Row 0 is the header; row 1 is the delimiter
//! row when it parses as one. Every transform in [`crate::formatter`] returns a new `Table`;
//! untouched rows are shared between the old and new value through [`Arc`].
//!
//! All coordinates handed to or returned from the host (`Point::column`, `Focus::offset`) are
//! counted in `char`s of the raw line text.

use std::sync::Arc;

use crate::position::{Focus, Point, Range};

/// Column alignment as encoded by the delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Alignment {
    /// `---`
    #[default]
    None,
    /// `:--`
    Left,
    /// `--:`
    Right,
    /// `:-:`
    Center,
}

/// A single table cell.
///
/// Keeps the raw text between two delimiters verbatim, including surrounding whitespace and
/// escape sequences. Two cells compare equal when their trimmed content is equal.
#[derive(Debug, Clone)]
pub struct Cell {
    raw: String,
    /// Byte range of the trimmed content within `raw`.
    content_start: usize,
    content_end: usize,
    /// Leading padding in characters.
    padding_left: usize,
    /// Content length in characters.
    content_chars: usize,
}

impl Cell {
    /// Create a cell from its raw text.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed_start = raw.trim_start();
        let content_start = raw.len() - trimmed_start.len();
        let content_end = content_start + trimmed_start.trim_end().len();
        let content = &raw[content_start..content_end];
        let content_chars = content.chars().count();

        // An all-blank cell still reserves one space before the (empty) content.
        let padding_left = if content.is_empty() {
            usize::from(!raw.is_empty())
        } else {
            raw[..content_start].chars().count()
        };

        Self {
            raw,
            content_start,
            content_end,
            padding_left,
            content_chars,
        }
    }

    /// An empty cell.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Raw text, exactly as read or rendered.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Trimmed content.
    pub fn content(&self) -> &str {
        &self.raw[self.content_start..self.content_end]
    }

    /// Trimmed content with escaped delimiters (`\|`) turned into `|`.
    pub fn unescaped_content(&self) -> String {
        self.content().replace("\\|", "|")
    }

    /// Leading padding in characters.
    pub fn padding_left(&self) -> usize {
        self.padding_left
    }

    /// Trailing padding in characters.
    pub fn padding_right(&self) -> usize {
        self.raw_len()
            .saturating_sub(self.padding_left + self.content_chars)
    }

    /// Length of the raw text in characters.
    pub fn raw_len(&self) -> usize {
        self.raw.chars().count()
    }

    /// Length of the content in characters.
    pub fn content_len(&self) -> usize {
        self.content_chars
    }

    /// Returns `true` if the cell is a valid delimiter cell (`:?-+:?` surrounded by whitespace).
    pub fn is_delimiter(&self) -> bool {
        let body = self.content();
        let body = body.strip_prefix(':').unwrap_or(body);
        let body = body.strip_suffix(':').unwrap_or(body);
        !body.is_empty() && body.chars().all(|c| c == '-')
    }

    /// Alignment encoded by this cell, if it is a delimiter cell.
    pub fn alignment(&self) -> Option<Alignment> {
        if !self.is_delimiter() {
            return None;
        }
        let content = self.content();
        let alignment = match (content.starts_with(':'), content.ends_with(':')) {
            (true, true) if content.len() > 1 => Alignment::Center,
            (true, _) => Alignment::Left,
            (false, true) => Alignment::Right,
            (false, false) => Alignment::None,
        };
        Some(alignment)
    }

    /// Convert a raw offset into an offset within the content.
    pub fn content_offset(&self, raw_offset: usize) -> usize {
        if self.content_chars == 0 || raw_offset < self.padding_left {
            0
        } else {
            (raw_offset - self.padding_left).min(self.content_chars)
        }
    }

    /// Convert a content offset into a raw offset.
    pub fn raw_offset(&self, content_offset: usize) -> usize {
        content_offset + self.padding_left
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.content() == other.content()
    }
}

impl Eq for Cell {}

/// A table row: cells plus the verbatim text before the first and after the last delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    cells: Vec<Cell>,
    margin_left: String,
    margin_right: String,
}

impl Row {
    /// Create a row.
    pub fn new(
        cells: Vec<Cell>,
        margin_left: impl Into<String>,
        margin_right: impl Into<String>,
    ) -> Self {
        Self {
            cells,
            margin_left: margin_left.into(),
            margin_right: margin_right.into(),
        }
    }

    /// A row of `width` empty cells without margins.
    pub fn empty(width: usize) -> Self {
        Self::new(vec![Cell::empty(); width], "", "")
    }

    /// The cells of this row.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `index`.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Number of cells.
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// Text before the first `|`.
    pub fn margin_left(&self) -> &str {
        &self.margin_left
    }

    /// Whitespace after the last `|`.
    pub fn margin_right(&self) -> &str {
        &self.margin_right
    }

    /// Returns `true` if every cell is a delimiter cell.
    pub fn is_delimiter(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(Cell::is_delimiter)
    }

    /// Render the row back to a line.
    pub fn to_text(&self) -> String {
        if self.cells.is_empty() {
            return self.margin_left.clone();
        }
        let mut out = String::with_capacity(
            self.margin_left.len()
                + self.margin_right.len()
                + self.cells.iter().map(|c| c.raw.len() + 1).sum::<usize>()
                + 1,
        );
        out.push_str(&self.margin_left);
        out.push('|');
        for cell in &self.cells {
            out.push_str(&cell.raw);
            out.push('|');
        }
        out.push_str(&self.margin_right);
        out
    }

    /// Character column where cell `index` starts, relative to the line start.
    fn cell_start_column(&self, index: usize) -> usize {
        let mut column = self.margin_left.chars().count() + 1;
        for cell in self.cells.iter().take(index) {
            column += cell.raw_len() + 1;
        }
        column
    }
}

/// An immutable table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    rows: Vec<Arc<Row>>,
}

impl Table {
    /// Create a table from rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: rows.into_iter().map(Arc::new).collect(),
        }
    }

    /// Create a table from shared rows.
    pub fn from_shared(rows: Vec<Arc<Row>>) -> Self {
        Self { rows }
    }

    /// Shared handles to all rows, for building a derived table.
    pub fn shared_rows(&self) -> Vec<Arc<Row>> {
        self.rows.clone()
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &Row> + '_ {
        self.rows.iter().map(|row| row.as_ref())
    }

    /// Row at `index`.
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).map(|row| row.as_ref())
    }

    /// Number of rows, including header and delimiter.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of header cells.
    pub fn header_width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.width())
    }

    /// Row 1 if it is a valid delimiter row.
    pub fn delimiter_row(&self) -> Option<&Row> {
        self.row(1).filter(|row| row.is_delimiter())
    }

    /// Per-column alignment, `header_width` long.
    pub fn alignments(&self) -> Vec<Alignment> {
        let width = self.header_width();
        let mut alignments: Vec<Alignment> = self
            .delimiter_row()
            .map(|row| {
                row.cells()
                    .iter()
                    .take(width)
                    .map(|cell| cell.alignment().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();
        alignments.resize(width, Alignment::None);
        alignments
    }

    /// Cell at `(row, column)`, if the source row has that many cells.
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&Cell> {
        self.row(row)?.cell(column)
    }

    /// Content at `(row, column)`, reading cells missing from short rows as empty.
    pub fn content_at(&self, row: usize, column: usize) -> Option<&str> {
        let r = self.row(row)?;
        match r.cell(column) {
            Some(cell) => Some(cell.content()),
            None if column < self.header_width() => Some(""),
            None => None,
        }
    }

    /// The cell under `focus`.
    pub fn focused_cell(&self, focus: &Focus) -> Option<&Cell> {
        self.cell_at(focus.row_index()?, focus.column_index()?)
    }

    /// Render every row to a line.
    pub fn to_lines(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.to_text()).collect()
    }

    /// Focus corresponding to a screen position, where the table starts at `row_offset`.
    pub fn focus_of_position(&self, pos: Point, row_offset: usize) -> Option<Focus> {
        let row_index = pos.row.checked_sub(row_offset)?;
        let row = self.row(row_index)?;
        let row_pos = row_index as isize;

        let margin = row.margin_left.chars().count();
        if pos.column < margin + 1 {
            return Some(Focus::new(row_pos, -1, pos.column));
        }

        let mut column_pos = margin + 1;
        let mut column = 0;
        for cell in row.cells() {
            let width = cell.raw_len();
            if column_pos + width + 1 > pos.column {
                break;
            }
            column_pos += width + 1;
            column += 1;
        }

        Some(Focus::new(row_pos, column as isize, pos.column - column_pos))
    }

    /// Screen position of `focus`, where the table starts at `row_offset`.
    pub fn position_of_focus(&self, focus: &Focus, row_offset: usize) -> Option<Point> {
        let row_index = focus.row_index()?;
        let row = self.row(row_index)?;
        let line = row_index + row_offset;

        match focus.column_index() {
            None => Some(Point::new(line, focus.offset)),
            Some(column) => {
                let column = column.min(row.width());
                Some(Point::new(line, row.cell_start_column(column) + focus.offset))
            }
        }
    }

    /// Range covering the content of the focused cell, or `None` if it is empty.
    pub fn selection_range_of_focus(&self, focus: &Focus, row_offset: usize) -> Option<Range> {
        let row_index = focus.row_index()?;
        let column = focus.column_index()?;
        let row = self.row(row_index)?;
        let cell = row.cell(column)?;
        if cell.content_len() == 0 {
            return None;
        }

        let line = row_index + row_offset;
        let start = row.cell_start_column(column) + cell.padding_left();
        Some(Range::new(
            Point::new(line, start),
            Point::new(line, start + cell.content_len()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        Row::new(cells.iter().map(|c| Cell::new(*c)).collect(), "", "")
    }

    #[test]
    fn test_cell_padding_and_content() {
        let cell = Cell::new("  foo ");
        assert_eq!(cell.content(), "foo");
        assert_eq!(cell.padding_left(), 2);
        assert_eq!(cell.padding_right(), 1);
        assert_eq!(cell.raw_len(), 6);

        let blank = Cell::new("   ");
        assert_eq!(blank.content(), "");
        assert_eq!(blank.padding_left(), 1);

        assert_eq!(Cell::empty().padding_left(), 0);
    }

    #[test]
    fn test_cell_equality_is_by_content() {
        assert_eq!(Cell::new(" a "), Cell::new("a"));
        assert_ne!(Cell::new("a"), Cell::new("b"));
    }

    #[test]
    fn test_cell_offsets() {
        let cell = Cell::new("  foo ");
        assert_eq!(cell.content_offset(0), 0);
        assert_eq!(cell.content_offset(3), 1);
        assert_eq!(cell.content_offset(6), 3);
        assert_eq!(cell.raw_offset(1), 3);

        let wide = Cell::new(" 你好 ");
        assert_eq!(wide.content_offset(2), 1);
        assert_eq!(wide.raw_offset(2), 3);
    }

    #[test]
    fn test_cell_alignment() {
        assert_eq!(Cell::new(" --- ").alignment(), Some(Alignment::None));
        assert_eq!(Cell::new(":---").alignment(), Some(Alignment::Left));
        assert_eq!(Cell::new(" ---:").alignment(), Some(Alignment::Right));
        assert_eq!(Cell::new(":-:").alignment(), Some(Alignment::Center));
        assert_eq!(Cell::new(" - ").alignment(), Some(Alignment::None));
        assert_eq!(Cell::new(":").alignment(), None);
        assert_eq!(Cell::new("::").alignment(), None);
        assert_eq!(Cell::new("a-").alignment(), None);
        assert_eq!(Cell::new("").alignment(), None);
    }

    #[test]
    fn test_unescaped_content() {
        assert_eq!(Cell::new(r" a \| b ").unescaped_content(), "a | b");
    }

    #[test]
    fn test_row_to_text() {
        let r = Row::new(vec![Cell::new(" a "), Cell::new(" b ")], "> ", "  ");
        assert_eq!(r.to_text(), "> | a | b |  ");
        assert_eq!(Row::new(Vec::new(), "  ", "").to_text(), "  ");
    }

    #[test]
    fn test_table_queries() {
        let table = Table::new(vec![row(&[" a ", " b "]), row(&[" --- ", ":-:"]), row(&[" 1 "])]);
        assert_eq!(table.height(), 3);
        assert_eq!(table.header_width(), 2);
        assert!(table.delimiter_row().is_some());
        assert_eq!(table.alignments(), vec![Alignment::None, Alignment::Center]);

        // Short rows read as padded.
        assert_eq!(table.content_at(2, 0), Some("1"));
        assert_eq!(table.content_at(2, 1), Some(""));
        assert_eq!(table.content_at(2, 2), None);
        assert!(table.cell_at(2, 1).is_none());
    }

    #[test]
    fn test_alignments_without_delimiter_row() {
        let table = Table::new(vec![row(&["a", "b", "c"]), row(&["1", "2", "3"])]);
        assert!(table.delimiter_row().is_none());
        assert_eq!(table.alignments(), vec![Alignment::None; 3]);
    }

    #[test]
    fn test_focus_of_position() {
        //          0123456789
        // line:    | ab | c |
        let table = Table::new(vec![row(&[" ab ", " c "])]);
        assert_eq!(table.focus_of_position(Point::new(5, 0), 5), Some(Focus::new(0, -1, 0)));
        assert_eq!(table.focus_of_position(Point::new(5, 1), 5), Some(Focus::new(0, 0, 0)));
        assert_eq!(table.focus_of_position(Point::new(5, 3), 5), Some(Focus::new(0, 0, 2)));
        assert_eq!(table.focus_of_position(Point::new(5, 6), 5), Some(Focus::new(0, 1, 0)));
        assert_eq!(table.focus_of_position(Point::new(5, 9), 5), Some(Focus::new(0, 1, 3)));
        assert_eq!(table.focus_of_position(Point::new(5, 10), 5), Some(Focus::new(0, 2, 0)));
        assert_eq!(table.focus_of_position(Point::new(4, 0), 5), None);
        assert_eq!(table.focus_of_position(Point::new(6, 0), 5), None);
    }

    #[test]
    fn test_position_of_focus_round_trips() {
        let table = Table::new(vec![Row::new(vec![Cell::new(" ab "), Cell::new(" c ")], "  ", "")]);
        for column in 0..table.row(0).unwrap().to_text().chars().count() {
            let pos = Point::new(3, column);
            let focus = table.focus_of_position(pos, 3).unwrap();
            assert_eq!(table.position_of_focus(&focus, 3), Some(pos));
        }
    }

    #[test]
    fn test_selection_range_of_focus() {
        let table = Table::new(vec![row(&[" ab ", "   "])]);
        assert_eq!(
            table.selection_range_of_focus(&Focus::new(0, 0, 0), 1),
            Some(Range::new(Point::new(1, 2), Point::new(1, 4)))
        );
        assert_eq!(table.selection_range_of_focus(&Focus::new(0, 1, 0), 1), None);
        assert_eq!(table.selection_range_of_focus(&Focus::new(0, -1, 0), 1), None);
    }
}
