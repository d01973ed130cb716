#![warn(missing_docs)]
//! Table Editor Core - Headless Engine for Pipe-Delimited Text Tables
//!
//! # Overview
//!
//! `table-editor-core` formats and navigates Markdown-style tables inside an arbitrary text
//! document. It never touches the document directly: the host implements [`TextEditor`] and
//! the engine reads lines, computes the new table, and writes back a minimal line-level edit
//! script so that undo history, cursors and decorations in untouched lines survive.
//!
//! # Core Features
//!
//! - **Tolerant Parsing**: any line starting with `|` after an optional margin is a table row;
//!   escaped pipes and code spans stay inside their cell
//! - **Formatting**: column widths measured in display cells (East Asian wide characters,
//!   ambiguous-width policy, NFC normalization)
//! - **Navigation**: Tab/Enter style cell movement with automatic table growth and a
//!   "smart cursor" that remembers the starting column
//! - **Row and Column Operations**: insert, delete and move rows and columns
//! - **Minimal Updates**: bounded Levenshtein edit scripts over lines, applied in one transaction
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Table Commands (TableEditor)               │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Focus Navigation & Smart Cursor            │  ← Cursor Semantics
//! ├─────────────────────────────────────────────┤
//! │  Formatter (complete / format / alter)      │  ← Table Transformations
//! ├─────────────────────────────────────────────┤
//! │  Parser & Table Model                       │  ← Structure
//! ├─────────────────────────────────────────────┤
//! │  Text Width                                 │  ← Display Metrics
//! └─────────────────────────────────────────────┘
//!          │ edit script
//!          ▼
//! ┌─────────────────────────────────────────────┐
//! │  TextEditor host (TextBuffer or your own)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use table_editor_core::{Options, Point, TableCommand, TableEditor, TextBuffer, TextEditor};
//!
//! let mut buffer = TextBuffer::from_lines(&["| name | qty |", "| apple | 3 |"]);
//! buffer.set_cursor_position(Point::new(1, 3));
//!
//! let mut editor = TableEditor::new(buffer);
//! let options = Options::default();
//! editor.execute(TableCommand::NextCell, &options).unwrap();
//!
//! assert_eq!(
//!     editor.editor().lines(),
//!     vec!["| name  | qty |", "| ----- | --- |", "| apple | 3   |"]
//! );
//! ```
//!
//! # Module Description
//!
//! - [`text_width`] - display width measurement and padding
//! - [`options`] - engine configuration
//! - [`position`] - document points, ranges and table focus
//! - [`table`] - immutable table model
//! - [`parser`] - line to row parsing
//! - [`formatter`] - completion, formatting and structural operations
//! - [`focus`] - navigation rules and smart cursor state
//! - [`edit_script`] - shortest line edit scripts
//! - [`text_editor`] - host capability trait
//! - [`buffer`] - rope-backed host implementation
//! - [`line_ending`] - host document line terminators
//! - [`table_editor`] - command layer
//!
//! # Unicode Support
//!
//! - Widths come from the Unicode East Asian Width property
//! - Ambiguous-width characters are narrow unless configured otherwise
//! - Per-character overrides take precedence over the property
//! - Host columns are counted in `char`s, never bytes

pub mod buffer;
pub mod edit_script;
pub mod error;
pub mod focus;
pub mod formatter;
pub mod line_ending;
pub mod options;
pub mod parser;
pub mod position;
pub mod table;
pub mod table_editor;
pub mod text_editor;
pub mod text_width;

pub use buffer::{BufferEdit, TextBuffer};
pub use edit_script::{EditScript, LineEdit, apply_edit_script, shortest_edit_script};
pub use error::EditorError;
pub use focus::{Growth, SmartCursor};
pub use formatter::{CompletedTable, FormattedTable, complete_table, format_table};
pub use line_ending::LineEnding;
pub use options::{
    DEFAULT_MAX_EDIT_DISTANCE, DEFAULT_MIN_DELIMITER_WIDTH, DefaultAlignment, FormatType,
    HeaderAlignment, Options,
};
pub use parser::{RowMatcher, read_row, read_table};
pub use position::{Focus, Point, Range};
pub use table::{Alignment, Cell, Row, Table};
pub use table_editor::{CommandResult, TableCommand, TableEditor, TableInfo};
pub use text_editor::TextEditor;
pub use text_width::{TextWidthOptions, WidthClass, text_width};
