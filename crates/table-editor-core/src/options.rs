//! Configuration consumed by the parser, formatter and command layer.
//!
//! Hosts own how these values are stored; every type here derives `serde` traits so a host can
//! embed them in its own settings format.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::text_width::TextWidthOptions;

/// Default edit-distance bound used before falling back to a whole-range replace.
pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 3;

/// Default (and minimum) number of dashes in a delimiter cell.
pub const DEFAULT_MIN_DELIMITER_WIDTH: usize = 3;

/// How cells are re-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormatType {
    /// Pad every cell to its column width.
    #[default]
    Normal,
    /// Only normalize the one-space margins around cell content.
    Weak,
}

/// Padding used for columns whose alignment is [`Alignment::None`](crate::Alignment::None).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DefaultAlignment {
    /// Pad on the right.
    #[default]
    Left,
    /// Pad on the left.
    Right,
    /// Pad on both sides.
    Center,
}

/// Padding policy for header cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeaderAlignment {
    /// Use the column's alignment.
    #[default]
    Follow,
    /// Always left.
    Left,
    /// Always right.
    Right,
    /// Always centered.
    Center,
}

/// Table editor options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Characters besides whitespace allowed before the first `|` of a row.
    pub left_margin_chars: BTreeSet<char>,
    /// Formatting style.
    pub format_type: FormatType,
    /// Minimum dash count of a delimiter cell.
    pub min_delimiter_width: usize,
    /// Padding for unaligned columns.
    pub default_alignment: DefaultAlignment,
    /// Padding for header cells.
    pub header_alignment: HeaderAlignment,
    /// Text width measurement options.
    pub text_width: TextWidthOptions,
    /// Enable the smart cursor for `NextCell` / `NextRow`.
    pub smart_cursor: bool,
    /// Largest line edit distance applied as an edit script.
    pub max_edit_distance: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            left_margin_chars: BTreeSet::new(),
            format_type: FormatType::Normal,
            min_delimiter_width: DEFAULT_MIN_DELIMITER_WIDTH,
            default_alignment: DefaultAlignment::Left,
            header_alignment: HeaderAlignment::Follow,
            text_width: TextWidthOptions::default(),
            smart_cursor: false,
            max_edit_distance: DEFAULT_MAX_EDIT_DISTANCE,
        }
    }
}

impl Options {
    /// Set the extra left margin characters.
    pub fn with_left_margin_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.left_margin_chars = chars.into_iter().collect();
        self
    }

    /// Set the format type.
    pub fn with_format_type(mut self, format_type: FormatType) -> Self {
        self.format_type = format_type;
        self
    }

    /// Set the minimum delimiter width (clamped to at least 1).
    pub fn with_min_delimiter_width(mut self, width: usize) -> Self {
        self.min_delimiter_width = width.max(1);
        self
    }

    /// Set the padding for unaligned columns.
    pub fn with_default_alignment(mut self, alignment: DefaultAlignment) -> Self {
        self.default_alignment = alignment;
        self
    }

    /// Set the padding policy for header cells.
    pub fn with_header_alignment(mut self, alignment: HeaderAlignment) -> Self {
        self.header_alignment = alignment;
        self
    }

    /// Set the text width options.
    pub fn with_text_width(mut self, text_width: TextWidthOptions) -> Self {
        self.text_width = text_width;
        self
    }

    /// Enable or disable the smart cursor.
    pub fn with_smart_cursor(mut self, enabled: bool) -> Self {
        self.smart_cursor = enabled;
        self
    }

    /// Set the edit-distance bound.
    pub fn with_max_edit_distance(mut self, distance: usize) -> Self {
        self.max_edit_distance = distance;
        self
    }
}
