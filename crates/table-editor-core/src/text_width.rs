//! Text width measurement
//!
//! Computes the on-screen width of cell text based on the East Asian Width property (UAX #11),
//! with caller-supplied overrides. Unlike a terminal renderer, every Unicode scalar value is
//! measured independently: combining marks count as one cell unless [`TextWidthOptions::normalize`]
//! composes them first.

use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_width::UnicodeWidthChar;

use crate::options::DefaultAlignment;

/// Options that control how text width is measured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextWidthOptions {
    /// Apply NFC normalization before measuring.
    pub normalize: bool,
    /// Characters always measured as 2 cells.
    pub wide_chars: BTreeSet<char>,
    /// Characters always measured as 1 cell (checked after `wide_chars`).
    pub narrow_chars: BTreeSet<char>,
    /// Measure East Asian Ambiguous characters as 2 cells.
    pub ambiguous_as_wide: bool,
}

/// East Asian Width class of a character, collapsed to what the measurer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthClass {
    /// Halfwidth, Narrow, Neutral, or unclassified.
    Narrow,
    /// Wide or Fullwidth.
    Wide,
    /// Ambiguous: 1 or 2 cells depending on context.
    Ambiguous,
}

/// Classify a character.
///
/// `unicode-width` reports Wide/Fullwidth characters as 2 cells in both contexts, and Ambiguous
/// characters as 2 cells only in a CJK context.
pub fn width_class(ch: char) -> WidthClass {
    if ch.width() == Some(2) {
        WidthClass::Wide
    } else if ch.width_cjk() == Some(2) {
        WidthClass::Ambiguous
    } else {
        WidthClass::Narrow
    }
}

/// Width of a single character in cells (1 or 2).
pub fn char_width(options: &TextWidthOptions, ch: char) -> usize {
    if options.wide_chars.contains(&ch) {
        return 2;
    }
    if options.narrow_chars.contains(&ch) {
        return 1;
    }
    match width_class(ch) {
        WidthClass::Wide => 2,
        WidthClass::Ambiguous if options.ambiguous_as_wide => 2,
        WidthClass::Ambiguous | WidthClass::Narrow => 1,
    }
}

/// Total width of `text` in cells.
pub fn text_width(options: &TextWidthOptions, text: &str) -> usize {
    let text: Cow<'_, str> = if options.normalize {
        Cow::Owned(text.nfc().collect())
    } else {
        Cow::Borrowed(text)
    };

    // Fast path: without overrides, ASCII is always one cell per byte.
    if text.is_ascii() && options.wide_chars.is_empty() {
        return text.len();
    }

    text.chars().map(|ch| char_width(options, ch)).sum()
}

/// Pad `text` with spaces to `width` cells according to `alignment`.
///
/// Text wider than `width` is returned unchanged; it is never truncated.
pub fn align_text(
    options: &TextWidthOptions,
    alignment: DefaultAlignment,
    width: usize,
    text: &str,
) -> String {
    let measured = text_width(options, text);
    if measured >= width {
        return text.to_string();
    }

    let space = width - measured;
    let (left, right) = match alignment {
        DefaultAlignment::Left => (0, space),
        DefaultAlignment::Right => (space, 0),
        DefaultAlignment::Center => (space / 2, space - space / 2),
    };

    let mut out = String::with_capacity(text.len() + space);
    out.extend(std::iter::repeat_n(' ', left));
    out.push_str(text);
    out.extend(std::iter::repeat_n(' ', right));
    out
}

/// Align `text` to `width` and wrap it with the one-space cell margin on each side.
pub fn pad_text(
    options: &TextWidthOptions,
    alignment: DefaultAlignment,
    width: usize,
    text: &str,
) -> String {
    format!(" {} ", align_text(options, alignment, width, text))
}
