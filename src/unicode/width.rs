//! Display width arithmetic for editor columns.
//!
//! Columns are measured in terminal cells: a tab occupies `tab_size` cells,
//! combining marks and control characters occupy none, wide East-Asian forms
//! occupy two. The helpers here translate between columns and code-point
//! indices within a single line.

use unicode_width::UnicodeWidthChar;

use crate::config::EditorConfig;

/// Width calculation method for ambiguous-width characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthMethod {
    /// POSIX-like wcwidth: ambiguous width = 1.
    #[default]
    WcWidth,
    /// Unicode East Asian Width: ambiguous width = 2.
    Unicode,
}

/// Get the display width of a character using a specific method.
#[must_use]
pub fn display_width_char_with_method(c: char, method: WidthMethod) -> usize {
    match method {
        WidthMethod::WcWidth => UnicodeWidthChar::width(c).unwrap_or(0),
        WidthMethod::Unicode => UnicodeWidthChar::width_cjk(c).unwrap_or(0),
    }
}

/// Columns occupied by `c` under `config`.
///
/// This includes a fast path for ASCII printable characters (0x20-0x7E)
/// which are always width 1 and are the most common case.
#[inline]
#[must_use]
pub fn char_width(config: &EditorConfig, c: char) -> usize {
    if c == '\t' {
        return config.tab_size;
    }
    if c.is_ascii() && (' '..='~').contains(&c) {
        return 1;
    }
    if c < ' ' {
        return 0;
    }
    display_width_char_with_method(c, config.width_method)
}

/// Sum of widths of `chars`.
#[must_use]
pub fn column_span(config: &EditorConfig, chars: &[char]) -> usize {
    chars.iter().map(|&c| char_width(config, c)).sum()
}

/// Sum of widths of the characters of `text`.
#[must_use]
pub fn str_column_span(config: &EditorConfig, text: &str) -> usize {
    text.chars().map(|c| char_width(config, c)).sum()
}

/// Index of the first code point whose starting column is at or past `column`.
///
/// A column that falls inside a wide character resolves to the character
/// after it. Columns past the end resolve to `line.len()`.
#[must_use]
pub fn location_to_index(config: &EditorConfig, line: &[char], column: isize) -> usize {
    let mut current = 0isize;
    for (i, &c) in line.iter().enumerate() {
        if current >= column {
            return i;
        }
        current += char_width(config, c) as isize;
    }
    line.len()
}

/// Index of the code point that covers `column`.
///
/// A column inside a wide character resolves to that character. Columns
/// past the end resolve to `line.len()`.
#[must_use]
pub fn column_to_index(config: &EditorConfig, line: &[char], column: isize) -> usize {
    let mut current = 0isize;
    for (i, &c) in line.iter().enumerate() {
        current += char_width(config, c) as isize;
        if current > column {
            return i;
        }
    }
    line.len()
}
