//! Cursor movements.
//!
//! A [`Movement`] maps a range to a new range against the current buffer
//! without mutating anything. Movements that run off the buffer return
//! [`Range::OUT_OF_BOUNDS`]; the editor drops such cursors afterwards.
//!
//! Two horizontal primitives coexist: [`Movement::Chars`] steps through code
//! points and wraps across lines (bound to `h`/`l` in normal mode and `H`/`L`
//! in visual mode), while [`Movement::Columns`] shifts raw display columns
//! with no wrapping (`H`/`L` in normal mode, `h`/`l` in visual mode).

pub mod search;

pub use search::{SearchPattern, WORDS_PATTERN};

use crate::buffer::Buffer;
use crate::config::EditorConfig;
use crate::cursor::{Location, Range};
use crate::unicode::{column_span, column_to_index};

/// A pure range transformation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Movement {
    /// Shift both ends by whole rows.
    Rows(isize),
    /// Shift both ends by raw display columns.
    Columns(isize),
    /// Step through code points, counting each line break as one.
    Chars(isize),
    /// Jump to the start of the n-th next (or previous) word.
    Words(isize),
    /// Jump to the n-th next (or previous) landing position of a pattern.
    Regex { pattern: SearchPattern, count: isize },
    StartOfLine,
    /// The slot just past the last character of the line.
    EndOfLine,
    /// Collapse the selection onto its start.
    Unselect,
    /// Jump to a fixed range.
    Position(Range),
    /// Clamp both ends onto their lines.
    BoundToLine,
    /// Apply movements left to right.
    Chain(Vec<Movement>),
}

fn row_in<B: Buffer + ?Sized>(buffer: &B, row: isize) -> Option<usize> {
    usize::try_from(row).ok().filter(|&row| row < buffer.len())
}

impl Movement {
    /// Whether the movement heads toward the start of the buffer.
    ///
    /// Selections use this to decide which end of the buffer a failed
    /// movement clamps to.
    #[must_use]
    pub fn is_backward(&self) -> bool {
        match self {
            Self::Rows(n) | Self::Columns(n) | Self::Chars(n) | Self::Words(n) => *n < 0,
            Self::Regex { count, .. } => *count < 0,
            Self::StartOfLine => true,
            Self::Chain(movements) => movements.last().is_some_and(Self::is_backward),
            Self::EndOfLine | Self::Unselect | Self::Position(_) | Self::BoundToLine => false,
        }
    }

    /// Move `range` within `buffer`.
    #[must_use]
    pub fn apply<B: Buffer + ?Sized>(
        &self,
        buffer: &B,
        config: &EditorConfig,
        range: Range,
    ) -> Range {
        match self {
            Self::Rows(n) => Range::new(
                Location::new(range.start.row + n, range.start.column),
                Location::new(range.end.row + n, range.end.column),
            ),
            Self::Columns(n) => Range::new(
                range.start.offset_column(*n),
                range.end.offset_column(*n),
            ),
            Self::Chars(n) => chars(buffer, config, range.start, *n),
            Self::Words(n) => search::search(buffer, config, &SearchPattern::words(), range, *n),
            Self::Regex { pattern, count } => {
                search::search(buffer, config, pattern, range, *count)
            }
            Self::StartOfLine => Range::collapsed(Location::new(range.start.row, 0)),
            Self::EndOfLine => {
                let Some(row) = row_in(buffer, range.start.row) else {
                    return Range::OUT_OF_BOUNDS;
                };
                let span = column_span(config, buffer.line(row));
                Range::collapsed(Location::new(range.start.row, span as isize))
            }
            Self::Unselect => Range::collapsed(range.start),
            Self::Position(target) => *target,
            Self::BoundToLine => bound_to_line(buffer, config, range),
            Self::Chain(movements) => {
                let mut current = range;
                for movement in movements {
                    current = movement.apply(buffer, config, current);
                    if current.is_out_of_bounds(buffer.len()) {
                        return Range::OUT_OF_BOUNDS;
                    }
                }
                current
            }
        }
    }
}

fn chars<B: Buffer + ?Sized>(
    buffer: &B,
    config: &EditorConfig,
    start: Location,
    n: isize,
) -> Range {
    let mut row = start.row;
    let mut column = start.column;
    let mut remaining = n;
    loop {
        let Some(index) = row_in(buffer, row) else {
            return Range::OUT_OF_BOUNDS;
        };
        let line = buffer.line(index);
        let target = column_to_index(config, line, column) as isize + remaining;

        if target < 0 {
            if row == 0 {
                return Range::OUT_OF_BOUNDS;
            }
            // Land on the previous line's newline slot, which costs one step
            row -= 1;
            column = column_span(config, buffer.line(index - 1)) as isize;
            remaining = target + 1;
            continue;
        }

        let len = line.len() as isize;
        if target > len {
            if index + 1 >= buffer.len() {
                return Range::OUT_OF_BOUNDS;
            }
            row += 1;
            column = 0;
            remaining = target - len - 1;
            continue;
        }

        let column = column_span(config, &line[..target as usize]);
        return Range::collapsed(Location::new(row, column as isize));
    }
}

fn bound_to_line<B: Buffer + ?Sized>(buffer: &B, config: &EditorConfig, range: Range) -> Range {
    let (Some(start_row), Some(end_row)) =
        (row_in(buffer, range.start.row), row_in(buffer, range.end.row))
    else {
        return range;
    };
    let start_span = column_span(config, buffer.line(start_row)) as isize;
    let end_span = column_span(config, buffer.line(end_row)) as isize;
    Range::new(
        Location::new(range.start.row, range.start.column.clamp(0, start_span)),
        Location::new(range.end.row, range.end.column.clamp(0, end_span + 1)),
    )
    .with_min_width()
}
