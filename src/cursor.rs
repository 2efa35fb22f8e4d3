//! Cursor model: locations, ranges, registers.
//!
//! A [`Location`] is a `(row, column)` pair where the column is measured in
//! display cells. A [`Range`] is half-open: `end` is exclusive and a cursor
//! sitting "on" a character spans exactly one column, so a well-formed range
//! always has `end > start`.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// A position in the buffer.
///
/// Coordinates are signed so raw movements can step below zero before the
/// editor clamps them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub row: isize,
    pub column: isize,
}

impl Location {
    /// Sentinel produced by movements that run off the buffer.
    pub const OUT_OF_BOUNDS: Self = Self {
        row: -1,
        column: -1,
    };

    #[must_use]
    pub const fn new(row: isize, column: isize) -> Self {
        Self { row, column }
    }

    /// Same row, `delta` columns over.
    #[must_use]
    pub const fn offset_column(self, delta: isize) -> Self {
        Self {
            row: self.row,
            column: self.column + delta,
        }
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then(self.column.cmp(&other.column))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// A half-open selection `[start, end)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Location,
    pub end: Location,
}

impl Range {
    /// Sentinel range returned by movements that fail.
    pub const OUT_OF_BOUNDS: Self = Self {
        start: Location::OUT_OF_BOUNDS,
        end: Location { row: -1, column: 0 },
    };

    #[must_use]
    pub const fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// The minimum-width range on `location`.
    #[must_use]
    pub const fn collapsed(location: Location) -> Self {
        Self {
            start: location,
            end: location.offset_column(1),
        }
    }

    /// Shorthand for `Range::new(Location::new(..), Location::new(..))`.
    #[must_use]
    pub const fn from_coords(
        start_row: isize,
        start_column: isize,
        end_row: isize,
        end_column: isize,
    ) -> Self {
        Self {
            start: Location::new(start_row, start_column),
            end: Location::new(end_row, end_column),
        }
    }

    /// The same range with `start <= end`.
    #[must_use]
    pub fn ordered(self) -> Self {
        if self.end < self.start {
            Self {
                start: self.end,
                end: self.start,
            }
        } else {
            self
        }
    }

    /// Whether this range is the movement sentinel or lies on rows outside
    /// a buffer of `len` lines.
    #[must_use]
    pub fn is_out_of_bounds(&self, len: usize) -> bool {
        let len = len as isize;
        self.start.row < 0 || self.end.row < 0 || self.start.row >= len || self.end.row >= len
    }

    /// Re-establish `end > start` by pushing `end` one column past `start`.
    #[must_use]
    pub fn with_min_width(self) -> Self {
        if self.end <= self.start {
            Self::collapsed(self.start)
        } else {
            self
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Number of named registers (`a` through `z`).
pub const REGISTER_COUNT: usize = 26;

/// Index of a named register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Register(usize);

impl Register {
    /// Register by index, `0..26`.
    pub fn new(index: usize) -> Result<Self> {
        if index < REGISTER_COUNT {
            Ok(Self(index))
        } else {
            // Map to the name it would have had, or NUL when not representable
            let name = u8::try_from(index)
                .ok()
                .and_then(|i| i.checked_add(b'a'))
                .map_or('\0', char::from);
            Err(Error::InvalidRegister(name))
        }
    }

    /// Register by name, `'a'..='z'`.
    pub fn from_char(name: char) -> Result<Self> {
        if name.is_ascii_lowercase() {
            Ok(Self(name as usize - 'a' as usize))
        } else {
            Err(Error::InvalidRegister(name))
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }

    #[must_use]
    pub fn name(self) -> char {
        char::from(b'a' + self.0 as u8)
    }
}

/// Per-cursor register slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registers([Option<Arc<[char]>>; REGISTER_COUNT]);

impl Registers {
    #[must_use]
    pub fn get(&self, register: Register) -> Option<&[char]> {
        self.0[register.index()].as_deref()
    }

    pub fn set(&mut self, register: Register, contents: Vec<char>) {
        self.0[register.index()] = Some(contents.into());
    }

    pub fn clear(&mut self, register: Register) {
        self.0[register.index()] = None;
    }
}

/// A selection plus its private registers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    pub range: Range,
    pub registers: Registers,
}

impl Cursor {
    #[must_use]
    pub fn new(range: Range) -> Self {
        Self {
            range,
            registers: Registers::default(),
        }
    }

    #[must_use]
    pub fn start(&self) -> Location {
        self.range.start
    }

    #[must_use]
    pub fn end(&self) -> Location {
        self.range.end
    }
}

impl From<Range> for Cursor {
    fn from(range: Range) -> Self {
        Self::new(range)
    }
}

/// Stable sort by start location, row then column.
pub fn sort_cursors(cursors: &mut [Cursor]) {
    cursors.sort_by_key(|cursor| cursor.range.start);
}
