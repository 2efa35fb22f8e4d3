//! Buffer decorator reporting byte-level edits.
//!
//! Incremental parsers consume edits as byte ranges over the flattened
//! document (every line followed by one `\n`). [`ObservedBuffer`] wraps any
//! [`Buffer`] and translates each line-level mutation into a [`ByteEdit`]
//! before forwarding it.

use super::{Buffer, Version};
use crate::error::Result;

/// A `(row, byte column)` position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// One contiguous replacement in byte coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_end_byte: usize,
    pub start_position: Point,
    pub old_end_position: Point,
    pub new_end_position: Point,
}

/// Receiver of buffer change notifications.
pub trait BufferObserver {
    /// Called before the wrapped buffer applies the mutation.
    fn edit(&mut self, edit: &ByteEdit);

    /// Called after a snapshot restore replaced the whole contents.
    fn reset(&mut self);
}

fn byte_len(line: &[char]) -> usize {
    line.iter().map(|c| c.len_utf8()).sum()
}

/// [`Buffer`] wrapper that notifies an observer of every change.
#[derive(Debug)]
pub struct ObservedBuffer<B, O> {
    inner: B,
    observer: O,
    /// Byte offsets of the first `line_starts.len()` lines.
    line_starts: Vec<usize>,
}

impl<B: Buffer, O: BufferObserver> ObservedBuffer<B, O> {
    #[must_use]
    pub fn new(inner: B, observer: O) -> Self {
        Self {
            inner,
            observer,
            line_starts: vec![0],
        }
    }

    #[must_use]
    pub fn inner(&self) -> &B {
        &self.inner
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Unwrap into the buffer and observer.
    pub fn into_parts(self) -> (B, O) {
        (self.inner, self.observer)
    }

    /// Byte offset of the start of line `index`.
    ///
    /// Offsets are cached from the top of the buffer and only the lines at
    /// or below a mutation are invalidated, so repeated edits on one row
    /// cost O(1) after the first lookup.
    fn line_offset(&mut self, index: usize) -> usize {
        while self.line_starts.len() <= index {
            let row = self.line_starts.len() - 1;
            let next = self.line_starts[row] + byte_len(self.inner.line(row)) + 1;
            self.line_starts.push(next);
        }
        self.line_starts[index]
    }

    /// Forget cached offsets of lines after `index`.
    fn invalidate_after(&mut self, index: usize) {
        self.line_starts.truncate(index + 1);
    }
}

impl<B: Buffer, O: BufferObserver> Buffer for ObservedBuffer<B, O> {
    fn add_line(&mut self, index: usize, line: &[char]) {
        let start = self.line_offset(index);
        self.observer.edit(&ByteEdit {
            start_byte: start,
            old_end_byte: start,
            new_end_byte: start + byte_len(line) + 1,
            start_position: Point::new(index, 0),
            old_end_position: Point::new(index, 0),
            new_end_position: Point::new(index + 1, 0),
        });
        self.inner.add_line(index, line);
        self.invalidate_after(index);
    }

    fn remove_line(&mut self, index: usize) {
        let start = self.line_offset(index);
        let len = byte_len(self.inner.line(index));
        self.observer.edit(&ByteEdit {
            start_byte: start,
            old_end_byte: start + len + 1,
            new_end_byte: start,
            start_position: Point::new(index, 0),
            old_end_position: Point::new(index + 1, 0),
            new_end_position: Point::new(index, 0),
        });
        self.inner.remove_line(index);
        self.invalidate_after(index);
    }

    fn change_line(&mut self, index: usize, line: &[char]) {
        let start = self.line_offset(index);
        let old_len = byte_len(self.inner.line(index));
        let new_len = byte_len(line);
        self.observer.edit(&ByteEdit {
            start_byte: start,
            old_end_byte: start + old_len,
            new_end_byte: start + new_len,
            start_position: Point::new(index, 0),
            old_end_position: Point::new(index, old_len),
            new_end_position: Point::new(index, new_len),
        });
        self.inner.change_line(index, line);
        self.invalidate_after(index);
    }

    fn line(&self, index: usize) -> &[char] {
        self.inner.line(index)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn backup(&mut self, version: Version) {
        self.inner.backup(version);
    }

    fn restore(&mut self, version: Version) -> Result<()> {
        self.inner.restore(version)?;
        self.line_starts.truncate(1);
        self.observer.reset();
        Ok(())
    }

    fn discard(&mut self, version: Version) {
        self.inner.discard(version);
    }
}
