//! Sequential scanner over buffer contents.
//!
//! [`Reader`] presents a [`Buffer`] as one stream of code points with a `\n`
//! synthesized between consecutive lines. It can step in both directions,
//! seek by [`Location`], and export the whole buffer as UTF-8 bytes through
//! [`std::io::Read`].

use std::io;

use crate::buffer::Buffer;
use crate::config::EditorConfig;
use crate::cursor::Location;
use crate::unicode::{char_width, column_span, location_to_index};

/// Bidirectional code-point cursor over a buffer.
pub struct Reader<'a, B: Buffer + ?Sized> {
    buffer: &'a B,
    config: EditorConfig,
    row: usize,
    index: usize,
    /// Display column of `index`, kept in step with it.
    column: usize,
    pending: [u8; 4],
    pending_start: usize,
    pending_end: usize,
    terminated: bool,
}

impl<'a, B: Buffer + ?Sized> Reader<'a, B> {
    /// Create a reader positioned at `location`.
    #[must_use]
    pub fn new(buffer: &'a B, config: &EditorConfig, location: Location) -> Self {
        let mut reader = Self {
            buffer,
            config: *config,
            row: 0,
            index: 0,
            column: 0,
            pending: [0; 4],
            pending_start: 0,
            pending_end: 0,
            terminated: false,
        };
        reader.set_location(location);
        reader
    }

    /// Seek to `location`.
    ///
    /// Negative coordinates clamp to zero. A column inside a wide character
    /// lands after it; a column past the end lands at the end of the line.
    /// A row past the last line puts the reader at end of stream.
    pub fn set_location(&mut self, location: Location) {
        self.terminated = false;
        self.pending_start = 0;
        self.pending_end = 0;

        let row = usize::try_from(location.row).unwrap_or(0);
        if row >= self.buffer.len() {
            self.row = self.buffer.len();
            self.index = 0;
            self.column = 0;
            return;
        }
        let line = self.buffer.line(row);
        self.row = row;
        self.index = location_to_index(&self.config, line, location.column.max(0));
        self.column = column_span(&self.config, &line[..self.index]);
    }

    /// Current location, or [`Location::OUT_OF_BOUNDS`] past the last row.
    #[must_use]
    pub fn location(&self) -> Location {
        if self.row >= self.buffer.len() {
            return Location::OUT_OF_BOUNDS;
        }
        Location::new(self.row as isize, self.column as isize)
    }

    /// Read the next code point. Returns `None` at the end of the last line.
    pub fn read_rune(&mut self) -> Option<char> {
        let len = self.buffer.len();
        if self.row >= len {
            return None;
        }
        let line = self.buffer.line(self.row);
        if let Some(&c) = line.get(self.index) {
            self.index += 1;
            self.column += char_width(&self.config, c);
            return Some(c);
        }
        if self.row + 1 < len {
            self.row += 1;
            self.index = 0;
            self.column = 0;
            return Some('\n');
        }
        None
    }

    /// Step back one code point. Returns `None` at the start of the buffer.
    pub fn unread_rune(&mut self) -> Option<char> {
        let len = self.buffer.len();
        if self.row >= len || self.index == 0 {
            if self.row == 0 || len == 0 {
                return None;
            }
            self.row = self.row.min(len) - 1;
            let line = self.buffer.line(self.row);
            self.index = line.len();
            self.column = column_span(&self.config, line);
            return Some('\n');
        }
        self.index -= 1;
        let c = self.buffer.line(self.row)[self.index];
        self.column -= char_width(&self.config, c);
        Some(c)
    }
}

impl<B: Buffer + ?Sized> Iterator for Reader<'_, B> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.read_rune()
    }
}

/// UTF-8 export of the stream from the current position, followed by one
/// final `\n`.
impl<B: Buffer + ?Sized> io::Read for Reader<'_, B> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let mut written = 0;
        while written < out.len() {
            if self.pending_start < self.pending_end {
                let n = (out.len() - written).min(self.pending_end - self.pending_start);
                out[written..written + n]
                    .copy_from_slice(&self.pending[self.pending_start..self.pending_start + n]);
                written += n;
                self.pending_start += n;
                continue;
            }
            let c = match self.read_rune() {
                Some(c) => c,
                None if !self.terminated && self.row < self.buffer.len() => {
                    self.terminated = true;
                    '\n'
                }
                None => break,
            };
            self.pending_start = 0;
            self.pending_end = c.encode_utf8(&mut self.pending).len();
        }
        Ok(written)
    }
}
