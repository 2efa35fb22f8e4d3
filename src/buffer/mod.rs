//! Line-oriented buffer storage.
//!
//! Everything the editing engine does to text goes through the [`Buffer`]
//! trait: line-granular inserts, removals and replacements, plus
//! [`backup`](Buffer::backup)/[`restore`](Buffer::restore) snapshotting for
//! the undo history. Implementations:
//!
//! - [`PersistentBuffer`]: structurally-shared [`LineTree`]; snapshots are
//!   O(1) and edits copy only the path to the changed line.
//! - [`ArrayBuffer`]: a plain `Vec` of lines with full-copy snapshots, for
//!   tests and tiny documents.
//! - [`ObservedBuffer`]: a decorator reporting every mutation as a byte-range
//!   edit, for incremental parsers.
//!
//! # Examples
//!
//! ```
//! use wr::buffer::{Buffer, PersistentBuffer};
//!
//! let mut buffer = PersistentBuffer::from_strs(["one", "two"]);
//! buffer.backup(1);
//! buffer.change_line(0, &['1']);
//! assert_eq!(buffer.line(0), &['1']);
//!
//! buffer.restore(1).unwrap();
//! assert_eq!(buffer.line(0).iter().collect::<String>(), "one");
//! ```

mod array;
mod observed;
mod persistent;
mod tree;

use std::sync::Arc;

pub use array::ArrayBuffer;
pub use observed::{BufferObserver, ByteEdit, ObservedBuffer, Point};
pub use persistent::PersistentBuffer;
pub use tree::{LineTree, LineTreeIter};

use crate::error::Result;

/// A single line of text: code points without a line terminator.
pub type Line = Arc<[char]>;

/// Opaque snapshot identifier.
pub type Version = u64;

/// Line storage consumed by the editor.
///
/// Index arguments follow slice conventions: `add_line` accepts
/// `index <= len()`, every other method requires `index < len()` and panics
/// otherwise.
pub trait Buffer {
    /// Insert `line` so that it becomes line `index`.
    fn add_line(&mut self, index: usize, line: &[char]);

    /// Remove line `index`.
    fn remove_line(&mut self, index: usize);

    /// Replace the contents of line `index`.
    fn change_line(&mut self, index: usize, line: &[char]);

    /// Borrow line `index`.
    fn line(&self, index: usize) -> &[char];

    /// Number of lines.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store the current contents under `version`.
    fn backup(&mut self, version: Version);

    /// Replace the current contents with those stored under `version`.
    fn restore(&mut self, version: Version) -> Result<()>;

    /// Forget the snapshot stored under `version`, if any.
    fn discard(&mut self, version: Version);
}

/// Convert a string slice into line contents.
#[must_use]
pub fn to_chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

/// Collect every line of `buffer` into owned strings.
#[must_use]
pub fn collect_lines<B: Buffer + ?Sized>(buffer: &B) -> Vec<String> {
    (0..buffer.len())
        .map(|i| buffer.line(i).iter().collect())
        .collect()
}
