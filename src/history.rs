//! Version-indexed undo/redo.
//!
//! [`History`] keeps an ordered list of buffer versions together with the
//! cursor set captured alongside each one. The index points one past the
//! most recently marked or restored version. Marking mid-history discards
//! everything after the index, snapshots included.

use std::collections::HashMap;

use crate::buffer::{Buffer, Version};
use crate::cursor::Cursor;
use crate::event::{self, LogLevel};

/// Undo/redo state machine over buffer snapshots.
#[derive(Clone, Debug, Default)]
pub struct History {
    versions: Vec<Version>,
    index: usize,
    next_version: Version,
    cursors: HashMap<Version, Vec<Cursor>>,
    /// Maximum number of retained versions. Oldest are dropped when exceeded.
    limit: Option<usize>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history retaining at most `limit` versions.
    #[must_use]
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|limit| limit.max(1)),
            ..Self::default()
        }
    }

    /// Number of retained versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.versions.len()
    }

    /// Snapshot the buffer and cursors under a fresh version.
    pub fn mark<B: Buffer + ?Sized>(&mut self, buffer: &mut B, cursors: &[Cursor]) {
        let version = self.next_version;
        self.next_version += 1;

        buffer.backup(version);
        self.cursors.insert(version, cursors.to_vec());

        for stale in self.versions.drain(self.index..) {
            buffer.discard(stale);
            self.cursors.remove(&stale);
        }
        self.versions.push(version);
        self.index += 1;

        if let Some(limit) = self.limit {
            let excess = self.versions.len().saturating_sub(limit);
            if excess > 0 {
                for old in self.versions.drain(..excess) {
                    buffer.discard(old);
                    self.cursors.remove(&old);
                }
                self.index = self.index.saturating_sub(excess);
                event::emit_event(event::names::HISTORY_TRIM, &excess.to_string());
            }
        }

        event::emit_log(LogLevel::Debug, &format!("history: marked version {version}"));
        event::emit_event(event::names::HISTORY_MARK, &version.to_string());
    }

    /// Step back one version.
    ///
    /// When the live state has not been marked since the last restore it is
    /// marked first, so the edits being undone can be redone.
    pub fn undo<B: Buffer + ?Sized>(&mut self, buffer: &mut B, cursors: &mut Vec<Cursor>) {
        if self.index >= self.versions.len() {
            self.mark(buffer, cursors);
            self.index = self.index.saturating_sub(1);
        }
        if self.index > 0 {
            self.index -= 1;
        }
        if let Some(&version) = self.versions.get(self.index) {
            self.restore(buffer, cursors, version);
            event::emit_event(event::names::HISTORY_UNDO, &version.to_string());
        }
    }

    /// Step forward one version.
    pub fn redo<B: Buffer + ?Sized>(&mut self, buffer: &mut B, cursors: &mut Vec<Cursor>) {
        if self.index + 1 < self.versions.len() {
            self.index += 1;
        }
        if let Some(&version) = self.versions.get(self.index) {
            self.restore(buffer, cursors, version);
            event::emit_event(event::names::HISTORY_REDO, &version.to_string());
        }
    }

    fn restore<B: Buffer + ?Sized>(
        &self,
        buffer: &mut B,
        cursors: &mut Vec<Cursor>,
        version: Version,
    ) {
        if let Err(err) = buffer.restore(version) {
            event::emit_log(LogLevel::Warn, &format!("history: {err}"));
            return;
        }
        if let Some(saved) = self.cursors.get(&version) {
            cursors.clone_from(saved);
        }
        event::emit_log(
            LogLevel::Debug,
            &format!("history: restored version {version} at index {}", self.index),
        );
    }
}
