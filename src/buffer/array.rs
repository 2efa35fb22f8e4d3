//! Vector-backed buffer with full-copy snapshots.

use std::collections::HashMap;

use super::{Buffer, Line, Version};
use crate::error::{Error, Result};

/// Simple buffer storing lines in a `Vec`.
///
/// Snapshots copy the line vector (lines themselves are shared), so backups
/// cost O(n). Suitable for tests and small documents.
#[derive(Clone, Debug, Default)]
pub struct ArrayBuffer {
    lines: Vec<Line>,
    versions: HashMap<Version, Vec<Line>>,
}

impl ArrayBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from string slices, one per line.
    #[must_use]
    pub fn from_strs<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|s| s.as_ref().chars().collect::<Vec<_>>().into())
                .collect(),
            versions: HashMap::new(),
        }
    }
}

impl Buffer for ArrayBuffer {
    fn add_line(&mut self, index: usize, line: &[char]) {
        self.lines.insert(index, line.into());
    }

    fn remove_line(&mut self, index: usize) {
        self.lines.remove(index);
    }

    fn change_line(&mut self, index: usize, line: &[char]) {
        self.lines[index] = line.into();
    }

    fn line(&self, index: usize) -> &[char] {
        &self.lines[index]
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    fn backup(&mut self, version: Version) {
        self.versions.insert(version, self.lines.clone());
    }

    fn restore(&mut self, version: Version) -> Result<()> {
        let lines = self
            .versions
            .get(&version)
            .ok_or(Error::UnknownVersion(version))?;
        self.lines.clone_from(lines);
        Ok(())
    }

    fn discard(&mut self, version: Version) {
        self.versions.remove(&version);
    }
}
