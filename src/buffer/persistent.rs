//! Default buffer backed by a persistent line tree.

use std::collections::HashMap;

use super::{Buffer, Line, LineTree, Version};
use crate::error::{Error, Result};

/// Buffer whose snapshots share structure with the live contents.
///
/// `backup` stores a clone of the current [`LineTree`], which is a single
/// reference-count increment. Edits only rebuild the root-to-leaf path of
/// the touched line, so every stored snapshot stays valid.
#[derive(Clone, Debug, Default)]
pub struct PersistentBuffer {
    current: LineTree,
    versions: HashMap<Version, LineTree>,
}

impl PersistentBuffer {
    /// Create a buffer with no lines.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer holding `lines`.
    #[must_use]
    pub fn from_lines(lines: &[Line]) -> Self {
        Self {
            current: LineTree::from_lines(lines),
            versions: HashMap::new(),
        }
    }

    /// Create a buffer from string slices, one per line.
    #[must_use]
    pub fn from_strs<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<Line> = lines
            .into_iter()
            .map(|s| s.as_ref().chars().collect::<Vec<_>>().into())
            .collect();
        Self::from_lines(&lines)
    }

    /// The live line tree.
    #[must_use]
    pub fn tree(&self) -> &LineTree {
        &self.current
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.versions.len()
    }
}

impl Buffer for PersistentBuffer {
    fn add_line(&mut self, index: usize, line: &[char]) {
        self.current = self.current.insert(index, line.into());
    }

    fn remove_line(&mut self, index: usize) {
        self.current = self.current.remove(index);
    }

    fn change_line(&mut self, index: usize, line: &[char]) {
        self.current = self.current.replace(index, line.into());
    }

    fn line(&self, index: usize) -> &[char] {
        match self.current.get(index) {
            Some(line) => line,
            None => panic!(
                "line index {index} out of range for {} lines",
                self.current.len()
            ),
        }
    }

    fn len(&self) -> usize {
        self.current.len()
    }

    fn backup(&mut self, version: Version) {
        self.versions.insert(version, self.current.clone());
    }

    fn restore(&mut self, version: Version) -> Result<()> {
        let tree = self
            .versions
            .get(&version)
            .ok_or(Error::UnknownVersion(version))?;
        self.current = tree.clone();
        Ok(())
    }

    fn discard(&mut self, version: Version) {
        self.versions.remove(&version);
    }
}
