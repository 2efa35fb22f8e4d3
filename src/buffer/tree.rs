//! Persistent balanced tree of lines.
//!
//! [`LineTree`] is a size-augmented AVL tree addressed by line index. Nodes
//! are immutable and shared through `Arc`: every update rebuilds only the
//! nodes on the path from the root to the touched position and reuses the
//! rest, so cloning a tree (taking a snapshot) is a single reference-count
//! bump and old snapshots stay valid forever.

use std::cmp::Ordering;
use std::sync::Arc;

use super::Line;

type Link = Option<Arc<Node>>;

#[derive(Debug)]
struct Node {
    line: Line,
    left: Link,
    right: Link,
    /// Number of lines in this subtree.
    len: usize,
    height: u32,
}

fn len(link: &Link) -> usize {
    link.as_ref().map_or(0, |node| node.len)
}

fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

fn make(left: Link, line: Line, right: Link) -> Arc<Node> {
    Arc::new(Node {
        len: len(&left) + len(&right) + 1,
        height: height(&left).max(height(&right)) + 1,
        line,
        left,
        right,
    })
}

/// Join `left`, `line`, `right` restoring the AVL invariant.
///
/// Subtree heights may differ by at most two, which holds after a single
/// insertion or removal below.
fn balance(left: Link, line: Line, right: Link) -> Arc<Node> {
    let hl = height(&left);
    let hr = height(&right);
    if hl > hr + 1 {
        if let Some(l) = &left {
            if height(&l.left) >= height(&l.right) {
                return make(
                    l.left.clone(),
                    l.line.clone(),
                    Some(make(l.right.clone(), line, right)),
                );
            }
            if let Some(lr) = &l.right {
                return make(
                    Some(make(l.left.clone(), l.line.clone(), lr.left.clone())),
                    lr.line.clone(),
                    Some(make(lr.right.clone(), line, right)),
                );
            }
        }
    } else if hr > hl + 1 {
        if let Some(r) = &right {
            if height(&r.right) >= height(&r.left) {
                return make(
                    Some(make(left, line, r.left.clone())),
                    r.line.clone(),
                    r.right.clone(),
                );
            }
            if let Some(rl) = &r.left {
                return make(
                    Some(make(left, line, rl.left.clone())),
                    rl.line.clone(),
                    Some(make(rl.right.clone(), r.line.clone(), r.right.clone())),
                );
            }
        }
    }
    make(left, line, right)
}

fn insert(link: &Link, index: usize, line: Line) -> Arc<Node> {
    let Some(node) = link else {
        return make(None, line, None);
    };
    let left_len = len(&node.left);
    if index <= left_len {
        balance(
            Some(insert(&node.left, index, line)),
            node.line.clone(),
            node.right.clone(),
        )
    } else {
        balance(
            node.left.clone(),
            node.line.clone(),
            Some(insert(&node.right, index - left_len - 1, line)),
        )
    }
}

fn remove_first(node: &Arc<Node>) -> (Line, Link) {
    match &node.left {
        None => (node.line.clone(), node.right.clone()),
        Some(left) => {
            let (first, rest) = remove_first(left);
            (
                first,
                Some(balance(rest, node.line.clone(), node.right.clone())),
            )
        }
    }
}

fn remove(link: &Link, index: usize) -> Link {
    let node = link.as_ref()?;
    let left_len = len(&node.left);
    match index.cmp(&left_len) {
        Ordering::Less => Some(balance(
            remove(&node.left, index),
            node.line.clone(),
            node.right.clone(),
        )),
        Ordering::Greater => Some(balance(
            node.left.clone(),
            node.line.clone(),
            remove(&node.right, index - left_len - 1),
        )),
        Ordering::Equal => match (&node.left, &node.right) {
            (None, right) => right.clone(),
            (left, None) => left.clone(),
            (left, Some(right)) => {
                let (successor, rest) = remove_first(right);
                Some(balance(left.clone(), successor, rest))
            }
        },
    }
}

fn replace(node: &Arc<Node>, index: usize, line: Line) -> Arc<Node> {
    let left_len = len(&node.left);
    match index.cmp(&left_len) {
        Ordering::Less => match &node.left {
            Some(left) => make(
                Some(replace(left, index, line)),
                node.line.clone(),
                node.right.clone(),
            ),
            None => make(None, node.line.clone(), node.right.clone()),
        },
        Ordering::Greater => match &node.right {
            Some(right) => make(
                node.left.clone(),
                node.line.clone(),
                Some(replace(right, index - left_len - 1, line)),
            ),
            None => make(node.left.clone(), node.line.clone(), None),
        },
        Ordering::Equal => make(node.left.clone(), line, node.right.clone()),
    }
}

fn build(lines: &[Line]) -> Link {
    if lines.is_empty() {
        return None;
    }
    let mid = lines.len() / 2;
    Some(make(
        build(&lines[..mid]),
        lines[mid].clone(),
        build(&lines[mid + 1..]),
    ))
}

/// Persistent sequence of lines.
#[derive(Clone, Debug, Default)]
pub struct LineTree {
    root: Link,
}

impl LineTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a perfectly balanced tree in O(n).
    #[must_use]
    pub fn from_lines(lines: &[Line]) -> Self {
        Self { root: build(lines) }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        len(&self.root)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree; O(log n) for any sequence of updates.
    #[must_use]
    pub fn height(&self) -> u32 {
        height(&self.root)
    }

    /// Borrow line `index`, or `None` when out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Line> {
        let mut link = &self.root;
        let mut index = index;
        while let Some(node) = link {
            let left_len = len(&node.left);
            match index.cmp(&left_len) {
                Ordering::Less => link = &node.left,
                Ordering::Equal => return Some(&node.line),
                Ordering::Greater => {
                    index -= left_len + 1;
                    link = &node.right;
                }
            }
        }
        None
    }

    /// Tree with `line` inserted at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[must_use]
    pub fn insert(&self, index: usize, line: Line) -> Self {
        assert!(
            index <= self.len(),
            "insert index {index} out of range for {} lines",
            self.len()
        );
        Self {
            root: Some(insert(&self.root, index, line)),
        }
    }

    /// Tree with line `index` removed.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn remove(&self, index: usize) -> Self {
        assert!(
            index < self.len(),
            "remove index {index} out of range for {} lines",
            self.len()
        );
        Self {
            root: remove(&self.root, index),
        }
    }

    /// Tree with line `index` replaced by `line`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn replace(&self, index: usize, line: Line) -> Self {
        match &self.root {
            Some(root) if index < root.len => Self {
                root: Some(replace(root, index, line)),
            },
            _ => panic!(
                "replace index {index} out of range for {} lines",
                self.len()
            ),
        }
    }

    /// In-order iterator over the lines.
    #[must_use]
    pub fn iter(&self) -> LineTreeIter<'_> {
        let mut iter = LineTreeIter { stack: Vec::new() };
        iter.push_left(&self.root);
        iter
    }

    /// Whether both trees share the same root node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Iterator over the lines of a [`LineTree`].
pub struct LineTreeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> LineTreeIter<'a> {
    fn push_left(&mut self, mut link: &'a Link) {
        while let Some(node) = link {
            self.stack.push(node);
            link = &node.left;
        }
    }
}

impl<'a> Iterator for LineTreeIter<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(&node.right);
        Some(&node.line)
    }
}

impl<'a> IntoIterator for &'a LineTree {
    type Item = &'a Line;
    type IntoIter = LineTreeIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
