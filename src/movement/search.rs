//! Regex-driven cursor search.
//!
//! Patterns run over the buffer flattened by a [`Reader`] (lines joined by
//! `\n`). Every scan position gets one anchored attempt: a match counts only
//! if it starts exactly there, so a leading `\A` stands for the scan
//! position and may be omitted. The named group `cursor`, when present and
//! participating, marks the landing position of a match; otherwise the match
//! start does.
//!
//! Text is read in windows of whole lines that grow geometrically, and a scan
//! stops as soon as it has seen as many landings as the movement asked for.

use std::fmt;
use std::sync::LazyLock;

use regex_automata::meta::Regex;
use regex_automata::util::captures::Captures;
use regex_automata::{Anchored, Input, PatternID};

use crate::buffer::Buffer;
use crate::config::EditorConfig;
use crate::cursor::{Location, Range};
use crate::error::{Error, Result};
use crate::reader::Reader;
use crate::unicode::{char_width, location_to_index};

/// Name of the capture group selecting the landing position.
pub const CURSOR_GROUP: &str = "cursor";

/// Start of each word: a non-space at the start of a line or after whitespace.
pub const WORDS_PATTERN: &str = r"\A(?:(?m:^)|\s)(?P<cursor>\S)";

/// Rows read into the first window.
const INITIAL_ROWS: usize = 64;

/// Rows a window must hold past an attempt before a forward match is trusted.
const LOOKAHEAD_ROWS: usize = 8;

static WORDS: LazyLock<SearchPattern> = LazyLock::new(|| match SearchPattern::new(WORDS_PATTERN) {
    Ok(pattern) => pattern,
    Err(err) => unreachable!("built-in word pattern is valid: {err}"),
});

/// A compiled search pattern.
#[derive(Clone)]
pub struct SearchPattern {
    source: String,
    regex: Regex,
    cursor_group: Option<usize>,
}

impl SearchPattern {
    /// Compile `pattern`.
    pub fn new(pattern: &str) -> Result<Self> {
        let body = pattern.strip_prefix(r"\A").unwrap_or(pattern);
        let regex = Regex::new(body).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        let cursor_group = regex
            .group_info()
            .to_index(PatternID::ZERO, CURSOR_GROUP);
        Ok(Self {
            source: pattern.to_string(),
            regex,
            cursor_group,
        })
    }

    /// The built-in word-start pattern, compiled once per process.
    #[must_use]
    pub fn words() -> Self {
        WORDS.clone()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Landing offset of a match starting exactly at `pos`.
    fn landing_at(&self, text: &str, pos: usize, caps: &mut Captures) -> Option<usize> {
        let input = Input::new(text).range(pos..).anchored(Anchored::Yes);
        self.regex.search_captures(&input, caps);
        let found = caps.get_match()?;
        Some(
            self.cursor_group
                .and_then(|group| caps.get_group(group))
                .map_or(found.start(), |span| span.start),
        )
    }
}

impl fmt::Debug for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SearchPattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for SearchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for SearchPattern {}

/// Whole lines `first_row..end_row` joined by `\n`.
struct Window {
    first_row: usize,
    complete: bool,
    text: String,
    line_starts: Vec<usize>,
}

impl Window {
    fn read<B: Buffer + ?Sized>(
        buffer: &B,
        config: &EditorConfig,
        first_row: usize,
        end_row: usize,
    ) -> Self {
        let end_row = end_row.min(buffer.len());
        let mut text = String::new();
        let mut line_starts = vec![0];
        let mut reader = Reader::new(buffer, config, Location::new(first_row as isize, 0));
        while let Some(c) = reader.read_rune() {
            if c == '\n' && first_row + line_starts.len() >= end_row {
                break;
            }
            text.push(c);
            if c == '\n' {
                line_starts.push(text.len());
            }
        }
        Self {
            first_row,
            complete: end_row >= buffer.len(),
            text,
            line_starts,
        }
    }

    /// End of the positions a forward scan may try before the window grows.
    fn forward_limit(&self) -> usize {
        if self.complete {
            return self.text.len() + 1;
        }
        self.line_starts
            .len()
            .checked_sub(LOOKAHEAD_ROWS)
            .map_or(0, |row| self.line_starts[row])
    }

    fn offset_of<B: Buffer + ?Sized>(
        &self,
        buffer: &B,
        config: &EditorConfig,
        location: Location,
    ) -> usize {
        let row = location.row as usize;
        let line = buffer.line(row);
        let index = location_to_index(config, line, location.column);
        self.line_starts[row - self.first_row]
            + line[..index].iter().map(|c| c.len_utf8()).sum::<usize>()
    }

    fn location_of(&self, config: &EditorConfig, offset: usize) -> Location {
        let line = self.line_starts.partition_point(|&s| s <= offset) - 1;
        let column: usize = self.text[self.line_starts[line]..offset]
            .chars()
            .map(|c| char_width(config, c))
            .sum();
        Location::new((self.first_row + line) as isize, column as isize)
    }
}

/// Distinct landings seen so far. Repeats of the previous landing count once.
struct Landings {
    wanted: usize,
    seen: usize,
    last: Option<usize>,
}

impl Landings {
    const fn new(wanted: usize) -> Self {
        Self {
            wanted,
            seen: 0,
            last: None,
        }
    }

    /// Record `landing`; true once the wanted count is reached.
    fn push(&mut self, landing: usize) -> bool {
        if self.last != Some(landing) {
            self.last = Some(landing);
            self.seen += 1;
        }
        self.seen == self.wanted
    }

    fn shift(&mut self, delta: usize) {
        if let Some(last) = &mut self.last {
            *last += delta;
        }
    }
}

/// Offset of the code point following `pos`, or one past the end.
fn next_boundary(text: &str, pos: usize) -> usize {
    pos + text[pos..].chars().next().map_or(1, char::len_utf8)
}

/// Move `range` to the `count`-th landing position of `pattern` after its
/// start (before it, for negative counts).
///
/// Returns [`Range::OUT_OF_BOUNDS`] when fewer than `count` landings exist.
pub fn search<B: Buffer + ?Sized>(
    buffer: &B,
    config: &EditorConfig,
    pattern: &SearchPattern,
    range: Range,
    count: isize,
) -> Range {
    if count == 0 {
        return range;
    }
    let start = range.start;
    if start.row < 0 || start.row as usize >= buffer.len() {
        return Range::OUT_OF_BOUNDS;
    }
    let wanted = count.unsigned_abs();
    let found = if count > 0 {
        search_forward(buffer, config, pattern, start, wanted)
    } else {
        search_backward(buffer, config, pattern, start, wanted)
    };
    found.map_or(Range::OUT_OF_BOUNDS, Range::collapsed)
}

/// Attempts run from the start of the origin row; landings must lie after
/// the origin.
fn search_forward<B: Buffer + ?Sized>(
    buffer: &B,
    config: &EditorConfig,
    pattern: &SearchPattern,
    start: Location,
    wanted: usize,
) -> Option<Location> {
    let first_row = start.row as usize;
    let mut rows = INITIAL_ROWS;
    let mut window = Window::read(buffer, config, first_row, first_row + rows);
    let origin = window.offset_of(buffer, config, start);
    let mut caps = pattern.regex.create_captures();
    let mut landings = Landings::new(wanted);
    let mut pos = 0;

    loop {
        let limit = window.forward_limit();
        while pos < limit {
            if let Some(landing) = pattern.landing_at(&window.text, pos, &mut caps) {
                if landing > origin && landings.push(landing) {
                    return Some(window.location_of(config, landing));
                }
            }
            pos = next_boundary(&window.text, pos);
        }
        if window.complete {
            return None;
        }
        rows = rows.saturating_mul(2);
        window = Window::read(buffer, config, first_row, first_row.saturating_add(rows));
    }
}

/// Attempts run from just before the origin toward the start of the buffer;
/// landings must lie before the origin.
fn search_backward<B: Buffer + ?Sized>(
    buffer: &B,
    config: &EditorConfig,
    pattern: &SearchPattern,
    start: Location,
    wanted: usize,
) -> Option<Location> {
    let row = start.row as usize;
    let end_row = row + 1 + LOOKAHEAD_ROWS;
    let mut rows = INITIAL_ROWS;
    let mut window = Window::read(buffer, config, row.saturating_sub(rows), end_row);
    let mut origin = window.offset_of(buffer, config, start);
    let mut caps = pattern.regex.create_captures();
    let mut landings = Landings::new(wanted);
    let mut pos = origin;

    loop {
        while let Some(c) = window.text[..pos].chars().next_back() {
            pos -= c.len_utf8();
            if let Some(landing) = pattern.landing_at(&window.text, pos, &mut caps) {
                if landing < origin && landings.push(landing) {
                    return Some(window.location_of(config, landing));
                }
            }
        }
        if window.first_row == 0 {
            return None;
        }
        rows = rows.saturating_mul(2);
        let wider = Window::read(buffer, config, row.saturating_sub(rows), end_row);
        let delta = wider.line_starts[window.first_row - wider.first_row];
        pos = delta;
        origin += delta;
        landings.shift(delta);
        window = wider;
    }
}
