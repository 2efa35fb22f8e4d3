//! Invertible edits.
//!
//! Every [`Edit`] applied to an editor yields an [`AppliedEdit`]: the
//! line-level [`Step`]s it performed, each carrying exactly what is needed to
//! undo itself, plus the cursor set as it was before the edit. Reverting
//! undoes the steps in reverse order and reinstates that cursor set, which
//! also brings back cursors the edit dropped.

use crate::buffer::{Buffer, Line};
use crate::config::EditorConfig;
use crate::cursor::{Cursor, Location, Range, Register};
use crate::event::{self, LogLevel};
use crate::movement::Movement;
use crate::reader::Reader;
use crate::unicode::{column_span, location_to_index};

/// An edit performed at one cursor. Applied through [`Edit::Cursor`], which
/// runs it at every cursor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CursorEdit {
    /// Break the line at the cursor start.
    Split,
    /// Break the line and carry its leading whitespace onto the new line.
    SmartSplit,
    /// Insert text containing no line breaks.
    InsertInLine(Vec<char>),
    /// Insert text, splitting lines at each `\n`.
    Insert(Vec<char>),
    /// Remove the selected text.
    Delete,
    /// Copy the selected text into a register of this cursor.
    Yank(Register),
    /// Insert the contents of a register of this cursor.
    Paste(Register),
}

impl CursorEdit {
    #[must_use]
    pub fn insert(text: &str) -> Self {
        Self::Insert(text.chars().collect())
    }

    #[must_use]
    pub fn insert_in_line(text: &str) -> Self {
        Self::InsertInLine(text.chars().collect())
    }
}

/// An edit applied to the whole editor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// Run a cursor edit at every cursor, bottom-most first.
    Cursor(CursorEdit),
    SingleSplit(Location),
    SingleInsertInLine { text: Vec<char>, at: Location },
    SingleDelete(Range),
    PushCursor(Range),
    /// Remove the cursor at this position in the cursor list.
    RemoveCursor(usize),
    /// Keep only the most recently added cursor.
    OnlyMainCursor,
    /// Replace every cursor.
    SetCursors(Vec<Range>),
    /// Move every cursor, dropping those that leave the buffer.
    GoTo(Movement),
    /// Move each cursor's end to where the movement takes its range.
    SelectUntil(Movement),
    /// Move each cursor's end to where the movement takes the end.
    ExpandSelection(Movement),
    /// Add a cursor at the movement's result from the last cursor.
    PushCursorFromLast(Movement),
}

impl From<CursorEdit> for Edit {
    fn from(edit: CursorEdit) -> Self {
        Self::Cursor(edit)
    }
}

/// One line-level buffer mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Line `row` was split into `row` and `row + 1`.
    Split { row: usize },
    /// Line `row` was replaced; `line` holds its previous contents.
    Changed { row: usize, line: Line },
    /// Lines starting at `row` were joined into one; `lines` holds them all.
    Deleted { row: usize, lines: Vec<Line> },
}

impl Step {
    fn undo<B: Buffer + ?Sized>(&self, buffer: &mut B) {
        match self {
            Self::Split { row } => {
                let mut joined = buffer.line(*row).to_vec();
                joined.extend_from_slice(buffer.line(row + 1));
                buffer.remove_line(row + 1);
                buffer.change_line(*row, &joined);
            }
            Self::Changed { row, line } => buffer.change_line(*row, line),
            Self::Deleted { row, lines } => {
                if let Some((first, rest)) = lines.split_first() {
                    buffer.change_line(*row, first);
                    for (offset, line) in rest.iter().enumerate() {
                        buffer.add_line(row + 1 + offset, line);
                    }
                }
            }
        }
    }
}

/// Record of an applied edit, sufficient to revert it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppliedEdit {
    cursors: Vec<Cursor>,
    steps: Vec<Step>,
}

impl AppliedEdit {
    /// Cursor set from before the edit, in list order.
    #[must_use]
    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    /// Buffer mutations in the order they were performed.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether the edit left the buffer untouched.
    #[must_use]
    pub fn is_buffer_unchanged(&self) -> bool {
        self.steps.is_empty()
    }

    /// Undo the steps and return the cursor set to reinstate.
    pub(crate) fn revert_on<B: Buffer + ?Sized>(self, buffer: &mut B) -> Vec<Cursor> {
        for step in self.steps.iter().rev() {
            step.undo(buffer);
        }
        self.cursors
    }
}

fn row_index<B: Buffer + ?Sized>(buffer: &B, row: isize) -> Option<usize> {
    usize::try_from(row).ok().filter(|&row| row < buffer.len())
}

/// Mutable view of editor state while one edit runs.
pub(crate) struct Transaction<'a, B: Buffer + ?Sized> {
    buffer: &'a mut B,
    cursors: &'a mut Vec<Cursor>,
    config: &'a EditorConfig,
    steps: Vec<Step>,
}

impl<'a, B: Buffer + ?Sized> Transaction<'a, B> {
    pub(crate) fn new(
        buffer: &'a mut B,
        cursors: &'a mut Vec<Cursor>,
        config: &'a EditorConfig,
    ) -> Self {
        Self {
            buffer,
            cursors,
            config,
            steps: Vec::new(),
        }
    }

    /// Run `edit` and produce its inversion record.
    pub(crate) fn run(mut self, edit: &Edit) -> AppliedEdit {
        let before = self.cursors.clone();
        match edit {
            Edit::Cursor(cursor_edit) => self.apply_to_all_cursors(cursor_edit),
            Edit::SingleSplit(at) => self.split(*at),
            Edit::SingleInsertInLine { text, at } => self.insert_in_line(text, *at),
            Edit::SingleDelete(range) => self.delete(*range),
            Edit::PushCursor(range) => self.cursors.push(Cursor::new(*range)),
            Edit::RemoveCursor(index) => {
                if *index < self.cursors.len() {
                    self.cursors.remove(*index);
                }
            }
            Edit::OnlyMainCursor => {
                let excess = self.cursors.len().saturating_sub(1);
                self.cursors.drain(..excess);
            }
            Edit::SetCursors(ranges) => {
                *self.cursors = ranges.iter().copied().map(Cursor::new).collect();
            }
            Edit::GoTo(movement) => self.go_to(movement),
            Edit::SelectUntil(movement) => self.select(movement, false),
            Edit::ExpandSelection(movement) => self.select(movement, true),
            Edit::PushCursorFromLast(movement) => self.push_cursor_from_last(movement),
        }
        AppliedEdit {
            cursors: before,
            steps: self.steps,
        }
    }

    // ============================================
    // Cursor-set edits
    // ============================================

    fn apply_to_all_cursors(&mut self, edit: &CursorEdit) {
        let mut order: Vec<usize> = (0..self.cursors.len()).collect();
        order.sort_by_key(|&slot| self.cursors[slot].range.start);

        // Later cursors first, so edits never shift a cursor still waiting
        for &slot in order.iter().rev() {
            if self.cursors[slot].range.is_out_of_bounds(self.buffer.len()) {
                continue;
            }
            self.apply_cursor_edit(slot, edit);
        }
        self.remove_out_of_bounds();
    }

    fn apply_cursor_edit(&mut self, slot: usize, edit: &CursorEdit) {
        match edit {
            CursorEdit::Split => self.split(self.cursors[slot].range.start),
            CursorEdit::SmartSplit => self.smart_split(slot),
            CursorEdit::InsertInLine(text) => {
                self.insert_in_line(text, self.cursors[slot].range.start);
            }
            CursorEdit::Insert(text) => self.insert(slot, text),
            CursorEdit::Delete => self.delete(self.cursors[slot].range),
            CursorEdit::Yank(register) => self.yank(slot, *register),
            CursorEdit::Paste(register) => {
                if let Some(text) = self.cursors[slot].registers.get(*register) {
                    let text = text.to_vec();
                    self.insert(slot, &text);
                }
            }
        }
    }

    fn remove_out_of_bounds(&mut self) {
        let len = self.buffer.len();
        let before = self.cursors.len();
        self.cursors.retain(|cursor| !cursor.range.is_out_of_bounds(len));
        let dropped = before - self.cursors.len();
        if dropped > 0 {
            event::emit_log(
                LogLevel::Warn,
                &format!("dropped {dropped} out-of-bounds cursor(s)"),
            );
            event::emit_event(event::names::CURSOR_DROPPED, &dropped.to_string());
        }
    }

    fn go_to(&mut self, movement: &Movement) {
        for cursor in self.cursors.iter_mut() {
            cursor.range = movement.apply(&*self.buffer, self.config, cursor.range);
        }
        self.remove_out_of_bounds();
        for cursor in self.cursors.iter_mut() {
            let mut range = cursor.range;
            range.start.column = range.start.column.max(0);
            range.end.column = range.end.column.max(0);
            cursor.range = range.with_min_width();
        }
    }

    /// Move each cursor's end, pivoting on the end itself when `from_end`.
    fn select(&mut self, movement: &Movement, from_end: bool) {
        for slot in 0..self.cursors.len() {
            let range = self.cursors[slot].range;
            let pivot = if from_end {
                Range::collapsed(range.end)
            } else {
                range
            };
            let target = movement.apply(&*self.buffer, self.config, pivot).start;
            let end = self.clamp_selection_end(target, movement);
            self.cursors[slot].range.end = end;
        }
    }

    fn clamp_selection_end(&self, target: Location, movement: &Movement) -> Location {
        let len = self.buffer.len();
        if len == 0 {
            return Location::default();
        }
        let last = len - 1;
        let row = match row_index(&*self.buffer, target.row) {
            Some(row) => row,
            None if movement.is_backward() => return Location::new(0, 0),
            None => {
                let span = column_span(self.config, self.buffer.line(last)) as isize;
                return Location::new(last as isize, span + 1);
            }
        };
        let span = column_span(self.config, self.buffer.line(row)) as isize;
        Location::new(target.row, target.column.clamp(0, span + 1))
    }

    fn push_cursor_from_last(&mut self, movement: &Movement) {
        let Some(last) = self.cursors.last() else {
            return;
        };
        let mut cursor = last.clone();
        cursor.range = movement.apply(&*self.buffer, self.config, cursor.range);
        self.cursors.push(cursor);
        self.remove_out_of_bounds();
    }

    // ============================================
    // Buffer edits
    // ============================================

    fn change_line(&mut self, row: usize, line: &[char]) {
        self.steps.push(Step::Changed {
            row,
            line: self.buffer.line(row).into(),
        });
        self.buffer.change_line(row, line);
    }

    fn split(&mut self, at: Location) {
        let Some(row) = row_index(&*self.buffer, at.row) else {
            return;
        };
        let line = self.buffer.line(row);
        let index = location_to_index(self.config, line, at.column);
        let left = line[..index].to_vec();
        let right = line[index..].to_vec();
        // A split column inside a wide character lands after it
        let shift = (column_span(self.config, &left) as isize).max(at.column);

        self.buffer.change_line(row, &left);
        self.buffer.add_line(row + 1, &right);
        self.steps.push(Step::Split { row });

        let split_row = at.row;
        let relocate = |location: Location| {
            if location.row > split_row {
                Location::new(location.row + 1, location.column)
            } else if location.row == split_row && location.column >= at.column {
                Location::new(location.row + 1, (location.column - shift).max(0))
            } else {
                location
            }
        };
        for cursor in self.cursors.iter_mut() {
            cursor.range.start = relocate(cursor.range.start);
            cursor.range.end = relocate(cursor.range.end);
        }
    }

    fn insert_in_line(&mut self, text: &[char], at: Location) {
        let Some(row) = row_index(&*self.buffer, at.row) else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let line = self.buffer.line(row);
        let index = location_to_index(self.config, line, at.column);
        let mut joined = Vec::with_capacity(line.len() + text.len());
        joined.extend_from_slice(&line[..index]);
        joined.extend_from_slice(text);
        joined.extend_from_slice(&line[index..]);
        self.change_line(row, &joined);

        let width = column_span(self.config, text) as isize;
        for cursor in self.cursors.iter_mut() {
            for location in [&mut cursor.range.start, &mut cursor.range.end] {
                if location.row == at.row && location.column >= at.column {
                    location.column += width;
                }
            }
        }
    }

    fn insert(&mut self, slot: usize, text: &[char]) {
        for (i, segment) in text.split(|&c| c == '\n').enumerate() {
            if i > 0 {
                self.split(self.cursors[slot].range.start);
            }
            self.insert_in_line(segment, self.cursors[slot].range.start);
        }
    }

    fn smart_split(&mut self, slot: usize) {
        let row = self.cursors[slot].range.start.row;
        let indentation: Vec<char> =
            Reader::new(&*self.buffer, self.config, Location::new(row, 0))
                .take_while(|&c| c != '\n' && c.is_whitespace())
                .collect();
        self.split(self.cursors[slot].range.start);
        self.insert_in_line(&indentation, self.cursors[slot].range.start);
    }

    /// Normalize `range` so its end never points past a line's newline slot.
    ///
    /// An end beyond the newline slot moves to the start of the next line,
    /// or clamps to one past the last line's end. A start beyond the end of
    /// its line clamps to the newline slot.
    fn include_newline(&self, range: Range) -> Range {
        let mut range = range;
        let last = self.buffer.len() as isize - 1;
        let end_span = self.span_of(range.end.row);
        if range.end.column > end_span {
            if range.end.row >= last {
                range.end.column = end_span + 1;
            } else {
                range.end = Location::new(range.end.row + 1, 0);
            }
        }
        let start_span = self.span_of(range.start.row);
        if range.start.column > start_span {
            range.start.column = start_span;
        }
        range
    }

    fn span_of(&self, row: isize) -> isize {
        row_index(&*self.buffer, row)
            .map_or(0, |row| column_span(self.config, self.buffer.line(row)) as isize)
    }

    fn delete(&mut self, range: Range) {
        let range = range.ordered();
        if range.is_out_of_bounds(self.buffer.len()) {
            return;
        }
        let range = self.include_newline(range);
        let (start, end) = (range.start, range.end);
        let (Some(first_row), Some(last_row)) = (
            row_index(&*self.buffer, start.row),
            row_index(&*self.buffer, end.row),
        ) else {
            return;
        };

        let first = self.buffer.line(first_row);
        let last = self.buffer.line(last_row);
        let start_index = location_to_index(self.config, first, start.column);
        let mut end_index = location_to_index(self.config, last, end.column);
        if first_row == last_row {
            end_index = end_index.max(start_index);
        }
        if first_row == last_row && start_index == end_index {
            return;
        }

        let mut joined = first[..start_index].to_vec();
        joined.extend_from_slice(&last[end_index..]);
        let originals: Vec<Line> = (first_row..=last_row)
            .map(|row| self.buffer.line(row).into())
            .collect();

        for row in (first_row + 1..=last_row).rev() {
            self.buffer.remove_line(row);
        }
        self.buffer.change_line(first_row, &joined);
        self.steps.push(Step::Deleted {
            row: first_row,
            lines: originals,
        });

        let removed = end.row - start.row;
        let relocate = |location: Location| {
            if location < start {
                location
            } else if location < end {
                start
            } else if location.row == end.row {
                Location::new(start.row, start.column + location.column - end.column)
            } else {
                Location::new(location.row - removed, location.column)
            }
        };
        for cursor in self.cursors.iter_mut() {
            cursor.range = Range::new(relocate(cursor.range.start), relocate(cursor.range.end))
                .with_min_width();
        }
    }

    fn yank(&mut self, slot: usize, register: Register) {
        let range = self.cursors[slot].range;
        let mut reader = Reader::new(&*self.buffer, self.config, range.start);
        let mut yanked = Vec::new();
        while reader.location() < range.end && reader.location() != Location::OUT_OF_BOUNDS {
            match reader.read_rune() {
                Some(c) => yanked.push(c),
                None => break,
            }
        }
        self.cursors[slot].registers.set(register, yanked);
    }
}
