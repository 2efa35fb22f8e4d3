//! Multi-cursor editor state.
//!
//! [`Editor`] owns a [`Buffer`], the live cursor set and the undo
//! [`History`]. All mutation goes through [`Editor::apply`], which returns an
//! [`AppliedEdit`] that [`Editor::revert`] can undo exactly.
//!
//! # Examples
//!
//! ```
//! use wr::{CursorEdit, Edit, Editor, EditorConfig, Location, Movement, Range};
//!
//! let mut editor = Editor::from_lines(["hello", "world"], EditorConfig::default());
//! editor.apply(&Edit::PushCursor(Range::collapsed(Location::new(0, 0))));
//! editor.mark_undo();
//! editor.apply(&Edit::GoTo(Movement::EndOfLine));
//! editor.apply(&Edit::Cursor(CursorEdit::insert(", there")));
//! assert_eq!(editor.lines(), vec!["hello, there", "world"]);
//!
//! editor.undo();
//! assert_eq!(editor.lines(), vec!["hello", "world"]);
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use ropey::Rope;

use crate::buffer::{Buffer, Line, PersistentBuffer, collect_lines};
use crate::config::EditorConfig;
use crate::cursor::{Cursor, Location, Range};
use crate::edit::{AppliedEdit, Edit, Transaction};
use crate::error::{Error, Result};
use crate::event::{self, LogLevel};
use crate::history::History;
use crate::movement::Movement;
use crate::reader::Reader;
use crate::unicode::char_width;

/// Split a UTF-8 byte stream into lines on `\n`.
///
/// A trailing terminator does not start a new line, and the result always
/// holds at least one (possibly empty) line.
pub fn read_lines<R: Read>(reader: R) -> Result<Vec<Line>> {
    let mut source = SourceReader {
        inner: reader,
        failed: false,
    };
    let rope = match Rope::from_reader(&mut source) {
        Ok(rope) => rope,
        Err(e) if !source.failed && e.kind() == io::ErrorKind::InvalidData => {
            return Err(Error::InvalidUtf8);
        }
        Err(e) => return Err(Error::Io(e)),
    };
    let mut lines: Vec<Line> = rope
        .lines()
        .map(|slice| {
            let mut chars: Vec<char> = slice.chars().collect();
            if chars.last() == Some(&'\n') {
                chars.pop();
            }
            chars.into()
        })
        .collect();
    if lines.len() > 1 && lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        lines.push(Line::from(Vec::new()));
    }
    Ok(lines)
}

/// Remembers whether the wrapped reader itself failed, so decoding errors
/// raised by the rope can be told apart from the caller's I/O errors.
struct SourceReader<R> {
    inner: R,
    failed: bool,
}

impl<R: Read> Read for SourceReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf).inspect_err(|e| {
            if e.kind() != io::ErrorKind::Interrupted {
                self.failed = true;
            }
        })
    }
}

/// Buffer, cursors and history of one document.
pub struct Editor<B: Buffer = PersistentBuffer> {
    buffer: B,
    cursors: Vec<Cursor>,
    history: History,
    config: EditorConfig,
}

impl Editor<PersistentBuffer> {
    /// Create an editor holding one empty line and no cursors.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::from_lines([""], config)
    }

    /// Create an editor over the given lines.
    #[must_use]
    pub fn from_lines<I, S>(lines: I, config: EditorConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buffer = PersistentBuffer::from_strs(lines);
        if buffer.is_empty() {
            buffer.add_line(0, &[]);
        }
        Self::with_buffer(buffer, config)
    }

    /// Load a document from a UTF-8 byte stream.
    pub fn load<R: Read>(reader: R, config: EditorConfig) -> Result<Self> {
        config.validate()?;
        let lines = read_lines(reader)?;
        Ok(Self::with_buffer(PersistentBuffer::from_lines(&lines), config))
    }

    /// Load a document from a file.
    pub fn open(path: impl AsRef<Path>, config: EditorConfig) -> Result<Self> {
        let file = fs::File::open(path)?;
        Self::load(io::BufReader::new(file), config)
    }
}

impl<B: Buffer> Editor<B> {
    /// Wrap an existing buffer. The editor starts with no cursors.
    #[must_use]
    pub fn with_buffer(buffer: B, config: EditorConfig) -> Self {
        Self {
            buffer,
            cursors: Vec::new(),
            history: History::with_limit(config.history_limit),
            config,
        }
    }

    #[must_use]
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Unwrap into the underlying buffer.
    pub fn into_buffer(self) -> B {
        self.buffer
    }

    #[must_use]
    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    /// The main cursor: the most recently added one.
    #[must_use]
    pub fn primary_cursor(&self) -> Option<&Cursor> {
        self.cursors.last()
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Every line as an owned string.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        collect_lines(&self.buffer)
    }

    /// Whole document, lines joined by `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.reader(Location::default()).collect()
    }

    /// Scanner over the document starting at `location`.
    #[must_use]
    pub fn reader(&self, location: Location) -> Reader<'_, B> {
        Reader::new(&self.buffer, &self.config, location)
    }

    /// Whether `range` lies on rows outside the buffer.
    #[must_use]
    pub fn is_out_of_bounds(&self, range: &Range) -> bool {
        range.is_out_of_bounds(self.buffer.len())
    }

    // ============================================
    // Editing
    // ============================================

    /// Apply `edit`, returning the record needed to revert it.
    pub fn apply(&mut self, edit: &Edit) -> AppliedEdit {
        Transaction::new(&mut self.buffer, &mut self.cursors, &self.config).run(edit)
    }

    /// Undo `applied`, which must be the most recent edit applied.
    pub fn revert(&mut self, applied: AppliedEdit) {
        self.cursors = applied.revert_on(&mut self.buffer);
    }

    pub fn push_cursor(&mut self, range: Range) -> AppliedEdit {
        self.apply(&Edit::PushCursor(range))
    }

    pub fn remove_cursor(&mut self, index: usize) -> AppliedEdit {
        self.apply(&Edit::RemoveCursor(index))
    }

    pub fn only_main_cursor(&mut self) -> AppliedEdit {
        self.apply(&Edit::OnlyMainCursor)
    }

    pub fn set_cursors(&mut self, ranges: Vec<Range>) -> AppliedEdit {
        self.apply(&Edit::SetCursors(ranges))
    }

    pub fn push_cursor_from_last(&mut self, movement: Movement) -> AppliedEdit {
        self.apply(&Edit::PushCursorFromLast(movement))
    }

    pub fn go_to(&mut self, movement: Movement) -> AppliedEdit {
        self.apply(&Edit::GoTo(movement))
    }

    pub fn select_until(&mut self, movement: Movement) -> AppliedEdit {
        self.apply(&Edit::SelectUntil(movement))
    }

    pub fn expand_selection(&mut self, movement: Movement) -> AppliedEdit {
        self.apply(&Edit::ExpandSelection(movement))
    }

    // ============================================
    // History
    // ============================================

    /// Snapshot the current state as an undo point.
    pub fn mark_undo(&mut self) {
        self.history.mark(&mut self.buffer, &self.cursors);
    }

    pub fn undo(&mut self) {
        self.history.undo(&mut self.buffer, &mut self.cursors);
    }

    pub fn redo(&mut self) {
        self.history.redo(&mut self.buffer, &mut self.cursors);
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ============================================
    // I/O
    // ============================================

    /// Write the document as UTF-8, every line terminated by `\n`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let mut reader = self.reader(Location::default());
        io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut bytes = Vec::new();
        self.reader(Location::default()).read_to_end(&mut bytes)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Replace the whole document with the contents of `reader`.
    ///
    /// The previous contents are marked for undo first. Cursors are kept
    /// where they are; those left past the new end are dropped.
    pub fn replace_contents<R: Read>(&mut self, reader: R) -> Result<()> {
        let lines = read_lines(reader)?;
        self.mark_undo();

        let old_len = self.buffer.len();
        for (row, line) in lines.iter().enumerate().take(old_len) {
            self.buffer.change_line(row, line);
        }
        for row in (lines.len()..old_len).rev() {
            self.buffer.remove_line(row);
        }
        for (row, line) in lines.iter().enumerate().skip(old_len) {
            self.buffer.add_line(row, line);
        }

        let len = self.buffer.len();
        let before = self.cursors.len();
        self.cursors.retain(|cursor| !cursor.range.is_out_of_bounds(len));
        let dropped = before - self.cursors.len();
        if dropped > 0 {
            event::emit_event(event::names::CURSOR_DROPPED, &dropped.to_string());
        }
        event::emit_log(
            LogLevel::Info,
            &format!("replaced {old_len} line(s) with {len}"),
        );
        event::emit_event(event::names::BUFFER_REPLACED, &len.to_string());
        Ok(())
    }

    /// Render the buffer with `[` and `]` marking cursor starts and ends.
    ///
    /// Tabs are expanded to spaces. Markers past the end of a line follow
    /// its last character.
    #[must_use]
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        for row in 0..self.buffer.len() {
            let row_key = row as isize;
            let mut marks: Vec<(isize, bool)> = Vec::new();
            for cursor in &self.cursors {
                if cursor.range.end.row == row_key {
                    marks.push((cursor.range.end.column, false));
                }
                if cursor.range.start.row == row_key {
                    marks.push((cursor.range.start.column, true));
                }
            }
            // Ends sort before starts at the same column
            marks.sort_unstable();
            let mut marks = marks.into_iter().peekable();

            let mut column = 0isize;
            for &c in self.buffer.line(row) {
                while let Some((_, is_start)) = marks.next_if(|&(at, _)| at <= column) {
                    out.push(if is_start { '[' } else { ']' });
                }
                let width = char_width(&self.config, c);
                if c == '\t' {
                    out.extend(std::iter::repeat_n(' ', width));
                } else {
                    out.push(c);
                }
                column += width as isize;
            }
            for (_, is_start) in marks {
                out.push(if is_start { '[' } else { ']' });
            }
            out.push('\n');
        }
        out
    }
}

impl Default for Editor<PersistentBuffer> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Once;

    use super::*;
    use crate::buffer::ArrayBuffer;
    use crate::cursor::Register;
    use crate::edit::CursorEdit;
    use crate::event::set_log_callback;

    fn setup_test_logging() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_test_writer()
                .try_init();
            set_log_callback(|level, message| match level {
                LogLevel::Debug => tracing::debug!("{message}"),
                LogLevel::Info => tracing::info!("{message}"),
                LogLevel::Warn => tracing::warn!("{message}"),
                LogLevel::Error => tracing::error!("{message}"),
            });
        });
    }

    fn editor(lines: &[&str], ranges: &[Range]) -> Editor {
        setup_test_logging();
        let mut editor = Editor::from_lines(lines, EditorConfig::default());
        editor.set_cursors(ranges.to_vec());
        editor
    }

    fn ranges(editor: &Editor) -> Vec<Range> {
        editor.cursors().iter().map(|c| c.range).collect()
    }

    const LINES: [&str; 4] = ["0000", "1111", "2222", "3333"];

    // ============================================
    // Split
    // ============================================

    #[test]
    fn test_split() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(1, 2, 1, 3), Range::from_coords(2, 3, 2, 4)],
        );
        ed.mark_undo();
        ed.apply(&Edit::Cursor(CursorEdit::Split));
        assert_eq!(ed.lines(), vec!["0000", "11", "11", "222", "2", "3333"]);

        ed.undo();
        assert_eq!(ed.lines(), LINES);
    }

    #[test]
    fn test_split_out_of_bounds_columns() {
        let mut ed = editor(
            &LINES,
            &[
                Range::from_coords(1, 100, 1, 200),
                Range::from_coords(2, 300, 2, 400),
            ],
        );
        ed.mark_undo();
        ed.apply(&Edit::Cursor(CursorEdit::Split));
        assert_eq!(ed.lines(), vec!["0000", "1111", "", "2222", "", "3333"]);

        ed.undo();
        assert_eq!(ed.lines(), LINES);
    }

    #[test]
    fn test_split_moves_cursors() {
        let ranges_before: Vec<Range> = (0..4).map(|r| Range::from_coords(r, 1, r, 4)).collect();
        let mut ed = editor(&LINES, &ranges_before);
        ed.apply(&Edit::Cursor(CursorEdit::Split));
        assert_eq!(
            ed.lines(),
            vec!["0", "000", "1", "111", "2", "222", "3", "333"]
        );
        assert_eq!(
            ranges(&ed),
            vec![
                Range::from_coords(1, 0, 1, 3),
                Range::from_coords(3, 0, 3, 3),
                Range::from_coords(5, 0, 5, 3),
                Range::from_coords(7, 0, 7, 3),
            ]
        );
    }

    #[test]
    fn test_smart_split_keeps_indentation() {
        let mut ed = editor(&["    let x;", "\tfoo()"], &[
            Range::from_coords(0, 8, 0, 9),
            Range::from_coords(1, 7, 1, 8),
        ]);
        ed.apply(&Edit::Cursor(CursorEdit::SmartSplit));
        assert_eq!(ed.lines(), vec!["    let ", "    x;", "\tfoo", "\t()"]);
        assert_eq!(
            ranges(&ed),
            vec![Range::from_coords(1, 4, 1, 5), Range::from_coords(3, 4, 3, 5)]
        );
    }

    // ============================================
    // Insert
    // ============================================

    #[test]
    fn test_insert_in_line_moves_cursors() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(1, 2, 1, 3), Range::from_coords(2, 3, 2, 4)],
        );
        ed.mark_undo();
        ed.apply(&Edit::Cursor(CursorEdit::insert_in_line("!\t")));
        ed.apply(&Edit::Cursor(CursorEdit::insert_in_line("!")));
        assert_eq!(ed.lines(), vec!["0000", "11!\t!11", "222!\t!2", "3333"]);
        assert_eq!(
            ranges(&ed),
            vec![Range::from_coords(1, 8, 1, 9), Range::from_coords(2, 9, 2, 10)]
        );

        ed.undo();
        assert_eq!(ed.lines(), LINES);
    }

    #[test]
    fn test_single_insert_in_line() {
        let mut ed = editor(&LINES, &[Range::from_coords(1, 2, 1, 3)]);
        ed.apply(&Edit::SingleInsertInLine {
            text: vec!['!'],
            at: Location::new(1, 2),
        });
        assert_eq!(ed.lines(), vec!["0000", "11!11", "2222", "3333"]);
        assert_eq!(ranges(&ed), vec![Range::from_coords(1, 3, 1, 4)]);
    }

    #[test]
    fn test_insert_multiline() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(1, 2, 1, 3), Range::from_coords(2, 3, 2, 4)],
        );
        ed.mark_undo();
        ed.apply(&Edit::Cursor(CursorEdit::insert("!\n!")));
        assert_eq!(
            ed.lines(),
            vec!["0000", "11!", "!11", "222!", "!2", "3333"]
        );

        ed.undo();
        assert_eq!(ed.lines(), LINES);
    }

    #[test]
    fn test_insert_out_of_bounds_columns() {
        let mut ed = editor(
            &LINES,
            &[
                Range::from_coords(1, 100, 1, 100),
                Range::from_coords(2, 100, 2, 100),
            ],
        );
        ed.mark_undo();
        ed.apply(&Edit::Cursor(CursorEdit::insert("!\n!")));
        assert_eq!(
            ed.lines(),
            vec!["0000", "1111!", "!", "2222!", "!", "3333"]
        );

        ed.undo();
        assert_eq!(ed.lines(), LINES);
    }

    // ============================================
    // Delete
    // ============================================

    #[test]
    fn test_single_delete() {
        let cases: [(Range, Vec<&str>); 4] = [
            (Range::from_coords(1, 1, 1, 2), vec!["0000", "111", "2222", "3333"]),
            (Range::from_coords(1, 1, 2, 2), vec!["0000", "122", "3333"]),
            (Range::from_coords(1, 1, 2, 5), vec!["0000", "13333"]),
            (Range::from_coords(3, 4, 3, 5), LINES.to_vec()),
        ];
        for (range, expected) in cases {
            let mut ed = editor(&LINES, &[]);
            ed.mark_undo();
            ed.apply(&Edit::SingleDelete(range));
            assert_eq!(ed.lines(), expected, "deleting {range}");

            ed.undo();
            assert_eq!(ed.lines(), LINES, "undoing {range}");
        }
    }

    #[test]
    fn test_single_delete_moves_cursors() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(1, 3, 1, 4), Range::from_coords(2, 3, 2, 4)],
        );
        ed.apply(&Edit::SingleDelete(Range::from_coords(0, 0, 1, 1)));
        assert_eq!(ed.lines(), vec!["111", "2222", "3333"]);
        assert_eq!(
            ranges(&ed),
            vec![Range::from_coords(0, 2, 0, 3), Range::from_coords(1, 3, 1, 4)]
        );
    }

    #[test]
    fn test_delete_at_every_cursor() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(1, 2, 1, 3), Range::from_coords(2, 0, 2, 5)],
        );
        ed.mark_undo();
        ed.apply(&Edit::Cursor(CursorEdit::Delete));
        assert_eq!(ed.lines(), vec!["0000", "111", "3333"]);
        assert_eq!(
            ranges(&ed),
            vec![Range::from_coords(1, 2, 1, 3), Range::from_coords(2, 0, 2, 1)]
        );

        ed.undo();
        assert_eq!(ed.lines(), LINES);
        assert_eq!(
            ranges(&ed),
            vec![Range::from_coords(1, 2, 1, 3), Range::from_coords(2, 0, 2, 5)]
        );
    }

    // ============================================
    // Registers
    // ============================================

    #[test]
    fn test_yank_and_paste() {
        let register = Register::from_char('a').unwrap();
        let mut ed = editor(&LINES, &[Range::from_coords(1, 1, 2, 2)]);
        ed.apply(&Edit::Cursor(CursorEdit::Yank(register)));
        assert_eq!(
            ed.cursors()[0].registers.get(register),
            Some(&['1', '1', '1', '\n', '2', '2'][..])
        );

        ed.go_to(Movement::StartOfLine);
        ed.apply(&Edit::Cursor(CursorEdit::Paste(register)));
        assert_eq!(
            ed.lines(),
            vec!["0000", "111", "221111", "2222", "3333"]
        );
    }

    #[test]
    fn test_degenerate_yank_is_empty() {
        let register = Register::from_char('b').unwrap();
        let mut ed = editor(&LINES, &[Range::from_coords(1, 2, 1, 2)]);
        ed.apply(&Edit::Cursor(CursorEdit::Yank(register)));
        assert_eq!(ed.cursors()[0].registers.get(register), Some(&[][..]));
    }

    #[test]
    fn test_paste_empty_register_is_noop() {
        let register = Register::from_char('c').unwrap();
        let mut ed = editor(&LINES, &[Range::from_coords(1, 2, 1, 3)]);
        let applied = ed.apply(&Edit::Cursor(CursorEdit::Paste(register)));
        assert!(applied.is_buffer_unchanged());
        assert_eq!(ed.lines(), LINES);
    }

    // ============================================
    // Cursor set
    // ============================================

    #[test]
    fn test_remove_cursor_then_split() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(1, 1, 1, 2), Range::from_coords(2, 3, 2, 4)],
        );
        ed.mark_undo();
        ed.remove_cursor(0);
        ed.remove_cursor(7);
        ed.apply(&Edit::Cursor(CursorEdit::Split));
        assert_eq!(ed.lines(), vec!["0000", "1111", "222", "2", "3333"]);

        ed.undo();
        assert_eq!(ed.lines(), LINES);
    }

    #[test]
    fn test_only_main_cursor_keeps_last() {
        let mut ed = editor(
            &LINES,
            &[
                Range::from_coords(0, 0, 0, 1),
                Range::from_coords(1, 0, 1, 1),
                Range::from_coords(2, 0, 2, 1),
            ],
        );
        ed.only_main_cursor();
        assert_eq!(ranges(&ed), vec![Range::from_coords(2, 0, 2, 1)]);
        assert_eq!(
            ed.primary_cursor().map(|c| c.range),
            Some(Range::from_coords(2, 0, 2, 1))
        );
    }

    #[test]
    fn test_push_cursor_from_last() {
        let mut ed = editor(&LINES, &[Range::from_coords(1, 2, 1, 3)]);
        ed.push_cursor_from_last(Movement::Rows(1));
        ed.push_cursor_from_last(Movement::Rows(1));
        ed.push_cursor_from_last(Movement::Rows(1));
        assert_eq!(
            ranges(&ed),
            vec![
                Range::from_coords(1, 2, 1, 3),
                Range::from_coords(2, 2, 2, 3),
                Range::from_coords(3, 2, 3, 3),
            ]
        );
    }

    // ============================================
    // Movement edits
    // ============================================

    #[test]
    fn test_move_columns_then_edit() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(1, 1, 1, 3), Range::from_coords(2, 3, 2, 4)],
        );
        ed.mark_undo();
        ed.go_to(Movement::Columns(2));
        ed.apply(&Edit::Cursor(CursorEdit::Split));
        ed.go_to(Movement::Columns(-100));
        ed.apply(&Edit::Cursor(CursorEdit::insert("!")));
        ed.go_to(Movement::Columns(-1));
        ed.apply(&Edit::Cursor(CursorEdit::Delete));
        assert_eq!(
            ed.lines(),
            vec!["0000", "111", "1", "2222", "", "3333"]
        );

        ed.undo();
        assert_eq!(ed.lines(), LINES);
    }

    #[test]
    fn test_move_rows_then_split() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(1, 2, 1, 3), Range::from_coords(2, 3, 2, 4)],
        );
        ed.mark_undo();
        ed.go_to(Movement::Rows(2));
        assert_eq!(ranges(&ed), vec![Range::from_coords(3, 2, 3, 3)]);
        ed.apply(&Edit::Cursor(CursorEdit::Split));
        assert_eq!(ed.lines(), vec!["0000", "1111", "2222", "33", "33"]);

        ed.undo();
        assert_eq!(ed.lines(), LINES);
    }

    #[test]
    fn test_rows_up_twice_never_panics() {
        let mut ed = editor(&LINES, &[Range::from_coords(0, 1, 0, 2)]);
        ed.go_to(Movement::Rows(-1));
        ed.go_to(Movement::Rows(-1));
        assert!(ed.cursors().is_empty());
    }

    #[test]
    fn test_move_chars_round_trip_through_undo() {
        let mut ed = editor(&LINES, &[Range::from_coords(1, 1, 1, 2)]);
        ed.mark_undo();
        ed.go_to(Movement::Chars(1));
        assert_eq!(ranges(&ed), vec![Range::from_coords(1, 2, 1, 3)]);

        ed.undo();
        assert_eq!(ranges(&ed), vec![Range::from_coords(1, 1, 1, 2)]);
    }

    #[test]
    fn test_chars_over_multibyte_and_wide() {
        for (line, expected) in [("11ñ11", "11!ñ!11"), ("11ｏ11", "11!ｏ!11")] {
            let mut ed = editor(&["0000", line, "2222"], &[Range::from_coords(1, 2, 1, 3)]);
            ed.go_to(Movement::Chars(1));
            ed.apply(&Edit::Cursor(CursorEdit::insert("!")));
            ed.go_to(Movement::Chars(-2));
            ed.apply(&Edit::Cursor(CursorEdit::insert("!")));
            assert_eq!(ed.lines()[1], expected);
        }
    }

    #[test]
    fn test_chars_from_inside_wide_character() {
        let mut ed = editor(&["0000", "1111", "22学22"], &[Range::from_coords(1, 3, 1, 4)]);
        ed.go_to(Movement::Rows(1));
        ed.go_to(Movement::Chars(1));
        ed.apply(&Edit::Cursor(CursorEdit::insert("!")));
        assert_eq!(ed.lines()[2], "22学!22");
    }

    #[test]
    fn test_select_until_then_delete() {
        let mut ed = editor(&["foo bar baz"], &[Range::from_coords(0, 4, 0, 5)]);
        ed.select_until(Movement::Words(1));
        assert_eq!(ranges(&ed), vec![Range::from_coords(0, 4, 0, 8)]);
        ed.apply(&Edit::Cursor(CursorEdit::Delete));
        assert_eq!(ed.lines(), vec!["foo baz"]);
    }

    #[test]
    fn test_select_until_clamps_by_direction() {
        let mut ed = editor(&["foo bar", "baz"], &[Range::from_coords(1, 0, 1, 1)]);
        ed.select_until(Movement::Words(1));
        assert_eq!(ranges(&ed), vec![Range::from_coords(1, 0, 1, 4)]);

        ed.set_cursors(vec![Range::from_coords(0, 1, 0, 2)]);
        ed.select_until(Movement::Rows(-5));
        assert_eq!(ranges(&ed), vec![Range::from_coords(0, 1, 0, 0)]);
    }

    #[test]
    fn test_expand_selection_pivots_on_end() {
        let mut ed = editor(&["0000", "1111", "2222"], &[Range::from_coords(0, 1, 0, 3)]);
        ed.expand_selection(Movement::Rows(1));
        assert_eq!(ranges(&ed), vec![Range::from_coords(0, 1, 1, 3)]);
        ed.expand_selection(Movement::Columns(10));
        assert_eq!(ranges(&ed), vec![Range::from_coords(0, 1, 1, 5)]);
    }

    // ============================================
    // Revert
    // ============================================

    #[test]
    fn test_revert_restores_dropped_cursors() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(0, 0, 0, 1), Range::from_coords(3, 0, 3, 1)],
        );
        let applied = ed.go_to(Movement::Rows(1));
        assert_eq!(ranges(&ed), vec![Range::from_coords(1, 0, 1, 1)]);
        ed.revert(applied);
        assert_eq!(
            ranges(&ed),
            vec![Range::from_coords(0, 0, 0, 1), Range::from_coords(3, 0, 3, 1)]
        );
    }

    #[test]
    fn test_revert_multi_cursor_insert() {
        let mut ed = editor(
            &LINES,
            &[Range::from_coords(0, 2, 0, 3), Range::from_coords(2, 1, 2, 2)],
        );
        let applied = ed.apply(&Edit::Cursor(CursorEdit::insert("x\ny\n")));
        assert_ne!(ed.lines(), LINES);
        ed.revert(applied);
        assert_eq!(ed.lines(), LINES);
        assert_eq!(
            ranges(&ed),
            vec![Range::from_coords(0, 2, 0, 3), Range::from_coords(2, 1, 2, 2)]
        );
    }

    // ============================================
    // I/O
    // ============================================

    #[test]
    fn test_load_splits_on_newlines() {
        let ed = Editor::load("a\nb\n".as_bytes(), EditorConfig::default()).unwrap();
        assert_eq!(ed.lines(), vec!["a", "b"]);

        let ed = Editor::load("".as_bytes(), EditorConfig::default()).unwrap();
        assert_eq!(ed.lines(), vec![""]);

        let ed = Editor::load("x\n\n".as_bytes(), EditorConfig::default()).unwrap();
        assert_eq!(ed.lines(), vec!["x", ""]);
    }

    #[test]
    fn test_load_rejects_invalid_utf8() {
        let result = Editor::load(&[0x61, 0xff, 0x62][..], EditorConfig::default());
        assert!(matches!(result, Err(Error::InvalidUtf8)));
    }

    #[test]
    fn test_load_keeps_source_errors() {
        struct Failing;

        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::InvalidData, "bad frame"))
            }
        }

        let result = Editor::load(Failing, EditorConfig::default());
        match result {
            Err(Error::Io(e)) => {
                assert_eq!(e.kind(), io::ErrorKind::InvalidData);
                assert_eq!(e.to_string(), "bad frame");
            }
            other => panic!("expected the reader's own error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let config = EditorConfig::default().with_tab_size(0);
        assert!(matches!(
            Editor::load("a".as_bytes(), config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_write_to() {
        let ed = editor(&["0000", "1!111"], &[]);
        let mut out = Vec::new();
        ed.write_to(&mut out).unwrap();
        assert_eq!(out, b"0000\n1!111\n");
        assert_eq!(ed.text(), "0000\n1!111");
    }

    #[test]
    fn test_replace_contents_is_undoable() {
        let mut ed = editor(&LINES, &[Range::from_coords(3, 0, 3, 1)]);
        ed.replace_contents("a\nb\n".as_bytes()).unwrap();
        assert_eq!(ed.lines(), vec!["a", "b"]);
        assert!(ed.cursors().is_empty());

        ed.undo();
        assert_eq!(ed.lines(), LINES);
        assert_eq!(ranges(&ed), vec![Range::from_coords(3, 0, 3, 1)]);
    }

    #[test]
    fn test_generic_over_buffer() {
        let mut ed = Editor::with_buffer(
            ArrayBuffer::from_strs(["abc"]),
            EditorConfig::default(),
        );
        ed.push_cursor(Range::from_coords(0, 1, 0, 2));
        ed.mark_undo();
        ed.apply(&Edit::Cursor(CursorEdit::Delete));
        assert_eq!(ed.lines(), vec!["ac"]);
        ed.undo();
        assert_eq!(ed.lines(), vec!["abc"]);
    }

    #[test]
    fn test_debug_dump_marks_cursors() {
        let ed = editor(
            &["0000", "\t1", "22"],
            &[
                Range::from_coords(0, 1, 0, 2),
                Range::from_coords(1, 4, 1, 5),
                Range::from_coords(2, 2, 2, 3),
            ],
        );
        assert_eq!(ed.debug_dump(), "0[0]00\n    [1]\n22[]\n");
    }
}
