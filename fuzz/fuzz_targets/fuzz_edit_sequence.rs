//! Fuzz target for multi-cursor edit sequences.
//!
//! Drives the editor with arbitrary cursors, movements and edits, checking
//! that nothing panics, that every applied edit reverts exactly, and that
//! undo returns to the marked text.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wr::{CursorEdit, Edit, Editor, EditorConfig, Movement, Range, Register};

#[derive(Arbitrary, Debug)]
enum FuzzMovement {
    Rows(i8),
    Columns(i8),
    Chars(i8),
    Words(i8),
    StartOfLine,
    EndOfLine,
    Unselect,
    BoundToLine,
}

impl FuzzMovement {
    fn to_movement(&self) -> Movement {
        match *self {
            Self::Rows(n) => Movement::Rows(n.into()),
            Self::Columns(n) => Movement::Columns(n.into()),
            Self::Chars(n) => Movement::Chars(n.into()),
            Self::Words(n) => Movement::Words((n % 4).into()),
            Self::StartOfLine => Movement::StartOfLine,
            Self::EndOfLine => Movement::EndOfLine,
            Self::Unselect => Movement::Unselect,
            Self::BoundToLine => Movement::BoundToLine,
        }
    }
}

#[derive(Arbitrary, Debug)]
enum FuzzOp {
    Push(i8, i8, i8, i8),
    Remove(u8),
    OnlyMain,
    GoTo(FuzzMovement),
    SelectUntil(FuzzMovement),
    Expand(FuzzMovement),
    PushFromLast(FuzzMovement),
    Split,
    SmartSplit,
    Insert(String),
    Delete,
    Yank(u8),
    Paste(u8),
}

#[derive(Arbitrary, Debug)]
struct Input {
    lines: Vec<String>,
    tab_size: u8,
    ops: Vec<FuzzOp>,
}

fn register(index: u8) -> Register {
    // Always in range after the modulo
    Register::new(usize::from(index) % 26).unwrap()
}

fn to_edit(op: &FuzzOp) -> Edit {
    match op {
        FuzzOp::Push(sr, sc, er, ec) => Edit::PushCursor(Range::from_coords(
            (*sr).into(),
            (*sc).into(),
            (*er).into(),
            (*ec).into(),
        )),
        FuzzOp::Remove(i) => Edit::RemoveCursor(usize::from(*i)),
        FuzzOp::OnlyMain => Edit::OnlyMainCursor,
        FuzzOp::GoTo(m) => Edit::GoTo(m.to_movement()),
        FuzzOp::SelectUntil(m) => Edit::SelectUntil(m.to_movement()),
        FuzzOp::Expand(m) => Edit::ExpandSelection(m.to_movement()),
        FuzzOp::PushFromLast(m) => Edit::PushCursorFromLast(m.to_movement()),
        FuzzOp::Split => Edit::Cursor(CursorEdit::Split),
        FuzzOp::SmartSplit => Edit::Cursor(CursorEdit::SmartSplit),
        FuzzOp::Insert(text) => Edit::Cursor(CursorEdit::insert(text)),
        FuzzOp::Delete => Edit::Cursor(CursorEdit::Delete),
        FuzzOp::Yank(r) => Edit::Cursor(CursorEdit::Yank(register(*r))),
        FuzzOp::Paste(r) => Edit::Cursor(CursorEdit::Paste(register(*r))),
    }
}

fuzz_target!(|input: Input| {
    if input.lines.len() > 64 || input.ops.len() > 128 {
        return;
    }
    let config = EditorConfig::default().with_tab_size(usize::from(input.tab_size % 8) + 1);
    let mut editor = Editor::from_lines(&input.lines, config);
    editor.mark_undo();
    let marked = editor.lines();

    for op in &input.ops {
        let edit = to_edit(op);
        let lines = editor.lines();
        let cursors = editor.cursors().to_vec();

        let applied = editor.apply(&edit);
        let after_lines = editor.lines();
        let after_cursors = editor.cursors().to_vec();

        editor.revert(applied);
        assert_eq!(editor.lines(), lines, "revert of {edit:?}");
        assert_eq!(editor.cursors(), &cursors[..], "revert of {edit:?}");

        editor.apply(&edit);
        assert_eq!(editor.lines(), after_lines, "reapply of {edit:?}");
        assert_eq!(editor.cursors(), &after_cursors[..], "reapply of {edit:?}");
        let _ = editor.debug_dump();
    }

    editor.undo();
    assert_eq!(editor.lines(), marked);
});
