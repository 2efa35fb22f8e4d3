//! Loading, saving and filtering documents through real files.

mod common;

use std::fs;
use std::io::{Read, Write};

use common::{editor_with, r, ranges, setup_test_logging};
use tempfile::{NamedTempFile, tempdir};
use wr::{CursorEdit, Edit, Editor, EditorConfig, Error, Location};

#[test]
fn open_edit_save_round_trip() {
    setup_test_logging();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all("fn main() {\n\tprintln!(\"héllo 学\");\n}\n".as_bytes())
        .unwrap();

    let mut editor = Editor::open(file.path(), EditorConfig::default()).unwrap();
    assert_eq!(editor.lines().len(), 3);

    editor.push_cursor(r(1, 0, 1, 1));
    editor.apply(&Edit::Cursor(CursorEdit::insert("// ")));
    editor.save_to_file(file.path()).unwrap();

    let saved = fs::read_to_string(file.path()).unwrap();
    assert_eq!(saved, "fn main() {\n// \tprintln!(\"héllo 学\");\n}\n");

    let reopened = Editor::open(file.path(), EditorConfig::default()).unwrap();
    assert_eq!(reopened.lines(), editor.lines());
}

#[test]
fn missing_trailing_newline_is_added_on_save() {
    setup_test_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "a\nb").unwrap();

    let editor = Editor::open(&path, EditorConfig::default()).unwrap();
    assert_eq!(editor.lines(), vec!["a", "b"]);
    editor.save_to_file(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
}

#[test]
fn carriage_returns_stay_in_the_line() {
    setup_test_logging();
    let editor = Editor::load("a\r\nb\r\n".as_bytes(), EditorConfig::default()).unwrap();
    assert_eq!(editor.lines(), vec!["a\r", "b\r"]);
}

#[test]
fn opening_a_missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let result = Editor::open(dir.path().join("absent.txt"), EditorConfig::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn invalid_utf8_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[b'o', b'k', b'\n', 0xc3, 0x28]).unwrap();
    let result = Editor::open(file.path(), EditorConfig::default());
    assert!(matches!(result, Err(Error::InvalidUtf8)));
}

#[test]
fn reader_streams_in_tiny_chunks() {
    let editor = editor_with(&["ñ学", "😀", ""], &[]);
    let mut reader = editor.reader(Location::new(0, 0));
    let mut out = Vec::new();
    let mut chunk = [0u8; 1];
    loop {
        let n = reader.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }
    assert_eq!(String::from_utf8(out).unwrap(), "ñ学\n😀\n\n");
}

#[test]
fn replace_contents_filters_the_whole_document() {
    let mut editor = editor_with(&["b", "a", "c"], &[r(0, 0, 0, 1), r(2, 0, 2, 1)]);

    let mut dump = String::new();
    editor
        .reader(Location::new(0, 0))
        .read_to_string(&mut dump)
        .unwrap();
    let mut sorted: Vec<&str> = dump.lines().collect();
    sorted.sort_unstable();
    let filtered = sorted.join("\n") + "\n";

    editor.replace_contents(filtered.as_bytes()).unwrap();
    assert_eq!(editor.lines(), vec!["a", "b", "c"]);
    assert_eq!(ranges(editor.cursors()), vec![r(0, 0, 0, 1), r(2, 0, 2, 1)]);

    editor.undo();
    assert_eq!(editor.lines(), vec!["b", "a", "c"]);
}

#[test]
fn replace_contents_with_longer_text() {
    let mut editor = editor_with(&["x"], &[r(0, 0, 0, 1)]);
    editor.replace_contents("1\n2\n3\n".as_bytes()).unwrap();
    assert_eq!(editor.lines(), vec!["1", "2", "3"]);
    editor.undo();
    assert_eq!(editor.lines(), vec!["x"]);
    editor.redo();
    assert_eq!(editor.lines(), vec!["1", "2", "3"]);
}
