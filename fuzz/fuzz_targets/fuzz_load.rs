//! Fuzz target for document loading and saving.
//!
//! Arbitrary bytes either fail to load as UTF-8 or survive a save/load
//! round trip unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wr::{Editor, EditorConfig, Error};

fuzz_target!(|data: &[u8]| {
    let editor = match Editor::load(data, EditorConfig::default()) {
        Ok(editor) => editor,
        Err(Error::InvalidUtf8) => {
            assert!(std::str::from_utf8(data).is_err());
            return;
        }
        Err(err) => panic!("unexpected load error: {err}"),
    };

    let mut saved = Vec::new();
    editor.write_to(&mut saved).unwrap();
    let reloaded = Editor::load(saved.as_slice(), EditorConfig::default()).unwrap();
    assert_eq!(reloaded.lines(), editor.lines());
});
