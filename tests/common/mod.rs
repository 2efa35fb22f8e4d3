#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)] // Not every test binary uses every helper

use std::sync::Once;

use wr::{Cursor, Editor, EditorConfig, LogLevel, Range, set_log_callback};

/// Route editor log messages into `tracing` once per test binary.
pub fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
        set_log_callback(|level, message| match level {
            LogLevel::Debug => tracing::debug!(target: "wr", "{message}"),
            LogLevel::Info => tracing::info!(target: "wr", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "wr", "{message}"),
            LogLevel::Error => tracing::error!(target: "wr", "{message}"),
        });
    });
}

/// Editor over `lines` with one cursor per range, pushed in order.
pub fn editor_with(lines: &[&str], ranges: &[Range]) -> Editor {
    setup_test_logging();
    let mut editor = Editor::from_lines(lines, EditorConfig::default());
    for &range in ranges {
        editor.push_cursor(range);
    }
    editor
}

pub fn ranges(cursors: &[Cursor]) -> Vec<Range> {
    cursors.iter().map(|cursor| cursor.range).collect()
}

/// `(r0, c0, r1, c1)` shorthand.
pub fn r(sr: isize, sc: isize, er: isize, ec: isize) -> Range {
    Range::from_coords(sr, sc, er, ec)
}
