//! `wr` - Multi-cursor editing engine for terminal text editors
//!
//! Text lives in a line-oriented [`Buffer`] whose default implementation is a
//! persistent balanced tree, so undo snapshots cost O(1) to take. An
//! [`Editor`] drives the buffer through invertible [`Edit`]s applied at every
//! cursor, with vim-style [`Movement`]s, per-cursor registers and a linear
//! undo [`History`](history::History).

// Crate-level lint configuration
#![warn(unsafe_code)] // No unsafe code is expected anywhere
#![allow(clippy::cast_possible_truncation)] // Intentional row and column casts
#![allow(clippy::cast_sign_loss)] // Columns are checked non-negative before casting
#![allow(clippy::cast_possible_wrap)] // Intentional row and column conversions
#![allow(clippy::module_name_repetitions)] // Allow buffer::BufferObserver etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::format_push_string)] // format! with push_str is fine
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::branches_sharing_code)] // Code clarity over DRY in branching
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod buffer;
pub mod config;
pub mod cursor;
pub mod edit;
pub mod editor;
pub mod error;
pub mod event;
pub mod history;
pub mod movement;
pub mod reader;
pub mod unicode;

// Re-export core types at crate root
pub use buffer::{Buffer, Line, PersistentBuffer, Version};
pub use config::EditorConfig;
pub use error::{Error, Result};
pub use event::{LogLevel, emit_event, emit_log, set_event_callback, set_log_callback};

// Re-export editing types
pub use cursor::{Cursor, Location, Range, Register, Registers};
pub use edit::{AppliedEdit, CursorEdit, Edit, Step};
pub use editor::{Editor, read_lines};
pub use movement::{Movement, SearchPattern};
pub use reader::Reader;

// Re-export width helpers
pub use unicode::{WidthMethod, char_width, column_span};
