//! Error types for the editing engine.
//!
//! The core never fails on out-of-bounds coordinates (those produce sentinel
//! cursors instead); errors only come from construction and I/O edges.

use std::fmt;
use std::io;

use crate::buffer::Version;

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for editor operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error while loading or saving a byte stream.
    Io(io::Error),
    /// Loaded bytes were not valid UTF-8.
    InvalidUtf8,
    /// A search pattern failed to compile.
    InvalidPattern {
        pattern: String,
        source: regex_automata::meta::BuildError,
    },
    /// Configuration value rejected by [`EditorConfig::validate`](crate::EditorConfig::validate).
    InvalidConfig(String),
    /// Restore requested for a version that was never backed up (or was discarded).
    UnknownVersion(Version),
    /// Register name outside `a..=z`.
    InvalidRegister(char),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidUtf8 => write!(f, "stream is not valid UTF-8"),
            Self::InvalidPattern { pattern, source } => {
                write!(f, "invalid search pattern {pattern:?}: {source}")
            }
            Self::InvalidConfig(reason) => write!(f, "invalid editor config: {reason}"),
            Self::UnknownVersion(version) => write!(f, "unknown buffer version {version}"),
            Self::InvalidRegister(name) => write!(f, "invalid register {name:?}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::InvalidPattern { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
