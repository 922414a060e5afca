//! Error types for clip I/O.

use std::path::PathBuf;

use motion_types::MotionError;
use thiserror::Error;

/// Result type for clip I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading or writing clips.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Unknown file format (unrecognized extension).
    #[error("unknown clip format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },

    /// A value in a text clip could not be parsed.
    #[error("line {line}, column {column}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// 1-based column (field) number.
        column: usize,
        /// What was wrong.
        message: String,
    },

    /// A JSON source dump is missing data or has the wrong shape.
    #[error("invalid source clip: {message}")]
    InvalidSource {
        /// Description of what was invalid.
        message: String,
    },

    /// The clip content violates a frame or clip invariant.
    #[error(transparent)]
    Motion(#[from] MotionError),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IoError {
    /// Create a `Parse` error at a 1-based line and column.
    #[must_use]
    pub fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create an `InvalidSource` error with the given message.
    #[must_use]
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
        }
    }

    /// Wrap an error from opening `path`, mapping `NotFound` to
    /// [`IoError::FileNotFound`].
    pub(crate) fn open(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
