//! Clip file I/O for the motion tooling.
//!
//! This crate reads and writes motion clips:
//!
//! - **CSV** - Headerless rows with six decimals, the format consumed by
//!   the tracking pipeline (read and write)
//! - **Source JSON** - Retargeting output keyed by motion name, with
//!   `dof`, `root_rot` and `root_trans`/`root_trans_offset` arrays (read)
//!
//! # Example
//!
//! ```no_run
//! use motion_io::{load_clip, save_csv};
//! use motion_types::DEFAULT_FPS;
//!
//! // Format detected from the .json extension
//! let clip = load_clip("walk.json", DEFAULT_FPS).unwrap();
//! save_csv(&clip, "walk.csv").unwrap();
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod csv;
mod error;
mod source;

pub use csv::{load_csv, read_csv, save_csv, write_csv, CSV_PRECISION};
pub use error::{IoError, IoResult};
pub use source::{load_source_json, SourceDump, SourceMotion};

use std::path::Path;

use motion_types::MotionClip;

/// Supported clip file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipFormat {
    /// Headerless CSV, one frame per line.
    Csv,
    /// JSON dump of retargeting output. Read only.
    SourceJson,
}

impl ClipFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::SourceJson),
            _ => None,
        }
    }

    /// Get the canonical file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::SourceJson => "json",
        }
    }
}

fn detect(path: &Path) -> IoResult<ClipFormat> {
    ClipFormat::from_path(path).ok_or_else(|| IoError::UnknownFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string(),
    })
}

/// Load a clip, detecting the format from the extension.
///
/// CSV files carry no rate, so `fps` is used for them. Source dumps use
/// their recorded rate and fall back to `fps`. For a source dump the first
/// motion is loaded.
///
/// # Errors
///
/// Returns [`IoError::UnknownFormat`] for an unrecognized extension, or
/// any error from the format's loader.
pub fn load_clip<P: AsRef<Path>>(path: P, fps: f64) -> IoResult<MotionClip> {
    let path = path.as_ref();
    match detect(path)? {
        ClipFormat::Csv => load_csv(path, fps),
        ClipFormat::SourceJson => load_source_json(path, None, fps),
    }
}

/// Save a clip, detecting the format from the extension.
///
/// # Errors
///
/// Returns [`IoError::UnknownFormat`] unless the extension is `.csv`, or
/// any error from [`save_csv`].
pub fn save_clip<P: AsRef<Path>>(clip: &MotionClip, path: P) -> IoResult<()> {
    let path = path.as_ref();
    match detect(path)? {
        ClipFormat::Csv => save_csv(clip, path),
        ClipFormat::SourceJson => Err(IoError::UnknownFormat {
            extension: ClipFormat::SourceJson.extension().to_string(),
        }),
    }
}
