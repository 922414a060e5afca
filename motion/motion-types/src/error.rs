//! Error types for motion data.

use std::fmt;

use thiserror::Error;

/// Position of the frame that triggered an error, when known.
///
/// Frame-level operations do not know where their input sits in a clip;
/// clip-level operations attach the index with [`MotionError::at_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameIndex(pub Option<usize>);

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(index) => write!(f, " at frame {index}"),
            None => Ok(()),
        }
    }
}

/// Errors that can occur when building or transforming motion data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotionError {
    /// A row does not have the field count its layout requires.
    #[error("malformed frame{frame}: expected {expected} fields, got {actual}")]
    MalformedFrame {
        /// Frame that triggered the error.
        frame: FrameIndex,
        /// Field count required by the layout.
        expected: usize,
        /// Field count actually present.
        actual: usize,
    },

    /// Quaternion normalization would divide by a zero or near-zero norm.
    #[error("degenerate rotation{frame}: blended quaternion norm {norm:e} cannot be normalized")]
    DegenerateRotation {
        /// Frame that triggered the error.
        frame: FrameIndex,
        /// Norm of the blended quaternion.
        norm: f64,
    },

    /// No robot model with this identifier is registered.
    #[error("unsupported robot model: {name}")]
    UnsupportedRobotModel {
        /// Requested robot identifier.
        name: String,
    },

    /// The robot model has no remap table for the requested source layout.
    #[error("robot '{robot}' has no remap table for source layout '{source_layout}'")]
    UnsupportedSource {
        /// Robot identifier.
        robot: String,
        /// Requested source layout.
        source_layout: String,
    },

    /// A field holds `NaN` or an infinity.
    #[error("non-finite value{frame} in field {field}: {value}")]
    NonFiniteValue {
        /// Frame that triggered the error.
        frame: FrameIndex,
        /// Field index within the frame.
        field: usize,
        /// Offending value.
        value: f64,
    },

    /// Remap table references joints that do not exist or collide.
    #[error("invalid remap table: {0}")]
    InvalidRemapTable(String),

    /// A numeric parameter is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The operation needs at least one frame.
    #[error("clip is empty")]
    EmptyClip,

    /// The robot registry configuration could not be read.
    #[error("invalid robot configuration: {0}")]
    Config(String),
}

impl MotionError {
    /// Creates a malformed frame error without a frame index.
    #[must_use]
    pub const fn malformed(expected: usize, actual: usize) -> Self {
        Self::MalformedFrame {
            frame: FrameIndex(None),
            expected,
            actual,
        }
    }

    /// Creates a degenerate rotation error without a frame index.
    #[must_use]
    pub const fn degenerate_rotation(norm: f64) -> Self {
        Self::DegenerateRotation {
            frame: FrameIndex(None),
            norm,
        }
    }

    /// Creates a non-finite value error without a frame index.
    #[must_use]
    pub const fn non_finite(field: usize, value: f64) -> Self {
        Self::NonFiniteValue {
            frame: FrameIndex(None),
            field,
            value,
        }
    }

    /// Creates an unsupported robot model error.
    #[must_use]
    pub fn unsupported_robot(name: impl Into<String>) -> Self {
        Self::UnsupportedRobotModel { name: name.into() }
    }

    /// Creates an unsupported source layout error.
    #[must_use]
    pub fn unsupported_source(robot: impl Into<String>, source_layout: impl Into<String>) -> Self {
        Self::UnsupportedSource {
            robot: robot.into(),
            source_layout: source_layout.into(),
        }
    }

    /// Creates an invalid remap table error.
    #[must_use]
    pub fn invalid_remap(reason: impl Into<String>) -> Self {
        Self::InvalidRemapTable(reason.into())
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter(reason.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    /// Attaches a frame index to frame-level errors.
    ///
    /// An index that is already set is kept, so the innermost caller wins.
    #[must_use]
    pub fn at_frame(self, index: usize) -> Self {
        match self {
            Self::MalformedFrame {
                frame: FrameIndex(None),
                expected,
                actual,
            } => Self::MalformedFrame {
                frame: FrameIndex(Some(index)),
                expected,
                actual,
            },
            Self::DegenerateRotation {
                frame: FrameIndex(None),
                norm,
            } => Self::DegenerateRotation {
                frame: FrameIndex(Some(index)),
                norm,
            },
            Self::NonFiniteValue {
                frame: FrameIndex(None),
                field,
                value,
            } => Self::NonFiniteValue {
                frame: FrameIndex(Some(index)),
                field,
                value,
            },
            other => other,
        }
    }

    /// Returns the frame index attached to this error, if any.
    #[must_use]
    pub const fn frame_index(&self) -> Option<usize> {
        match self {
            Self::MalformedFrame { frame, .. }
            | Self::DegenerateRotation { frame, .. }
            | Self::NonFiniteValue { frame, .. } => frame.0,
            _ => None,
        }
    }

    /// Check if this is a degenerate rotation error.
    #[must_use]
    pub const fn is_degenerate_rotation(&self) -> bool {
        matches!(self, Self::DegenerateRotation { .. })
    }
}

impl From<serde_json::Error> for MotionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for motion operations.
pub type Result<T> = std::result::Result<T, MotionError>;
