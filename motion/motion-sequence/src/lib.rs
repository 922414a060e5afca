//! Motion frame sequencing for robot retargeting.
//!
//! This crate turns retargeted source clips into clips a tracking policy
//! can start from cleanly:
//!
//! - [`remap_frame`] / [`remap_clip`] - Source joint layout to robot layout
//! - [`interpolate`] / [`ease`] - Frame blending with unit-norm orientation
//! - [`build_transition`] - Hold a stabilization pose, then ease into a clip
//! - [`prepend_stabilization`] - The full prefix pipeline on a clip
//! - [`extend_with_last_pose`] - Hold the final pose after the clip ends
//! - [`summarize`] - Frame counts, zero columns, quaternion norm checks
//!
//! Every operation is a pure function over [`MotionFrame`] and
//! [`MotionClip`]; nothing here performs I/O.
//!
//! # Example
//!
//! ```
//! use motion_types::{MotionClip, MotionFrame, RobotRegistry};
//! use motion_sequence::{prepend_stabilization, extend_with_last_pose, TransitionParams};
//!
//! let registry = RobotRegistry::builtin().unwrap();
//! let g1 = registry.get("g1").unwrap();
//!
//! let crouch = MotionFrame::from_parts([0.2, 0.1, 0.6], [0.0, 0.0, 0.0, 1.0], &[0.0; 29]);
//! let clip = MotionClip::new(vec![crouch; 90], 30.0).unwrap();
//!
//! let (prefixed, report) =
//!     prepend_stabilization(&clip, g1.default_pose(), &TransitionParams::default()).unwrap();
//! assert_eq!(prefixed.len(), 150);
//! assert_eq!(report.motion, 60..150);
//!
//! let held = extend_with_last_pose(&prefixed, 30).unwrap();
//! assert_eq!(held.len(), 180);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod analysis;
mod extend;
mod interpolation;
mod params;
mod remap;
mod transition;

pub use analysis::{summarize, ClipSummary, FieldLocation, ValueRange, ZeroColumn, ZERO_COLUMN_TOLERANCE};
pub use extend::{extend_by_duration, extend_with_last_pose};
pub use interpolation::{ease, interpolate, lerp, DEGENERATE_NORM_EPSILON};
pub use params::TransitionParams;
pub use remap::{remap_clip, remap_frame, SOURCE_NORM_TOLERANCE};
pub use transition::{build_transition, prepend_stabilization, StabilizationReport};

// Re-export the data model for convenience.
pub use motion_types::{MotionClip, MotionError, MotionFrame, Result};
