//! Motion data types for robot retargeting.
//!
//! This crate provides the data model shared by the motion tooling:
//!
//! - [`MotionFrame`] - Root pose plus joint angles, stored as a flat row
//! - [`MotionClip`] - Frames sampled at a fixed rate
//! - [`JointLayout`] - Named joint order of a robot or source skeleton
//! - [`JointRemapTable`] - Source joint index to target joint index
//! - [`RobotRegistry`] - Robot models (layout, start pose, remap tables)
//!   loaded from a JSON resource
//!
//! # Frame Layout
//!
//! ```text
//! field:  0  1  2  3   4   5   6   7 ..
//!         x  y  z  qx  qy  qz  qw  joints in layout order
//! ```
//!
//! The quaternion is stored scalar-last, matching the clip files consumed
//! by the tracking pipeline. For the G1 (29 DOF) a frame has 36 fields.
//!
//! # Example
//!
//! ```
//! use motion_types::{MotionClip, RobotRegistry, DEFAULT_FPS};
//!
//! let registry = RobotRegistry::builtin().unwrap();
//! let g1 = registry.get("g1").unwrap();
//!
//! let pose = g1.default_pose().clone();
//! let clip = MotionClip::with_layout(vec![pose; 30], DEFAULT_FPS, g1.layout()).unwrap();
//! assert!((clip.duration_secs() - 1.0).abs() < 1e-12);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod clip;
mod error;
mod frame;
pub mod layout;
mod remap;
mod robot;

pub use clip::{frames_for_duration, MotionClip, DEFAULT_FPS};
pub use error::{FrameIndex, MotionError, Result};
pub use frame::{MotionFrame, MIN_QUATERNION_NORM};
pub use layout::{JointLayout, JOINT_OFFSET, ROOT_ORIENTATION, ROOT_POSITION};
pub use remap::JointRemapTable;
pub use robot::{
    PoseConfig, RegistryConfig, RobotConfig, RobotModel, RobotRegistry, SourceConfig,
    SourceLayout,
};
