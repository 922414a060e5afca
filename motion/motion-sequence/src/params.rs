//! Parameters for stabilization prefixes.

use motion_types::{frames_for_duration, Result};
use serde::{Deserialize, Serialize};

/// Parameters for [`prepend_stabilization`](crate::prepend_stabilization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionParams {
    /// Frames holding the stabilization pose unchanged. Default: 30
    pub hold_frames: usize,

    /// Frames easing from the stabilization pose into the clip. Default: 30
    pub transition_frames: usize,

    /// Move the stabilization pose's root x/y onto the clip's first frame,
    /// so the transition does not slide the robot across the floor.
    /// Default: true
    pub align_horizontal: bool,

    /// Root height of the stabilization pose. If None, the robot's default
    /// pose height is kept.
    pub root_height: Option<f64>,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            hold_frames: 30,
            transition_frames: 30,
            align_horizontal: true,
            root_height: None,
        }
    }
}

impl TransitionParams {
    /// Create params from segment lengths in frames.
    #[must_use]
    pub fn new(hold_frames: usize, transition_frames: usize) -> Self {
        Self {
            hold_frames,
            transition_frames,
            ..Default::default()
        }
    }

    /// Create params from segment durations in seconds at `fps`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidParameter`](motion_types::MotionError::InvalidParameter)
    /// for a negative duration or a non-positive rate.
    pub fn from_seconds(hold_secs: f64, transition_secs: f64, fps: f64) -> Result<Self> {
        Ok(Self::new(
            frames_for_duration(hold_secs, fps)?,
            frames_for_duration(transition_secs, fps)?,
        ))
    }

    /// Set horizontal alignment.
    #[must_use]
    pub const fn with_align_horizontal(mut self, align: bool) -> Self {
        self.align_horizontal = align;
        self
    }

    /// Override the stabilization root height.
    #[must_use]
    pub const fn with_root_height(mut self, height: f64) -> Self {
        self.root_height = Some(height);
        self
    }

    /// Frames added in front of the clip.
    #[must_use]
    pub const fn total_frames(&self) -> usize {
        self.hold_frames.saturating_add(self.transition_frames)
    }
}
