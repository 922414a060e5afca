//! Stabilization holds and eased transitions.
//!
//! A tracking policy starts best from a known, statically stable pose. The
//! prefix built here is a hold segment that repeats that pose, followed by
//! a transition that eases into the clip's first frame:
//!
//! ```text
//! | hold (stab x H) | transition (stab -> first, T frames) | clip ... |
//! ```
//!
//! Transition frame `i` blends with `ease(i / T)`, so it starts exactly at
//! the stabilization pose and approaches (but never reaches) the first
//! frame, which follows as the first frame of the clip itself.

use std::ops::Range;

use motion_types::{MotionClip, MotionError, MotionFrame, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::interpolation::{ease, interpolate};
use crate::params::TransitionParams;

/// Builds a hold segment followed by an eased transition.
///
/// Returns `hold_length` copies of `stab`, then `transition_length` frames
/// blending from `stab` toward `first`. The result always has exactly
/// `hold_length + transition_length` frames.
///
/// # Errors
///
/// - [`MotionError::MalformedFrame`] if `stab` and `first` differ in width
/// - [`MotionError::DegenerateRotation`] if a blend hits a zero quaternion,
///   with the index of that frame in the returned sequence
/// - [`MotionError::InvalidParameter`] if the two lengths cannot be
///   allocated together
///
/// # Example
///
/// ```
/// use motion_types::MotionFrame;
/// use motion_sequence::build_transition;
///
/// let stab = MotionFrame::from_parts([0.0, 0.0, 0.8], [0.0, 0.0, 0.0, 1.0], &[0.0]);
/// let first = MotionFrame::from_parts([0.0, 0.0, 0.5], [0.0, 0.0, 0.0, 1.0], &[1.0]);
///
/// let frames = build_transition(&stab, &first, 30, 30).unwrap();
/// assert_eq!(frames.len(), 60);
/// assert_eq!(frames[30], stab);
/// ```
pub fn build_transition(
    stab: &MotionFrame,
    first: &MotionFrame,
    hold_length: usize,
    transition_length: usize,
) -> Result<Vec<MotionFrame>> {
    if stab.width() != first.width() {
        return Err(MotionError::malformed(stab.width(), first.width()));
    }

    let too_long = || {
        MotionError::invalid_parameter(format!(
            "prefix of {hold_length} hold and {transition_length} transition frames is too long"
        ))
    };
    let total = hold_length.checked_add(transition_length).ok_or_else(too_long)?;
    let mut frames = Vec::new();
    frames.try_reserve_exact(total).map_err(|_| too_long())?;
    frames.resize(hold_length, stab.clone());

    #[allow(clippy::cast_precision_loss)]
    let steps = transition_length as f64;
    for i in 0..transition_length {
        #[allow(clippy::cast_precision_loss)]
        let alpha = ease(i as f64 / steps);
        let frame = interpolate(stab, first, alpha).map_err(|err| err.at_frame(hold_length + i))?;
        frames.push(frame);
    }

    debug!(
        hold = hold_length,
        transition = transition_length,
        "Built stabilization prefix"
    );
    Ok(frames)
}

/// Frame ranges of a clip with a stabilization prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StabilizationReport {
    /// Frames repeating the stabilization pose.
    pub hold: Range<usize>,
    /// Frames easing into the motion.
    pub transition: Range<usize>,
    /// The original clip.
    pub motion: Range<usize>,
}

impl StabilizationReport {
    fn new(hold: usize, transition: usize, motion: usize) -> Self {
        let transition_start = hold;
        let motion_start = hold + transition;
        Self {
            hold: 0..transition_start,
            transition: transition_start..motion_start,
            motion: motion_start..motion_start + motion,
        }
    }

    /// Total frame count.
    #[must_use]
    pub const fn total_frames(&self) -> usize {
        self.motion.end
    }
}

/// Prepends a stabilization hold and transition to `clip`.
///
/// The stabilization frame starts as `pose`. Its root height is replaced by
/// `params.root_height` when set, and its root x/y are moved onto the
/// clip's first frame when `params.align_horizontal` is set. The clip's
/// own frames follow unchanged.
///
/// # Errors
///
/// - [`MotionError::EmptyClip`] if `clip` has no frames
/// - [`MotionError::InvalidParameter`] for a non-finite height override
/// - any error from [`build_transition`]
pub fn prepend_stabilization(
    clip: &MotionClip,
    pose: &MotionFrame,
    params: &TransitionParams,
) -> Result<(MotionClip, StabilizationReport)> {
    let first = clip.first()?;

    let mut stab = pose.clone();
    if let Some(height) = params.root_height {
        if !height.is_finite() {
            return Err(MotionError::invalid_parameter(format!(
                "stabilization height must be finite, got {height}"
            )));
        }
        stab.set_root_height(height);
    }
    if params.align_horizontal {
        let [x, y, _] = first.root_position();
        stab.set_root_horizontal(x, y);
    }

    let mut frames = build_transition(&stab, first, params.hold_frames, params.transition_frames)?;
    frames.extend(clip.iter().cloned());

    let report =
        StabilizationReport::new(params.hold_frames, params.transition_frames, clip.len());
    let prefixed = MotionClip::new(frames, clip.fps())?;

    info!(
        hold = params.hold_frames,
        transition = params.transition_frames,
        motion = clip.len(),
        total = prefixed.len(),
        "Prepended stabilization pose"
    );
    Ok((prefixed, report))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const IDENTITY: [f64; 4] = [0.0, 0.0, 0.0, 1.0];
    const YAW_45: [f64; 4] = [0.0, 0.0, 0.382_683_432_365_089_8, 0.923_879_532_511_286_7];

    fn stab() -> MotionFrame {
        MotionFrame::from_parts([0.0, 0.0, 0.8], IDENTITY, &[0.0, 1.47, -1.47])
    }

    fn first() -> MotionFrame {
        MotionFrame::from_parts([1.5, -2.0, 0.5], YAW_45, &[0.2, 0.1, -0.3])
    }

    #[test]
    fn test_lengths() {
        for (hold, transition) in [(0, 0), (0, 5), (5, 0), (30, 30), (1, 1)] {
            let frames = build_transition(&stab(), &first(), hold, transition).unwrap();
            assert_eq!(frames.len(), hold + transition);
        }
    }

    #[test]
    fn test_hold_copies_stab() {
        let frames = build_transition(&stab(), &first(), 10, 10).unwrap();
        assert!(frames[..10].iter().all(|f| *f == stab()));
    }

    #[test]
    fn test_transition_starts_at_stab() {
        let frames = build_transition(&stab(), &first(), 3, 10).unwrap();
        assert_eq!(frames[3], stab());
    }

    #[test]
    fn test_transition_is_monotonic_in_height() {
        let frames = build_transition(&stab(), &first(), 0, 30).unwrap();
        let heights: Vec<f64> = frames.iter().map(MotionFrame::root_height).collect();
        assert!(heights.windows(2).all(|w| w[1] <= w[0]));
        assert!(heights[29] > 0.5);
    }

    #[test]
    fn test_transition_orientations_are_unit() {
        let frames = build_transition(&stab(), &first(), 0, 30).unwrap();
        for frame in &frames {
            assert_relative_eq!(frame.quaternion_norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_width_mismatch() {
        let narrow = MotionFrame::from_parts([0.0; 3], IDENTITY, &[0.0]);
        let err = build_transition(&stab(), &narrow, 1, 1).unwrap_err();
        assert_eq!(err, MotionError::malformed(10, 8));
    }

    #[test]
    fn test_oversized_prefix() {
        let err = build_transition(&stab(), &first(), usize::MAX, 1).unwrap_err();
        assert!(matches!(err, MotionError::InvalidParameter(_)));

        let err = build_transition(&stab(), &first(), usize::MAX / 2, 0).unwrap_err();
        assert!(matches!(err, MotionError::InvalidParameter(_)));
    }

    #[test]
    fn test_degenerate_reports_frame() {
        let a = MotionFrame::from_parts([0.0; 3], IDENTITY, &[]);
        let b = MotionFrame::from_parts([0.0; 3], [0.0, 0.0, 0.0, -1.0], &[]);
        // ease(1/2) = 0.5 hits the antipodal midpoint at transition step 1.
        let err = build_transition(&a, &b, 4, 2).unwrap_err();
        assert!(err.is_degenerate_rotation());
        assert_eq!(err.frame_index(), Some(5));
    }

    #[test]
    fn test_prepend_aligns_and_reports() {
        let clip = MotionClip::new(vec![first(); 5], 30.0).unwrap();
        let params = TransitionParams::new(4, 6);
        let (prefixed, report) = prepend_stabilization(&clip, &stab(), &params).unwrap();

        assert_eq!(prefixed.len(), 15);
        assert_eq!(report.hold, 0..4);
        assert_eq!(report.transition, 4..10);
        assert_eq!(report.motion, 10..15);
        assert_eq!(report.total_frames(), 15);

        let held = prefixed.first().unwrap();
        assert_eq!(held.root_position(), [1.5, -2.0, 0.8]);
        assert_eq!(held.joints(), stab().joints());
        assert_eq!(&prefixed.frames()[10..], clip.frames());
    }

    #[test]
    fn test_prepend_height_override_without_alignment() {
        let clip = MotionClip::new(vec![first()], 30.0).unwrap();
        let params = TransitionParams::new(2, 2)
            .with_align_horizontal(false)
            .with_root_height(0.75);
        let (prefixed, _) = prepend_stabilization(&clip, &stab(), &params).unwrap();
        assert_eq!(prefixed.frames()[0].root_position(), [0.0, 0.0, 0.75]);
    }

    #[test]
    fn test_prepend_empty_clip() {
        let clip = MotionClip::new(Vec::new(), 30.0).unwrap();
        let err = prepend_stabilization(&clip, &stab(), &TransitionParams::default()).unwrap_err();
        assert_eq!(err, MotionError::EmptyClip);
    }
}
