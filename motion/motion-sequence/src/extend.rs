//! Holding the final pose past the end of a clip.

use motion_types::{frames_for_duration, MotionClip, MotionError, Result};
use tracing::info;

/// Appends `frame_count` copies of the clip's last frame.
///
/// The existing frames are kept unchanged and the rate is preserved.
///
/// # Errors
///
/// - [`MotionError::EmptyClip`] if the clip has no frames to repeat
/// - [`MotionError::InvalidParameter`] if the extended length does not fit
///   in a `usize`
///
/// # Example
///
/// ```
/// use motion_types::{MotionClip, MotionFrame};
/// use motion_sequence::extend_with_last_pose;
///
/// let clip = MotionClip::new(vec![MotionFrame::neutral(2); 10], 30.0).unwrap();
/// let extended = extend_with_last_pose(&clip, 5).unwrap();
/// assert_eq!(extended.len(), 15);
/// ```
pub fn extend_with_last_pose(clip: &MotionClip, frame_count: usize) -> Result<MotionClip> {
    let last = clip.last()?.clone();
    let too_long = || {
        MotionError::invalid_parameter(format!(
            "cannot append {frame_count} frames to a clip of {}",
            clip.len()
        ))
    };
    let total = clip.len().checked_add(frame_count).ok_or_else(too_long)?;

    let mut frames = Vec::new();
    frames.try_reserve_exact(total).map_err(|_| too_long())?;
    frames.extend(clip.iter().cloned());
    frames.resize(total, last);

    let extended = MotionClip::new(frames, clip.fps())?;
    info!(
        added = frame_count,
        total = extended.len(),
        "Extended clip with last pose"
    );
    Ok(extended)
}

/// Holds the last pose for `seconds` at the clip's own rate.
///
/// # Errors
///
/// Returns [`MotionError::InvalidParameter`] for a negative duration or one
/// whose frame count overflows, otherwise the same as [`extend_with_last_pose`].
pub fn extend_by_duration(clip: &MotionClip, seconds: f64) -> Result<MotionClip> {
    let frame_count = frames_for_duration(seconds, clip.fps())?;
    extend_with_last_pose(clip, frame_count)
}
