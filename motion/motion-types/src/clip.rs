//! Ordered sequences of motion frames.

use serde::Serialize;

use crate::error::{MotionError, Result};
use crate::frame::MotionFrame;
use crate::layout::JointLayout;

/// Sample rate used by every clip in the motion library.
pub const DEFAULT_FPS: f64 = 30.0;

/// A motion clip sampled at a fixed rate.
///
/// All frames share one width. Frame order is playback order.
///
/// # Example
///
/// ```
/// use motion_types::{MotionClip, MotionFrame};
///
/// let frames = vec![MotionFrame::neutral(2); 60];
/// let clip = MotionClip::new(frames, 30.0).unwrap();
/// assert_eq!(clip.len(), 60);
/// assert!((clip.duration_secs() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionClip {
    frames: Vec<MotionFrame>,
    fps: f64,
}

impl MotionClip {
    /// Creates a clip from frames.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::InvalidParameter`] for a non-positive rate and
    /// [`MotionError::MalformedFrame`] (with the frame index) if a frame's
    /// width differs from the first frame.
    pub fn new(frames: Vec<MotionFrame>, fps: f64) -> Result<Self> {
        check_fps(fps)?;
        if let Some(first) = frames.first() {
            let expected = first.width();
            if let Some((index, frame)) = frames
                .iter()
                .enumerate()
                .find(|(_, frame)| frame.width() != expected)
            {
                return Err(MotionError::malformed(expected, frame.width()).at_frame(index));
            }
        }
        Ok(Self { frames, fps })
    }

    /// Creates a clip whose frames must all match `layout`.
    ///
    /// # Errors
    ///
    /// Same as [`MotionClip::new`], with widths checked against the layout.
    pub fn with_layout(frames: Vec<MotionFrame>, fps: f64, layout: &JointLayout) -> Result<Self> {
        let clip = Self::new(frames, fps)?;
        clip.check_layout(layout)?;
        Ok(clip)
    }

    /// Creates a clip from flat rows.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::MalformedFrame`] with the row index of the
    /// first row that is too short or differs in width.
    pub fn from_rows(rows: Vec<Vec<f64>>, fps: f64) -> Result<Self> {
        let frames = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| MotionFrame::from_values(row).map_err(|e| e.at_frame(index)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(frames, fps)
    }

    /// Sample rate in frames per second.
    #[must_use]
    pub const fn fps(&self) -> f64 {
        self.fps
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the clip has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Playback duration in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        self.frames.len() as f64 / self.fps
    }

    /// Field count shared by all frames, or `None` for an empty clip.
    #[must_use]
    pub fn width(&self) -> Option<usize> {
        self.frames.first().map(MotionFrame::width)
    }

    /// Frames in playback order.
    #[must_use]
    pub fn frames(&self) -> &[MotionFrame] {
        &self.frames
    }

    /// Frame at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&MotionFrame> {
        self.frames.get(index)
    }

    /// First frame.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::EmptyClip`] if the clip has no frames.
    pub fn first(&self) -> Result<&MotionFrame> {
        self.frames.first().ok_or(MotionError::EmptyClip)
    }

    /// Last frame.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::EmptyClip`] if the clip has no frames.
    pub fn last(&self) -> Result<&MotionFrame> {
        self.frames.last().ok_or(MotionError::EmptyClip)
    }

    /// Iterates over frames in playback order.
    pub fn iter(&self) -> std::slice::Iter<'_, MotionFrame> {
        self.frames.iter()
    }

    /// Consumes the clip and returns its frames.
    #[must_use]
    pub fn into_frames(self) -> Vec<MotionFrame> {
        self.frames
    }

    /// Checks every frame against `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::MalformedFrame`] with the first bad frame index.
    pub fn check_layout(&self, layout: &JointLayout) -> Result<()> {
        for (index, frame) in self.frames.iter().enumerate() {
            layout
                .check_width(frame.width())
                .map_err(|e| e.at_frame(index))?;
        }
        Ok(())
    }

    /// Checks that no frame holds `NaN` or an infinity.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::NonFiniteValue`] with frame and field index.
    pub fn check_finite(&self) -> Result<()> {
        for (index, frame) in self.frames.iter().enumerate() {
            frame.check_finite().map_err(|e| e.at_frame(index))?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a MotionClip {
    type Item = &'a MotionFrame;
    type IntoIter = std::slice::Iter<'a, MotionFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Converts a duration into a whole number of frames at `fps`.
///
/// # Errors
///
/// Returns [`MotionError::InvalidParameter`] for a negative or non-finite
/// duration, a non-positive rate, or a frame count that overflows `usize`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn frames_for_duration(seconds: f64, fps: f64) -> Result<usize> {
    check_fps(fps)?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(MotionError::invalid_parameter(format!(
            "duration must be a non-negative number of seconds, got {seconds}"
        )));
    }
    let frames = (seconds * fps).round();
    let limit = usize::MAX as f64;
    if frames >= limit {
        return Err(MotionError::invalid_parameter(format!(
            "{seconds} s at {fps} fps is more frames than a clip can hold"
        )));
    }
    Ok(frames as usize)
}

fn check_fps(fps: f64) -> Result<()> {
    if fps.is_finite() && fps > 0.0 {
        Ok(())
    } else {
        Err(MotionError::invalid_parameter(format!(
            "frame rate must be positive and finite, got {fps}"
        )))
    }
}
