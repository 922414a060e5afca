//! Clip statistics and column diagnostics.

use motion_types::{JointLayout, MotionClip, Result, JOINT_OFFSET};
use serde::Serialize;
use tracing::{debug, warn};

/// Joint columns whose values all stay within this of zero count as empty.
pub const ZERO_COLUMN_TOLERANCE: f64 = 1e-9;

/// Closed range of observed values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

/// A joint column that is zero in every frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZeroColumn {
    /// Joint index.
    pub joint: usize,
    /// Field index within the frame.
    pub field: usize,
    /// Joint name, when a layout was given.
    pub name: Option<String>,
}

/// Location of the first non-finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldLocation {
    /// Frame index.
    pub frame: usize,
    /// Field index within the frame.
    pub field: usize,
}

/// Summary statistics of a clip.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipSummary {
    /// Number of frames.
    pub frame_count: usize,
    /// Sample rate.
    pub fps: f64,
    /// Playback duration in seconds.
    pub duration_secs: f64,
    /// Fields per frame, if the clip has frames.
    pub width: Option<usize>,
    /// Joint count, if the clip has frames.
    pub dof: Option<usize>,
    /// Root height over the clip.
    pub root_height: Option<ValueRange>,
    /// Largest `|norm(q) - 1|` over all frames.
    pub max_quaternion_norm_error: f64,
    /// Root heading of the first frame, in radians.
    pub start_yaw: Option<f64>,
    /// Root heading of the last frame, in radians.
    pub end_yaw: Option<f64>,
    /// Joint columns that are zero in every frame.
    pub zero_joints: Vec<ZeroColumn>,
    /// First NaN or infinite value, if any.
    pub first_non_finite: Option<FieldLocation>,
}

impl std::fmt::Display for ClipSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "frames:       {} ({:.2} s at {} fps)",
            self.frame_count, self.duration_secs, self.fps
        )?;
        if let (Some(width), Some(dof)) = (self.width, self.dof) {
            writeln!(f, "fields:       {width} ({dof} joints)")?;
        }
        if let Some(range) = self.root_height {
            writeln!(f, "root height:  {:.3} .. {:.3}", range.min, range.max)?;
        }
        if let (Some(start), Some(end)) = (self.start_yaw, self.end_yaw) {
            writeln!(
                f,
                "yaw:          {:.1} deg -> {:.1} deg",
                start.to_degrees(),
                end.to_degrees()
            )?;
        }
        writeln!(
            f,
            "quat norm:    max |1 - norm| = {:.2e}",
            self.max_quaternion_norm_error
        )?;
        if self.zero_joints.is_empty() {
            writeln!(f, "zero joints:  none")?;
        } else {
            let names: Vec<String> = self
                .zero_joints
                .iter()
                .map(|c| match &c.name {
                    Some(name) => format!("{name} ({})", c.field),
                    None => format!("field {}", c.field),
                })
                .collect();
            writeln!(f, "zero joints:  {}", names.join(", "))?;
        }
        if let Some(location) = self.first_non_finite {
            writeln!(
                f,
                "non-finite:   frame {} field {}",
                location.frame, location.field
            )?;
        }
        Ok(())
    }
}

/// Computes a [`ClipSummary`].
///
/// With a `layout`, zero columns are reported by joint name.
///
/// # Errors
///
/// Returns [`MotionError::MalformedFrame`](motion_types::MotionError::MalformedFrame)
/// if `layout` is given and the clip's frames do not match it.
pub fn summarize(clip: &MotionClip, layout: Option<&JointLayout>) -> Result<ClipSummary> {
    if let Some(layout) = layout {
        clip.check_layout(layout)?;
    }

    let mut root_height: Option<ValueRange> = None;
    let mut max_quaternion_norm_error = 0.0f64;
    let mut first_non_finite = None;
    let dof = clip.width().map_or(0, |width| width - JOINT_OFFSET);
    let mut nonzero = vec![false; dof];

    for (index, frame) in clip.iter().enumerate() {
        let height = frame.root_height();
        root_height = Some(match root_height {
            Some(range) => ValueRange {
                min: range.min.min(height),
                max: range.max.max(height),
            },
            None => ValueRange {
                min: height,
                max: height,
            },
        });

        max_quaternion_norm_error =
            max_quaternion_norm_error.max((frame.quaternion_norm() - 1.0).abs());

        for (seen, value) in nonzero.iter_mut().zip(frame.joints()) {
            *seen |= value.is_nan() || value.abs() > ZERO_COLUMN_TOLERANCE;
        }

        if first_non_finite.is_none() {
            if let Some(field) = frame.values().iter().position(|v| !v.is_finite()) {
                first_non_finite = Some(FieldLocation {
                    frame: index,
                    field,
                });
            }
        }
    }

    let zero_joints: Vec<ZeroColumn> = if clip.is_empty() {
        Vec::new()
    } else {
        nonzero
            .iter()
            .enumerate()
            .filter(|(_, seen)| !**seen)
            .map(|(joint, _)| ZeroColumn {
                joint,
                field: JOINT_OFFSET + joint,
                name: layout.and_then(|l| l.joint_names().get(joint).cloned()),
            })
            .collect()
    };

    if !zero_joints.is_empty() {
        let columns: Vec<String> = zero_joints
            .iter()
            .map(|c| c.name.clone().unwrap_or_else(|| format!("joint {}", c.joint)))
            .collect();
        debug!(count = zero_joints.len(), ?columns, "All-zero joint columns");
    }
    if let Some(location) = first_non_finite {
        warn!(
            frame = location.frame,
            field = location.field,
            "Clip contains non-finite values"
        );
    }

    let summary = ClipSummary {
        frame_count: clip.len(),
        fps: clip.fps(),
        duration_secs: clip.duration_secs(),
        width: clip.width(),
        dof: clip.width().map(|width| width - JOINT_OFFSET),
        root_height,
        max_quaternion_norm_error,
        start_yaw: clip.frames().first().and_then(|f| f.yaw()),
        end_yaw: clip.frames().last().and_then(|f| f.yaw()),
        zero_joints,
        first_non_finite,
    };
    debug!(frames = summary.frame_count, "Summarized clip");
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use motion_types::{MotionError, MotionFrame};

    const YAW_45: [f64; 4] = [0.0, 0.0, 0.382_683_432_365_089_8, 0.923_879_532_511_286_7];

    fn clip() -> MotionClip {
        MotionClip::new(
            vec![
                MotionFrame::from_parts([0.0, 0.0, 0.8], [0.0, 0.0, 0.0, 1.0], &[0.0, 0.3, 0.0]),
                MotionFrame::from_parts([0.0, 0.0, 0.6], YAW_45, &[0.0, -0.1, 0.0]),
                MotionFrame::from_parts([0.0, 0.0, 0.7], [0.0, 0.0, 0.0, 1.01], &[0.0, 0.0, 0.2]),
            ],
            30.0,
        )
        .unwrap()
    }

    #[test]
    fn test_basic_stats() {
        let summary = summarize(&clip(), None).unwrap();
        assert_eq!(summary.frame_count, 3);
        assert_eq!(summary.width, Some(10));
        assert_eq!(summary.dof, Some(3));
        assert_relative_eq!(summary.duration_secs, 0.1, epsilon = 1e-12);

        let range = summary.root_height.unwrap();
        assert_eq!(range.min, 0.6);
        assert_eq!(range.max, 0.8);
        assert_relative_eq!(summary.max_quaternion_norm_error, 0.01, epsilon = 1e-9);
    }

    #[test]
    fn test_yaw() {
        let summary = summarize(&clip(), None).unwrap();
        assert_relative_eq!(summary.start_yaw.unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(summary.end_yaw.unwrap(), 0.0, epsilon = 1e-12);

        let turned = MotionClip::new(
            vec![MotionFrame::from_parts([0.0; 3], YAW_45, &[])],
            30.0,
        )
        .unwrap();
        let summary = summarize(&turned, None).unwrap();
        assert_relative_eq!(
            summary.start_yaw.unwrap(),
            std::f64::consts::FRAC_PI_4,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_columns_by_name() {
        let layout = JointLayout::new(["hip", "knee", "ankle"]).unwrap();
        let summary = summarize(&clip(), Some(&layout)).unwrap();
        assert_eq!(
            summary.zero_joints,
            vec![ZeroColumn {
                joint: 0,
                field: 7,
                name: Some("hip".to_string()),
            }]
        );
    }

    #[test]
    fn test_layout_mismatch() {
        let layout = JointLayout::new(["hip"]).unwrap();
        let err = summarize(&clip(), Some(&layout)).unwrap_err();
        assert!(matches!(err, MotionError::MalformedFrame { .. }));
    }

    #[test]
    fn test_non_finite_location() {
        let mut frames = clip().into_frames();
        frames[1].values_mut()[8] = f64::NAN;
        let clip = MotionClip::new(frames, 30.0).unwrap();
        let summary = summarize(&clip, None).unwrap();
        assert_eq!(summary.first_non_finite, Some(FieldLocation { frame: 1, field: 8 }));
    }

    #[test]
    fn test_empty_clip() {
        let empty = MotionClip::new(Vec::new(), 30.0).unwrap();
        let summary = summarize(&empty, None).unwrap();
        assert_eq!(summary.frame_count, 0);
        assert!(summary.root_height.is_none());
        assert!(summary.zero_joints.is_empty());
        assert!(summary.start_yaw.is_none());
    }

    #[test]
    fn test_serializes_to_json() {
        let summary = summarize(&clip(), None).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["frame_count"], 3);
        assert_eq!(json["zero_joints"][0]["field"], 7);
    }

    #[test]
    fn test_display() {
        let layout = JointLayout::new(["hip", "knee", "ankle"]).unwrap();
        let text = summarize(&clip(), Some(&layout)).unwrap().to_string();
        assert!(text.contains("frames:       3 (0.10 s at 30 fps)"));
        assert!(text.contains("fields:       10 (3 joints)"));
        assert!(text.contains("root height:  0.600 .. 0.800"));
        assert!(text.contains("zero joints:  hip (7)"));
        assert!(!text.contains("non-finite"));

        let empty = MotionClip::new(Vec::new(), 30.0).unwrap();
        let text = summarize(&empty, None).unwrap().to_string();
        assert!(text.contains("zero joints:  none"));
        assert!(!text.contains("fields:"));
    }
}
