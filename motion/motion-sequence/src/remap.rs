//! Source-to-target frame remapping.

use motion_types::{
    JointRemapTable, MotionClip, MotionError, MotionFrame, Result, JOINT_OFFSET,
};
use tracing::{debug, info, warn};

/// Source orientations further than this from unit norm are reported.
pub const SOURCE_NORM_TOLERANCE: f64 = 1e-3;

/// Maps one source frame into the target layout.
///
/// The root translation and rotation are copied unchanged. Joint angles are
/// placed per `table`; target joints without a source are exactly `0.0`.
///
/// # Errors
///
/// Returns [`MotionError::MalformedFrame`] if `source` does not carry
/// exactly `7 + table.source_dof()` fields.
///
/// # Example
///
/// ```
/// use motion_types::{JointRemapTable, MotionFrame};
/// use motion_sequence::remap_frame;
///
/// let table = JointRemapTable::new(3, vec![Some(2), Some(0)]).unwrap();
/// let source = MotionFrame::from_parts([1.0, 2.0, 0.7], [0.0, 0.0, 0.0, 1.0], &[0.4, 0.5]);
///
/// let target = remap_frame(&source, &table).unwrap();
/// assert_eq!(target.root_position(), [1.0, 2.0, 0.7]);
/// assert_eq!(target.joints(), &[0.5, 0.0, 0.4]);
/// ```
pub fn remap_frame(source: &MotionFrame, table: &JointRemapTable) -> Result<MotionFrame> {
    let expected = JOINT_OFFSET + table.source_dof();
    if source.width() != expected {
        return Err(MotionError::malformed(expected, source.width()));
    }
    let joints = table.apply(source.joints())?;
    Ok(MotionFrame::from_parts(
        source.root_position(),
        source.root_orientation(),
        &joints,
    ))
}

/// Maps every frame of a source clip into the target layout.
///
/// Source orientations are copied as-is; frames whose quaternion is not
/// unit length are counted and reported through `tracing`.
///
/// # Errors
///
/// Same as [`remap_frame`], with the offending frame index attached.
pub fn remap_clip(clip: &MotionClip, table: &JointRemapTable) -> Result<MotionClip> {
    let mut off_unit = 0usize;
    let mut worst = 0.0f64;

    let frames = clip
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            let deviation = (frame.quaternion_norm() - 1.0).abs();
            if deviation > SOURCE_NORM_TOLERANCE {
                off_unit += 1;
                worst = worst.max(deviation);
            }
            remap_frame(frame, table).map_err(|err| err.at_frame(index))
        })
        .collect::<Result<Vec<_>>>()?;

    if off_unit > 0 {
        warn!(
            frames = off_unit,
            max_deviation = worst,
            "Source orientation is not unit length"
        );
    }

    let unmapped = table.unmapped_targets();
    debug!(?unmapped, "Target joints without a source are fixed at zero");

    let remapped = MotionClip::new(frames, clip.fps())?;
    info!(
        frames = remapped.len(),
        source_dof = table.source_dof(),
        target_dof = table.target_dof(),
        "Remapped clip"
    );
    Ok(remapped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use motion_types::RobotRegistry;

    fn source_frame(joints: &[f64]) -> MotionFrame {
        MotionFrame::from_parts([0.3, -0.1, 0.75], [0.0, 0.0, 0.1, 0.995], joints)
    }

    #[test]
    fn root_is_copied() {
        let table = JointRemapTable::identity(2);
        let source = source_frame(&[0.1, 0.2]);
        let target = remap_frame(&source, &table).unwrap();
        assert_eq!(target.root_position(), source.root_position());
        assert_eq!(target.root_orientation(), source.root_orientation());
        assert_eq!(target.joints(), source.joints());
    }

    #[test]
    fn wrong_width_rejected() {
        let table = JointRemapTable::identity(3);
        let err = remap_frame(&source_frame(&[0.0, 0.0]), &table).unwrap_err();
        assert_eq!(err, MotionError::malformed(10, 9));
    }

    #[test]
    fn g1_from_pbhc() {
        let registry = RobotRegistry::builtin().unwrap();
        let g1 = registry.get("g1").unwrap();
        let pbhc = g1.source("pbhc").unwrap();

        // Distinct non-zero value per source joint.
        let joints: Vec<f64> = (1..=23).map(f64::from).collect();
        let target = remap_frame(&source_frame(&joints), pbhc.remap()).unwrap();

        assert_eq!(target.width(), 36);
        let layout = g1.layout();
        // Waist roll/pitch are dropped, wrists have no source.
        for name in [
            "waist_roll",
            "waist_pitch",
            "left_wrist_roll",
            "left_wrist_pitch",
            "left_wrist_yaw",
            "right_wrist_roll",
            "right_wrist_pitch",
            "right_wrist_yaw",
        ] {
            assert_eq!(target.joint(layout, name), Some(0.0), "{name}");
        }
        assert_eq!(target.joint(layout, "left_hip_pitch"), Some(1.0));
        assert_eq!(target.joint(layout, "waist_yaw"), Some(13.0));
        assert_eq!(target.joint(layout, "left_elbow"), Some(19.0));
        assert_eq!(target.joint(layout, "right_shoulder_pitch"), Some(20.0));
        assert_eq!(target.joint(layout, "right_elbow"), Some(23.0));
    }

    #[test]
    fn clip_error_carries_frame_index() {
        let table = JointRemapTable::identity(2);
        let good = source_frame(&[0.0, 0.0]);
        let clip = MotionClip::new(vec![good.clone(), good], 30.0).unwrap();
        assert_eq!(remap_clip(&clip, &table).unwrap().len(), 2);

        let narrow = JointRemapTable::identity(1);
        let err = remap_clip(&clip, &narrow).unwrap_err();
        assert_eq!(err.frame_index(), Some(0));
    }

    #[test]
    fn clip_keeps_rate() {
        let table = JointRemapTable::new(3, vec![Some(1)]).unwrap();
        let clip = MotionClip::new(vec![source_frame(&[0.5]); 4], 50.0).unwrap();
        let remapped = remap_clip(&clip, &table).unwrap();
        assert_eq!(remapped.fps(), 50.0);
        assert!(remapped.iter().all(|f| f.joints() == [0.0, 0.5, 0.0]));
    }
}
