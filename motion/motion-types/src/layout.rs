//! Named field layout of a motion frame.
//!
//! Every frame stores the floating base first and the joints after it:
//!
//! ```text
//! [x, y, z, qx, qy, qz, qw, joint_0, joint_1, ..., joint_{dof-1}]
//! ```
//!
//! A [`JointLayout`] names the joint fields so that remapping, analysis and
//! I/O can refer to `"left_shoulder_roll"` instead of column 23.

use std::collections::HashSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};

/// Fields holding the root position `(x, y, z)` in world space.
pub const ROOT_POSITION: Range<usize> = 0..3;

/// Fields holding the root orientation quaternion `(qx, qy, qz, qw)`.
pub const ROOT_ORIENTATION: Range<usize> = 3..7;

/// Index of the first joint field.
pub const JOINT_OFFSET: usize = 7;

const ROOT_FIELD_NAMES: [&str; JOINT_OFFSET] = [
    "root_x", "root_y", "root_z", "root_qx", "root_qy", "root_qz", "root_qw",
];

/// Ordered joint names of a robot model.
///
/// # Example
///
/// ```
/// use motion_types::JointLayout;
///
/// let layout = JointLayout::new(["hip", "knee", "ankle"]).unwrap();
/// assert_eq!(layout.dof(), 3);
/// assert_eq!(layout.width(), 10);
/// assert_eq!(layout.field_index("knee"), Some(8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct JointLayout {
    joints: Vec<String>,
}

impl JointLayout {
    /// Creates a layout from joint names in field order.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Config`] if a name is empty or repeated.
    pub fn new<I, S>(joints: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let joints: Vec<String> = joints.into_iter().map(Into::into).collect();

        let mut seen = HashSet::with_capacity(joints.len());
        for name in &joints {
            if name.is_empty() {
                return Err(MotionError::config("joint name must not be empty"));
            }
            if !seen.insert(name.as_str()) {
                return Err(MotionError::config(format!(
                    "joint '{name}' appears more than once in layout"
                )));
            }
        }

        Ok(Self { joints })
    }

    /// Number of joints (degrees of freedom).
    #[must_use]
    pub fn dof(&self) -> usize {
        self.joints.len()
    }

    /// Number of fields in a frame of this layout.
    #[must_use]
    pub fn width(&self) -> usize {
        JOINT_OFFSET + self.joints.len()
    }

    /// Joint names in field order.
    #[must_use]
    pub fn joint_names(&self) -> &[String] {
        &self.joints
    }

    /// Position of a joint among the joints (0-based, excluding root fields).
    #[must_use]
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|joint| joint == name)
    }

    /// Position of a joint within the full frame.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.joint_index(name).map(|index| JOINT_OFFSET + index)
    }

    /// Name of a frame field, including the root fields.
    #[must_use]
    pub fn field_name(&self, field: usize) -> Option<&str> {
        if field < JOINT_OFFSET {
            return Some(ROOT_FIELD_NAMES[field]);
        }
        self.joints.get(field - JOINT_OFFSET).map(String::as_str)
    }

    /// Checks that a row has exactly the width of this layout.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::MalformedFrame`] on a width mismatch.
    pub fn check_width(&self, actual: usize) -> Result<()> {
        if actual == self.width() {
            Ok(())
        } else {
            Err(MotionError::malformed(self.width(), actual))
        }
    }
}

impl TryFrom<Vec<String>> for JointLayout {
    type Error = MotionError;

    fn try_from(joints: Vec<String>) -> Result<Self> {
        Self::new(joints)
    }
}

impl From<JointLayout> for Vec<String> {
    fn from(layout: JointLayout) -> Self {
        layout.joints
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn arm() -> JointLayout {
        JointLayout::new(["shoulder_pitch", "shoulder_roll", "elbow"]).unwrap()
    }

    #[test]
    fn root_ranges_are_contiguous() {
        assert_eq!(ROOT_POSITION.end, ROOT_ORIENTATION.start);
        assert_eq!(ROOT_ORIENTATION.end, JOINT_OFFSET);
    }

    #[test]
    fn width_includes_root() {
        let layout = arm();
        assert_eq!(layout.dof(), 3);
        assert_eq!(layout.width(), 10);
    }

    #[test]
    fn field_lookup() {
        let layout = arm();
        assert_eq!(layout.joint_index("elbow"), Some(2));
        assert_eq!(layout.field_index("elbow"), Some(9));
        assert_eq!(layout.field_index("wrist"), None);
    }

    #[test]
    fn field_names_cover_root_and_joints() {
        let layout = arm();
        assert_eq!(layout.field_name(0), Some("root_x"));
        assert_eq!(layout.field_name(6), Some("root_qw"));
        assert_eq!(layout.field_name(7), Some("shoulder_pitch"));
        assert_eq!(layout.field_name(10), None);
    }

    #[test]
    fn duplicate_joint_rejected() {
        let err = JointLayout::new(["knee", "knee"]).unwrap_err();
        assert!(err.to_string().contains("knee"));
    }

    #[test]
    fn empty_joint_name_rejected() {
        assert!(JointLayout::new(["hip", ""]).is_err());
    }

    #[test]
    fn check_width_reports_mismatch() {
        let layout = arm();
        assert!(layout.check_width(10).is_ok());
        assert_eq!(
            layout.check_width(9).unwrap_err(),
            MotionError::malformed(10, 9)
        );
    }

    #[test]
    fn deserialize_validates() {
        let ok: JointLayout = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(ok.dof(), 2);

        let dup = serde_json::from_str::<JointLayout>(r#"["a", "a"]"#);
        assert!(dup.is_err());
    }
}
