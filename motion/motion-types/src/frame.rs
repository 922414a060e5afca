//! A single motion frame: floating-base pose followed by joint angles.

use nalgebra::{Quaternion, UnitQuaternion};
use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::layout::{JointLayout, JOINT_OFFSET, ROOT_ORIENTATION, ROOT_POSITION};

/// Quaternion norms below this are treated as zero.
pub const MIN_QUATERNION_NORM: f64 = 1e-9;

/// One sample of a motion clip.
///
/// Stored as the flat row that clip files use, see [`crate::layout`].
/// The orientation is kept as `(qx, qy, qz, qw)`, scalar last.
///
/// # Example
///
/// ```
/// use motion_types::MotionFrame;
///
/// let frame = MotionFrame::from_parts([0.0, 0.0, 0.8], [0.0, 0.0, 0.0, 1.0], &[0.1, -0.2]);
/// assert_eq!(frame.width(), 9);
/// assert_eq!(frame.dof(), 2);
/// assert_eq!(frame.root_position()[2], 0.8);
/// assert!(frame.is_orientation_normalized(1e-12));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct MotionFrame {
    values: Vec<f64>,
}

impl MotionFrame {
    /// Creates a frame from a flat row.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::MalformedFrame`] if the row is too short to
    /// hold the root pose.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        if values.len() < JOINT_OFFSET {
            return Err(MotionError::malformed(JOINT_OFFSET, values.len()));
        }
        Ok(Self { values })
    }

    /// Creates a frame from a flat row that must match `layout`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::MalformedFrame`] on a width mismatch.
    pub fn with_layout(values: Vec<f64>, layout: &JointLayout) -> Result<Self> {
        layout.check_width(values.len())?;
        Ok(Self { values })
    }

    /// Creates a frame from its root pose and joint angles.
    #[must_use]
    pub fn from_parts(root_position: [f64; 3], root_orientation: [f64; 4], joints: &[f64]) -> Self {
        let mut values = Vec::with_capacity(JOINT_OFFSET + joints.len());
        values.extend_from_slice(&root_position);
        values.extend_from_slice(&root_orientation);
        values.extend_from_slice(joints);
        Self { values }
    }

    /// Creates a frame at the origin with identity orientation and all joints at zero.
    #[must_use]
    pub fn neutral(dof: usize) -> Self {
        Self::from_parts([0.0; 3], [0.0, 0.0, 0.0, 1.0], &vec![0.0; dof])
    }

    /// Total number of fields.
    #[must_use]
    pub fn width(&self) -> usize {
        self.values.len()
    }

    /// Number of joint fields.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.values.len() - JOINT_OFFSET
    }

    /// All fields in storage order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable access to all fields.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Consumes the frame and returns the flat row.
    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Root position `(x, y, z)`.
    #[must_use]
    pub fn root_position(&self) -> [f64; 3] {
        let mut position = [0.0; 3];
        position.copy_from_slice(&self.values[ROOT_POSITION]);
        position
    }

    /// Sets the root position.
    pub fn set_root_position(&mut self, position: [f64; 3]) {
        self.values[ROOT_POSITION].copy_from_slice(&position);
    }

    /// Sets the horizontal root position, leaving the height untouched.
    pub fn set_root_horizontal(&mut self, x: f64, y: f64) {
        self.values[ROOT_POSITION.start] = x;
        self.values[ROOT_POSITION.start + 1] = y;
    }

    /// Root height (`z`).
    #[must_use]
    pub fn root_height(&self) -> f64 {
        self.values[ROOT_POSITION.start + 2]
    }

    /// Sets the root height.
    pub fn set_root_height(&mut self, height: f64) {
        self.values[ROOT_POSITION.start + 2] = height;
    }

    /// Root orientation as `(qx, qy, qz, qw)`.
    #[must_use]
    pub fn root_orientation(&self) -> [f64; 4] {
        let mut orientation = [0.0; 4];
        orientation.copy_from_slice(&self.values[ROOT_ORIENTATION]);
        orientation
    }

    /// Sets the root orientation from `(qx, qy, qz, qw)`.
    pub fn set_root_orientation(&mut self, orientation: [f64; 4]) {
        self.values[ROOT_ORIENTATION].copy_from_slice(&orientation);
    }

    /// Root orientation as an nalgebra quaternion (not necessarily unit).
    #[must_use]
    pub fn quaternion(&self) -> Quaternion<f64> {
        let [x, y, z, w] = self.root_orientation();
        Quaternion::new(w, x, y, z)
    }

    /// Sets the root orientation from an nalgebra quaternion.
    pub fn set_quaternion(&mut self, q: &Quaternion<f64>) {
        self.set_root_orientation([q.i, q.j, q.k, q.w]);
    }

    /// Euclidean norm of the stored orientation.
    #[must_use]
    pub fn quaternion_norm(&self) -> f64 {
        self.quaternion().norm()
    }

    /// Checks if the orientation has unit norm within `tolerance`.
    #[must_use]
    pub fn is_orientation_normalized(&self, tolerance: f64) -> bool {
        (self.quaternion_norm() - 1.0).abs() <= tolerance
    }

    /// Heading of the root about the world Z axis, in radians.
    ///
    /// Returns `None` if the orientation has zero length.
    #[must_use]
    pub fn yaw(&self) -> Option<f64> {
        let q = UnitQuaternion::try_new(self.quaternion(), MIN_QUATERNION_NORM)?;
        Some(q.euler_angles().2)
    }

    /// Joint angles in layout order.
    #[must_use]
    pub fn joints(&self) -> &[f64] {
        &self.values[JOINT_OFFSET..]
    }

    /// Mutable joint angles.
    pub fn joints_mut(&mut self) -> &mut [f64] {
        &mut self.values[JOINT_OFFSET..]
    }

    /// Looks up a joint angle by name.
    #[must_use]
    pub fn joint(&self, layout: &JointLayout, name: &str) -> Option<f64> {
        layout
            .field_index(name)
            .and_then(|field| self.values.get(field).copied())
    }

    /// Sets a joint angle by name.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Config`] if the layout has no such joint or the
    /// frame does not match the layout.
    pub fn set_joint(&mut self, layout: &JointLayout, name: &str, angle: f64) -> Result<()> {
        layout.check_width(self.width())?;
        let field = layout
            .field_index(name)
            .ok_or_else(|| MotionError::config(format!("unknown joint '{name}'")))?;
        self.values[field] = angle;
        Ok(())
    }

    /// Checks that every field is finite.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::NonFiniteValue`] naming the first bad field.
    pub fn check_finite(&self) -> Result<()> {
        match self.values.iter().position(|v| !v.is_finite()) {
            Some(field) => Err(MotionError::non_finite(field, self.values[field])),
            None => Ok(()),
        }
    }
}

impl TryFrom<Vec<f64>> for MotionFrame {
    type Error = MotionError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::from_values(values)
    }
}

impl From<MotionFrame> for Vec<f64> {
    fn from(frame: MotionFrame) -> Self {
        frame.values
    }
}
