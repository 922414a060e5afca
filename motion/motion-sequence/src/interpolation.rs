//! Frame blending and easing.
//!
//! Orientation is blended with normalized linear interpolation (nlerp):
//! the quaternion components are lerped and the result is rescaled to unit
//! length. Nlerp follows the great-circle path but not at constant angular
//! speed, so it is only a close match to slerp for small rotation deltas.
//! Transitions in this crate start from an upright stabilization pose, where
//! the difference is small; large-angle blends keep this known precision
//! limit instead of silently switching method.

use std::f64::consts::PI;

use motion_types::{MotionError, MotionFrame, Result, MIN_QUATERNION_NORM};
use nalgebra::UnitQuaternion;

/// Blended quaternions with a norm below this cannot be normalized.
pub const DEGENERATE_NORM_EPSILON: f64 = MIN_QUATERNION_NORM;

/// Linear interpolation `(1 - t) * a + t * b`.
///
/// Exact at both endpoints, and blending a value with itself returns it
/// unchanged for any `t`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if a == b {
        return a;
    }
    (1.0 - t).mul_add(a, t * b)
}

/// Cosine ease-in-out curve, `0.5 - 0.5 * cos(t * pi)`.
///
/// Maps `[0, 1]` onto `[0, 1]` with `ease(0) = 0`, `ease(1) = 1` and zero
/// slope at both ends, so a transition starts and stops without a velocity
/// step.
///
/// # Example
///
/// ```
/// use motion_sequence::ease;
///
/// assert_eq!(ease(0.0), 0.0);
/// assert_eq!(ease(1.0), 1.0);
/// assert!((ease(0.5) - 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn ease(t: f64) -> f64 {
    0.5f64.mul_add(-(t * PI).cos(), 0.5)
}

/// Blends two frames of the same layout.
///
/// Every field except the orientation is blended with [`lerp`]. The
/// orientation is lerped component-wise and renormalized, so the result
/// always carries a unit quaternion.
///
/// # Errors
///
/// - [`MotionError::MalformedFrame`] if the frames differ in width
/// - [`MotionError::InvalidParameter`] if `alpha` is outside `[0, 1]`
/// - [`MotionError::DegenerateRotation`] if the blended quaternion is
///   (near) zero, e.g. antipodal orientations blended at `alpha = 0.5`
///
/// # Example
///
/// ```
/// use motion_types::MotionFrame;
/// use motion_sequence::interpolate;
///
/// let a = MotionFrame::from_parts([0.0, 0.0, 0.8], [0.0, 0.0, 0.0, 1.0], &[0.0]);
/// let b = MotionFrame::from_parts([0.0, 0.0, 0.6], [0.0, 0.0, 0.0, 1.0], &[1.0]);
///
/// let mid = interpolate(&a, &b, 0.5).unwrap();
/// assert!((mid.root_height() - 0.7).abs() < 1e-12);
/// assert!((mid.joints()[0] - 0.5).abs() < 1e-12);
/// ```
pub fn interpolate(a: &MotionFrame, b: &MotionFrame, alpha: f64) -> Result<MotionFrame> {
    if a.width() != b.width() {
        return Err(MotionError::malformed(a.width(), b.width()));
    }
    if !(0.0..=1.0).contains(&alpha) {
        return Err(MotionError::invalid_parameter(format!(
            "interpolation factor must be in [0, 1], got {alpha}"
        )));
    }

    let values = a
        .values()
        .iter()
        .zip(b.values())
        .map(|(&x, &y)| lerp(x, y, alpha))
        .collect();
    let mut blended = MotionFrame::from_values(values)?;

    let q = a.quaternion().lerp(&b.quaternion(), alpha);
    let norm = q.norm();
    let unit = UnitQuaternion::try_new(q, DEGENERATE_NORM_EPSILON)
        .ok_or(MotionError::degenerate_rotation(norm))?;
    blended.set_quaternion(unit.quaternion());

    Ok(blended)
}
