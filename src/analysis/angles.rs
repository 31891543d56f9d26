//! Joint angle and alignment geometry
//!
//! Interior angle at a joint from the vectors to its two neighbors,
//! e.g. shoulder→elbow←wrist for the elbow angle.

use nalgebra::Vector2;
use serde::Deserialize;

/// Landmarks closer than this are treated as coincident
const DEGENERACY_EPS: f32 = 1e-4;

/// Interior angle at `vertex` in degrees, in [0, 180].
///
/// Uses the dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Returns `None` when either neighbor coincides with the vertex —
/// the angle is undefined there, not 0 or 180.
pub fn joint_angle(a: (f32, f32), vertex: (f32, f32), b: (f32, f32)) -> Option<f32> {
    let v1 = Vector2::new(a.0 - vertex.0, a.1 - vertex.1);
    let v2 = Vector2::new(b.0 - vertex.0, b.1 - vertex.1);

    let mag1 = v1.norm();
    let mag2 = v2.norm();
    if mag1 < DEGENERACY_EPS || mag2 < DEGENERACY_EPS {
        return None;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    Some(cos_angle.acos().to_degrees())
}

/// Axis for alignment measurements
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

/// Signed deviation of `a` from `b` along one axis.
///
/// Positive when `a` is right of / below `b` in image coordinates.
/// Used for symmetry and cave-in checks (wrist vs shoulder x-offset,
/// knee vs ankle x-offset).
pub fn axis_offset(a: (f32, f32), b: (f32, f32), axis: Axis) -> f32 {
    match axis {
        Axis::X => a.0 - b.0,
        Axis::Y => a.1 - b.1,
    }
}
