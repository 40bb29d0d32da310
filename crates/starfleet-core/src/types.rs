//! Fundamental geometric and simulation types.
//!
//! Space is right-handed with +Y up. Ships look down their local -Z axis,
//! so `forward(q) = q * -Z`.

use glam::{DMat3, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::constants::FRAME_MS;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each simulated tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl SimTime {
    /// Advance by one tick of `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += dt_ms;
    }
}

/// Position and orientation of a simulated body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
        }
    }

    /// Unit vector the body is facing.
    pub fn forward(&self) -> DVec3 {
        forward(self.orientation)
    }

    pub fn distance_to(&self, other: DVec3) -> f64 {
        self.position.distance(other)
    }
}

/// Facing direction for an orientation.
pub fn forward(orientation: DQuat) -> DVec3 {
    orientation * DVec3::NEG_Z
}

/// Number of reference frames (60 Hz) covered by `dt_ms`.
pub fn frames(dt_ms: f64) -> f64 {
    dt_ms / FRAME_MS
}

/// Convert a per-frame interpolation rate into the equivalent factor for `dt_ms`.
///
/// Applying the returned factor once is the same as applying `rate` once per
/// reference frame, so easing speed does not depend on the host frame rate.
pub fn frame_rate_factor(rate: f64, dt_ms: f64) -> f64 {
    let rate = rate.clamp(0.0, 1.0);
    1.0 - (1.0 - rate).powf(frames(dt_ms))
}

/// Orientation that makes a body at `eye` face `target` (its -Z toward target).
///
/// Returns `None` when the two points coincide.
pub fn look_rotation(eye: DVec3, target: DVec3) -> Option<DQuat> {
    let z = (eye - target).try_normalize()?;
    let mut x = DVec3::Y.cross(z);
    if x.length_squared() < 1e-12 {
        // Looking straight up or down: pick any stable right vector.
        x = DVec3::X.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Some(DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize())
}

/// Shortest distance from `point` to the segment `start..end`.
///
/// Standard clamped projection; a zero-length segment degrades to point distance.
pub fn point_to_segment_distance(point: DVec3, start: DVec3, end: DVec3) -> f64 {
    let line = end - start;
    let len_sq = line.length_squared();
    if len_sq <= f64::EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(line) / len_sq).clamp(0.0, 1.0);
    point.distance(start + line * t)
}

/// Horizontal perpendicular of a direction (right angle in the XZ plane).
pub fn horizontal_perpendicular(direction: DVec3) -> DVec3 {
    DVec3::new(-direction.z, 0.0, direction.x).normalize_or_zero()
}

/// Remove roll from an orientation, keeping yaw and pitch (YXZ order).
pub fn without_roll(orientation: DQuat) -> DQuat {
    let (yaw, pitch, _roll) = orientation.to_euler(glam::EulerRot::YXZ);
    DQuat::from_euler(glam::EulerRot::YXZ, yaw, pitch, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_distance_projects_inside_segment() {
        let d = point_to_segment_distance(
            DVec3::new(5.0, 3.0, 0.0),
            DVec3::ZERO,
            DVec3::new(10.0, 0.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-9);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let d = point_to_segment_distance(
            DVec3::new(-4.0, 3.0, 0.0),
            DVec3::ZERO,
            DVec3::new(10.0, 0.0, 0.0),
        );
        assert!((d - 5.0).abs() < 1e-9);
        let d = point_to_segment_distance(DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO, DVec3::ZERO);
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn look_rotation_faces_target() {
        let eye = DVec3::new(10.0, 0.0, 0.0);
        let target = DVec3::new(10.0, 0.0, -50.0);
        let q = look_rotation(eye, target).unwrap();
        assert!(forward(q).distance(DVec3::NEG_Z) < 1e-9);

        let q = look_rotation(DVec3::ZERO, DVec3::new(30.0, 0.0, 0.0)).unwrap();
        assert!(forward(q).distance(DVec3::X) < 1e-9);

        let q = look_rotation(DVec3::ZERO, DVec3::new(0.0, 20.0, 0.0)).unwrap();
        assert!(forward(q).distance(DVec3::Y) < 1e-9);

        assert!(look_rotation(eye, eye).is_none());
    }

    #[test]
    fn frame_rate_factor_matches_per_frame_rate() {
        assert!((frame_rate_factor(0.1, FRAME_MS) - 0.1).abs() < 1e-12);
        // Two frames at 0.1 each leave 0.81 of the gap.
        assert!((frame_rate_factor(0.1, FRAME_MS * 2.0) - 0.19).abs() < 1e-12);
        assert_eq!(frame_rate_factor(0.5, 0.0), 0.0);
    }
}
