//! Geometry primitives for camera placement.
//!
//! Small helpers shared by the solver and smoothing filter. Angles are
//! degrees at the API surface (matching the host's yaw/pitch/roll
//! convention) and converted to radians internally.

use glam::Vec3;

/// Unit vector in the horizontal plane pointing along a yaw angle.
pub fn forward_from_yaw(yaw_degrees: f32) -> Vec3 {
    let yaw = yaw_degrees.to_radians();
    Vec3::new(yaw.cos(), yaw.sin(), 0.0)
}

/// Unit vector in the horizontal plane pointing opposite a yaw angle.
///
/// This is the direction a chase camera retreats along.
pub fn backward_from_yaw(yaw_degrees: f32) -> Vec3 {
    -forward_from_yaw(yaw_degrees)
}

/// Length of a vector projected onto the horizontal plane.
pub fn horizontal_length(v: Vec3) -> f32 {
    (v.x * v.x + v.y * v.y).sqrt()
}

/// Whether `other` lies in front of an observer facing along `observer_yaw`.
///
/// Front means a positive dot product between the facing direction and the
/// observer-to-other vector. Coincident positions count as not in front.
pub fn is_in_front(observer: Vec3, observer_yaw_degrees: f32, other: Vec3) -> bool {
    let facing = forward_from_yaw(observer_yaw_degrees);
    (other - observer).dot(facing) > 0.0
}

/// Velocity vector that moves from `a` to `b` over `elapsed` seconds.
///
/// A zero or negative elapsed time is treated as one second so callers get
/// a finite (if meaningless) result instead of an infinity.
pub fn velocity_between(a: Vec3, b: Vec3, elapsed: f32) -> Vec3 {
    let elapsed = if elapsed > 0.0 { elapsed } else { 1.0 };
    let offset = b - a;
    let distance = offset.length();
    if distance == 0.0 {
        return Vec3::ZERO;
    }
    (offset / distance) * (distance / elapsed)
}
