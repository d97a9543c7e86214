//! Velocity-adaptive position smoothing.
//!
//! Converts the solver's raw per-frame target into a temporally stable
//! trajectory: the faster the subject moves, the more eagerly the camera
//! tracks; at rest it damps hard and anchors on an idle reference so probe
//! noise cannot make it drift or pump vertically.

use glam::Vec3;

use crate::config::SmoothingSettings;
use crate::math::horizontal_length;
use crate::session::CameraSession;

/// Smoothing filter over a session's accepted-position history.
pub struct SmoothingFilter<'a> {
    settings: &'a SmoothingSettings,
}

impl<'a> SmoothingFilter<'a> {
    pub fn new(settings: &'a SmoothingSettings) -> Self {
        Self { settings }
    }

    /// Blend `raw_target` into the session's trajectory and return the
    /// position to emit this frame.
    ///
    /// The first call on a session with no accepted position adopts the
    /// (height-clamped) raw target directly. `desired_distance` caps the
    /// distance reclamp alongside the configured band.
    pub fn smooth(
        &self,
        session: &mut CameraSession,
        raw_target: Vec3,
        subject_position: Vec3,
        velocity: Vec3,
        desired_distance: f32,
        now: f32,
    ) -> Vec3 {
        let s = self.settings;

        let min_z = subject_position.z + s.min_height;
        let max_z = subject_position.z + s.max_height;

        let mut target = raw_target;
        target.z = target.z.clamp(min_z, max_z);

        let current = match session.last_accepted {
            Some(pos) => pos,
            None => {
                session.accept(target, now);
                return target;
            }
        };

        let elapsed = (now - session.last_update).max(0.0);

        let vertical_speed = velocity.z.abs();
        let horizontal_speed = horizontal_length(velocity);

        // Faster motion tracks the target more eagerly; slower motion damps
        // harder.
        let speed_t = (horizontal_speed / s.reference_speed).clamp(0.0, 1.0);
        let lerp_factor = s.min_lerp + (s.max_lerp - s.min_lerp) * speed_t;
        let effective = (lerp_factor * s.stabilization).clamp(s.lerp_floor, s.lerp_ceiling);

        let mut smoothed = current.lerp(target, effective);

        // Budget the height change against the idle anchor. Before any
        // anchor exists the last accepted height stands in for it.
        let anchor_z = session.last_fallback.map_or(current.z, |p| p.z);
        let rate = (vertical_speed * s.rate_scale).clamp(s.rate_floor, s.rate_ceiling);
        let budget = (rate * elapsed).max(s.min_step);
        let z_diff = smoothed.z - anchor_z;
        if z_diff.abs() > budget {
            smoothed.z = anchor_z + budget.copysign(z_diff);
        }

        if vertical_speed < s.idle_vertical_speed && horizontal_speed < s.idle_horizontal_speed {
            session.last_fallback = Some(smoothed);
        }

        smoothed.z = smoothed.z.clamp(min_z, max_z);

        // Project back into the allowed distance band from the subject.
        let to_subject = subject_position - smoothed;
        let distance = to_subject.length();
        if distance < s.min_distance || distance > s.max_distance {
            let direction = to_subject.normalize_or_zero();
            let clamped =
                distance.clamp(s.min_distance, s.max_distance.min(desired_distance));
            smoothed = subject_position - direction * clamped;
            smoothed.z = smoothed.z.max(min_z);
        }

        session.accept(smoothed, now);
        smoothed
    }

    /// Mirror-mode variant: blend toward the frozen snapshot position with a
    /// fixed factor, skipping the speed mapping and reclamping entirely.
    pub fn smooth_toward_fixed(
        &self,
        session: &mut CameraSession,
        frozen: Vec3,
        blend: f32,
        now: f32,
    ) -> Vec3 {
        let smoothed = match session.last_accepted {
            Some(current) => current.lerp(frozen, blend),
            None => frozen,
        };
        session.accept(smoothed, now);
        smoothed
    }
}
