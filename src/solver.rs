//! Target position solving.
//!
//! Turns a subject pose into the ideal unobstructed camera position for the
//! frame: distance search against nearby subjects, backward placement from
//! yaw, ground and occlusion clamping through world probes, and vertical
//! hysteresis against the previously accepted position. The output here is
//! the raw target; Smoothed sessions damp it further in the filter.

use glam::Vec3;

use crate::config::{SearchSettings, SolverProfile, SolverSettings};
use crate::host::{CollisionMask, Pose, SubjectId, WorldQuery};
use crate::math::{backward_from_yaw, horizontal_length};

/// Largest offset along the subject's backward direction that keeps the
/// camera clear of other subjects.
///
/// A deliberately coarse stepped walk: starting at one step, advance in
/// fixed increments up to the profile's desired distance, probing a point at
/// the profile's probe height (less the configured drop); the first step
/// that lands within the proximity radius of another subject yields the
/// previous step. Frame-to-frame stability matters here, sub-step precision
/// does not.
pub fn safe_distance(
    pose: &Pose,
    profile: &SolverProfile,
    search: &SearchSettings,
    others: &[Vec3],
) -> f32 {
    let backward = backward_from_yaw(pose.orientation.yaw);
    let probe_lift = Vec3::new(0.0, 0.0, profile.probe_height - search.height_drop);

    let mut d = search.step;
    while d <= profile.desired_distance {
        let check = pose.position + backward * d + probe_lift;
        let blocked = others
            .iter()
            .any(|other| (*other - check).length() < search.proximity_radius);
        if blocked {
            return d - search.step;
        }
        d += search.step;
    }

    profile.desired_distance
}

/// Simple placement a fixed distance behind the subject along its yaw, at a
/// fixed height. Used for the initial placement at activation.
pub fn position_behind(pose: &Pose, distance: f32, height: f32) -> Vec3 {
    pose.position + backward_from_yaw(pose.orientation.yaw) * distance + Vec3::new(0.0, 0.0, height)
}

/// Placement behind the subject with the eye pinned at an absolute height,
/// ignoring pitch. Used to capture the frozen mirror pose.
pub fn static_height_position(pose: &Pose, distance: f32, fixed_z: f32) -> Vec3 {
    let eye = Vec3::new(pose.position.x, pose.position.y, fixed_z);
    eye + backward_from_yaw(pose.orientation.yaw) * distance
}

/// Probe-free placement on the pitch-inclined sphere behind the subject.
///
/// Looking down swings the camera up over the subject and vice versa; no
/// collision handling at all, so only useful where clipping is acceptable.
pub fn unobstructed_position(pose: &Pose, distance: f32, height: f32) -> Vec3 {
    let yaw = pose.orientation.yaw.to_radians();
    let pitch = pose.orientation.pitch.to_radians();
    let boom = -distance;
    Vec3::new(
        pose.position.x + boom * pitch.cos() * yaw.cos(),
        pose.position.y + boom * pitch.cos() * yaw.sin(),
        pose.position.z + height + boom * (-pitch).sin(),
    )
}

/// Occlusion- and ground-aware target position solver.
pub struct TargetSolver<'a, W: WorldQuery + ?Sized> {
    world: &'a W,
    settings: &'a SolverSettings,
}

impl<'a, W: WorldQuery + ?Sized> TargetSolver<'a, W> {
    pub fn new(world: &'a W, settings: &'a SolverSettings) -> Self {
        Self { world, settings }
    }

    /// Compute the raw camera target for this frame.
    ///
    /// `prior` is the last accepted position, used for vertical hysteresis;
    /// pass `None` on the first frame. The caller records the result as the
    /// new prior.
    pub fn solve(
        &self,
        subject: SubjectId,
        pose: &Pose,
        velocity: Vec3,
        desired_distance: f32,
        vertical_offset: f32,
        prior: Option<Vec3>,
    ) -> Vec3 {
        let s = self.settings;
        let subject_pos = pose.position;

        // Steep look angles pull the eye point down toward the subject so
        // the camera stays near eye level instead of towering overhead.
        let pitch = pose.orientation.pitch.to_radians();
        let pitch_factor = 1.0 - (pitch.abs() / std::f32::consts::FRAC_PI_2).clamp(0.0, 0.5);
        let vertical_offset = vertical_offset * pitch_factor;

        let eye = subject_pos + Vec3::new(0.0, 0.0, vertical_offset);
        let backward = backward_from_yaw(pose.orientation.yaw);
        let target = eye + backward * desired_distance;

        // The camera may never sink below the subject's feet, nor below any
        // ground found under the target.
        let mut min_allowed_z = subject_pos.z;
        let ground = self.world.probe(
            target + Vec3::new(0.0, 0.0, s.ground_probe_up),
            target - Vec3::new(0.0, 0.0, s.ground_probe_down),
            CollisionMask::Solid,
            subject,
        );
        if let Some(hit) = ground {
            min_allowed_z = min_allowed_z.max(hit.position.z + s.ground_margin);
        }

        let occlusion = self
            .world
            .probe(eye, target, CollisionMask::ShotVisibility, subject);

        let mut final_pos = match occlusion {
            Some(hit) => {
                let wall_distance = (hit.position - eye).length();

                let clamped_distance = if wall_distance < s.near_threshold {
                    s.min_distance
                } else if wall_distance < desired_distance {
                    (wall_distance - s.wall_margin).clamp(s.min_distance, desired_distance)
                } else {
                    desired_distance
                };

                if clamped_distance < desired_distance {
                    tracing::debug!(
                        subject = %subject,
                        wall_distance,
                        clamped_distance,
                        "camera distance clamped by occlusion"
                    );
                }

                eye + backward * clamped_distance
            }
            None => target,
        };

        if final_pos.z < min_allowed_z {
            final_pos.z = min_allowed_z;
        }

        // Per-frame occlusion-probe noise shows up as height pumping; only
        // let the height creep toward its new value while the subject moves.
        if let Some(prior) = prior {
            let z_diff = final_pos.z - prior.z;
            let moving = velocity.length() > s.moving_speed
                || velocity.z.abs() > s.moving_vertical_speed;

            if moving {
                if z_diff.abs() < s.height_deadband {
                    final_pos.z = prior.z;
                } else if horizontal_length(velocity) > s.fast_horizontal_speed {
                    final_pos.z = prior.z + z_diff * s.height_catchup;
                } else {
                    final_pos.z = prior.z;
                }
            } else if velocity.z.abs() < s.settled_vertical_speed {
                final_pos.z = prior.z;
            }
        }

        // A camera collapsing onto its subject is worse than a wrong one.
        if (final_pos - subject_pos).length() < s.collapse_radius {
            tracing::warn!(subject = %subject, "camera too close, substituting overhead offset");
            final_pos = subject_pos + Vec3::new(0.0, 0.0, s.collapse_height);
        }

        final_pos
    }
}
