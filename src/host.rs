//! Interfaces to the host simulation.
//!
//! The engine never creates entities, parses input, or does its own
//! intersection math. Everything it needs from the surrounding world comes
//! through the adapter traits defined here; the host implements them once
//! and passes them into each frame update.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Stable identifier for a tracked subject (e.g. a player avatar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub u64);

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Orientation as yaw/pitch/roll in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    /// Pitch in degrees; positive looks down.
    pub pitch: f32,
    /// Yaw in degrees around the vertical axis.
    pub yaw: f32,
    /// Roll in degrees.
    pub roll: f32,
}

/// A subject's position and orientation as reported by the host.
///
/// The engine reads poses, never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Orientation,
}

/// Collision mask classes used by camera probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionMask {
    /// Solid world geometry only; used for ground clamping.
    Solid,
    /// Solid world plus subjects; used for occlusion-aware placement.
    ShotVisibility,
}

/// First intersection along a probe segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub position: Vec3,
}

/// World-intersection queries.
pub trait WorldQuery {
    /// Return the nearest hit between `origin` and `destination`, or `None`
    /// if the segment is clear. `ignore` excludes the tracked subject's own
    /// body from the query.
    fn probe(
        &self,
        origin: Vec3,
        destination: Vec3,
        mask: CollisionMask,
        ignore: SubjectId,
    ) -> Option<RayHit>;
}

/// Subject pose and velocity queries.
pub trait SubjectQuery {
    /// Current pose of a subject, or `None` while it is unavailable
    /// (e.g. between life-cycle transitions).
    fn pose(&self, id: SubjectId) -> Option<Pose>;

    /// Current linear velocity of a subject.
    fn velocity(&self, id: SubjectId) -> Option<Vec3>;

    /// Positions of all other currently valid subjects, for proximity checks.
    fn other_subject_positions(&self, id: SubjectId) -> Vec<Vec3>;
}

/// Sink for the final camera pose each frame.
///
/// Fire-and-forget: the engine does not observe whether attachment succeeded.
pub trait CameraSink {
    fn apply(&mut self, id: SubjectId, position: Vec3, orientation: Orientation);
}
