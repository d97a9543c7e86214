//! Per-subject camera session state.
//!
//! A session exists exactly while a subject has an active third-person
//! camera. All mutable smoothing state lives here and is touched only by
//! that subject's own frame computation.

use glam::Vec3;
use std::collections::HashMap;

use crate::host::{Orientation, SubjectId};

/// How the emitted position is derived from the raw target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Emit the solved target directly every frame.
    Direct,
    /// Run the solved target through the smoothing filter.
    Smoothed,
}

/// Pose frozen at the moment mirror mode was enabled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MirrorSnapshot {
    pub position: Vec3,
    pub orientation: Orientation,
}

/// State for one tracked subject's active camera.
#[derive(Debug, Clone)]
pub struct CameraSession {
    /// The tracked subject.
    pub subject: SubjectId,
    /// Chosen at activation; immutable for the session's lifetime.
    pub mode: CameraMode,
    /// Present exactly while mirror mode is enabled.
    mirror: Option<MirrorSnapshot>,
    /// Last position emitted to the camera; the smoothing reference point.
    /// Always a post-clamp final value, never a raw target.
    pub last_accepted: Option<Vec3>,
    /// Conservative position remembered while the subject is nearly
    /// stationary; anchors long idle holds.
    pub last_fallback: Option<Vec3>,
    /// Wall-clock seconds of the previous frame's computation.
    pub last_update: f32,
}

impl CameraSession {
    /// Create a fresh session with no history.
    pub fn new(subject: SubjectId, mode: CameraMode, now: f32) -> Self {
        Self {
            subject,
            mode,
            mirror: None,
            last_accepted: None,
            last_fallback: None,
            last_update: now,
        }
    }

    /// Whether mirror mode is currently enabled.
    pub fn mirror_enabled(&self) -> bool {
        self.mirror.is_some()
    }

    /// The frozen mirror pose, if mirror mode is enabled.
    pub fn mirror(&self) -> Option<&MirrorSnapshot> {
        self.mirror.as_ref()
    }

    /// Freeze a mirror pose. Replaces any previous snapshot.
    pub fn enable_mirror(&mut self, snapshot: MirrorSnapshot) {
        self.mirror = Some(snapshot);
    }

    /// Clear the mirror pose and return to live tracking.
    pub fn disable_mirror(&mut self) {
        self.mirror = None;
    }

    /// Record an emitted position and its timestamp.
    pub fn accept(&mut self, position: Vec3, now: f32) {
        self.last_accepted = Some(position);
        self.last_update = now;
    }
}

/// Explicit store mapping subjects to their camera sessions.
///
/// Owned by the engine; there is no ambient global state.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SubjectId, CameraSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh session. Returns `false` if one already exists.
    pub fn create(&mut self, subject: SubjectId, mode: CameraMode, now: f32) -> bool {
        if self.sessions.contains_key(&subject) {
            return false;
        }
        self.sessions
            .insert(subject, CameraSession::new(subject, mode, now));
        true
    }

    /// Remove a session, returning it if present.
    pub fn destroy(&mut self, subject: SubjectId) -> Option<CameraSession> {
        self.sessions.remove(&subject)
    }

    /// Drop every session (round reset).
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn contains(&self, subject: SubjectId) -> bool {
        self.sessions.contains_key(&subject)
    }

    pub fn get(&self, subject: SubjectId) -> Option<&CameraSession> {
        self.sessions.get(&subject)
    }

    pub fn get_mut(&mut self, subject: SubjectId) -> Option<&mut CameraSession> {
        self.sessions.get_mut(&subject)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Mutable iteration over all sessions, for the per-frame pass.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CameraSession> {
        self.sessions.values_mut()
    }
}
