//! Per-frame camera controller.
//!
//! Owns the session store and the tuning configuration, exposes the
//! lifecycle handlers the host wires its events to, and runs the
//! once-per-tick pass that turns each session's subject pose into an
//! emitted camera pose. Single-threaded by contract: the host invokes
//! everything here from one logical tick, so no locking is needed.

use glam::Vec3;
use thiserror::Error;

use crate::config::CameraConfig;
use crate::host::{CameraSink, SubjectId, SubjectQuery, WorldQuery};
use crate::session::{CameraMode, CameraSession, MirrorSnapshot, SessionStore};
use crate::smoothing::SmoothingFilter;
use crate::solver::{
    position_behind, safe_distance, static_height_position, unobstructed_position, TargetSolver,
};

/// Errors from session lifecycle operations.
///
/// Nothing here is fatal; per-frame computation never returns errors at all
/// and degrades to "no update this frame" instead.
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera already active for subject {0}")]
    SessionExists(SubjectId),

    #[error("no active camera for subject {0}")]
    SessionNotFound(SubjectId),

    #[error("mirror mode requires an active camera for subject {0}")]
    MirrorRequiresSession(SubjectId),

    #[error("subject {0} is currently unavailable")]
    SubjectUnavailable(SubjectId),
}

/// The follow-camera engine: session store plus tuning.
#[derive(Debug)]
pub struct CameraEngine {
    config: CameraConfig,
    sessions: SessionStore,
}

impl Default for CameraEngine {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl CameraEngine {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            sessions: SessionStore::new(),
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Number of active sessions.
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Whether a subject currently has an active camera.
    pub fn is_active(&self, subject: SubjectId) -> bool {
        self.sessions.contains(subject)
    }

    /// Read-only view of a subject's session.
    pub fn session(&self, subject: SubjectId) -> Option<&CameraSession> {
        self.sessions.get(subject)
    }

    /// Handle "subject activated camera": create a session and emit an
    /// initial placement behind the subject so the first frame does not
    /// start from nowhere.
    pub fn activate(
        &mut self,
        subject: SubjectId,
        mode: CameraMode,
        now: f32,
        subjects: &dyn SubjectQuery,
        sink: &mut dyn CameraSink,
    ) -> Result<(), CameraError> {
        if !self.sessions.create(subject, mode, now) {
            return Err(CameraError::SessionExists(subject));
        }
        tracing::info!(subject = %subject, ?mode, "camera session created");

        if let Some(pose) = subjects.pose(subject) {
            let profile = self.config.profile(mode == CameraMode::Smoothed);
            let initial = position_behind(
                &pose,
                self.config.unobstructed.distance,
                profile.placement_height,
            );
            sink.apply(subject, initial, pose.orientation);
        }

        Ok(())
    }

    /// Handle "subject deactivated camera": destroy the session.
    pub fn deactivate(&mut self, subject: SubjectId) -> Result<(), CameraError> {
        match self.sessions.destroy(subject) {
            Some(_) => {
                tracing::info!(subject = %subject, "camera session destroyed");
                Ok(())
            }
            None => Err(CameraError::SessionNotFound(subject)),
        }
    }

    /// Handle a round reset: destroy all sessions.
    pub fn round_reset(&mut self) {
        if !self.sessions.is_empty() {
            tracing::info!(count = self.sessions.len(), "round reset, clearing camera sessions");
        }
        self.sessions.clear();
    }

    /// Handle a mirror toggle for a subject.
    ///
    /// Enabling captures the subject's current orientation and a
    /// static-height position and freezes both; disabling clears them.
    /// Returns whether mirror mode is enabled after the toggle.
    pub fn toggle_mirror(
        &mut self,
        subject: SubjectId,
        subjects: &dyn SubjectQuery,
    ) -> Result<bool, CameraError> {
        let mirror = self.config.mirror;
        let session = self
            .sessions
            .get_mut(subject)
            .ok_or(CameraError::MirrorRequiresSession(subject))?;

        if session.mirror_enabled() {
            session.disable_mirror();
            tracing::info!(subject = %subject, "mirror mode disabled");
            return Ok(false);
        }

        let pose = subjects
            .pose(subject)
            .ok_or(CameraError::SubjectUnavailable(subject))?;

        let position = static_height_position(
            &pose,
            mirror.distance,
            pose.position.z + mirror.height_offset,
        );
        session.enable_mirror(MirrorSnapshot {
            position,
            orientation: pose.orientation,
        });
        tracing::info!(subject = %subject, ?position, "mirror mode enabled");
        Ok(true)
    }

    /// Run one frame for every active session.
    ///
    /// `now` is wall-clock seconds. A session whose subject has no pose this
    /// frame is skipped without touching its state; it recovers on its own
    /// once the pose is available again.
    pub fn update_frame(
        &mut self,
        now: f32,
        subjects: &dyn SubjectQuery,
        world: &dyn WorldQuery,
        sink: &mut dyn CameraSink,
    ) {
        let config = &self.config;
        let solver = TargetSolver::new(world, &config.solver);
        let filter = SmoothingFilter::new(&config.smoothing);

        for session in self.sessions.iter_mut() {
            let subject = session.subject;

            let Some(pose) = subjects.pose(subject) else {
                tracing::debug!(subject = %subject, "pose unavailable, skipping frame");
                continue;
            };
            let velocity = subjects.velocity(subject).unwrap_or(Vec3::ZERO);

            // Frozen mirror pose short-circuits all live computation.
            if let Some(snapshot) = session.mirror().copied() {
                let position = match session.mode {
                    CameraMode::Direct => {
                        session.accept(snapshot.position, now);
                        snapshot.position
                    }
                    CameraMode::Smoothed => filter.smooth_toward_fixed(
                        session,
                        snapshot.position,
                        config.mirror.blend,
                        now,
                    ),
                };
                sink.apply(subject, position, snapshot.orientation);
                continue;
            }

            let profile = config.profile(session.mode == CameraMode::Smoothed);

            let raw = if config.unobstructed.enabled {
                unobstructed_position(
                    &pose,
                    config.unobstructed.distance,
                    profile.placement_height,
                )
            } else {
                let others = subjects.other_subject_positions(subject);
                let distance = safe_distance(&pose, profile, &config.search, &others);
                solver.solve(
                    subject,
                    &pose,
                    velocity,
                    distance,
                    profile.vertical_offset,
                    session.last_accepted,
                )
            };

            let emitted = match session.mode {
                CameraMode::Direct => {
                    session.accept(raw, now);
                    raw
                }
                CameraMode::Smoothed => filter.smooth(
                    session,
                    raw,
                    pose.position,
                    velocity,
                    profile.desired_distance,
                    now,
                ),
            };

            sink.apply(subject, emitted, pose.orientation);
        }
    }
}
