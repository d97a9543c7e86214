//! ChaseCam - Safe Third-Person Camera Engine
//!
//! Computes, once per simulation frame, a collision-safe and visually stable
//! position and orientation for a follow camera trailing a tracked subject.
//! The host simulation supplies pose, raycast, and camera-attachment
//! adapters; this crate supplies the geometry solving, occlusion clamping,
//! velocity-adaptive smoothing, and per-subject session state.

pub mod config;
pub mod engine;
pub mod host;
pub mod math;
pub mod session;
pub mod smoothing;
pub mod solver;

// Re-export commonly used types
pub use config::{CameraConfig, ConfigError};
pub use engine::{CameraEngine, CameraError};
pub use host::{
    CameraSink, CollisionMask, Orientation, Pose, RayHit, SubjectId, SubjectQuery, WorldQuery,
};
pub use session::{CameraMode, CameraSession, MirrorSnapshot};
pub use smoothing::SmoothingFilter;
pub use solver::TargetSolver;
