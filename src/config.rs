//! Camera tuning configuration.
//!
//! Every numeric constant the solver and filter use lives here, grouped per
//! component, so the two camera modes can diverge by data instead of by
//! duplicated code paths. Values are loaded from a TOML file when present
//! and otherwise fall back to the tuned defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placement parameters for one camera mode.
///
/// Direct and Smoothed historically ran slightly different offsets; both
/// feed the same solver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverProfile {
    /// Ideal camera distance behind the subject's eye point.
    pub desired_distance: f32,
    /// Eye-point height above the subject's feet, before pitch attenuation.
    pub vertical_offset: f32,
    /// Height above the subject's feet at which the safe-distance search
    /// probes for nearby subjects.
    pub probe_height: f32,
    /// Height used for the initial placement at activation and for the
    /// probe-free unobstructed placement.
    pub placement_height: f32,
}

impl SolverProfile {
    /// Defaults for Direct (unsmoothed) sessions.
    pub fn direct() -> Self {
        Self {
            desired_distance: 90.0,
            vertical_offset: 90.0,
            probe_height: 60.0,
            placement_height: 90.0,
        }
    }

    /// Defaults for Smoothed sessions.
    pub fn smoothed() -> Self {
        Self {
            desired_distance: 90.0,
            vertical_offset: 70.0,
            probe_height: 70.0,
            placement_height: 75.0,
        }
    }
}

/// Stepped proximity search against other subjects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Step size of the backward walk.
    pub step: f32,
    /// A probe point closer than this to another subject is a violation.
    pub proximity_radius: f32,
    /// The probe point sits this far below the profile's probe height.
    pub height_drop: f32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            step: 10.0,
            proximity_radius: 8.0,
            height_drop: 30.0,
        }
    }
}

/// Clamp and hysteresis tuning for the target position solver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Ground probe extent above the target position.
    pub ground_probe_up: f32,
    /// Ground probe extent below the target position.
    pub ground_probe_down: f32,
    /// Minimum clearance kept above a ground hit.
    pub ground_margin: f32,
    /// Occlusion hits closer than this collapse to `min_distance`.
    pub near_threshold: f32,
    /// Smallest allowed camera distance after an occlusion clamp.
    pub min_distance: f32,
    /// Distance kept between the camera and an occluding wall.
    pub wall_margin: f32,
    /// Height changes below this are snapped to the prior height.
    pub height_deadband: f32,
    /// Fraction of a height change applied per call while moving fast.
    pub height_catchup: f32,
    /// Horizontal speed above which height catch-up applies.
    pub fast_horizontal_speed: f32,
    /// Overall speed above which the subject counts as moving.
    pub moving_speed: f32,
    /// Vertical speed above which the subject counts as moving.
    pub moving_vertical_speed: f32,
    /// Vertical speed below which the prior height is held exactly.
    pub settled_vertical_speed: f32,
    /// Results closer than this to the subject are discarded.
    pub collapse_radius: f32,
    /// Height of the substitute position above the subject after a discard.
    pub collapse_height: f32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            ground_probe_up: 50.0,
            ground_probe_down: 200.0,
            ground_margin: 15.0,
            near_threshold: 16.0,
            min_distance: 10.0,
            wall_margin: 6.0,
            height_deadband: 0.25,
            height_catchup: 0.2,
            fast_horizontal_speed: 30.0,
            moving_speed: 15.0,
            moving_vertical_speed: 10.0,
            settled_vertical_speed: 5.0,
            collapse_radius: 10.0,
            collapse_height: 70.0,
        }
    }
}

/// Velocity-adaptive smoothing tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmoothingSettings {
    /// Lower bound of the camera height band above the subject.
    pub min_height: f32,
    /// Upper bound of the camera height band above the subject.
    pub max_height: f32,
    /// Lower bound of the camera distance band from the subject.
    pub min_distance: f32,
    /// Upper bound of the camera distance band from the subject.
    pub max_distance: f32,
    /// Interpolation factor at rest.
    pub min_lerp: f32,
    /// Interpolation factor at or beyond the reference speed.
    pub max_lerp: f32,
    /// Horizontal speed at which `max_lerp` is reached.
    pub reference_speed: f32,
    /// Fixed scale applied to the speed-mapped factor.
    pub stabilization: f32,
    /// Safety band floor for the effective factor.
    pub lerp_floor: f32,
    /// Safety band ceiling for the effective factor.
    pub lerp_ceiling: f32,
    /// Vertical rate per unit of vertical speed.
    pub rate_scale: f32,
    /// Floor of the vertical rate in units per second.
    pub rate_floor: f32,
    /// Ceiling of the vertical rate in units per second.
    pub rate_ceiling: f32,
    /// Minimum height budget per frame regardless of elapsed time.
    pub min_step: f32,
    /// Vertical speed below which the subject counts as idle.
    pub idle_vertical_speed: f32,
    /// Horizontal speed below which the subject counts as idle.
    pub idle_horizontal_speed: f32,
}

impl Default for SmoothingSettings {
    fn default() -> Self {
        Self {
            min_height: 70.0,
            max_height: 110.0,
            min_distance: 78.0,
            max_distance: 78.0,
            min_lerp: 0.06,
            max_lerp: 0.45,
            reference_speed: 300.0,
            stabilization: 0.8,
            lerp_floor: 0.05,
            lerp_ceiling: 0.5,
            rate_scale: 0.1,
            rate_floor: 10.0,
            rate_ceiling: 80.0,
            min_step: 0.5,
            idle_vertical_speed: 5.0,
            idle_horizontal_speed: 50.0,
        }
    }
}

/// Frozen fixed-pose ("mirror") camera tuning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MirrorSettings {
    /// Distance behind the subject for the captured position.
    pub distance: f32,
    /// Captured eye height above the subject's feet.
    pub height_offset: f32,
    /// Fixed blend factor Smoothed sessions use toward the frozen position.
    pub blend: f32,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            distance: 70.0,
            height_offset: 75.0,
            blend: 0.25,
        }
    }
}

/// Probe-free placement that ignores world geometry entirely.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnobstructedSettings {
    /// When set, skip all probing and place the camera on the
    /// pitch-inclined sphere behind the subject.
    pub enabled: bool,
    /// Boom length of the inclined placement.
    pub distance: f32,
}

impl Default for UnobstructedSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            distance: 110.0,
        }
    }
}

/// Complete camera engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Placement profile for Direct sessions.
    pub direct: SolverProfile,
    /// Placement profile for Smoothed sessions.
    pub smoothed: SolverProfile,
    /// Safe-distance search tuning.
    pub search: SearchSettings,
    /// Solver clamp tuning.
    pub solver: SolverSettings,
    /// Smoothing filter tuning.
    pub smoothing: SmoothingSettings,
    /// Mirror mode tuning.
    pub mirror: MirrorSettings,
    /// Unobstructed placement switch.
    pub unobstructed: UnobstructedSettings,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            direct: SolverProfile::direct(),
            smoothed: SolverProfile::smoothed(),
            search: SearchSettings::default(),
            solver: SolverSettings::default(),
            smoothing: SmoothingSettings::default(),
            mirror: MirrorSettings::default(),
            unobstructed: UnobstructedSettings::default(),
        }
    }
}

impl CameraConfig {
    /// Profile for a given smoothing choice.
    pub fn profile(&self, smoothed: bool) -> &SolverProfile {
        if smoothed {
            &self.smoothed
        } else {
            &self.direct
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "chasecam", "ChaseCam")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("camera.toml")
}

/// Load camera configuration from the default path.
///
/// A missing file is not an error; defaults are returned.
pub fn load_config() -> Result<CameraConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load camera configuration from an explicit path.
pub fn load_config_from(path: &std::path::Path) -> Result<CameraConfig, ConfigError> {
    if !path.exists() {
        return Ok(CameraConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: CameraConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Save camera configuration to an explicit path.
pub fn save_config_to(config: &CameraConfig, path: &std::path::Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
