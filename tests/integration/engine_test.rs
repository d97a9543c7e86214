//! Engine frame-loop integration tests.

use crate::mock_host::{MockHost, RecordingSink};
use chasecam::{CameraEngine, CameraError, CameraMode, SubjectId};
use glam::Vec3;

const FRAME: f32 = 1.0 / 64.0;
const EPS: f32 = 1e-3;

fn run_frames(
    engine: &mut CameraEngine,
    host: &MockHost,
    sink: &mut RecordingSink,
    start: f32,
    count: usize,
) -> f32 {
    let mut now = start;
    for _ in 0..count {
        now += FRAME;
        engine.update_frame(now, host, host, sink);
    }
    now
}

/// Activation creates a session and emits the initial placement behind the
/// subject.
#[test]
fn test_activation_emits_initial_placement() {
    let mut engine = CameraEngine::default();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let id = SubjectId(1);
    host.put_subject(id, Vec3::ZERO, 0.0);

    engine
        .activate(id, CameraMode::Direct, 0.0, &host, &mut sink)
        .unwrap();

    assert!(engine.is_active(id));
    let (position, _) = sink.last_for(id).unwrap();
    assert!((position - Vec3::new(-110.0, 0.0, 90.0)).length() < EPS);
}

/// Direct mode emits the solved target unchanged each frame.
#[test]
fn test_direct_mode_tracks_solver_output() {
    let mut engine = CameraEngine::default();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let id = SubjectId(1);
    host.put_subject(id, Vec3::ZERO, 0.0);

    engine
        .activate(id, CameraMode::Direct, 0.0, &host, &mut sink)
        .unwrap();
    run_frames(&mut engine, &host, &mut sink, 0.0, 5);

    let (position, orientation) = sink.last_for(id).unwrap();
    assert!((position - Vec3::new(-90.0, 0.0, 90.0)).length() < EPS);
    assert_eq!(orientation.yaw, 0.0);
    assert_eq!(
        engine.session(id).unwrap().last_accepted,
        Some(position)
    );
}

/// A wall behind the subject shortens the emitted camera distance.
#[test]
fn test_wall_shortens_direct_placement() {
    let mut engine = CameraEngine::default();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let id = SubjectId(1);
    host.put_subject(id, Vec3::ZERO, 0.0);
    host.walls_x.push(-40.0);

    engine
        .activate(id, CameraMode::Direct, 0.0, &host, &mut sink)
        .unwrap();
    run_frames(&mut engine, &host, &mut sink, 0.0, 3);

    let (position, _) = sink.last_for(id).unwrap();
    assert!((position.x - -34.0).abs() < EPS);
    assert!(position.x > -40.0);
}

/// Another subject standing on the camera's retreat line shortens the
/// search distance before any wall clamping happens.
#[test]
fn test_other_subject_shortens_distance() {
    let mut engine = CameraEngine::default();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let id = SubjectId(1);
    host.put_subject(id, Vec3::ZERO, 0.0);
    // Bystander on the probe line 50 units back, at probe height.
    host.put_subject(SubjectId(2), Vec3::new(-50.0, 0.0, 30.0), 0.0);

    engine
        .activate(id, CameraMode::Direct, 0.0, &host, &mut sink)
        .unwrap();
    run_frames(&mut engine, &host, &mut sink, 0.0, 1);

    let (position, _) = sink.last_for(id).unwrap();
    assert!((position.x - -40.0).abs() < EPS);
}

/// With a constant pose and no obstructions, smoothing converges and then
/// holds; no perpetual drift at rest.
#[test]
fn test_smoothed_converges_at_rest() {
    let mut engine = CameraEngine::default();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let id = SubjectId(1);
    host.put_subject(id, Vec3::ZERO, 0.0);
    host.set_velocity(id, Vec3::ZERO);

    engine
        .activate(id, CameraMode::Smoothed, 0.0, &host, &mut sink)
        .unwrap();
    let now = run_frames(&mut engine, &host, &mut sink, 0.0, 400);

    let (before, _) = sink.last_for(id).unwrap();
    run_frames(&mut engine, &host, &mut sink, now, 1);
    let (after, _) = sink.last_for(id).unwrap();

    assert!((after - before).length() < EPS);
}

/// Emitted heights stay inside the configured band above the subject, and
/// distances stay inside the band except where the height floor wins.
#[test]
fn test_bounds_invariant() {
    let mut engine = CameraEngine::default();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let id = SubjectId(1);
    let subject_z = 5.0;
    host.put_subject(id, Vec3::new(0.0, 0.0, subject_z), 30.0);
    host.set_velocity(id, Vec3::new(150.0, 50.0, 0.0));

    engine
        .activate(id, CameraMode::Smoothed, 0.0, &host, &mut sink)
        .unwrap();
    // The very first frame adopts the raw target as-is; the bands apply
    // from the second frame on.
    let now = run_frames(&mut engine, &host, &mut sink, 0.0, 2);
    sink.applied.clear();
    run_frames(&mut engine, &host, &mut sink, now, 200);

    let smoothing = &engine.config().smoothing;
    // Re-flooring the height after the distance projection can push the
    // distance above the band by at most the floor height's contribution.
    let distance_cap =
        (smoothing.max_distance.powi(2) + smoothing.min_height.powi(2)).sqrt();

    for (_, position, _) in &sink.applied {
        let z_above = position.z - subject_z;
        assert!(z_above >= smoothing.min_height - EPS, "height {z_above} below band");
        assert!(z_above <= smoothing.max_height + EPS, "height {z_above} above band");

        let distance = (*position - Vec3::new(0.0, 0.0, subject_z)).length();
        assert!(distance >= smoothing.min_distance - EPS, "distance {distance} too short");
        assert!(distance <= distance_cap + EPS, "distance {distance} too long");
    }
}

/// Consecutive emitted heights change no faster than the vertical rate
/// budget allows once the trajectory is warmed up.
#[test]
fn test_vertical_rate_limit_across_frames() {
    let mut engine = CameraEngine::default();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let id = SubjectId(1);
    host.put_subject(id, Vec3::ZERO, 0.0);
    host.set_velocity(id, Vec3::new(100.0, 0.0, 0.0));

    engine
        .activate(id, CameraMode::Smoothed, 0.0, &host, &mut sink)
        .unwrap();
    let now = run_frames(&mut engine, &host, &mut sink, 0.0, 100);

    // New ground under the camera forces the solver to raise its target.
    host.grounds_z.push(80.0);
    sink.applied.clear();
    run_frames(&mut engine, &host, &mut sink, now, 100);

    let smoothing = &engine.config().smoothing;
    let budget = (smoothing.rate_floor * FRAME).max(smoothing.min_step);

    let heights: Vec<f32> = sink.applied.iter().map(|(_, p, _)| p.z).collect();
    for pair in heights.windows(2) {
        let change = (pair[1] - pair[0]).abs();
        // Slack covers the distance reclamp's small vertical correction.
        assert!(
            change <= budget + 0.5,
            "height changed by {change} in one frame (budget {budget})"
        );
    }
}

/// A subject with no pose is skipped for the frame and recovers once the
/// pose is available again.
#[test]
fn test_missing_pose_skips_frame() {
    let mut engine = CameraEngine::default();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let id = SubjectId(1);
    host.put_subject(id, Vec3::ZERO, 0.0);

    engine
        .activate(id, CameraMode::Smoothed, 0.0, &host, &mut sink)
        .unwrap();
    run_frames(&mut engine, &host, &mut sink, 0.0, 3);

    host.remove_subject(id);
    let emitted_before = sink.count_for(id);
    run_frames(&mut engine, &host, &mut sink, 1.0, 5);
    assert_eq!(sink.count_for(id), emitted_before);
    assert!(engine.is_active(id));

    host.put_subject(id, Vec3::ZERO, 0.0);
    run_frames(&mut engine, &host, &mut sink, 2.0, 1);
    assert_eq!(sink.count_for(id), emitted_before + 1);
}

/// Deactivation stops emission; round reset clears every session.
#[test]
fn test_lifecycle_stops_emission() {
    let mut engine = CameraEngine::default();
    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    host.put_subject(SubjectId(1), Vec3::ZERO, 0.0);
    host.put_subject(SubjectId(2), Vec3::new(500.0, 0.0, 0.0), 90.0);

    engine
        .activate(SubjectId(1), CameraMode::Direct, 0.0, &host, &mut sink)
        .unwrap();
    engine
        .activate(SubjectId(2), CameraMode::Smoothed, 0.0, &host, &mut sink)
        .unwrap();

    engine.deactivate(SubjectId(1)).unwrap();
    assert!(matches!(
        engine.deactivate(SubjectId(1)),
        Err(CameraError::SessionNotFound(_))
    ));

    sink.applied.clear();
    run_frames(&mut engine, &host, &mut sink, 0.0, 2);
    assert_eq!(sink.count_for(SubjectId(1)), 0);
    assert_eq!(sink.count_for(SubjectId(2)), 2);

    engine.round_reset();
    sink.applied.clear();
    run_frames(&mut engine, &host, &mut sink, 1.0, 2);
    assert!(sink.applied.is_empty());
}

/// The probe-free placement ignores walls entirely.
#[test]
fn test_unobstructed_mode_ignores_walls() {
    let mut config = chasecam::CameraConfig::default();
    config.unobstructed.enabled = true;
    let mut engine = CameraEngine::new(config);

    let mut host = MockHost::new();
    let mut sink = RecordingSink::new();
    let id = SubjectId(1);
    host.put_subject(id, Vec3::ZERO, 0.0);
    host.walls_x.push(-40.0);

    engine
        .activate(id, CameraMode::Direct, 0.0, &host, &mut sink)
        .unwrap();
    run_frames(&mut engine, &host, &mut sink, 0.0, 1);

    let (position, _) = sink.last_for(id).unwrap();
    // Level pitch: full boom length behind the subject, wall or no wall.
    assert!((position - Vec3::new(-110.0, 0.0, 90.0)).length() < EPS);
}
