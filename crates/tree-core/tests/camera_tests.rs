// Integration tests for the hand-driven orbit controller.

use std::f32::consts::{PI, TAU};
use tree_core::*;

const DT: f32 = 1.0 / 60.0;

fn orbit_with_full_turn_range() -> OrbitController {
    OrbitController::new(OrbitConfig {
        azimuth_range: TAU,
        ..OrbitConfig::default()
    })
}

#[test]
fn short_path_crosses_the_wrap_boundary() {
    let current = -PI + 0.01;
    let target = PI - 0.01;
    let next = step_angle(current, target, 0.5);
    let moved = wrap_angle(next - current);
    assert!(
        (moved + 0.01).abs() < 1e-4,
        "expected a -0.01 step through -π, moved {moved}"
    );

    let back = step_angle(target, current, 0.5);
    let moved = wrap_angle(back - target);
    assert!((moved - 0.01).abs() < 1e-4, "moved {moved}");
}

#[test]
fn controller_rotates_the_short_way_around() {
    let mut orbit = orbit_with_full_turn_range();
    let polar = orbit.polar();
    orbit.set_angles(-PI + 0.01, polar);
    // x chosen so the azimuth target is π - 0.01
    let x = 0.5 + (PI - 0.01) / TAU;
    let start = orbit.azimuth();
    for _ in 0..30 {
        assert!(orbit.update(HandSample::new(x, 0.5, true), DT));
        let delta = wrap_angle(orbit.azimuth() - start);
        assert!(delta <= 0.0 && delta >= -0.0201, "swung {delta} rad");
    }
    assert!(wrap_angle(orbit.azimuth() - (PI - 0.01)).abs() < 0.01);
}

#[test]
fn polar_stays_in_bounds_for_extreme_input() {
    for sensitivity in [0.5, 1.0, 1.6, 10.0] {
        for offset in [-1.0, 0.0, 0.2, 2.0] {
            let mut orbit = OrbitController::new(OrbitConfig {
                y_sensitivity: sensitivity,
                y_offset: offset,
                ..OrbitConfig::default()
            });
            let (min, max) = (orbit.config().min_polar, orbit.config().max_polar);
            for y in [0.0, 1.0, -5.0, 7.0] {
                for _ in 0..240 {
                    orbit.update(HandSample::new(0.5, y, true), DT);
                    assert!(orbit.polar() >= min && orbit.polar() <= max);
                }
                let target = orbit.polar_target(y.clamp(0.0, 1.0));
                assert!(target >= min && target <= max);
            }
        }
    }
}

#[test]
fn extremes_map_to_the_polar_bounds() {
    let orbit = OrbitController::default();
    let cfg = orbit.config().clone();
    assert!((orbit.polar_target(0.0) - cfg.min_polar).abs() < 1e-6);
    assert!((orbit.polar_target(1.0) - cfg.max_polar).abs() < 1e-6);
}

#[test]
fn lost_hand_freezes_angles_exactly() {
    let mut orbit = OrbitController::default();
    for _ in 0..20 {
        orbit.update(HandSample::new(0.9, 0.7, true), DT);
    }
    let (az, po, eye) = (orbit.azimuth(), orbit.polar(), orbit.eye());
    for _ in 0..100 {
        assert!(!orbit.update(HandSample::new(0.1, 0.1, false), DT));
    }
    assert_eq!(orbit.azimuth(), az);
    assert_eq!(orbit.polar(), po);
    assert_eq!(orbit.eye(), eye);
}

#[test]
fn non_finite_hand_is_treated_as_lost() {
    let mut orbit = OrbitController::default();
    let (az, po) = (orbit.azimuth(), orbit.polar());
    assert!(!orbit.update(HandSample::new(f32::NAN, 0.5, true), DT));
    assert!(!orbit.update(HandSample::new(0.5, f32::INFINITY, true), DT));
    assert_eq!((orbit.azimuth(), orbit.polar()), (az, po));
}

#[test]
fn bad_delta_does_not_move_or_poison_the_camera() {
    let mut orbit = OrbitController::default();
    let (az, po) = (orbit.azimuth(), orbit.polar());
    for delta in [f32::NAN, -1.0, 0.0] {
        orbit.update(HandSample::new(1.0, 1.0, true), delta);
    }
    assert_eq!((orbit.azimuth(), orbit.polar()), (az, po));
    assert!(orbit.eye().is_finite());
}

#[test]
fn out_of_range_hand_is_clamped() {
    let mut a = OrbitController::default();
    let mut b = OrbitController::default();
    for _ in 0..60 {
        a.update(HandSample::new(3.0, -2.0, true), DT);
        b.update(HandSample::new(1.0, 0.0, true), DT);
    }
    assert_eq!(a.azimuth(), b.azimuth());
    assert_eq!(a.polar(), b.polar());
}

#[test]
fn holding_a_pose_converges_on_the_target() {
    let mut orbit = OrbitController::default();
    let sample = HandSample::new(0.8, 0.55, true);
    for _ in 0..60 * 10 {
        orbit.update(sample, DT);
    }
    assert!((orbit.azimuth() - orbit.azimuth_target(0.8)).abs() < 1e-3);
    assert!((orbit.polar() - orbit.polar_target(0.55)).abs() < 1e-3);
}

#[test]
fn camera_looks_at_the_pinned_height() {
    let mut orbit = OrbitController::default();
    orbit.set_angles(0.4, orbit.config().max_polar);
    let pose = orbit.pose();
    assert_eq!(pose.target, glam::Vec3::new(0.0, orbit.config().look_at_height, 0.0));
    let view_target = pose.view().transform_point3(pose.target);
    assert!(view_target.x.abs() < 1e-3 && view_target.y.abs() < 1e-3);
    assert!(view_target.z < 0.0);
    // At the lowest allowed tilt the eye is still at or above the horizon band.
    assert!(pose.eye.y >= pose.target.y - orbit.distance() * 0.2);
}

#[test]
fn look_at_point_projects_to_the_screen_centre() {
    let mut orbit = OrbitController::default();
    orbit.set_angles(-2.0, 1.0);
    let pose = orbit.pose();
    for aspect in [16.0 / 9.0, 0.5, 0.0, f32::NAN] {
        let clip = pose.view_projection(aspect) * pose.target.extend(1.0);
        assert!(clip.w > 0.0, "target behind the camera at aspect {aspect}");
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
        assert!((-1.0..=1.0).contains(&ndc.z), "depth {} outside clip range", ndc.z);
    }
}

#[test]
fn zoom_moves_the_eye_along_the_view_ray() {
    let mut orbit = OrbitController::default();
    let before = orbit.pose();
    orbit.set_distance(orbit.config().max_distance);
    let after = orbit.pose();
    let dir_before = (before.eye - before.target).normalize();
    let dir_after = (after.eye - after.target).normalize();
    assert!(dir_before.abs_diff_eq(dir_after, 1e-5));
    assert!((after.eye.distance(after.target) - orbit.config().max_distance).abs() < 1e-3);
}

#[test]
fn orbit_config_validation() {
    let bad_polar = OrbitConfig {
        min_polar: 1.0,
        max_polar: 4.0,
        ..OrbitConfig::default()
    };
    assert!(matches!(bad_polar.validate(), Err(ConfigError::PolarBounds { .. })));

    let bad_distance = OrbitConfig {
        min_distance: 10.0,
        max_distance: 5.0,
        ..OrbitConfig::default()
    };
    assert!(matches!(
        bad_distance.validate(),
        Err(ConfigError::DistanceBounds { .. })
    ));

    let bad_damping = OrbitConfig {
        damping: 0.0,
        ..OrbitConfig::default()
    };
    assert!(matches!(
        bad_damping.validate(),
        Err(ConfigError::OrbitParameter { name: "damping", .. })
    ));
}
