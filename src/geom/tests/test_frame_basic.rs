use super::{assert_vec3_near, path_through};
use crate::geom::{BezierPath, Vec3, initial_up, propagate, transport_up};

fn twisted_loop() -> BezierPath {
    path_through(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 2.0),
            Vec3::new(0.0, 1.0, 1.0),
        ],
        true,
    )
}

#[test]
fn initial_up_is_world_up_in_look_frame() {
    assert_vec3_near(initial_up(Vec3::X), Vec3::Y, 1e-12);
    assert_vec3_near(initial_up(Vec3::new(0.0, 0.0, -3.0)), Vec3::Y, 1e-12);

    let up = initial_up(Vec3::new(1.0, 1.0, 0.0));
    assert!(up.dot(Vec3::new(1.0, 1.0, 0.0)).abs() < 1e-12);
    assert!(up.y > 0.0);
}

#[test]
fn transport_without_motion_is_identity() {
    let up = Vec3::new(0.0, 0.6, 0.8);
    let carried = transport_up(Vec3::ONE, Vec3::ONE, Vec3::X, Vec3::X, up);
    assert_vec3_near(carried, up, 1e-12);
}

#[test]
fn straight_path_keeps_world_up() {
    let path = BezierPath::new();
    assert_vec3_near(path.smart_up_vector_at_index(0), Vec3::Y, 1e-12);
    assert_vec3_near(path.smart_up_vector_at_index(1), Vec3::Y, 1e-12);
    assert_vec3_near(path.up_vector_at_time(0.3), Vec3::Y, 1e-12);
    assert_vec3_near(path.forward_vector_at_time(0.3), Vec3::X, 1e-12);

    let rotation = path.rotation_at_time(0.3);
    assert_vec3_near(rotation * Vec3::Z, Vec3::X, 1e-9);
    assert_vec3_near(rotation * Vec3::Y, Vec3::Y, 1e-9);
}

#[test]
fn point_roll_turns_up_around_tangent() {
    let mut path = BezierPath::new();
    path.set_roll(0, 90.0);
    assert_vec3_near(path.up_vector_at_index(0), Vec3::Z, 1e-9);
    // Smart up is unaffected by roll.
    assert_vec3_near(path.smart_up_vector_at_index(0), Vec3::Y, 1e-12);
}

#[test]
fn frame_stays_orthonormal_along_curvy_path() {
    let path = path_through(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 1.0, 0.5),
            Vec3::new(4.0, 3.0, 2.0),
            Vec3::new(6.0, 2.0, -1.0),
        ],
        false,
    );
    for i in 0..=20 {
        let t = f64::from(i) / 20.0;
        let sample = path.sample_at_time(t);
        assert!((sample.up.length() - 1.0).abs() < 1e-9, "up not unit at t = {t}");
        assert!(sample.up.dot(sample.forward).abs() < 1e-9, "up not normal at t = {t}");
        assert!((sample.right.length() - 1.0).abs() < 1e-9, "right not unit at t = {t}");
        assert_vec3_near(sample.rotation * Vec3::Z, sample.forward, 1e-9);
    }
}

#[test]
fn loop_closes_without_up_discontinuity() {
    let path = twisted_loop();
    assert!(path.is_looping());
    assert_vec3_near(path.up_vector_at_time(1.0), path.up_vector_at_time(0.0), 1e-6);
}

#[test]
fn open_path_has_no_roll_adjustment() {
    let mut path = twisted_loop();
    path.set_looping(false);
    assert_eq!(path.roll_adjustment_per_index(), 0.0);
}

#[test]
fn propagate_matches_point_count() {
    let path = twisted_loop();
    let field = propagate(path.points(), true);
    assert_eq!(field.smart_up.len(), 4);
    assert!((field.roll_adjustment_per_index - path.roll_adjustment_per_index()).abs() < 1e-12);

    let empty = propagate(&[], false);
    assert!(empty.smart_up.is_empty());
    assert_eq!(empty.roll_adjustment_per_index, 0.0);
}
