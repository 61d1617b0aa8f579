use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{assert_vec3_near, path_through};
use crate::geom::{
    ConnectionType, ControlPoint, CurveType, VIRTUAL_POINT_EPSILON, Vec3, apply_connection,
    linear_tangent, refit_bezier, update_auto_and_linear,
};

#[test]
fn refit_is_uniform_catmull_rom() {
    let p0 = Vec3::new(0.0, 0.0, 0.0);
    let p1 = Vec3::new(1.0, 0.0, 0.0);
    let p2 = Vec3::new(2.0, 1.0, 0.0);
    let p3 = Vec3::new(3.0, 1.0, 0.0);
    let (out_tangent, in_tangent) = refit_bezier(p0, p1, p2, p3);
    assert_vec3_near(out_tangent, p1 + (p2 - p0) / 6.0, 1e-12);
    assert_vec3_near(in_tangent, p2 - (p3 - p1) / 6.0, 1e-12);
}

#[test]
fn open_ends_use_virtual_neighbours() {
    let path = path_through(&[Vec3::ZERO, Vec3::X], false);
    let handle = (1.0 + VIRTUAL_POINT_EPSILON) / 6.0;
    assert_vec3_near(path.out_tangent_position_at_index(0), Vec3::new(handle, 0.0, 0.0), 1e-12);
    assert_vec3_near(path.in_tangent_position_at_index(1), Vec3::new(1.0 - handle, 0.0, 0.0), 1e-12);
}

#[test]
fn looping_auto_tangents_are_symmetric() {
    let path = path_through(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ],
        true,
    );
    for point in path.points() {
        assert_vec3_near(point.out_tangent_offset(), -point.in_tangent_offset(), 1e-12);
    }
    // Point 0 sees the last point as its predecessor.
    assert_vec3_near(path.tangent_at_index(0), Vec3::new(2.0, -2.0, 0.0) / 6.0, 1e-12);
}

#[test]
fn auto_update_is_idempotent_on_random_paths() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let count: usize = rng.random_range(2..8);
        let mut points: Vec<ControlPoint> = (0..count)
            .map(|_| {
                let mut point = ControlPoint::new(Vec3::new(
                    rng.random_range(-10.0..10.0),
                    rng.random_range(-10.0..10.0),
                    rng.random_range(-10.0..10.0),
                ));
                if rng.random_bool(0.3) {
                    point.out_tangent.curve_type = CurveType::Linear;
                }
                point
            })
            .collect();
        let looping = rng.random_bool(0.5);

        update_auto_and_linear(&mut points, looping);
        let once = points.clone();
        update_auto_and_linear(&mut points, looping);
        assert_eq!(points, once);
    }
}

#[test]
fn update_never_writes_free_tangents() {
    let mut points = vec![ControlPoint::new(Vec3::ZERO), ControlPoint::new(Vec3::new(3.0, 0.0, 0.0))];
    let handle = Vec3::new(0.0, 5.0, 0.0);
    points[0].out_tangent.position = handle;
    points[0].out_tangent.curve_type = CurveType::Free;
    points[1].in_tangent.curve_type = CurveType::Linear;

    update_auto_and_linear(&mut points, false);
    assert_eq!(points[0].out_tangent.position, handle);
    assert_vec3_near(points[1].in_tangent.position, linear_tangent(points[1].position, Vec3::ZERO), 1e-12);
    assert_vec3_near(points[1].in_tangent.position, Vec3::new(2.0, 0.0, 0.0), 1e-12);
}

#[test]
fn mirrored_reflects_through_point() {
    let mut point = ControlPoint::new(Vec3::ONE);
    point.connection_type = ConnectionType::Mirrored;
    point.in_tangent.position = Vec3::new(0.0, 1.0, 1.0);
    point.in_tangent.curve_type = CurveType::Free;

    apply_connection(&mut point, true);
    assert_vec3_near(point.out_tangent.position, Vec3::new(2.0, 1.0, 1.0), 1e-12);
    assert_eq!(point.out_tangent.curve_type, CurveType::Free);
    assert_vec3_near(point.position * 2.0 - point.in_tangent.position, point.out_tangent.position, 1e-12);
}

#[test]
fn connected_keeps_length_of_adjusted_handle() {
    let mut point = ControlPoint::new(Vec3::ZERO);
    point.in_tangent.position = Vec3::new(0.0, 2.0, 0.0);
    point.out_tangent.position = Vec3::new(5.0, 0.0, 0.0);

    apply_connection(&mut point, false);
    assert_vec3_near(point.in_tangent.position, Vec3::new(-2.0, 0.0, 0.0), 1e-12);
    assert_eq!(point.in_tangent.curve_type, CurveType::Free);
    assert_eq!(point.out_tangent.curve_type, CurveType::Auto);
}

#[test]
fn connected_with_degenerate_handle_keeps_position() {
    let mut point = ControlPoint::new(Vec3::ZERO);
    point.out_tangent.position = Vec3::ZERO;
    let before = point.in_tangent.position;

    apply_connection(&mut point, false);
    assert_eq!(point.in_tangent.position, before);
    assert_eq!(point.in_tangent.curve_type, CurveType::Free);
}

#[test]
fn broken_leaves_opposite_handle_alone() {
    let mut point = ControlPoint::new(Vec3::ZERO);
    point.connection_type = ConnectionType::Broken;
    point.out_tangent.position = Vec3::new(0.0, 0.0, 4.0);
    let before = point.in_tangent;

    apply_connection(&mut point, false);
    assert_eq!(point.in_tangent, before);
}

#[test]
fn preferred_connection_type_per_curve_type() {
    assert_eq!(
        CurveType::Auto.preferred_connection_type(ConnectionType::Broken),
        ConnectionType::Connected
    );
    assert_eq!(CurveType::from_index(2), Some(CurveType::Free));
    assert_eq!(CurveType::from_index(3), None);
    assert_eq!(ConnectionType::from_index(2), Some(ConnectionType::Mirrored));
}
