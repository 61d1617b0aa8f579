use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{assert_vec3_near, path_through};
use crate::geom::{
    ARC_LENGTH_STEPS, ArcLengthTable, BezierPath, PositionSamples, RAY_SAMPLE_COUNT, Vec3,
};

#[test]
fn table_of_straight_line() {
    let table = ArcLengthTable::build(|t| Vec3::new(3.0 * t, 4.0 * t, 0.0));
    assert_eq!(table.distances().len(), ARC_LENGTH_STEPS + 1);
    assert_eq!(table.distances()[0], 0.0);
    assert!((table.length() - 5.0).abs() < 1e-12);
    assert!((table.distance_to_time(2.5) - 0.5).abs() < 1e-12);
    assert!((table.time_to_distance(0.2) - 1.0).abs() < 1e-12);
}

#[test]
fn distance_to_time_clamps_at_both_ends() {
    let path = BezierPath::new();
    let length = path.length();
    assert_eq!(path.distance_to_time(0.0), 0.0);
    assert_eq!(path.distance_to_time(-1.0), 0.0);
    assert_eq!(path.distance_to_time(length), 1.0);
    assert_eq!(path.distance_to_time(length + 10.0), 1.0);
    assert_eq!(path.time_to_distance(0.0), 0.0);
    assert!((path.time_to_distance(1.0) - length).abs() < 1e-12);
}

#[test]
fn zero_length_path_maps_everything_to_end() {
    let path = path_through(&[Vec3::ONE], false);
    assert_eq!(path.length(), 0.0);
    assert_eq!(path.distance_to_time(0.0), 1.0);
    assert_eq!(path.time_to_distance(0.5), 0.0);
    assert_eq!(path.position_at_distance(3.0), Vec3::ONE);
}

#[test]
fn distance_and_time_are_monotonic_inverses() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let positions: Vec<Vec3> = (0..5)
            .map(|_| {
                Vec3::new(
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                )
            })
            .collect();
        let path = path_through(&positions, rng.random_bool(0.5));
        let length = path.length();
        assert!(length > 0.0);

        let mut prev = 0.0;
        for i in 1..50 {
            let d = length * f64::from(i) / 50.0;
            let t = path.distance_to_time(d);
            assert!(t >= prev, "distance_to_time decreased at d = {d}");
            assert!((path.time_to_distance(t) - d).abs() < 1e-9);
            prev = t;
        }
    }
}

#[test]
fn distance_queries_follow_arc_length() {
    let path = BezierPath::new();
    assert_vec3_near(path.position_at_distance(0.3), Vec3::new(0.3, 0.0, 0.0), 1e-4);
    assert_vec3_near(path.forward_vector_at_distance(0.3), Vec3::X, 1e-12);
    assert_vec3_near(path.up_vector_at_distance(0.3), Vec3::Y, 1e-12);

    let sample = path.sample_at_distance(0.3);
    assert_eq!(sample.position, path.position_at_distance(0.3));
    assert!((sample.time - path.distance_to_time(0.3)).abs() < 1e-15);

    let matrix = path.matrix_at_distance(0.3);
    assert_vec3_near(matrix.translation(), sample.position, 1e-12);
}

#[test]
fn position_samples_cover_unit_interval() {
    let samples = PositionSamples::build(|t| Vec3::new(t, 0.0, 0.0));
    assert_eq!(samples.positions().len(), RAY_SAMPLE_COUNT);
    assert_eq!(samples.positions()[0], Vec3::ZERO);
    assert!((samples.positions()[RAY_SAMPLE_COUNT - 1].x - 0.99).abs() < 1e-12);
}

#[test]
fn caches_reset_after_geometry_change() {
    let mut path = BezierPath::new();
    let before = path.length();
    path.set_position(1, Vec3::new(2.0, 0.0, 0.0));
    assert!((path.length() - 2.0).abs() < 1e-9);
    assert!(path.length() > before);

    // Roll is metadata and leaves the length alone.
    path.set_roll(0, 45.0);
    assert!((path.length() - 2.0).abs() < 1e-9);
}
