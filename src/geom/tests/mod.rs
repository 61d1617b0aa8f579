mod test_arc_length_basic;
mod test_frame_basic;
mod test_profile_basic;
mod test_tangent_basic;

use crate::geom::{BezierPath, ControlPoint, SourceMesh, Vec2, Vec3};

pub(super) fn assert_vec3_near(actual: Vec3, expected: Vec3, eps: f64) {
    assert!(
        (actual - expected).length() <= eps,
        "expected {expected:?}, got {actual:?} (eps {eps})"
    );
}

/// Open path through `positions` with default auto tangents.
pub(super) fn path_through(positions: &[Vec3], looping: bool) -> BezierPath {
    let points = positions.iter().copied().map(ControlPoint::new).collect();
    BezierPath::from_points(points, looping).expect("valid points")
}

/// Unit quad spanning Z in `[0, 1]` and X in `[-0.5, 0.5]`, one submesh.
pub(super) fn quad_profile() -> SourceMesh {
    SourceMesh {
        vertices: vec![
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(-0.5, 0.0, 1.0),
            Vec3::new(0.5, 0.0, 1.0),
        ],
        normals: vec![Vec3::Y; 4],
        uv_channels: Vec::new(),
        submeshes: vec![vec![0, 2, 1, 1, 2, 3]],
    }
}

pub(super) fn quad_profile_with_uvs() -> SourceMesh {
    SourceMesh {
        uv_channels: vec![vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        ]],
        ..quad_profile()
    }
}
