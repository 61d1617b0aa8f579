use super::quad_profile;
use crate::geom::{Axis, CapMesh, IntermediateMesh, ProfileError, SourceMesh, Vec2, Vec3};

fn two_submesh_profile() -> SourceMesh {
    SourceMesh {
        submeshes: vec![vec![0, 2, 1], vec![1, 2, 3]],
        ..quad_profile()
    }
}

#[test]
fn rebuild_rebases_forward_axis_onto_zero() {
    let mut source = quad_profile();
    for v in &mut source.vertices {
        v.z += 2.0;
    }
    let mut profile = IntermediateMesh::from_source(source).expect("valid profile");
    assert!(profile.is_dirty());
    assert_eq!(profile.length(), 0.0);

    let data = profile.rebuild_if_dirty().expect("profile data");
    assert!((data.length - 1.0).abs() < 1e-12);
    let zs: Vec<f64> = data.vertices.iter().map(|v| v.z).collect();
    assert_eq!(zs, vec![0.0, 0.0, 1.0, 1.0]);
    assert_eq!(data.uv_channels.len(), 8);
    assert_eq!(data.triangle_count(), 2);

    assert!(!profile.is_dirty());
    assert!((profile.length() - 1.0).abs() < 1e-12);
}

#[test]
fn x_axis_becomes_sweep_direction() {
    let source = SourceMesh {
        vertices: vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 1.0, 0.0), Vec3::new(4.0, 0.0, 1.0)],
        normals: Vec::new(),
        uv_channels: Vec::new(),
        submeshes: vec![vec![0, 1, 2]],
    };
    let mut profile = IntermediateMesh::from_source(source).expect("valid profile");
    profile.set_forward_axis(Axis::X);
    let data = profile.rebuild_if_dirty().expect("profile data");

    assert!((data.length - 4.0).abs() < 1e-12);
    assert_eq!(data.vertices[1], Vec3::new(0.0, 1.0, 4.0));
    assert_eq!(data.vertices[2], Vec3::new(-1.0, 0.0, 4.0));
    assert!(data.normals.is_empty());
}

#[test]
fn axis_mapping_lands_on_positive_z() {
    assert_eq!(Axis::X.to_sweep_space(Vec3::X), Vec3::Z);
    assert_eq!(Axis::Y.to_sweep_space(Vec3::Y), Vec3::Z);
    assert_eq!(Axis::Z.to_sweep_space(Vec3::Z), Vec3::Z);
    assert_eq!(Axis::from_index(1), Some(Axis::Y));
    assert_eq!(Axis::from_index(3), None);
}

#[test]
fn flip_mirrors_sweep_axis_and_winding() {
    let mut profile = IntermediateMesh::from_source(quad_profile()).expect("valid profile");
    profile.set_flip(true);
    assert!(profile.flip());
    let data = profile.rebuild_if_dirty().expect("profile data");

    assert_eq!(data.vertices[0].z, 1.0);
    assert_eq!(data.vertices[3].z, 0.0);
    assert_eq!(data.buckets[0], vec![2, 0, 1, 2, 1, 3]);
}

#[test]
fn settings_mark_profile_dirty() {
    let mut profile = IntermediateMesh::from_source(quad_profile()).expect("valid profile");
    profile.rebuild_if_dirty();
    assert!(!profile.is_dirty());

    profile.set_forward_axis(Axis::Y);
    assert!(profile.is_dirty());
    profile.rebuild_if_dirty();

    profile.set_remapped_submesh_indices(vec![0]);
    assert!(profile.is_dirty());
    profile.rebuild_if_dirty();

    profile.mark_dirty();
    assert!(profile.is_dirty());

    let mut empty = IntermediateMesh::new();
    assert!(empty.rebuild_if_dirty().is_none());
}

#[test]
fn remap_routes_submeshes_into_buckets() {
    let mut profile = IntermediateMesh::from_source(two_submesh_profile()).expect("valid profile");
    assert_eq!(profile.remapped_submesh_indices(), &[0, 0]);

    profile.set_remapped_submesh_indices(vec![1, 0]);
    let data = profile.rebuild_if_dirty().expect("profile data");
    assert_eq!(data.buckets.len(), 2);
    assert_eq!(data.buckets[0], vec![1, 2, 3]);
    assert_eq!(data.buckets[1], vec![0, 2, 1]);

    profile.set_remapped_submesh_index(0, 3);
    let data = profile.rebuild_if_dirty().expect("profile data");
    assert_eq!(data.buckets.len(), 4);
    assert!(data.buckets[1].is_empty());
    assert_eq!(data.buckets[3], vec![0, 2, 1]);
}

#[test]
fn remap_table_follows_source_submesh_count() {
    let mut profile = IntermediateMesh::new();
    assert_eq!(profile.remapped_submesh_indices(), &[0]);

    let source = SourceMesh {
        submeshes: vec![vec![0, 2, 1], vec![1, 2, 3], Vec::new()],
        ..quad_profile()
    };
    profile.set_source(Some(source)).expect("valid profile");
    assert_eq!(profile.remapped_submesh_indices(), &[0, 0, 0]);

    profile.set_remapped_submesh_indices(vec![2]);
    assert_eq!(profile.remapped_submesh_indices(), &[2, 0, 0]);

    profile.set_remapped_submesh_indices(vec![1, 1, 1, 1, 1]);
    assert_eq!(profile.remapped_submesh_indices(), &[1, 1, 1]);

    profile.set_source(None).expect("clearing always succeeds");
    assert_eq!(profile.remapped_submesh_indices(), &[0]);
    assert!(profile.source().is_none());
}

#[test]
fn source_validation_errors() {
    let mut incomplete = quad_profile();
    incomplete.submeshes = vec![vec![0, 1, 2, 3]];
    assert_eq!(
        incomplete.validate(),
        Err(ProfileError::IncompleteTriangle { submesh: 0, len: 4 })
    );

    let mut out_of_bounds = quad_profile();
    out_of_bounds.submeshes = vec![vec![0, 1, 9]];
    assert_eq!(
        out_of_bounds.validate(),
        Err(ProfileError::IndexOutOfBounds { submesh: 0, index: 9, vertex_count: 4 })
    );

    let mut normals = quad_profile();
    normals.normals.pop();
    assert!(matches!(
        normals.validate(),
        Err(ProfileError::AttributeLengthMismatch { attribute: "normals", len: 3, vertex_count: 4 })
    ));

    let mut uvs = quad_profile();
    uvs.uv_channels = vec![Vec::new(); 9];
    assert_eq!(uvs.validate(), Err(ProfileError::TooManyUvChannels { count: 9 }));

    let mut short_uvs = quad_profile();
    short_uvs.uv_channels = vec![vec![Vec2::ZERO; 2]];
    assert!(short_uvs.validate().is_err());

    let mut nan = quad_profile();
    nan.vertices[2].y = f64::NAN;
    assert_eq!(nan.validate(), Err(ProfileError::NonFiniteVertex { index: 2 }));

    let mut profile = IntermediateMesh::new();
    assert!(profile.set_source(Some(nan)).is_err());
    assert!(profile.source().is_none());
}

#[test]
fn cap_enter_percent_is_clamped() {
    let mut cap = CapMesh::default();
    assert!(!cap.is_active_and_valid());

    cap.set_enter_percent(1.5);
    assert_eq!(cap.enter_percent(), 1.0);
    cap.set_enter_percent(-0.2);
    assert_eq!(cap.enter_percent(), 0.0);
    cap.set_enter_percent(f64::NAN);
    assert_eq!(cap.enter_percent(), 0.0);

    let profile = IntermediateMesh::from_source(quad_profile()).expect("valid profile");
    let mut cap = CapMesh::new(profile);
    assert!(cap.is_active_and_valid());
    cap.active = false;
    assert!(!cap.is_active_and_valid());
}
