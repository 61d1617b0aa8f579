//! Sweeping a profile mesh along a path.
//!
//! The body profile is repeated along the path between the caps; every
//! profile vertex is placed by converting its sweep coordinate into a
//! distance along the path and evaluating the path frame there. Optional
//! start/end caps are swept once over their own range just outside the body.

use serde::{Deserialize, Serialize};

use super::diagnostics::PathMeshDiagnostics;
use super::mesh::{GeneratedMesh, GeneratedSubmesh};
use super::metrics::{PathMetrics, TimingBucket};
use super::profile::{CapMesh, IntermediateMesh, MAX_UV_CHANNELS, ProfileData};
use super::{PathQuery, Quat, Tolerance, Transform, Vec2, Vec3};

/// Upper bound on body repetitions.
pub const MAX_REPEAT_COUNT: usize = 100;

/// Name of the submesh a fresh generator writes into.
pub const DEFAULT_SUBMESH_NAME: &str = "Base";

/// How the number of body repetitions is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FittingType {
    /// As many copies as fit the path, see [`best_fit`].
    #[default]
    Length,
    /// Exactly [`PathMeshOptions::count`] copies.
    Count,
}

impl FittingType {
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Length),
            1 => Some(Self::Count),
            _ => None,
        }
    }
}

/// Options for controlling path mesh generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathMeshOptions {
    pub fitting_type: FittingType,
    /// Repetitions used with [`FittingType::Count`].
    pub count: usize,
    /// Fractional remainder up to which one more copy is squeezed in, in `[0, 1]`.
    pub mesh_fitting: f64,
}

impl Default for PathMeshOptions {
    fn default() -> Self {
        Self { fitting_type: FittingType::Length, count: 1, mesh_fitting: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PathMeshError {
    #[error("path mesh has no profile mesh")]
    MissingProfile,
    #[error("profile mesh has no vertices or no triangles")]
    EmptyProfile,
    #[error("cannot fit a profile of length {profile_length} onto a span of {span}")]
    DegenerateLength { profile_length: f64, span: f64 },
}

/// Number of copies of a mesh of `mesh_length` that best fill `path_length`.
///
/// One more copy than fits is used when the fractional remainder is at most
/// `fitting`, so `fitting = 1` always rounds up and `fitting = 0` rounds down
/// except for exact fits.
#[must_use]
pub fn best_fit(mesh_length: f64, path_length: f64, fitting: f64) -> usize {
    debug_assert!(
        path_length > 0.0 && mesh_length > 0.0,
        "path length and mesh length need to be greater than 0"
    );
    let ratio = path_length / mesh_length;
    let fraction = ratio % 1.0;
    let count = if fraction <= fitting { ratio.ceil() } else { ratio.floor() };
    count as usize
}

/// [`best_fit`] over the span `[start_distance, end_distance]`.
#[must_use]
pub fn best_fit_between(fitting: f64, mesh_length: f64, start_distance: f64, end_distance: f64) -> usize {
    best_fit(mesh_length, end_distance - start_distance, fitting)
}

/// Owns the profiles and settings, and produces a fresh mesh per call.
#[derive(Debug, Clone)]
pub struct PathMeshGenerator {
    pub profile: IntermediateMesh,
    pub start_cap: CapMesh,
    pub end_cap: CapMesh,
    /// Output submesh per bucket index.
    pub submesh_names: Vec<String>,
    pub options: PathMeshOptions,
}

impl Default for PathMeshGenerator {
    fn default() -> Self {
        Self {
            profile: IntermediateMesh::default(),
            start_cap: CapMesh::default(),
            end_cap: CapMesh::default(),
            submesh_names: vec![DEFAULT_SUBMESH_NAME.to_string()],
            options: PathMeshOptions::default(),
        }
    }
}

impl PathMeshGenerator {
    #[must_use]
    pub fn new(profile: IntermediateMesh) -> Self {
        Self { profile, ..Self::default() }
    }

    /// Sweep the profile (and active caps) along `path`.
    ///
    /// Dirty profiles are rebuilt first. Caps without a source mesh are
    /// skipped. Empty submeshes are left out of the result.
    pub fn generate(
        &mut self,
        path: &impl PathQuery,
    ) -> Result<(GeneratedMesh, PathMeshDiagnostics), PathMeshError> {
        let mut metrics = PathMetrics::default();
        metrics.begin();
        let mut diagnostics = PathMeshDiagnostics::new();

        if self.profile.source().is_none() {
            return Err(PathMeshError::MissingProfile);
        }
        metrics.time(TimingBucket::ProfileRebuild, || {
            self.profile.rebuild_if_dirty();
            self.start_cap.profile.rebuild_if_dirty();
            self.end_cap.profile.rebuild_if_dirty();
        });

        let body = self.profile.data().ok_or(PathMeshError::MissingProfile)?;
        if body.vertices.is_empty() || body.triangle_count() == 0 {
            return Err(PathMeshError::EmptyProfile);
        }
        let start_cap = active_cap(&self.start_cap);
        let end_cap = active_cap(&self.end_cap);

        let length = metrics.time(TimingBucket::ArcLength, || path.length());
        let start_scale = path.scale_at_index(0).z;
        let end_scale = path.scale_at_index(path.point_count().saturating_sub(1)).z;

        let start_distance = start_cap.map_or(0.0, |(cap, enter)| enter * cap.length * start_scale);
        let end_distance = end_cap.map_or(length, |(cap, enter)| length - enter * cap.length * end_scale);
        let span = end_distance - start_distance;

        // Count mode places copies even on empty or inverted spans; past the
        // path ends they are extrapolated along the end tangents.
        let count = match self.options.fitting_type {
            FittingType::Length => {
                if !(span > Tolerance::DEFAULT.eps && body.length > Tolerance::DEFAULT.eps) {
                    return Err(PathMeshError::DegenerateLength { profile_length: body.length, span });
                }
                best_fit(body.length, span, self.options.mesh_fitting)
            }
            FittingType::Count => self.options.count,
        }
        .clamp(1, MAX_REPEAT_COUNT);
        diagnostics.repeat_count = count;

        let names: Vec<String> = if self.submesh_names.is_empty() {
            vec![DEFAULT_SUBMESH_NAME.to_string()]
        } else {
            self.submesh_names.clone()
        };

        let blocks = [
            start_cap.map(|(cap, _)| (cap, start_distance - cap.length * start_scale, start_distance, 1)),
            Some((body, start_distance, end_distance, count)),
            end_cap.map(|(cap, _)| (cap, end_distance, end_distance + cap.length * end_scale, 1)),
        ];
        let mut used_channels = [false; MAX_UV_CHANNELS];
        for (profile, ..) in blocks.iter().flatten() {
            for (used, uvs) in used_channels.iter_mut().zip(&profile.uv_channels) {
                *used |= !uvs.is_empty();
            }
        }

        let mut builder = SweepBuilder {
            path,
            length,
            used_channels,
            mesh: GeneratedMesh::new(),
            buckets: vec![Vec::new(); names.len()],
            diagnostics: &mut diagnostics,
        };
        metrics.time(TimingBucket::Sweep, || {
            for &(profile, start, end, repeat) in blocks.iter().flatten() {
                builder.add_block(profile, start, end, repeat);
            }
        });

        let SweepBuilder { mut mesh, buckets, .. } = builder;
        metrics.time(TimingBucket::Assembly, || {
            mesh.submeshes = names
                .into_iter()
                .zip(buckets)
                .filter(|(_, indices)| !indices.is_empty())
                .map(|(name, indices)| GeneratedSubmesh { name, indices })
                .collect();
        });

        diagnostics.vertex_count = mesh.vertex_count();
        diagnostics.triangle_count = mesh.triangle_count();
        diagnostics.submesh_count = mesh.submesh_count();
        diagnostics.dropped_submesh_count = self.submesh_names.len().max(1) - mesh.submesh_count();
        diagnostics.timing = metrics.end();
        log::debug!("path mesh generated: {diagnostics}");

        Ok((mesh, diagnostics))
    }
}

/// Built profile and enter fraction of a cap that takes part in generation.
fn active_cap(cap: &CapMesh) -> Option<(&ProfileData, f64)> {
    if !cap.is_active_and_valid() {
        return None;
    }
    cap.profile.data().map(|data| (data, cap.enter_percent()))
}

struct SweepBuilder<'a, P: PathQuery> {
    path: &'a P,
    length: f64,
    used_channels: [bool; MAX_UV_CHANNELS],
    mesh: GeneratedMesh,
    buckets: Vec<Vec<u32>>,
    diagnostics: &'a mut PathMeshDiagnostics,
}

impl<P: PathQuery> SweepBuilder<'_, P> {
    /// Append `count` copies of `profile` spread over `[start, end]`.
    fn add_block(&mut self, profile: &ProfileData, start: f64, end: f64, count: usize) {
        let block_length = (end - start) / count as f64;
        // Flat profiles (zero sweep extent) sit at the start of their block.
        let multiplier = if profile.length > Tolerance::DEFAULT.eps {
            block_length / profile.length
        } else {
            0.0
        };
        let offset = self.mesh.vertices.len();
        let vertex_count = profile.vertices.len();

        for c in 0..count {
            for (i, vertex) in profile.vertices.iter().enumerate() {
                let distance = c as f64 * block_length + vertex.z * multiplier + start;
                let (frame, rotation) = self.frame_at_distance(distance);
                let normal = profile.normals.get(i).copied().unwrap_or(Vec3::ZERO);
                self.mesh.vertices.push(frame.apply_point(Vec3::new(vertex.x, vertex.y, 0.0)));
                self.mesh.normals.push(rotation * normal);
            }
        }

        for (channel, uvs) in self.mesh.uv_channels.iter_mut().enumerate() {
            if !self.used_channels[channel] {
                continue;
            }
            let source = &profile.uv_channels[channel];
            for _ in 0..count {
                if source.is_empty() {
                    uvs.extend(std::iter::repeat_n(Vec2::ZERO, vertex_count));
                } else {
                    uvs.extend_from_slice(source);
                }
            }
        }

        for (bucket, indices) in profile.buckets.iter().enumerate() {
            if indices.is_empty() {
                continue;
            }
            let target = if bucket < self.buckets.len() {
                bucket
            } else {
                let triangles = indices.len() / 3 * count;
                log::warn!("profile bucket {bucket} has no submesh name, {triangles} triangles go to submesh 0");
                self.diagnostics.remapped_to_default_triangle_count += triangles;
                self.diagnostics
                    .add_warning(format!("bucket {bucket} has no submesh name; routed to submesh 0"));
                0
            };
            for c in 0..count {
                let base = offset + c * vertex_count;
                self.buckets[target].extend(indices.iter().map(|&i| (base + i as usize) as u32));
            }
        }
    }

    /// Frame at `distance`, extended linearly past the ends, and its rotation.
    fn frame_at_distance(&mut self, distance: f64) -> (Transform, Quat) {
        let t = self.path.distance_to_time(distance);
        let mut position = self.path.position_at_time(t);
        let overshoot = if distance < 0.0 {
            distance
        } else if distance > self.length {
            distance - self.length
        } else {
            0.0
        };
        if overshoot != 0.0 {
            position += self.path.tangent_at_time(t).normalize_or_zero() * overshoot;
            self.diagnostics.extrapolated_vertex_count += 1;
        }
        let rotation = self.path.rotation_at_time(t);
        (Transform::from_trs(position, rotation, self.path.scale_at_time(t)), rotation)
    }
}
