//! Cross-section profiles for path extrusion.
//!
//! A [`SourceMesh`] is re-based into sweep-local coordinates by
//! [`IntermediateMesh`]: the chosen forward axis becomes +Z, the mesh is
//! shifted so Z spans `[0, length]`, and source submeshes are routed into
//! target buckets through a remap table.

use serde::{Deserialize, Serialize};

use super::{BBox, Vec2, Vec3};

/// Texture coordinate channels carried through extrusion.
pub const MAX_UV_CHANNELS: usize = 8;

/// Source axis that becomes the sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            _ => None,
        }
    }

    #[must_use]
    pub const fn component(self, v: Vec3) -> f64 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }

    /// Rotate `v` so this axis lands on +Z.
    #[must_use]
    pub const fn to_sweep_space(self, v: Vec3) -> Vec3 {
        match self {
            Self::X => Vec3::new(-v.z, v.y, v.x),
            Self::Y => Vec3::new(v.x, -v.z, v.y),
            Self::Z => v,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("profile mesh has {count} uv channels, at most {MAX_UV_CHANNELS} are supported")]
    TooManyUvChannels { count: usize },
    #[error("submesh {submesh} index count {len} is not a multiple of 3")]
    IncompleteTriangle { submesh: usize, len: usize },
    #[error("submesh {submesh} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfBounds { submesh: usize, index: u32, vertex_count: usize },
    #[error("{attribute} has {len} entries, expected 0 or {vertex_count}")]
    AttributeLengthMismatch { attribute: &'static str, len: usize, vertex_count: usize },
    #[error("profile mesh vertex {index} is not finite")]
    NonFiniteVertex { index: usize },
}

/// Mesh handed over by the host, in its own coordinate frame.
///
/// `normals` and each UV channel are either empty or one entry per vertex.
/// Each submesh is a triangle list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMesh {
    pub vertices: Vec<Vec3>,
    #[serde(default)]
    pub normals: Vec<Vec3>,
    #[serde(default)]
    pub uv_channels: Vec<Vec<Vec2>>,
    pub submeshes: Vec<Vec<u32>>,
}

impl SourceMesh {
    pub fn validate(&self) -> Result<(), ProfileError> {
        let vertex_count = self.vertices.len();
        if self.uv_channels.len() > MAX_UV_CHANNELS {
            return Err(ProfileError::TooManyUvChannels { count: self.uv_channels.len() });
        }
        if !self.normals.is_empty() && self.normals.len() != vertex_count {
            return Err(ProfileError::AttributeLengthMismatch {
                attribute: "normals",
                len: self.normals.len(),
                vertex_count,
            });
        }
        if let Some(channel) = self
            .uv_channels
            .iter()
            .find(|uvs| !uvs.is_empty() && uvs.len() != vertex_count)
        {
            return Err(ProfileError::AttributeLengthMismatch {
                attribute: "uv channel",
                len: channel.len(),
                vertex_count,
            });
        }
        if let Some(index) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(ProfileError::NonFiniteVertex { index });
        }
        for (submesh, indices) in self.submeshes.iter().enumerate() {
            if indices.len() % 3 != 0 {
                return Err(ProfileError::IncompleteTriangle { submesh, len: indices.len() });
            }
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(ProfileError::IndexOutOfBounds { submesh, index, vertex_count });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.len() / 3).sum()
    }

    #[must_use]
    pub fn bounds(&self) -> Option<BBox> {
        BBox::from_points(&self.vertices)
    }
}

/// Profile geometry in sweep space, ready for extrusion.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileData {
    /// Extent along the sweep axis.
    pub length: f64,
    /// Vertices with Z in `[0, length]`.
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Always `MAX_UV_CHANNELS` entries; absent channels are empty.
    pub uv_channels: Vec<Vec<Vec2>>,
    /// Triangle lists per target bucket.
    pub buckets: Vec<Vec<u32>>,
}

impl ProfileData {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.buckets.iter().map(|b| b.len() / 3).sum()
    }
}

/// A source mesh plus the settings that map it into sweep space.
///
/// Changing any setting discards the cached [`ProfileData`];
/// [`rebuild_if_dirty`](Self::rebuild_if_dirty) recomputes it.
#[derive(Debug, Clone)]
pub struct IntermediateMesh {
    forward_axis: Axis,
    flip: bool,
    remapped_submesh_indices: Vec<usize>,
    source: Option<SourceMesh>,
    data: Option<ProfileData>,
}

impl Default for IntermediateMesh {
    fn default() -> Self {
        Self {
            forward_axis: Axis::Z,
            flip: false,
            remapped_submesh_indices: vec![0],
            source: None,
            data: None,
        }
    }
}

impl IntermediateMesh {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Profile from a validated source mesh with default settings.
    pub fn from_source(source: SourceMesh) -> Result<Self, ProfileError> {
        let mut profile = Self::default();
        profile.set_source(Some(source))?;
        Ok(profile)
    }

    #[must_use]
    pub fn source(&self) -> Option<&SourceMesh> {
        self.source.as_ref()
    }

    /// Replace the source mesh. The remap table is resized to its submesh count.
    pub fn set_source(&mut self, source: Option<SourceMesh>) -> Result<(), ProfileError> {
        if let Some(mesh) = &source {
            mesh.validate()?;
        }
        self.source = source;
        self.data = None;
        self.check_submesh_indices();
        Ok(())
    }

    #[must_use]
    pub const fn forward_axis(&self) -> Axis {
        self.forward_axis
    }

    pub fn set_forward_axis(&mut self, axis: Axis) {
        self.forward_axis = axis;
        self.data = None;
    }

    #[must_use]
    pub const fn flip(&self) -> bool {
        self.flip
    }

    pub fn set_flip(&mut self, flip: bool) {
        self.flip = flip;
        self.data = None;
    }

    /// Target bucket per source submesh.
    #[must_use]
    pub fn remapped_submesh_indices(&self) -> &[usize] {
        &self.remapped_submesh_indices
    }

    /// Replace the remap table; it is then fitted to the source submesh count.
    pub fn set_remapped_submesh_indices(&mut self, indices: Vec<usize>) {
        self.remapped_submesh_indices = indices;
        self.check_submesh_indices();
        self.data = None;
    }

    /// Route source submesh `submesh` into bucket `target`.
    pub fn set_remapped_submesh_index(&mut self, submesh: usize, target: usize) {
        self.remapped_submesh_indices[submesh] = target;
        self.data = None;
    }

    /// Fit the remap table to the source: keep existing entries, pad with 0.
    /// Without a source the table is `[0]`.
    pub fn check_submesh_indices(&mut self) {
        match &self.source {
            None => self.remapped_submesh_indices = vec![0],
            Some(mesh) => self.remapped_submesh_indices.resize(mesh.submeshes.len(), 0),
        }
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.data.is_none()
    }

    pub fn mark_dirty(&mut self) {
        self.data = None;
    }

    /// Cached sweep-space data, if it has been built since the last change.
    #[must_use]
    pub fn data(&self) -> Option<&ProfileData> {
        self.data.as_ref()
    }

    /// Sweep length of the built profile, 0 when not built.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.data.as_ref().map_or(0.0, |d| d.length)
    }

    fn remapped_index(&self, submesh: usize) -> usize {
        self.remapped_submesh_indices.get(submesh).copied().unwrap_or(submesh)
    }

    /// Rebuild the sweep-space data when a setting changed.
    ///
    /// Returns `None` without a source mesh.
    pub fn rebuild_if_dirty(&mut self) -> Option<&ProfileData> {
        if self.data.is_none() {
            let source = self.source.as_ref()?;
            let data = self.build(source);
            log::debug!(
                "profile rebuilt: {} vertices, {} buckets, length {:.6}",
                data.vertices.len(),
                data.buckets.len(),
                data.length
            );
            self.data = Some(data);
        }
        self.data.as_ref()
    }

    fn build(&self, source: &SourceMesh) -> ProfileData {
        let axis = self.forward_axis;
        let (length, center) = source
            .bounds()
            .map_or((0.0, 0.0), |b| (axis.component(b.size()), axis.component(b.center())));
        let offset = length / 2.0 - center;

        let vertices = source
            .vertices
            .iter()
            .map(|&v| {
                let mut v = axis.to_sweep_space(v);
                v.z += offset;
                if self.flip {
                    v.z = length - v.z;
                }
                v
            })
            .collect();

        let normals = source
            .normals
            .iter()
            .map(|&n| {
                let mut n = axis.to_sweep_space(n);
                if self.flip {
                    n.z = -n.z;
                }
                n
            })
            .collect();

        let mut uv_channels = source.uv_channels.clone();
        uv_channels.resize(MAX_UV_CHANNELS, Vec::new());

        let bucket_count = (0..source.submeshes.len())
            .map(|i| self.remapped_index(i))
            .chain(self.remapped_submesh_indices.iter().copied())
            .max()
            .map_or(1, |max| max + 1);
        let mut buckets = vec![Vec::new(); bucket_count];
        for (i, indices) in source.submeshes.iter().enumerate() {
            let bucket = &mut buckets[self.remapped_index(i)];
            if self.flip {
                for tri in indices.chunks_exact(3) {
                    bucket.extend_from_slice(&[tri[1], tri[0], tri[2]]);
                }
            } else {
                bucket.extend_from_slice(indices);
            }
        }

        ProfileData { length, vertices, normals, uv_channels, buckets }
    }
}

/// Optional end piece swept once at either end of the path.
#[derive(Debug, Clone, Default)]
pub struct CapMesh {
    pub active: bool,
    pub profile: IntermediateMesh,
    /// Fraction of the cap length that overlaps the path, in `[0, 1]`.
    enter_percent: f64,
}

impl CapMesh {
    #[must_use]
    pub fn new(profile: IntermediateMesh) -> Self {
        Self { active: true, profile, enter_percent: 0.0 }
    }

    #[must_use]
    pub const fn enter_percent(&self) -> f64 {
        self.enter_percent
    }

    pub fn set_enter_percent(&mut self, percent: f64) {
        self.enter_percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 1.0) };
    }

    /// Active with a source mesh to sweep.
    #[must_use]
    pub fn is_active_and_valid(&self) -> bool {
        self.active && self.profile.source().is_some()
    }
}
