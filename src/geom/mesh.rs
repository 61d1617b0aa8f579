use serde::{Deserialize, Serialize};

use super::{Vec2, Vec3};
use super::profile::MAX_UV_CHANNELS;

/// Triangle list of one named output submesh.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratedSubmesh {
    pub name: String,
    pub indices: Vec<u32>,
}

/// Output of path extrusion, rebuilt from scratch on every generation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneratedMesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// `MAX_UV_CHANNELS` channels; each is empty or one entry per vertex.
    pub uv_channels: Vec<Vec<Vec2>>,
    pub submeshes: Vec<GeneratedSubmesh>,
}

/// Packed numeric buffers for hosts that upload straight to a renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshBuffers {
    /// `[x0, y0, z0, x1, ...]`
    pub positions: Vec<f64>,
    pub normals: Vec<f64>,
    /// `[u0, v0, u1, ...]` per channel.
    pub uv_channels: Vec<Vec<f64>>,
    pub submeshes: Vec<GeneratedSubmesh>,
}

impl GeneratedMesh {
    /// Empty mesh with all UV channels allocated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            normals: Vec::new(),
            uv_channels: vec![Vec::new(); MAX_UV_CHANNELS],
            submeshes: Vec::new(),
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.indices.len() / 3).sum()
    }

    #[must_use]
    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    #[must_use]
    pub fn submesh(&self, name: &str) -> Option<&GeneratedSubmesh> {
        self.submeshes.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.vertices.iter().any(|v| !v.is_finite())
    }

    /// Returns true if all vertex indices are within bounds.
    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.vertices.len();
        self.submeshes
            .iter()
            .all(|s| s.indices.iter().all(|&i| (i as usize) < n))
    }

    /// Returns true if every submesh is a triangle list.
    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.submeshes.iter().all(|s| s.indices.len() % 3 == 0)
    }

    /// Returns true if normals and every non-empty UV channel match the vertex count.
    #[must_use]
    pub fn has_valid_attribute_lengths(&self) -> bool {
        let n = self.vertices.len();
        self.normals.len() == n
            && self.uv_channels.iter().all(|uvs| uvs.is_empty() || uvs.len() == n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_triangle_indices() {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if !self.has_valid_attribute_lengths() {
            return Err("mesh attribute buffers do not match vertex count".to_string());
        }
        if self.submeshes.iter().any(|s| s.indices.is_empty()) {
            return Err("mesh contains an empty submesh".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn positions_flat(&self) -> Vec<f64> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    #[must_use]
    pub fn normals_flat(&self) -> Vec<f64> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }

    #[must_use]
    pub fn uvs_flat(&self, channel: usize) -> Vec<f64> {
        self.uv_channels
            .get(channel)
            .map(|uvs| uvs.iter().flat_map(|uv| uv.to_array()).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn to_buffers(&self) -> MeshBuffers {
        MeshBuffers {
            positions: self.positions_flat(),
            normals: self.normals_flat(),
            uv_channels: (0..self.uv_channels.len()).map(|c| self.uvs_flat(c)).collect(),
            submeshes: self.submeshes.clone(),
        }
    }
}
