//! Diagnostics returned alongside a generated path mesh.
//!
//! Generation never fails on ordinary authoring edge cases; instead it
//! normalizes them and records what happened here:
//!
//! - triangles routed to a bucket with no submesh name fall back to the first submesh
//! - vertices past either end of an open path are extrapolated along the end tangent
//! - buckets that received no triangles are dropped from the output
//!
//! ```ignore
//! let (mesh, diagnostics) = generator.generate(&path)?;
//! for warning in &diagnostics.warnings {
//!     log::warn!("{warning}");
//! }
//! ```

use std::fmt;

use super::metrics::PathTimingReport;

/// Counts and warnings collected during one call to
/// [`PathMeshGenerator::generate`](super::PathMeshGenerator::generate).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PathMeshDiagnostics {
    /// Total number of vertices in the generated mesh.
    pub vertex_count: usize,

    /// Total number of triangles across all submeshes.
    pub triangle_count: usize,

    /// Number of submeshes in the output (non-empty buckets only).
    pub submesh_count: usize,

    /// Named submeshes that received no triangles and were dropped.
    pub dropped_submesh_count: usize,

    /// Number of body repetitions along the path, after clamping.
    pub repeat_count: usize,

    /// Vertices placed beyond the start or end of the path.
    ///
    /// These are extended linearly along the boundary tangent; caps normally
    /// account for all of them.
    pub extrapolated_vertex_count: usize,

    /// Triangles whose bucket had no matching submesh name and were sent to
    /// the first submesh instead.
    pub remapped_to_default_triangle_count: usize,

    /// Optional timing breakdown.
    ///
    /// Only populated when the `path_metrics` feature is enabled
    /// and the target is not WASM.
    pub timing: Option<PathTimingReport>,

    /// Human-readable warnings about normalized edge cases.
    pub warnings: Vec<String>,
}

impl PathMeshDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no edge case had to be normalized.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.remapped_to_default_triangle_count == 0 && self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

impl fmt::Display for PathMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} triangles in {} submeshes ({} dropped), {} repeats",
            self.vertex_count,
            self.triangle_count,
            self.submesh_count,
            self.dropped_submesh_count,
            self.repeat_count
        )?;
        if self.extrapolated_vertex_count > 0 {
            write!(f, ", {} extrapolated vertices", self.extrapolated_vertex_count)?;
        }
        if !self.warnings.is_empty() {
            write!(f, ", {} warnings", self.warnings.len())?;
        }
        Ok(())
    }
}
