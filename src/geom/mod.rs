mod arc_length;
mod attachment;
mod core;
mod diagnostics;
mod frame;
mod mesh;
mod metrics;
mod path;
mod path_mesh;
mod point;
mod profile;
mod query;
mod segment;
mod tangent;

pub use arc_length::{ARC_LENGTH_STEPS, ArcLengthTable, PositionSamples, RAY_SAMPLE_COUNT};
pub use attachment::{AttachmentPose, MeasurementUnit, PathAttachment};
pub use core::{BBox, Quat, Tolerance, Transform, Vec2, Vec3};
pub use diagnostics::PathMeshDiagnostics;
pub use frame::{FrameField, apply_roll, initial_up, propagate, transport_up};
pub use mesh::{GeneratedMesh, GeneratedSubmesh, MeshBuffers};
pub use metrics::{PathMetrics, PathTimingReport, TimingBucket};
pub use path::{BezierPath, PathError};
pub use path_mesh::{
    DEFAULT_SUBMESH_NAME, FittingType, MAX_REPEAT_COUNT, PathMeshError, PathMeshGenerator,
    PathMeshOptions, best_fit, best_fit_between,
};
pub use point::{ConnectionType, ControlPoint, CurveType, ScaleInputType, TangentHandle};
pub use profile::{
    Axis, CapMesh, IntermediateMesh, MAX_UV_CHANNELS, ProfileData, ProfileError, SourceMesh,
};
pub use query::{PathQuery, PathSample, RAY_REFINE_ITERATIONS};
pub use segment::{CubicSegment, SegmentIndexer, SegmentTime};
pub use tangent::{
    VIRTUAL_POINT_EPSILON, apply_connection, linear_tangent, refit_bezier, update_auto_and_linear,
};

#[cfg(test)]
mod tests;
