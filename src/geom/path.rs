//! The editable Bezier path: control points, path-wide settings and derived state.
//!
//! Every geometry mutation re-derives Auto/Linear tangents, reruns the frame
//! pass and drops the arc-length and sample caches. Metadata mutations (roll,
//! scale) touch none of these.

use std::cell::OnceCell;

use super::arc_length::{ArcLengthTable, PositionSamples};
use super::frame;
use super::tangent::{apply_connection, update_auto_and_linear};
use super::{ConnectionType, ControlPoint, CurveType, ScaleInputType, SegmentIndexer, Vec3};

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("a path requires at least one control point")]
    NoPoints,
    #[error("control point {index} has a non-finite position or tangent")]
    NonFinitePoint { index: usize },
}

/// Cubic Bezier path in local space.
#[derive(Debug, Clone)]
pub struct BezierPath {
    pub(super) points: Vec<ControlPoint>,
    pub(super) looping: bool,
    pub(super) path_roll: f64,
    pub(super) path_scale: Vec3,
    pub(super) scale_input_type: ScaleInputType,
    pub(super) roll_adjustment_per_index: f64,
    arc_length: OnceCell<ArcLengthTable>,
    samples: OnceCell<PositionSamples>,
}

impl Default for BezierPath {
    /// Open two-point path from the origin to `(1, 0, 0)`.
    fn default() -> Self {
        let mut path = Self::empty(vec![
            ControlPoint::new(Vec3::ZERO),
            ControlPoint::new(Vec3::X),
        ]);
        path.geometry_changed();
        path
    }
}

impl BezierPath {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from existing control points.
    ///
    /// Auto and Linear tangents are re-derived; Free tangents are kept as given.
    pub fn from_points(points: Vec<ControlPoint>, looping: bool) -> Result<Self, PathError> {
        validate_points(&points)?;
        let mut path = Self::empty(points);
        path.looping = looping;
        path.geometry_changed();
        Ok(path)
    }

    fn empty(points: Vec<ControlPoint>) -> Self {
        Self {
            points,
            looping: false,
            path_roll: 0.0,
            path_scale: Vec3::ONE,
            scale_input_type: ScaleInputType::Float,
            roll_adjustment_per_index: 0.0,
            arc_length: OnceCell::new(),
            samples: OnceCell::new(),
        }
    }

    /// Replace every control point, keeping the path settings.
    pub fn set_points(&mut self, points: Vec<ControlPoint>) -> Result<(), PathError> {
        validate_points(&points)?;
        self.points = points;
        self.geometry_changed();
        Ok(())
    }

    // ───── accessors ─────

    #[must_use]
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    #[must_use]
    pub fn point(&self, index: usize) -> &ControlPoint {
        &self.points[index]
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.indexer().segment_count()
    }

    #[must_use]
    pub fn indexer(&self) -> SegmentIndexer {
        SegmentIndexer::new(self.points.len(), self.looping)
    }

    #[must_use]
    pub const fn is_looping(&self) -> bool {
        self.looping
    }

    #[must_use]
    pub const fn path_roll(&self) -> f64 {
        self.path_roll
    }

    #[must_use]
    pub const fn path_scale(&self) -> Vec3 {
        self.path_scale
    }

    #[must_use]
    pub const fn scale_input_type(&self) -> ScaleInputType {
        self.scale_input_type
    }

    /// Loop-closure roll in degrees added per point index.
    #[must_use]
    pub const fn roll_adjustment_per_index(&self) -> f64 {
        self.roll_adjustment_per_index
    }

    // ───── point set ─────

    /// Append a point one unit past the last point along its out tangent.
    pub fn add_point(&mut self) {
        let last = &self.points[self.points.len() - 1];
        let direction = last.out_tangent_offset().normalized().unwrap_or(Vec3::X);
        let position = last.position + direction;
        self.add_point_at(position);
    }

    pub fn add_point_at(&mut self, position: Vec3) {
        self.points.push(ControlPoint::new(position));
        self.geometry_changed();
    }

    /// Split the segment containing `t` with a new point at `position_at_time(t)`.
    ///
    /// Returns the index of the inserted point, which always directly follows
    /// the segment's first point.
    pub fn insert_point_at_time(&mut self, t: f64) -> usize {
        let position = self.position_at_time(t);
        let index = self.indexer().remap_time(t).index + 1;
        self.points.insert(index, ControlPoint::new(position));
        self.geometry_changed();
        index
    }

    /// # Panics
    ///
    /// Panics when `index` is out of range or the path would become empty.
    pub fn remove_point_at(&mut self, index: usize) {
        assert!(self.points.len() > 1, "cannot remove the last remaining control point");
        self.points.remove(index);
        self.geometry_changed();
    }

    /// # Panics
    ///
    /// Panics when only one point remains.
    pub fn remove_last_point(&mut self) {
        self.remove_point_at(self.points.len() - 1);
    }

    /// Move a point, translating both tangents by the same delta.
    pub fn set_position(&mut self, index: usize, position: Vec3) {
        self.points[index].translate_to(position);
        self.geometry_changed();
    }

    /// Place the in tangent; it becomes Free and the out tangent follows the
    /// connection constraint.
    pub fn set_in_tangent_position(&mut self, index: usize, position: Vec3) {
        let point = &mut self.points[index];
        point.in_tangent.position = position;
        point.in_tangent.curve_type = CurveType::Free;
        apply_connection(point, true);
        self.geometry_changed();
    }

    /// Place the out tangent; it becomes Free and the in tangent follows the
    /// connection constraint.
    pub fn set_out_tangent_position(&mut self, index: usize, position: Vec3) {
        let point = &mut self.points[index];
        point.out_tangent.position = position;
        point.out_tangent.curve_type = CurveType::Free;
        apply_connection(point, false);
        self.geometry_changed();
    }

    pub fn set_in_curve_type(&mut self, index: usize, curve_type: CurveType) {
        self.points[index].in_tangent.curve_type = curve_type;
        self.geometry_changed();
    }

    pub fn set_out_curve_type(&mut self, index: usize, curve_type: CurveType) {
        self.points[index].out_tangent.curve_type = curve_type;
        self.geometry_changed();
    }

    /// Change the constraint between a point's tangents.
    ///
    /// When both tangents are Free and the type is not Broken, the constraint
    /// is applied right away; `adjust_out_to_in` picks which tangent moves.
    pub fn set_connection_type(
        &mut self,
        index: usize,
        connection_type: ConnectionType,
        adjust_out_to_in: bool,
    ) {
        let point = &mut self.points[index];
        point.connection_type = connection_type;
        if connection_type != ConnectionType::Broken && point.tangents_free() {
            apply_connection(point, adjust_out_to_in);
            self.geometry_changed();
        }
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        self.geometry_changed();
    }

    // ───── metadata ─────

    /// Per-point roll in degrees.
    pub fn set_roll(&mut self, index: usize, degrees: f64) {
        self.points[index].roll = degrees;
    }

    /// Per-point scale, normalized under the current scale input type.
    pub fn set_scale(&mut self, index: usize, scale: Vec3) {
        self.points[index].scale = self.scale_input_type.normalize(scale);
    }

    /// Path-wide roll in degrees, clamped to `[-180, 180]`.
    pub fn set_path_roll(&mut self, degrees: f64) {
        self.path_roll = degrees.clamp(-180.0, 180.0);
    }

    pub fn set_path_scale(&mut self, scale: Vec3) {
        self.path_scale = self.scale_input_type.normalize(scale);
    }

    /// Switch the scale input type and re-normalize every scale under it.
    pub fn set_scale_input_type(&mut self, scale_input_type: ScaleInputType) {
        self.scale_input_type = scale_input_type;
        self.path_scale = scale_input_type.normalize(self.path_scale);
        for point in &mut self.points {
            point.scale = scale_input_type.normalize(point.scale);
        }
    }

    /// Zero the path roll and every point roll.
    pub fn reset_roll(&mut self) {
        self.path_roll = 0.0;
        for point in &mut self.points {
            point.roll = 0.0;
        }
    }

    /// Reset the path scale and every point scale to one.
    pub fn reset_scale(&mut self) {
        self.path_scale = Vec3::ONE;
        for point in &mut self.points {
            point.scale = Vec3::ONE;
        }
    }

    // ───── derived state ─────

    fn geometry_changed(&mut self) {
        update_auto_and_linear(&mut self.points, self.looping);

        let field = frame::propagate(&self.points, self.looping);
        for (point, up) in self.points.iter_mut().zip(field.smart_up) {
            point.smart_up_vector = up;
        }
        self.roll_adjustment_per_index = field.roll_adjustment_per_index;

        self.arc_length = OnceCell::new();
        self.samples = OnceCell::new();
    }

    pub(super) fn arc_length_table(&self) -> &ArcLengthTable {
        self.arc_length
            .get_or_init(|| ArcLengthTable::build(|t| self.position_at_time(t)))
    }

    pub(super) fn position_samples(&self) -> &PositionSamples {
        self.samples
            .get_or_init(|| PositionSamples::build(|t| self.position_at_time(t)))
    }
}

fn validate_points(points: &[ControlPoint]) -> Result<(), PathError> {
    if points.is_empty() {
        return Err(PathError::NoPoints);
    }
    if let Some(index) = points.iter().position(|p| {
        !(p.position.is_finite() && p.in_tangent.position.is_finite() && p.out_tangent.position.is_finite())
    }) {
        return Err(PathError::NonFinitePoint { index });
    }
    Ok(())
}
