//! Twist-minimizing up vectors ("smart up") by double reflection.
//!
//! The frame of each control point is transported from its predecessor by
//! reflecting through the chord and then through the bisector of the
//! reflected and actual tangents. On looping paths the residual twist at the
//! seam is spread evenly over the points as a roll adjustment.

use super::{ControlPoint, CubicSegment, Quat, SegmentIndexer, Vec3};

/// Result of a full frame pass over the path.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameField {
    /// Smart up vector per control point.
    pub smart_up: Vec<Vec3>,
    /// Degrees of roll added per point index (non-zero only for loops).
    pub roll_adjustment_per_index: f64,
}

/// Up vector of the first point: world up expressed in the frame looking along `tangent`.
#[must_use]
pub fn initial_up(tangent: Vec3) -> Vec3 {
    Quat::look_rotation(tangent.normalize_or_zero(), Vec3::Y) * Vec3::Y
}

/// Carry `prev_up` from the frame at `prev_position` to the one at `position`.
///
/// Tangents are expected normalized. A degenerate chord or bisector makes the
/// corresponding reflection the identity.
#[must_use]
pub fn transport_up(
    position: Vec3,
    prev_position: Vec3,
    tangent: Vec3,
    prev_tangent: Vec3,
    prev_up: Vec3,
) -> Vec3 {
    let chord = (position - prev_position).normalize_or_zero();
    let reflected_tangent = prev_tangent.reflect(chord);
    let reflected_up = prev_up.reflect(chord);
    let bisector = (tangent - reflected_tangent).normalize_or_zero();
    reflected_up.reflect(bisector)
}

/// Rotate `up` by `roll_degrees` around `tangent`.
#[must_use]
pub fn apply_roll(up: Vec3, tangent: Vec3, roll_degrees: f64) -> Vec3 {
    Quat::from_axis_angle_degrees(tangent.normalize_or_zero(), roll_degrees) * up
}

/// Index tangent: out tangent relative to the point.
#[must_use]
pub fn index_tangent(point: &ControlPoint) -> Vec3 {
    point.out_tangent_offset()
}

/// Propagate smart up vectors over all points and compute the loop correction.
#[must_use]
pub fn propagate(points: &[ControlPoint], looping: bool) -> FrameField {
    let Some(first) = points.first() else {
        return FrameField { smart_up: Vec::new(), roll_adjustment_per_index: 0.0 };
    };

    let mut smart_up = Vec::with_capacity(points.len());
    let mut prev_up = initial_up(index_tangent(first));
    smart_up.push(prev_up);

    for pair in points.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);
        let up = transport_up(
            current.position,
            prev.position,
            index_tangent(current).normalize_or_zero(),
            index_tangent(prev).normalize_or_zero(),
            prev_up,
        );
        smart_up.push(up);
        prev_up = up;
    }

    let roll_adjustment_per_index = if looping {
        loop_closure_angle(points, &smart_up) / points.len() as f64
    } else {
        0.0
    };

    log::trace!(
        "frame pass: {} points, roll adjustment {roll_adjustment_per_index:.6}°",
        points.len()
    );

    FrameField { smart_up, roll_adjustment_per_index }
}

/// Negated twist between the first frame and the frame implied at `t = 1`.
fn loop_closure_angle(points: &[ControlPoint], smart_up: &[Vec3]) -> f64 {
    let indexer = SegmentIndexer::new(points.len(), true);
    let end = indexer.remap_time(1.0);
    let segment = CubicSegment::between(&points[end.index], &points[end.next]);
    let end_position = segment.position(end.local_t);
    let end_tangent = segment.derivative(end.local_t).normalize_or_zero();

    let last = indexer.last();
    let implied_up = transport_up(
        end_position,
        points[last].position,
        end_tangent,
        index_tangent(&points[last]).normalize_or_zero(),
        smart_up[last],
    );
    -smart_up[0].signed_angle_degrees(implied_up, end_tangent)
}
