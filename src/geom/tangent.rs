//! Automatic tangent placement and tangent connection constraints.

use super::{ConnectionType, ControlPoint, CurveType, SegmentIndexer, Vec3};

/// Offset used to synthesize the virtual neighbours of open path ends.
pub const VIRTUAL_POINT_EPSILON: f64 = 0.001;

/// Exponent of the chord-length parameterization used by [`refit_bezier`].
/// Zero gives uniform Catmull-Rom tangents.
const REFIT_ALPHA: f64 = 0.0;

/// Tangent one third of the way from `point` towards `other`.
#[must_use]
pub fn linear_tangent(point: Vec3, other: Vec3) -> Vec3 {
    point + (other - point) / 3.0
}

/// Fit the inner Bezier handles of the span `p1 → p2` from its neighbours.
///
/// Returns `(out tangent of p1, in tangent of p2)`.
#[must_use]
pub fn refit_bezier(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> (Vec3, Vec3) {
    let d1 = (p1 - p0).length().powf(REFIT_ALPHA);
    let d2 = (p2 - p1).length().powf(REFIT_ALPHA);
    let d3 = (p3 - p2).length().powf(REFIT_ALPHA);

    let out_tangent = (p2 * (d1 * d1) - p0 * (d2 * d2)
        + p1 * (2.0 * d1 * d1 + 3.0 * d1 * d2 + d2 * d2))
        / (3.0 * d1 * (d1 + d2));
    let in_tangent = (p1 * (d3 * d3) - p3 * (d2 * d2)
        + p2 * (2.0 * d3 * d3 + 3.0 * d3 * d2 + d2 * d2))
        / (3.0 * d3 * (d3 + d2));

    (out_tangent, in_tangent)
}

/// Re-derive every Auto and Linear tangent of the path.
///
/// Free tangents are never written. Running this twice without edits in
/// between leaves the points unchanged.
pub fn update_auto_and_linear(points: &mut [ControlPoint], looping: bool) {
    let indexer = SegmentIndexer::new(points.len(), looping);
    for segment in 0..indexer.segment_count() {
        fit_auto_segment(points, indexer, segment);
        fit_linear_segment(points, indexer, segment);
    }
}

fn fit_auto_segment(points: &mut [ControlPoint], indexer: SegmentIndexer, segment: usize) {
    let i1 = segment;
    let i2 = indexer.next(i1);
    let out_auto = points[i1].out_tangent.curve_type == CurveType::Auto;
    let in_auto = points[i2].in_tangent.curve_type == CurveType::Auto;
    if !out_auto && !in_auto {
        return;
    }

    let i0 = indexer.prev(i1);
    let i3 = indexer.next(i2);
    let p1 = points[i1].position;
    let p2 = points[i2].position;

    let p0 = if i1 == 0 && !indexer.looping {
        p1 - (p1 + p2) * VIRTUAL_POINT_EPSILON
    } else {
        points[i0].position
    };
    let p3 = if i2 == indexer.last() && !indexer.looping {
        p2 + (p1 + p2) * VIRTUAL_POINT_EPSILON
    } else {
        points[i3].position
    };

    let (out_tangent, in_tangent) = refit_bezier(p0, p1, p2, p3);
    if out_auto {
        points[i1].out_tangent.position = out_tangent;
    }
    if in_auto {
        points[i2].in_tangent.position = in_tangent;
    }
}

fn fit_linear_segment(points: &mut [ControlPoint], indexer: SegmentIndexer, segment: usize) {
    let i0 = segment;
    let i1 = indexer.next(i0);
    let p0 = points[i0].position;
    let p1 = points[i1].position;
    if points[i0].out_tangent.curve_type == CurveType::Linear {
        points[i0].out_tangent.position = linear_tangent(p0, p1);
    }
    if points[i1].in_tangent.curve_type == CurveType::Linear {
        points[i1].in_tangent.position = linear_tangent(p1, p0);
    }
}

/// Re-place the tangent opposite to an edited one.
///
/// With `adjust_out_to_in` the out tangent follows the in tangent, otherwise
/// the in tangent follows the out tangent. The adjusted tangent becomes Free.
/// Mirrored reflects the edited handle through the point; Connected keeps the
/// adjusted handle's length and only takes the mirrored direction. Broken
/// points are left alone.
pub fn apply_connection(point: &mut ControlPoint, adjust_out_to_in: bool) {
    let (edited, mut target) = if adjust_out_to_in {
        (point.in_tangent, point.out_tangent)
    } else {
        (point.out_tangent, point.in_tangent)
    };
    let mirrored = point.position - edited.position;

    match point.connection_type {
        ConnectionType::Broken => return,
        ConnectionType::Mirrored => {
            target.position = point.position + mirrored;
        }
        ConnectionType::Connected => {
            if let Some(direction) = mirrored.normalized() {
                let length = (target.position - point.position).length();
                target.position = point.position + direction * length;
            }
        }
    }
    target.curve_type = CurveType::Free;

    if adjust_out_to_in {
        point.out_tangent = target;
    } else {
        point.in_tangent = target;
    }
}
