//! Continuous queries on a [`BezierPath`]: by time, by distance and by index.
//!
//! Time is the global parameter in `[0, 1]`, split evenly over the segments.
//! Distance is arc length from the first point, mapped to time through the
//! arc-length table.

use serde::{Deserialize, Serialize};

use super::frame::{apply_roll, index_tangent, transport_up};
use super::{BezierPath, CubicSegment, Quat, SegmentTime, Transform, Vec3};

/// Bisection steps used to refine [`BezierPath::closest_time_to_ray`].
pub const RAY_REFINE_ITERATIONS: usize = 10;

/// Read-only path surface consumed by mesh generation and attachments.
pub trait PathQuery {
    fn point_count(&self) -> usize;
    fn length(&self) -> f64;
    fn distance_to_time(&self, distance: f64) -> f64;
    fn position_at_time(&self, t: f64) -> Vec3;
    fn tangent_at_time(&self, t: f64) -> Vec3;
    fn rotation_at_time(&self, t: f64) -> Quat;
    fn scale_at_time(&self, t: f64) -> Vec3;
    /// Authored scale of a single point, without the path scale.
    fn scale_at_index(&self, index: usize) -> Vec3;
}

/// Everything the path knows about one parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    pub time: f64,
    pub position: Vec3,
    pub tangent: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub forward: Vec3,
    pub rotation: Quat,
    pub roll: f64,
    pub scale: Vec3,
}

impl BezierPath {
    fn segment_at(&self, t: f64) -> (SegmentTime, CubicSegment) {
        let time = self.indexer().remap_time(t);
        let segment = CubicSegment::between(&self.points[time.index], &self.points[time.next]);
        (time, segment)
    }

    // ───── by time ─────

    #[must_use]
    pub fn position_at_time(&self, t: f64) -> Vec3 {
        let (time, segment) = self.segment_at(t);
        segment.position(time.local_t)
    }

    /// Unnormalized derivative of the segment containing `t`.
    #[must_use]
    pub fn tangent_at_time(&self, t: f64) -> Vec3 {
        let (time, segment) = self.segment_at(t);
        segment.derivative(time.local_t)
    }

    /// Up vector transported from the segment's first point, then rolled.
    #[must_use]
    pub fn up_vector_at_time(&self, t: f64) -> Vec3 {
        let (time, segment) = self.segment_at(t);
        let position = segment.position(time.local_t);
        let tangent = segment.derivative(time.local_t).normalize_or_zero();
        let first = &self.points[time.index];
        let up = transport_up(
            position,
            first.position,
            tangent,
            index_tangent(first).normalize_or_zero(),
            first.smart_up_vector,
        );
        apply_roll(up, tangent, self.roll_at_time(t))
    }

    #[must_use]
    pub fn right_vector_at_time(&self, t: f64) -> Vec3 {
        self.forward_vector_at_time(t).cross(self.up_vector_at_time(t))
    }

    #[must_use]
    pub fn forward_vector_at_time(&self, t: f64) -> Vec3 {
        self.tangent_at_time(t).normalize_or_zero()
    }

    #[must_use]
    pub fn rotation_at_time(&self, t: f64) -> Quat {
        Quat::look_rotation(self.tangent_at_time(t), self.up_vector_at_time(t))
    }

    /// Roll in degrees, interpolated across the segment.
    ///
    /// Interpolating into point 0 of a loop adds the full loop correction so
    /// the roll keeps increasing across the seam.
    #[must_use]
    pub fn roll_at_time(&self, t: f64) -> f64 {
        let time = self.indexer().remap_time(t);
        let start = self.roll_at_index(time.index);
        let mut end = self.roll_at_index(time.next);
        if time.next == 0 {
            end += self.roll_adjustment_per_index * self.points.len() as f64;
        }
        start + (end - start) * time.local_t
    }

    #[must_use]
    pub fn scale_at_time(&self, t: f64) -> Vec3 {
        let time = self.indexer().remap_time(t);
        let start = self.points[time.index].scale;
        let end = self.points[time.next].scale;
        self.path_scale.mul_elem(start.lerp(end, time.local_t))
    }

    /// Translation, rotation and scale at `t` as one transform.
    #[must_use]
    pub fn matrix_at_time(&self, t: f64) -> Transform {
        Transform::from_trs(
            self.position_at_time(t),
            self.rotation_at_time(t),
            self.scale_at_time(t),
        )
    }

    #[must_use]
    pub fn sample_at_time(&self, t: f64) -> PathSample {
        let tangent = self.tangent_at_time(t);
        let forward = tangent.normalize_or_zero();
        let up = self.up_vector_at_time(t);
        PathSample {
            time: t.clamp(0.0, 1.0),
            position: self.position_at_time(t),
            tangent,
            up,
            right: forward.cross(up),
            forward,
            rotation: Quat::look_rotation(tangent, up),
            roll: self.roll_at_time(t),
            scale: self.scale_at_time(t),
        }
    }

    // ───── by distance ─────

    #[must_use]
    pub fn position_at_distance(&self, distance: f64) -> Vec3 {
        self.position_at_time(self.distance_to_time(distance))
    }

    #[must_use]
    pub fn tangent_at_distance(&self, distance: f64) -> Vec3 {
        self.tangent_at_time(self.distance_to_time(distance))
    }

    #[must_use]
    pub fn up_vector_at_distance(&self, distance: f64) -> Vec3 {
        self.up_vector_at_time(self.distance_to_time(distance))
    }

    #[must_use]
    pub fn right_vector_at_distance(&self, distance: f64) -> Vec3 {
        self.right_vector_at_time(self.distance_to_time(distance))
    }

    #[must_use]
    pub fn forward_vector_at_distance(&self, distance: f64) -> Vec3 {
        self.forward_vector_at_time(self.distance_to_time(distance))
    }

    #[must_use]
    pub fn rotation_at_distance(&self, distance: f64) -> Quat {
        self.rotation_at_time(self.distance_to_time(distance))
    }

    #[must_use]
    pub fn roll_at_distance(&self, distance: f64) -> f64 {
        self.roll_at_time(self.distance_to_time(distance))
    }

    #[must_use]
    pub fn scale_at_distance(&self, distance: f64) -> Vec3 {
        self.scale_at_time(self.distance_to_time(distance))
    }

    #[must_use]
    pub fn matrix_at_distance(&self, distance: f64) -> Transform {
        self.matrix_at_time(self.distance_to_time(distance))
    }

    #[must_use]
    pub fn sample_at_distance(&self, distance: f64) -> PathSample {
        self.sample_at_time(self.distance_to_time(distance))
    }

    // ───── by index ─────

    #[must_use]
    pub fn position_at_index(&self, index: usize) -> Vec3 {
        self.points[index].position
    }

    #[must_use]
    pub fn in_tangent_position_at_index(&self, index: usize) -> Vec3 {
        self.points[index].in_tangent.position
    }

    #[must_use]
    pub fn out_tangent_position_at_index(&self, index: usize) -> Vec3 {
        self.points[index].out_tangent.position
    }

    /// Out tangent relative to the point.
    #[must_use]
    pub fn tangent_at_index(&self, index: usize) -> Vec3 {
        index_tangent(&self.points[index])
    }

    #[must_use]
    pub fn smart_up_vector_at_index(&self, index: usize) -> Vec3 {
        self.points[index].smart_up_vector
    }

    #[must_use]
    pub fn up_vector_at_index(&self, index: usize) -> Vec3 {
        apply_roll(
            self.points[index].smart_up_vector,
            self.tangent_at_index(index),
            self.roll_at_index(index),
        )
    }

    #[must_use]
    pub fn right_vector_at_index(&self, index: usize) -> Vec3 {
        self.forward_vector_at_index(index).cross(self.up_vector_at_index(index))
    }

    #[must_use]
    pub fn forward_vector_at_index(&self, index: usize) -> Vec3 {
        self.tangent_at_index(index).normalize_or_zero()
    }

    #[must_use]
    pub fn rotation_at_index(&self, index: usize) -> Quat {
        Quat::look_rotation(self.forward_vector_at_index(index), self.up_vector_at_index(index))
    }

    /// Path roll, loop correction and point roll, in degrees.
    #[must_use]
    pub fn roll_at_index(&self, index: usize) -> f64 {
        self.path_roll + self.roll_adjustment_per_index * index as f64 + self.points[index].roll
    }

    #[must_use]
    pub fn scale_at_index(&self, index: usize) -> Vec3 {
        self.points[index].scale
    }

    // ───── arc length ─────

    /// Length of the path, sampled at 100 uniform steps.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.arc_length_table().length()
    }

    #[must_use]
    pub fn distance_to_time(&self, distance: f64) -> f64 {
        self.arc_length_table().distance_to_time(distance)
    }

    #[must_use]
    pub fn time_to_distance(&self, t: f64) -> f64 {
        self.arc_length_table().time_to_distance(t)
    }

    /// Time of the path point closest to the ray `origin + s·direction`.
    ///
    /// Picks the nearest of the cached samples, then bisects between its
    /// neighbours. This is a local search; on self-intersecting or tightly
    /// curved paths it can settle on a point that is not the global optimum.
    #[must_use]
    pub fn closest_time_to_ray(&self, origin: Vec3, direction: Vec3) -> f64 {
        let distance_sq = |p: Vec3| direction.cross(p - origin).length_squared();

        let positions = self.position_samples().positions();
        let best = positions
            .iter()
            .enumerate()
            .map(|(i, &p)| (i, distance_sq(p)))
            .fold((0, f64::MAX), |best, (i, d)| if d < best.1 { (i, d) } else { best });

        let count = positions.len() as f64;
        let mut t0 = (best.0 as f64 - 1.0) / count;
        let mut t1 = (best.0 as f64 + 1.0) / count;
        let mut d0 = distance_sq(self.position_at_time(t0));
        let mut d1 = distance_sq(self.position_at_time(t1));

        for _ in 0..RAY_REFINE_ITERATIONS {
            let mid = (t0 + t1) * 0.5;
            let d = distance_sq(self.position_at_time(mid));
            if d0 < d1 {
                d1 = d;
                t1 = mid;
            } else {
                d0 = d;
                t0 = mid;
            }
        }

        let t = if d0 < d1 { t0 } else { t1 };
        t.clamp(0.0, 1.0)
    }

    /// Evenly spaced positions for drawing the path as a polyline.
    ///
    /// Uses `points_per_segment · point_count` steps, plus one closing step
    /// on loops.
    #[must_use]
    pub fn sample_polyline(&self, points_per_segment: usize) -> Vec<Vec3> {
        let steps = points_per_segment * self.points.len() + usize::from(self.looping);
        if steps == 0 {
            return vec![self.position_at_time(0.0)];
        }
        let step = 1.0 / steps as f64;
        (0..=steps).map(|i| self.position_at_time(i as f64 * step)).collect()
    }
}

impl PathQuery for BezierPath {
    fn point_count(&self) -> usize {
        self.points.len()
    }

    fn length(&self) -> f64 {
        Self::length(self)
    }

    fn distance_to_time(&self, distance: f64) -> f64 {
        Self::distance_to_time(self, distance)
    }

    fn position_at_time(&self, t: f64) -> Vec3 {
        Self::position_at_time(self, t)
    }

    fn tangent_at_time(&self, t: f64) -> Vec3 {
        Self::tangent_at_time(self, t)
    }

    fn rotation_at_time(&self, t: f64) -> Quat {
        Self::rotation_at_time(self, t)
    }

    fn scale_at_time(&self, t: f64) -> Vec3 {
        Self::scale_at_time(self, t)
    }

    fn scale_at_index(&self, index: usize) -> Vec3 {
        Self::scale_at_index(self, index)
    }
}
