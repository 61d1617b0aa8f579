//! Segment indexing and cubic Bezier blending.
//!
//! All wrap-around arithmetic for looping paths goes through [`SegmentIndexer`].

use super::{ControlPoint, Tolerance, Vec3};

/// Index arithmetic over `count` points, open or looping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentIndexer {
    pub count: usize,
    pub looping: bool,
}

/// A global parameter split into a segment and its local parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentTime {
    /// Index of the segment's first point.
    pub index: usize,
    /// Index of the segment's second point (0 when wrapping).
    pub next: usize,
    /// Parameter within the segment, in `[0, 1]`.
    pub local_t: f64,
}

impl SegmentIndexer {
    #[must_use]
    pub const fn new(count: usize, looping: bool) -> Self {
        Self { count, looping }
    }

    #[must_use]
    pub const fn segment_count(self) -> usize {
        if self.looping { self.count } else { self.count.saturating_sub(1) }
    }

    /// Following point, wrapping to 0 past the end.
    #[must_use]
    pub const fn next(self, index: usize) -> usize {
        if index + 1 < self.count { index + 1 } else { 0 }
    }

    /// Preceding point, wrapping to the last point before 0.
    #[must_use]
    pub const fn prev(self, index: usize) -> usize {
        if index > 0 { index - 1 } else { self.count.saturating_sub(1) }
    }

    #[must_use]
    pub const fn last(self) -> usize {
        self.count.saturating_sub(1)
    }

    /// Map a global parameter to `(segment, local t)`.
    ///
    /// `t` is clamped to `[0, 1]`; `t = 1` stays in the last segment with a local
    /// parameter of 1. A path without segments maps everything to point 0.
    #[must_use]
    pub fn remap_time(self, t: f64) -> SegmentTime {
        let segments = self.segment_count();
        if segments == 0 {
            return SegmentTime { index: 0, next: 0, local_t: 0.0 };
        }
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let mut scaled = t * segments as f64;
        // Parameters that land on a boundary up to rounding belong to the later segment.
        let rounded = scaled.round();
        if (scaled - rounded).abs() <= Tolerance::DEFAULT.eps {
            scaled = rounded;
        }
        let mut index = scaled.floor() as usize;
        if index >= segments {
            index = segments - 1;
        }
        SegmentTime {
            index,
            next: self.next(index),
            local_t: scaled - index as f64,
        }
    }

    /// Global parameter at the start of `segment`.
    #[must_use]
    pub fn segment_start_time(self, segment: usize) -> f64 {
        let segments = self.segment_count();
        if segments == 0 { 0.0 } else { segment as f64 / segments as f64 }
    }
}

/// The four control positions of one cubic segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub start: Vec3,
    pub start_handle: Vec3,
    pub end_handle: Vec3,
    pub end: Vec3,
}

impl CubicSegment {
    /// Segment running from `a` (out tangent) to `b` (in tangent).
    #[must_use]
    pub const fn between(a: &ControlPoint, b: &ControlPoint) -> Self {
        Self {
            start: a.position,
            start_handle: a.out_tangent.position,
            end_handle: b.in_tangent.position,
            end: b.position,
        }
    }

    /// Bernstein blend at local parameter `t`.
    #[must_use]
    pub fn position(&self, t: f64) -> Vec3 {
        let u = 1.0 - t;
        self.start * (u * u * u)
            + self.start_handle * (3.0 * u * u * t)
            + self.end_handle * (3.0 * u * t * t)
            + self.end * (t * t * t)
    }

    /// First derivative at local parameter `t`.
    #[must_use]
    pub fn derivative(&self, t: f64) -> Vec3 {
        let u = 1.0 - t;
        (self.start_handle - self.start) * (3.0 * u * u)
            + (self.end_handle - self.start_handle) * (6.0 * u * t)
            + (self.end - self.end_handle) * (3.0 * t * t)
    }
}
