//! Arc-length parameterization and the coarse position samples used for picking.

use super::Vec3;

/// Uniform parameter steps in the arc-length table.
pub const ARC_LENGTH_STEPS: usize = 100;

/// Positions cached for closest-point-to-ray queries.
pub const RAY_SAMPLE_COUNT: usize = 100;

/// Piecewise-linear cumulative distance over `ARC_LENGTH_STEPS + 1` uniform samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcLengthTable {
    distances: Vec<f64>,
}

impl ArcLengthTable {
    /// Sample `position_at` on `[0, 1]` and accumulate chord lengths.
    pub fn build(position_at: impl Fn(f64) -> Vec3) -> Self {
        let step = 1.0 / ARC_LENGTH_STEPS as f64;
        let mut distances = Vec::with_capacity(ARC_LENGTH_STEPS + 1);
        let mut prev = position_at(0.0);
        let mut total = 0.0;
        for i in 0..=ARC_LENGTH_STEPS {
            let next = position_at(i as f64 * step);
            total += (next - prev).length();
            distances.push(total);
            prev = next;
        }
        log::debug!("arc-length table rebuilt: length {total:.6}");
        Self { distances }
    }

    /// Total length of the sampled polyline.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Cumulative distances, first entry 0.
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Parameter at which the path has covered `distance`.
    ///
    /// Distances at or past the end map to 1; negative distances map to 0.
    #[must_use]
    pub fn distance_to_time(&self, distance: f64) -> f64 {
        if distance >= self.length() || self.distances.len() < 2 {
            return 1.0;
        }

        let mut bottom = 0;
        let mut top = self.distances.len() - 1;
        let mut mid = top / 2;
        while top - bottom > 1 {
            if distance <= self.distances[mid] {
                top = mid;
            } else {
                bottom = mid;
            }
            mid = (bottom + top) / 2;
        }

        let t = inverse_lerp(self.distances[bottom], self.distances[top], distance);
        let step = 1.0 / (self.distances.len() - 1) as f64;
        bottom as f64 * step + t * step
    }

    /// Distance covered at parameter `t` (clamped to `[0, 1]`).
    #[must_use]
    pub fn time_to_distance(&self, t: f64) -> f64 {
        let steps = self.distances.len().saturating_sub(1);
        if steps == 0 {
            return 0.0;
        }
        let scaled = t.clamp(0.0, 1.0) * steps as f64;
        let index = (scaled.floor() as usize).min(steps - 1);
        let frac = scaled - index as f64;
        let a = self.distances[index];
        let b = self.distances[index + 1];
        a + (b - a) * frac
    }
}

/// Clamped inverse interpolation, 0 for an empty range.
fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Positions at `i / RAY_SAMPLE_COUNT` for `i` in `0..RAY_SAMPLE_COUNT`.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSamples {
    positions: Vec<Vec3>,
}

impl PositionSamples {
    pub fn build(position_at: impl Fn(f64) -> Vec3) -> Self {
        let step = 1.0 / RAY_SAMPLE_COUNT as f64;
        let positions = (0..RAY_SAMPLE_COUNT)
            .map(|i| position_at(i as f64 * step))
            .collect();
        Self { positions }
    }

    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }
}
