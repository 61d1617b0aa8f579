//! Opt-in timing hooks for path mesh generation.
//!
//! Timing is only collected when the `path_metrics` feature is enabled and
//! the target is not WASM (`std::time::Instant` is unavailable there). In every
//! other configuration the calls compile down to running the closure.
//!
//! ```ignore
//! use bezier_path_engine::geom::{PathMetrics, TimingBucket};
//!
//! let mut metrics = PathMetrics::default();
//! metrics.begin();
//! let mesh = metrics.time(TimingBucket::Sweep, || sweep_body());
//! if let Some(report) = metrics.end() {
//!     println!("sweep: {} ns", report.sweep_ns);
//! }
//! ```

/// Phases of mesh generation that are timed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Rebuilding dirty profile data.
    ProfileRebuild,
    /// Building the arc-length table.
    ArcLength,
    /// Placing swept vertices, normals and UVs.
    Sweep,
    /// Routing triangles and dropping empty submeshes.
    Assembly,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathTimingReport {
    pub profile_rebuild_ns: u64,
    pub arc_length_ns: u64,
    pub sweep_ns: u64,
    pub assembly_ns: u64,
}

impl PathTimingReport {
    /// Returns the total time across all buckets in nanoseconds.
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.profile_rebuild_ns
            .saturating_add(self.arc_length_ns)
            .saturating_add(self.sweep_ns)
            .saturating_add(self.assembly_ns)
    }

    /// Returns the total time in milliseconds (for display purposes).
    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing generation phases.
///
/// When the `path_metrics` feature is disabled (or on WASM), all methods
/// are no-ops and [`end`](Self::end) returns `None`.
#[derive(Debug, Default)]
pub struct PathMetrics {
    #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
    report: PathTimingReport,
}

impl PathMetrics {
    /// Resets all timing counters to zero.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
        {
            self.report = PathTimingReport::default();
        }
    }

    /// Returns the accumulated timing report, or `None` if metrics are disabled.
    #[must_use]
    pub fn end(&self) -> Option<PathTimingReport> {
        #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "path_metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Times the execution of `f` and accumulates the elapsed time in `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            self.add_to_bucket(bucket, nanos);
            result
        }

        #[cfg(not(all(feature = "path_metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }

    #[cfg(all(feature = "path_metrics", not(target_arch = "wasm32")))]
    fn add_to_bucket(&mut self, bucket: TimingBucket, nanos: u64) {
        let slot = match bucket {
            TimingBucket::ProfileRebuild => &mut self.report.profile_rebuild_ns,
            TimingBucket::ArcLength => &mut self.report.arc_length_ns,
            TimingBucket::Sweep => &mut self.report.sweep_ns,
            TimingBucket::Assembly => &mut self.report.assembly_ns,
        };
        *slot = slot.saturating_add(nanos);
    }
}
