//! Performance-focused tracing utilities.
//!
//! RAII spans that measure wall-clock duration and emit a debug event on
//! drop. Used by the dispatch engine around kernel execution and by the
//! transfer paths in `lockstep-core`.

use std::time::Instant;

/// RAII guard that measures span duration and logs it when dropped.
///
/// An optional threshold suppresses events for durations below it, keeping
/// hot paths quiet unless something is actually slow.
pub struct PerformanceSpan {
    name: &'static str,
    threshold_us: Option<u64>,
    start: Instant,
}

impl PerformanceSpan {
    /// Create a new performance span.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the operation being measured
    /// * `threshold_us` - Minimum duration in microseconds to log
    ///   (`None` = always log)
    pub fn new(name: &'static str, threshold_us: Option<u64>) -> Self {
        Self {
            name,
            threshold_us,
            start: Instant::now(),
        }
    }
}

impl Drop for PerformanceSpan {
    fn drop(&mut self) {
        let duration_us = self.start.elapsed().as_micros() as u64;
        if let Some(threshold) = self.threshold_us {
            if duration_us < threshold {
                return;
            }
        }
        tracing::debug!(name = self.name, duration_us, "perf_span");
    }
}
