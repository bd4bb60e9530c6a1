//! Convenience macros for performance tracing.

/// Create a performance span with optional field capture.
///
/// Returns a [`crate::performance::PerformanceSpan`] guard that logs the
/// elapsed time when dropped.
///
/// # Syntax
///
/// ```text
/// perf_span!("name")
/// perf_span!("name", field1 = value1, field2 = value2, ...)
/// ```
///
/// # Example
///
/// ```rust
/// use lockstep_tracing::perf_span;
///
/// {
///     let _span = perf_span!("vector_add", n = 1024);
///     // ... operation code ...
/// } // logs duration on drop
/// ```
#[macro_export]
macro_rules! perf_span {
    ($name:expr) => {{
        $crate::performance::PerformanceSpan::new($name, None)
    }};
    ($name:expr, $($field:tt = $value:expr),+ $(,)?) => {{
        tracing::debug!(name = $name, $($field = $value),+, "perf_span_enter");
        $crate::performance::PerformanceSpan::new($name, None)
    }};
}

/// Emit a standardized performance event at debug level.
///
/// # Example
///
/// ```rust
/// use lockstep_tracing::perf_event;
///
/// perf_event!("dispatch_complete", groups = 16, duration_us = 150);
/// ```
#[macro_export]
macro_rules! perf_event {
    ($name:expr, $($field:tt = $value:expr),+ $(,)?) => {
        tracing::debug!(event = $name, $($field = $value),+);
    };
}
