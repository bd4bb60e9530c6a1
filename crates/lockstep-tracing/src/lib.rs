//! Shared tracing configuration utilities for the lockstep workspace.
//!
//! Sample binaries, integration tests, and benches all install their
//! `tracing` subscriber through this crate. Routing setup through one place
//! keeps the logging surface consistent across binaries and avoids
//! copy-pasted builder logic.

pub mod performance;

#[macro_use]
pub mod macros;

use std::fmt;

pub use tracing::{debug, error, info, trace, warn};

use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter};

/// Output format for the formatter layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TracingOutput {
    /// Human-oriented multi-line output with ANSI colour.
    Pretty,
    /// Single-line output suited to CI logs.
    Compact,
}

/// Configuration describing how the shared tracing subscriber should behave.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    /// Optional tracing directives (e.g. `lockstep_dispatch=debug,info`).
    /// When absent the crate falls back to `RUST_LOG` and finally to
    /// [`TracingConfig::default_directive`].
    pub directives: Option<String>,
    /// Fallback directive used when neither [`TracingConfig::directives`]
    /// nor `RUST_LOG` resolve to a valid filter.
    pub default_directive: String,
    /// Controls whether event targets (module paths) appear in output.
    pub include_targets: bool,
    /// Controls ANSI formatting. Disable for CI logs that strip colour codes.
    pub ansi: bool,
    /// Output format for the formatter layer.
    pub output: TracingOutput,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::for_local()
    }
}

impl TracingConfig {
    /// Returns a configuration tuned for local development.
    pub fn for_local() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: true,
            output: TracingOutput::Pretty,
        }
    }

    /// Returns a configuration tuned for CI or log collection environments.
    pub fn for_ci() -> Self {
        Self {
            directives: None,
            default_directive: "info".to_string(),
            include_targets: true,
            ansi: false,
            output: TracingOutput::Compact,
        }
    }

    /// Resolve the `EnvFilter` to use for the subscriber.
    ///
    /// Explicit directives win over `RUST_LOG`; the default directive is the
    /// last resort and is assumed to always parse.
    fn env_filter(&self) -> EnvFilter {
        if let Some(directives) = &self.directives {
            if let Ok(filter) = EnvFilter::try_new(directives) {
                return filter;
            }
        }
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive.clone()))
    }
}

/// Error returned when the global subscriber could not be installed.
#[derive(Debug)]
pub struct TracingInitError(String);

impl fmt::Display for TracingInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to install tracing subscriber: {}", self.0)
    }
}

impl std::error::Error for TracingInitError {}

/// Install the global tracing subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TracingInitError`] when a global subscriber is already
/// installed (usually because a test harness got there first).
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingInitError> {
    let builder = tracing_fmt::fmt()
        .with_env_filter(config.env_filter())
        .with_target(config.include_targets)
        .with_ansi(config.ansi);

    let result = match config.output {
        TracingOutput::Pretty => builder.pretty().finish().try_init(),
        TracingOutput::Compact => builder.compact().finish().try_init(),
    };

    result.map_err(|err| TracingInitError(err.to_string()))
}

/// Install the default subscriber, ignoring an already-installed one.
///
/// Sample binaries use this so repeated initialization (e.g. under a test
/// harness) stays silent.
pub fn init_default() {
    let _ = init_tracing(&TracingConfig::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_config_defaults() {
        let config = TracingConfig::for_local();
        assert_eq!(config.output, TracingOutput::Pretty);
        assert!(config.ansi);
        assert_eq!(config.default_directive, "info");
    }

    #[test]
    fn ci_config_disables_ansi() {
        let config = TracingConfig::for_ci();
        assert_eq!(config.output, TracingOutput::Compact);
        assert!(!config.ansi);
    }

    #[test]
    fn explicit_directives_win() {
        let config = TracingConfig {
            directives: Some("lockstep_dispatch=debug".to_string()),
            ..TracingConfig::for_local()
        };
        // Must not panic; the directive parses into a filter.
        let _filter = config.env_filter();
    }

    #[test]
    fn invalid_directives_fall_back() {
        let config = TracingConfig {
            directives: Some("not a directive ===".to_string()),
            ..TracingConfig::for_local()
        };
        let _filter = config.env_filter();
    }
}
