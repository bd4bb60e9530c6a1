//! Error types for dispatch operations.

use crate::device::DeviceKind;
use crate::domain::Extent;

/// Result type for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Errors that can occur while planning or dispatching a unit of work.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The (global, local) extent pair does not describe a valid domain.
    #[error("invalid domain: {reason} (global {global}, local {local})")]
    InvalidDomain {
        reason: &'static str,
        global: Extent,
        local: Extent,
    },

    /// A staging declaration is malformed.
    #[error("invalid staging declaration: multiplier must be >= 1")]
    InvalidStaging,

    /// The staging declaration exceeds the device's local memory.
    #[error("staging too large: requested {requested} bytes, local memory limit {limit} bytes")]
    StagingTooLarge { requested: usize, limit: usize },

    /// A single device probe failed.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(DeviceKind),

    /// Every policy in the selection chain failed.
    #[error("no device available: tried {tried:?}")]
    NoDeviceAvailable { tried: Vec<DeviceKind> },

    /// Unspecified fault surfaced during dispatch. Never retried.
    #[error("dispatch fault: {0}")]
    Fault(String),
}

impl DispatchError {
    /// Create a dispatch fault.
    pub fn fault(msg: impl Into<String>) -> Self {
        Self::Fault(msg.into())
    }
}
