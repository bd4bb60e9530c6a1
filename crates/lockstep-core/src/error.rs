//! Error types for host-side task construction and submission.

/// Result type for lockstep-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or submitting a unit of work.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Dispatch-level failure (domain validation, device selection,
    /// staging limits, engine faults).
    #[error(transparent)]
    Dispatch(#[from] lockstep_dispatch::DispatchError),

    /// Host data length does not match the declared shape.
    #[error("shape mismatch: shape covers {expected} elements, host data has {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A unit of work references more buffer views than supported.
    #[error("binding limit exceeded: a unit of work references at most {limit} buffer views")]
    BindingLimit { limit: usize },

    /// A task may declare local staging at most once.
    #[error("local staging already declared for this task")]
    StagingRedeclared,

    /// The task has nothing to dispatch.
    #[error("empty task: {0}")]
    EmptyTask(&'static str),
}
