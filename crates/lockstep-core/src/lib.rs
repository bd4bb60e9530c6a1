//! Host-facing API of the lockstep workspace.
//!
//! This crate owns the buffer lifecycle and task construction on top of the
//! `lockstep-dispatch` engine:
//!
//! ```text
//! lockstep-core
//! ├── Queue    - device selection + blocking submission
//! ├── Buffer   - shaped device view borrowing a host slice
//! ├── Task     - one unit of work: range, bindings, staging, stages
//! ├── access   - intent-typed accessor tokens
//! └── staged   - load/map/store stage builders
//! ```
//!
//! # Example
//!
//! ```rust
//! use lockstep_core::{staged, Buffer, Queue, Task};
//! use lockstep_core::{Extent, NdRange};
//!
//! # fn main() -> lockstep_core::Result<()> {
//! let queue = Queue::new()?; // GPU preferred, CPU fallback
//!
//! let mut data: Vec<f32> = (1..=64).map(|i| (i * i) as f32).collect();
//! {
//!     let mut buffer = Buffer::from_slice(&mut data, Extent::d2(8, 8))?;
//!     let range = NdRange::new(Extent::d2(8, 8), Extent::d2(2, 2))?;
//!
//!     let mut task = Task::new(range);
//!     let acc = task.bind_read_write(&mut buffer)?;
//!     let lm = task.local_staging::<f32>(1)?;
//!     staged::unary(&mut task, acc, lm, |x| x.sqrt());
//!
//!     queue.submit(task)?; // blocks; writes are visible after this
//! }
//! assert_eq!(data[3], 4.0); // sqrt(16) at global index 3
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod buffer;
pub mod error;
pub mod queue;
pub mod staged;
pub mod task;

pub use access::{LocalAccessor, ReadAccess, ReadAccessor, RwAccessor, WriteAccess, WriteAccessor};
pub use buffer::Buffer;
pub use error::{Error, Result};
pub use queue::Queue;
pub use task::{Task, MAX_BINDINGS};

// Re-export the dispatch-level vocabulary tasks are written in.
pub use lockstep_dispatch::{
    DeviceKind, DispatchError, Extent, GroupCtx, Intent, NdRange, WorkItem,
};
