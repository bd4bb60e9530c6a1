//! Device abstraction and group-parallel staged execution for the lockstep
//! workspace.
//!
//! This crate owns the execution model underneath `lockstep-core`:
//!
//! ```text
//! lockstep-core::Queue
//!   | submit(task)
//!   v
//! lockstep-dispatch
//! ├── domain   - work distribution planner (NdRange, WorkItem)
//! ├── staging  - per-group local scratch storage
//! ├── plan     - barrier-separated stage tables + group context
//! └── device   - Device trait, selection chain, CPU engine
//! ```
//!
//! # Execution model
//!
//! One dispatch covers a validated N-dimensional index domain partitioned
//! into fixed-size groups. Groups execute independently and in parallel;
//! within a group, the kernel's stage table runs stage by stage with a full
//! group barrier at every stage boundary. Stores are logged and become
//! host-visible together when the dispatch retires.

pub mod device;
pub mod domain;
pub mod error;
pub mod plan;
pub mod staging;

pub use device::{probe_device, select_device, CpuDevice, Device, DeviceKind};
pub use domain::{Extent, NdRange, WorkItem};
pub use error::{DispatchError, Result};
pub use plan::{BindingView, GroupCtx, Intent, KernelPlan, StageFn, TaskSpec};
pub use staging::StagingSpec;
