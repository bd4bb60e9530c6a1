//! Kernel plans: barrier-separated stage lists and the per-group context
//! stages execute against.
//!
//! A kernel is not a single closure but an ordered table of **stage
//! functions**. Every group member executes stage `k` to completion before
//! any member of its group enters stage `k + 1`; the stage boundary is the
//! group barrier. Representing barriers structurally has one important
//! consequence: the barrier count of a dispatch is a property of the plan,
//! never of item-level control flow, so it is identical across group
//! members by construction.
//!
//! Within a stage, member execution order is unspecified. Staging writes
//! made during stage `k` are only guaranteed visible to other members from
//! stage `k + 1` on.
//!
//! # Memory model
//!
//! Stages read bindings through pre-dispatch snapshots and write through a
//! store log. The log is applied to the write bindings after the whole unit
//! of work retires, so all writes become host-visible together at the
//! synchronization point - there is no partial visibility. A read of a
//! read-write binding therefore observes pre-submission contents for the
//! whole dispatch; kernels that need intra-dispatch communication stage
//! values in local memory, which is what local memory is for.
//!
//! Index or intent violations inside a kernel are faults: they panic and
//! take the dispatch down, mirroring how the modelled runtime treats them
//! as unrecoverable.

use crate::domain::{NdRange, WorkItem};
use crate::error::{DispatchError, Result};
use crate::staging::{GroupStaging, StagingSpec};

/// Declared access intent of one binding for one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Kernel may only read the binding.
    Read,
    /// Kernel may only write the binding.
    Write,
    /// Kernel may read pre-submission contents and write new ones.
    ReadWrite,
}

/// A host memory region bound to a dispatch with a declared intent.
pub enum BindingView<'a> {
    /// Read-only view of host data.
    Read(&'a [u8]),
    /// Write-only view; reads are kernel faults.
    Write(&'a mut [u8]),
    /// Read-write view; reads observe pre-submission contents.
    ReadWrite(&'a mut [u8]),
}

impl BindingView<'_> {
    /// The declared intent of this view.
    pub fn intent(&self) -> Intent {
        match self {
            BindingView::Read(_) => Intent::Read,
            BindingView::Write(_) => Intent::Write,
            BindingView::ReadWrite(_) => Intent::ReadWrite,
        }
    }

    /// Byte length of the bound region.
    pub fn len_bytes(&self) -> usize {
        match self {
            BindingView::Read(data) => data.len(),
            BindingView::Write(data) => data.len(),
            BindingView::ReadWrite(data) => data.len(),
        }
    }
}

/// Everything a device needs to schedule one unit of work, independent of
/// the kernel itself.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    /// The index domain the kernel runs over.
    pub range: NdRange,
    /// Local staging declaration, when the kernel uses group memory.
    pub staging: Option<StagingSpec>,
}

/// A stage function: invoked once per work item per stage.
pub type StageFn<'k> = Box<dyn Fn(&WorkItem, &mut GroupCtx<'_>) + Send + Sync + 'k>;

/// An ordered table of stage functions with a full group barrier at every
/// stage boundary.
#[derive(Default)]
pub struct KernelPlan<'k> {
    stages: Vec<StageFn<'k>>,
}

impl<'k> KernelPlan<'k> {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Append a stage. A barrier separates it from the previous stage.
    pub fn push_stage(&mut self, stage: impl Fn(&WorkItem, &mut GroupCtx<'_>) + Send + Sync + 'k) {
        self.stages.push(Box::new(stage));
    }

    /// Number of stages in the plan.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Number of group barriers every member passes: one per stage
    /// boundary. Structural, identical for all members.
    pub fn barrier_count(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    /// The stage table, in execution order.
    pub fn stages(&self) -> &[StageFn<'k>] {
        &self.stages
    }
}

/// One logged store, applied at the synchronization point.
pub(crate) struct StoreRecord {
    pub(crate) binding: usize,
    pub(crate) offset: usize,
    pub(crate) bytes: Vec<u8>,
}

/// Read snapshots and write limits of all bindings, shared by every group
/// of one dispatch.
pub(crate) struct BindingTable<'run> {
    reads: Vec<Option<&'run [u8]>>,
    writable: Vec<bool>,
    limits: Vec<usize>,
}

impl<'run> BindingTable<'run> {
    pub(crate) fn new(bindings: &'run [BindingView<'_>]) -> Self {
        let reads = bindings
            .iter()
            .map(|b| match b {
                BindingView::Read(data) => Some(&**data),
                BindingView::ReadWrite(data) => Some(&**data),
                BindingView::Write(_) => None,
            })
            .collect();
        let writable = bindings
            .iter()
            .map(|b| !matches!(b, BindingView::Read(_)))
            .collect();
        let limits = bindings.iter().map(|b| b.len_bytes()).collect();
        Self {
            reads,
            writable,
            limits,
        }
    }
}

/// The view a stage function has of its group: binding access, local
/// staging, and the store log.
pub struct GroupCtx<'run> {
    table: &'run BindingTable<'run>,
    staging: &'run mut GroupStaging,
    log: &'run mut Vec<StoreRecord>,
}

impl<'run> GroupCtx<'run> {
    pub(crate) fn new(
        table: &'run BindingTable<'run>,
        staging: &'run mut GroupStaging,
        log: &'run mut Vec<StoreRecord>,
    ) -> Self {
        Self {
            table,
            staging,
            log,
        }
    }

    /// Read element `index` of a readable binding.
    ///
    /// # Panics
    ///
    /// Faults on a write-only binding, an unknown binding index, or an
    /// out-of-bounds element index.
    pub fn load<T: bytemuck::Pod>(&self, binding: usize, index: usize) -> T {
        let data = self
            .table
            .reads
            .get(binding)
            .copied()
            .unwrap_or_else(|| panic!("kernel fault: unknown binding {binding}"))
            .unwrap_or_else(|| panic!("kernel fault: binding {binding} is write-only"));
        let size = std::mem::size_of::<T>();
        let offset = index * size;
        assert!(
            offset + size <= data.len(),
            "kernel fault: load of element {index} outside binding {binding}"
        );
        *bytemuck::from_bytes(&data[offset..offset + size])
    }

    /// Write element `index` of a writable binding. The write lands in the
    /// store log and becomes visible at the synchronization point.
    ///
    /// # Panics
    ///
    /// Faults on a read-only binding, an unknown binding index, or an
    /// out-of-bounds element index.
    pub fn store<T: bytemuck::Pod>(&mut self, binding: usize, index: usize, value: T) {
        let writable = *self
            .table
            .writable
            .get(binding)
            .unwrap_or_else(|| panic!("kernel fault: unknown binding {binding}"));
        assert!(writable, "kernel fault: binding {binding} is read-only");
        let size = std::mem::size_of::<T>();
        let offset = index * size;
        assert!(
            offset + size <= self.table.limits[binding],
            "kernel fault: store of element {index} outside binding {binding}"
        );
        self.log.push(StoreRecord {
            binding,
            offset,
            bytes: bytemuck::bytes_of(&value).to_vec(),
        });
    }

    /// Read the staging slot at (local linear index, slot).
    pub fn local_load<T: bytemuck::Pod>(&self, local_linear: usize, slot: u32) -> T {
        self.staging.load(local_linear, slot)
    }

    /// Write the staging slot at (local linear index, slot). Visible to
    /// other group members from the next stage on.
    pub fn local_store<T: bytemuck::Pod>(&mut self, local_linear: usize, slot: u32, value: T) {
        self.staging.store(local_linear, slot, value)
    }
}

/// Apply logged stores through the write bindings. Called by the engine
/// once all groups have retired; this is the synchronization point where
/// the unit of work's effects become host-visible.
pub(crate) fn apply_store_logs(
    bindings: &mut [BindingView<'_>],
    logs: impl IntoIterator<Item = StoreRecord>,
) -> Result<()> {
    for record in logs {
        let target = match bindings.get_mut(record.binding) {
            Some(BindingView::Write(data)) => data,
            Some(BindingView::ReadWrite(data)) => data,
            Some(BindingView::Read(_)) => {
                return Err(DispatchError::fault(format!(
                    "store log targets read-only binding {}",
                    record.binding
                )))
            }
            None => {
                return Err(DispatchError::fault(format!(
                    "store log targets unknown binding {}",
                    record.binding
                )))
            }
        };
        let end = record.offset + record.bytes.len();
        if end > target.len() {
            return Err(DispatchError::fault(format!(
                "store log overruns binding {} ({} > {})",
                record.binding,
                end,
                target.len()
            )));
        }
        target[record.offset..end].copy_from_slice(&record.bytes);
    }
    Ok(())
}
