//! Task construction: one unit of work, assembled before submission.
//!
//! A [`Task`] bundles everything the device needs - the index domain,
//! buffer bindings with declared intents, an optional staging declaration,
//! and the kernel's stage table - into an explicit descriptor. Nothing is
//! captured implicitly: stages receive their buffers through the accessor
//! tokens returned at bind time.

use lockstep_dispatch::{
    BindingView, GroupCtx, KernelPlan, NdRange, StagingSpec, TaskSpec, WorkItem,
};

use crate::access::{LocalAccessor, ReadAccessor, RwAccessor, WriteAccessor};
use crate::buffer::Buffer;
use crate::error::{Error, Result};

/// Maximum number of buffer views one unit of work may reference.
pub const MAX_BINDINGS: usize = 3;

/// One unit of work under construction.
pub struct Task<'a> {
    range: NdRange,
    staging: Option<StagingSpec>,
    bindings: Vec<BindingView<'a>>,
    plan: KernelPlan<'a>,
}

impl<'a> Task<'a> {
    /// Start building a task over the given index domain.
    pub fn new(range: NdRange) -> Self {
        Self {
            range,
            staging: None,
            bindings: Vec::new(),
            plan: KernelPlan::new(),
        }
    }

    /// The task's index domain.
    pub fn range(&self) -> NdRange {
        self.range
    }

    /// Number of bound buffer views.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Number of stages pushed so far.
    pub fn stage_count(&self) -> usize {
        self.plan.stage_count()
    }

    /// Number of group barriers each member will pass. Structural: fixed by
    /// the stage table, identical for every member.
    pub fn barrier_count(&self) -> usize {
        self.plan.barrier_count()
    }

    fn next_binding(&self) -> Result<usize> {
        if self.bindings.len() >= MAX_BINDINGS {
            return Err(Error::BindingLimit {
                limit: MAX_BINDINGS,
            });
        }
        Ok(self.bindings.len())
    }

    /// Bind a buffer with read-only intent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BindingLimit`] past [`MAX_BINDINGS`] views.
    pub fn bind_read<'h, T: bytemuck::Pod>(
        &mut self,
        buffer: &'a Buffer<'h, T>,
    ) -> Result<ReadAccessor<T>> {
        let binding = self.next_binding()?;
        let shape = buffer.shape();
        self.bindings.push(BindingView::Read(buffer.bytes()));
        Ok(ReadAccessor::new(binding, shape))
    }

    /// Bind a buffer with write-only intent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BindingLimit`] past [`MAX_BINDINGS`] views.
    pub fn bind_write<'h, T: bytemuck::Pod>(
        &mut self,
        buffer: &'a mut Buffer<'h, T>,
    ) -> Result<WriteAccessor<T>> {
        let binding = self.next_binding()?;
        let shape = buffer.shape();
        self.bindings.push(BindingView::Write(buffer.bytes_mut()));
        Ok(WriteAccessor::new(binding, shape))
    }

    /// Bind a buffer with read-write intent. Reads observe pre-submission
    /// contents for the whole dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BindingLimit`] past [`MAX_BINDINGS`] views.
    pub fn bind_read_write<'h, T: bytemuck::Pod>(
        &mut self,
        buffer: &'a mut Buffer<'h, T>,
    ) -> Result<RwAccessor<T>> {
        let binding = self.next_binding()?;
        let shape = buffer.shape();
        self.bindings.push(BindingView::ReadWrite(buffer.bytes_mut()));
        Ok(RwAccessor::new(binding, shape))
    }

    /// Declare local staging: `multiplier` slots of `T` per group member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StagingRedeclared`] on a second declaration, or the
    /// dispatch error for a zero multiplier.
    pub fn local_staging<T: bytemuck::Pod>(&mut self, multiplier: u32) -> Result<LocalAccessor<T>> {
        if self.staging.is_some() {
            return Err(Error::StagingRedeclared);
        }
        let spec = StagingSpec::new(multiplier, std::mem::size_of::<T>())?;
        self.staging = Some(spec);
        Ok(LocalAccessor::new(multiplier))
    }

    /// Append a stage to the kernel. A full group barrier separates
    /// consecutive stages.
    pub fn stage(&mut self, stage: impl Fn(&WorkItem, &mut GroupCtx<'_>) + Send + Sync + 'a) {
        self.plan.push_stage(stage);
    }

    pub(crate) fn into_parts(self) -> (TaskSpec, KernelPlan<'a>, Vec<BindingView<'a>>) {
        let spec = TaskSpec {
            range: self.range,
            staging: self.staging,
        };
        (spec, self.plan, self.bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_dispatch::Extent;

    #[test]
    fn binding_limit_is_enforced() {
        let range = NdRange::linear(4, 2).unwrap();
        let mut a = vec![0i32; 4];
        let mut b = vec![0i32; 4];
        let mut c = vec![0i32; 4];
        let mut d = vec![0i32; 4];
        let buf_a = Buffer::linear(&mut a).unwrap();
        let buf_b = Buffer::linear(&mut b).unwrap();
        let buf_c = Buffer::linear(&mut c).unwrap();
        let buf_d = Buffer::linear(&mut d).unwrap();

        let mut task = Task::new(range);
        task.bind_read(&buf_a).unwrap();
        task.bind_read(&buf_b).unwrap();
        task.bind_read(&buf_c).unwrap();
        assert!(matches!(
            task.bind_read(&buf_d),
            Err(Error::BindingLimit { limit: MAX_BINDINGS })
        ));
    }

    #[test]
    fn staging_declares_once() {
        let range = NdRange::linear(4, 2).unwrap();
        let mut task = Task::new(range);
        let lm = task.local_staging::<f32>(2).unwrap();
        assert_eq!(lm.multiplier(), 2);
        assert!(matches!(
            task.local_staging::<f32>(1),
            Err(Error::StagingRedeclared)
        ));
    }

    #[test]
    fn zero_multiplier_is_rejected() {
        let range = NdRange::linear(4, 2).unwrap();
        let mut task = Task::new(range);
        assert!(task.local_staging::<f32>(0).is_err());
    }

    #[test]
    fn stage_counts_track_the_plan() {
        let range = NdRange::new(Extent::d2(4, 4), Extent::d2(2, 2)).unwrap();
        let mut task = Task::new(range);
        assert_eq!(task.stage_count(), 0);
        task.stage(|_, _| {});
        task.stage(|_, _| {});
        assert_eq!(task.stage_count(), 2);
        assert_eq!(task.barrier_count(), 1);
    }
}
