//! CPU execution engine.
//!
//! Groups run in parallel on the rayon pool; they are independent and never
//! communicate. Within a group, every member executes stage `k` before any
//! member enters stage `k + 1` - the stage boundary is the group barrier of
//! the execution model, and running members to completion per stage is a
//! legal schedule of the "no ordering until the barrier" contract.
//!
//! Stores are logged per group and applied through the write bindings after
//! all groups have joined, so the whole unit of work becomes host-visible
//! at once.

use rayon::prelude::*;

use lockstep_tracing::perf_span;

use crate::device::{Device, DeviceKind};
use crate::error::Result;
use crate::plan::{apply_store_logs, BindingTable, BindingView, GroupCtx, KernelPlan, StoreRecord, TaskSpec};
use crate::staging::GroupStaging;

/// Local memory granted to each group, in bytes.
///
/// The modelled runtimes report this per device; the CPU engine fixes a
/// generous compiled-in value that samples may query and print.
pub const CPU_LOCAL_MEM_SIZE: usize = 64 * 1024;

/// The in-process CPU device.
#[derive(Debug, Default, Clone)]
pub struct CpuDevice {
    _private: (),
}

impl CpuDevice {
    /// Create a new CPU device.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Device for CpuDevice {
    fn kind(&self) -> DeviceKind {
        DeviceKind::Cpu
    }

    fn name(&self) -> &str {
        "lockstep cpu engine"
    }

    fn local_mem_size(&self) -> usize {
        CPU_LOCAL_MEM_SIZE
    }

    #[tracing::instrument(skip(self, spec, plan, bindings), fields(
        range = %spec.range,
        stages = plan.stage_count(),
        bindings = bindings.len(),
    ))]
    fn dispatch(
        &self,
        spec: &TaskSpec,
        plan: &KernelPlan<'_>,
        bindings: &mut [BindingView<'_>],
    ) -> Result<()> {
        let _span = perf_span!("cpu_dispatch");

        if let Some(staging) = spec.staging {
            staging.validate(spec.range.group_size(), self.local_mem_size())?;
        }

        let range = spec.range;
        let table = BindingTable::new(bindings);

        let logs: Vec<Vec<StoreRecord>> = (0..range.group_count())
            .into_par_iter()
            .map(|group| {
                let mut staging = GroupStaging::allocate(spec.staging, range.group_size());
                let mut log = Vec::new();
                for stage in plan.stages() {
                    for local in 0..range.group_size() {
                        let item = range.item(group, local);
                        let mut ctx = GroupCtx::new(&table, &mut staging, &mut log);
                        stage(&item, &mut ctx);
                    }
                    // Stage boundary: every member of this group has
                    // finished the stage before any member enters the next.
                }
                log
            })
            .collect();

        drop(table);

        tracing::debug!(
            groups = range.group_count(),
            items = range.item_count(),
            stores = logs.iter().map(Vec::len).sum::<usize>(),
            "dispatch retired, applying stores"
        );

        // The synchronization point: all writes become visible together.
        apply_store_logs(bindings, logs.into_iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NdRange;
    use crate::error::DispatchError;
    use crate::staging::StagingSpec;

    fn device() -> CpuDevice {
        CpuDevice::new()
    }

    #[test]
    fn single_stage_kernel_writes_through() {
        let range = NdRange::linear(8, 2).unwrap();
        let spec = TaskSpec {
            range,
            staging: None,
        };

        let input: Vec<i32> = (0..8).collect();
        let input_bytes: Vec<u8> = bytemuck::cast_slice(&input).to_vec();
        let mut output_bytes = vec![0u8; input_bytes.len()];

        let mut plan = KernelPlan::new();
        plan.push_stage(|item, ctx| {
            let value: i32 = ctx.load(0, item.global_linear());
            ctx.store(1, item.global_linear(), value * 3);
        });

        {
            let mut bindings = [
                BindingView::Read(&input_bytes),
                BindingView::Write(&mut output_bytes),
            ];
            device().dispatch(&spec, &plan, &mut bindings).unwrap();
        }

        let output: &[i32] = bytemuck::cast_slice(&output_bytes);
        assert_eq!(output, &[0, 3, 6, 9, 12, 15, 18, 21]);
    }

    #[test]
    fn staged_values_cross_the_stage_boundary() {
        // Each member stages its neighbour's slot in stage 2, which only
        // works because stage 1 completed group-wide first.
        let range = NdRange::linear(4, 4).unwrap();
        let spec = TaskSpec {
            range,
            staging: Some(StagingSpec::new(1, std::mem::size_of::<i32>()).unwrap()),
        };

        let input: Vec<i32> = vec![10, 20, 30, 40];
        let input_bytes: Vec<u8> = bytemuck::cast_slice(&input).to_vec();
        let mut output_bytes = vec![0u8; input_bytes.len()];

        let mut plan = KernelPlan::new();
        plan.push_stage(|item, ctx| {
            let value: i32 = ctx.load(0, item.global_linear());
            ctx.local_store(item.local_linear(), 0, value);
        });
        plan.push_stage(|item, ctx| {
            let next = (item.local_linear() + 1) % item.local_extent().len();
            let value: i32 = ctx.local_load(next, 0);
            ctx.store(1, item.global_linear(), value);
        });

        {
            let mut bindings = [
                BindingView::Read(&input_bytes),
                BindingView::Write(&mut output_bytes),
            ];
            device().dispatch(&spec, &plan, &mut bindings).unwrap();
        }

        let output: &[i32] = bytemuck::cast_slice(&output_bytes);
        assert_eq!(output, &[20, 30, 40, 10]);
    }

    #[test]
    fn read_write_binding_observes_pre_dispatch_contents() {
        let range = NdRange::linear(4, 2).unwrap();
        let spec = TaskSpec {
            range,
            staging: None,
        };

        let mut data: Vec<i32> = vec![1, 2, 3, 4];
        let mut plan = KernelPlan::new();
        plan.push_stage(|item, ctx| {
            let value: i32 = ctx.load(0, item.global_linear());
            ctx.store(0, item.global_linear(), value + 100);
        });
        // A second stage still reads the pre-dispatch snapshot.
        plan.push_stage(|item, ctx| {
            let value: i32 = ctx.load(0, item.global_linear());
            assert!(value < 100, "stage observed an uncommitted store");
        });

        {
            let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut data);
            let mut bindings = [BindingView::ReadWrite(bytes)];
            device().dispatch(&spec, &plan, &mut bindings).unwrap();
        }

        assert_eq!(data, vec![101, 102, 103, 104]);
    }

    #[test]
    fn oversized_staging_is_rejected_before_execution() {
        let range = NdRange::linear(4, 4).unwrap();
        let spec = TaskSpec {
            range,
            staging: Some(StagingSpec::new(u32::MAX, 8).unwrap()),
        };
        let plan = KernelPlan::new();
        let mut bindings: [BindingView<'_>; 0] = [];
        assert!(matches!(
            device().dispatch(&spec, &plan, &mut bindings),
            Err(DispatchError::StagingTooLarge { .. })
        ));
    }

    #[test]
    fn groups_see_private_staging() {
        // Two groups stage different data; neither observes the other's.
        let range = NdRange::linear(4, 2).unwrap();
        let spec = TaskSpec {
            range,
            staging: Some(StagingSpec::new(1, std::mem::size_of::<i32>()).unwrap()),
        };

        let input: Vec<i32> = vec![1, 2, 3, 4];
        let input_bytes: Vec<u8> = bytemuck::cast_slice(&input).to_vec();
        let mut output_bytes = vec![0u8; input_bytes.len()];

        let mut plan = KernelPlan::new();
        plan.push_stage(|item, ctx| {
            let value: i32 = ctx.load(0, item.global_linear());
            ctx.local_store(item.local_linear(), 0, value);
        });
        plan.push_stage(|item, ctx| {
            // Sum of the group's staging: distinct per group.
            let sum: i32 = (0..item.local_extent().len())
                .map(|l| ctx.local_load::<i32>(l, 0))
                .sum();
            ctx.store(1, item.global_linear(), sum);
        });

        {
            let mut bindings = [
                BindingView::Read(&input_bytes),
                BindingView::Write(&mut output_bytes),
            ];
            device().dispatch(&spec, &plan, &mut bindings).unwrap();
        }

        let output: &[i32] = bytemuck::cast_slice(&output_bytes);
        assert_eq!(output, &[3, 3, 7, 7]);
    }
}
