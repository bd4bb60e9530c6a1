//! Named stage builders for the canonical staged-computation pattern.
//!
//! Every local-memory kernel in the samples is some arrangement of the same
//! three phases, each separated from the next by the group barrier:
//!
//! ```text
//! load    - copy one element from the input binding into this member's
//!           staging slot
//! map     - apply a pure function to a staging slot, writing a staging slot
//! store   - copy a staging slot to this member's element of the output
//!           binding
//! ```
//!
//! The builders append those phases to a [`Task`] as stages, so the barrier
//! placement is fixed by construction. Kernels that need a different
//! arrangement (the matrix multiply keeps a running sum with a barrier per
//! reduction step) push custom stages through [`Task::stage`] instead.

use crate::access::{LocalAccessor, ReadAccess, WriteAccess};
use crate::task::Task;

/// Append the load phase: each member copies the element at its global
/// linear index from `src` into its staging slot `slot`.
pub fn load<'a, T, Src>(task: &mut Task<'a>, src: Src, lm: LocalAccessor<T>, slot: u32)
where
    T: bytemuck::Pod,
    Src: ReadAccess<T>,
{
    task.stage(move |item, ctx| {
        let value = src.get(ctx, item.global_linear());
        lm.set(ctx, item.local_linear(), slot, value);
    });
}

/// Append the map phase: each member reads its staging slot `src_slot`,
/// applies `f`, and writes its staging slot `dst_slot`.
pub fn map<'a, T, F>(task: &mut Task<'a>, lm: LocalAccessor<T>, src_slot: u32, dst_slot: u32, f: F)
where
    T: bytemuck::Pod,
    F: Fn(T) -> T + Send + Sync + 'a,
{
    task.stage(move |item, ctx| {
        let value = lm.get(ctx, item.local_linear(), src_slot);
        lm.set(ctx, item.local_linear(), dst_slot, f(value));
    });
}

/// Append the store phase: each member copies its staging slot `slot` to
/// the element at its global linear index in `dst`.
pub fn store<'a, T, Dst>(task: &mut Task<'a>, lm: LocalAccessor<T>, slot: u32, dst: Dst)
where
    T: bytemuck::Pod,
    Dst: WriteAccess<T>,
{
    task.stage(move |item, ctx| {
        let value = lm.get(ctx, item.local_linear(), slot);
        dst.set(ctx, item.global_linear(), value);
    });
}

/// Append the full load -> map -> store pipeline in-place over one
/// read-write binding, staging through slot 0.
pub fn unary<'a, T, Acc, F>(task: &mut Task<'a>, acc: Acc, lm: LocalAccessor<T>, f: F)
where
    T: bytemuck::Pod,
    Acc: ReadAccess<T> + WriteAccess<T>,
    F: Fn(T) -> T + Send + Sync + 'a,
{
    load(task, acc, lm, 0);
    map(task, lm, 0, 0, f);
    store(task, lm, 0, acc);
}
