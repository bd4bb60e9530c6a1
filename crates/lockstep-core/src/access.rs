//! Accessor tokens: the kernel-side capability a binding grants.
//!
//! Binding a buffer to a task yields a small `Copy` token typed by the
//! element and by the declared access intent. Intent is enforced at compile
//! time: a [`WriteAccessor`] has no `get`, a [`ReadAccessor`] has no `set`,
//! and only [`RwAccessor`] carries both. Tokens capture no references, so
//! stage closures stay `Send + Sync` for free.
//!
//! The [`ReadAccess`] / [`WriteAccess`] traits are the seams generic stage
//! builders (see [`crate::staged`]) work against, so a pipeline can load
//! from a read-only or a read-write binding alike.

use std::marker::PhantomData;

use lockstep_dispatch::{Extent, GroupCtx};

/// Capability to read elements of a binding from inside a kernel.
pub trait ReadAccess<T: bytemuck::Pod>: Copy + Send + Sync + 'static {
    /// Shape of the bound buffer.
    fn shape(&self) -> Extent;

    /// Read the element at a linear index.
    fn get(&self, ctx: &GroupCtx<'_>, linear: usize) -> T;

    /// Read the element at a 2D coordinate.
    fn get2(&self, ctx: &GroupCtx<'_>, i0: u32, i1: u32) -> T {
        self.get(ctx, self.shape().linear2(i0, i1))
    }

    /// Read the element at a 3D coordinate.
    fn get3(&self, ctx: &GroupCtx<'_>, i0: u32, i1: u32, i2: u32) -> T {
        self.get(ctx, self.shape().linear3(i0, i1, i2))
    }
}

/// Capability to write elements of a binding from inside a kernel.
pub trait WriteAccess<T: bytemuck::Pod>: Copy + Send + Sync + 'static {
    /// Shape of the bound buffer.
    fn shape(&self) -> Extent;

    /// Write the element at a linear index.
    fn set(&self, ctx: &mut GroupCtx<'_>, linear: usize, value: T);

    /// Write the element at a 2D coordinate.
    fn set2(&self, ctx: &mut GroupCtx<'_>, i0: u32, i1: u32, value: T) {
        self.set(ctx, self.shape().linear2(i0, i1), value)
    }

    /// Write the element at a 3D coordinate.
    fn set3(&self, ctx: &mut GroupCtx<'_>, i0: u32, i1: u32, i2: u32, value: T) {
        self.set(ctx, self.shape().linear3(i0, i1, i2), value)
    }
}

/// Token for a read-only binding.
pub struct ReadAccessor<T> {
    binding: usize,
    shape: Extent,
    _elem: PhantomData<fn() -> T>,
}

/// Token for a write-only binding. Reading through it does not compile.
pub struct WriteAccessor<T> {
    binding: usize,
    shape: Extent,
    _elem: PhantomData<fn() -> T>,
}

/// Token for a read-write binding. Reads observe pre-submission contents
/// for the whole dispatch.
pub struct RwAccessor<T> {
    binding: usize,
    shape: Extent,
    _elem: PhantomData<fn() -> T>,
}

macro_rules! impl_token_basics {
    ($($token:ident),* $(,)?) => {
        $(
            impl<T> $token<T> {
                pub(crate) fn new(binding: usize, shape: Extent) -> Self {
                    Self {
                        binding,
                        shape,
                        _elem: PhantomData,
                    }
                }
            }

            impl<T> Clone for $token<T> {
                fn clone(&self) -> Self {
                    *self
                }
            }

            impl<T> Copy for $token<T> {}
        )*
    };
}

impl_token_basics!(ReadAccessor, WriteAccessor, RwAccessor);

impl<T: bytemuck::Pod> ReadAccess<T> for ReadAccessor<T> {
    fn shape(&self) -> Extent {
        self.shape
    }

    fn get(&self, ctx: &GroupCtx<'_>, linear: usize) -> T {
        ctx.load(self.binding, linear)
    }
}

impl<T: bytemuck::Pod> WriteAccess<T> for WriteAccessor<T> {
    fn shape(&self) -> Extent {
        self.shape
    }

    fn set(&self, ctx: &mut GroupCtx<'_>, linear: usize, value: T) {
        ctx.store(self.binding, linear, value)
    }
}

impl<T: bytemuck::Pod> ReadAccess<T> for RwAccessor<T> {
    fn shape(&self) -> Extent {
        self.shape
    }

    fn get(&self, ctx: &GroupCtx<'_>, linear: usize) -> T {
        ctx.load(self.binding, linear)
    }
}

impl<T: bytemuck::Pod> WriteAccess<T> for RwAccessor<T> {
    fn shape(&self) -> Extent {
        self.shape
    }

    fn set(&self, ctx: &mut GroupCtx<'_>, linear: usize, value: T) {
        ctx.store(self.binding, linear, value)
    }
}

/// Token for a task's local staging declaration.
///
/// Addresses one group's scratch storage by (local linear index, slot).
/// With multiplier `m`, each group member owns slots `0..m`.
pub struct LocalAccessor<T> {
    multiplier: u32,
    _elem: PhantomData<fn() -> T>,
}

impl<T> LocalAccessor<T> {
    pub(crate) fn new(multiplier: u32) -> Self {
        Self {
            multiplier,
            _elem: PhantomData,
        }
    }

    /// Slots per group member.
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }
}

impl<T> Clone for LocalAccessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for LocalAccessor<T> {}

impl<T: bytemuck::Pod> LocalAccessor<T> {
    /// Read the staging slot at (local linear index, slot).
    pub fn get(&self, ctx: &GroupCtx<'_>, local_linear: usize, slot: u32) -> T {
        ctx.local_load(local_linear, slot)
    }

    /// Write the staging slot at (local linear index, slot). Visible to
    /// other group members from the next stage on.
    pub fn set(&self, ctx: &mut GroupCtx<'_>, local_linear: usize, slot: u32, value: T) {
        ctx.local_store(local_linear, slot, value)
    }
}
