//! Device-visible views over host-owned data.
//!
//! A [`Buffer`] borrows a host slice for the lifetime of the view. That
//! borrow is the ownership window of the modelled runtime: while the view
//! (or a task bound to it) is alive, the host cannot touch the underlying
//! array, and once the borrow ends - a lexical boundary, never a manual
//! deallocation - the host sees every write the submitted work produced.
//!
//! # Type safety
//!
//! `T` must be [`bytemuck::Pod`]; the engine stores and moves raw bytes and
//! re-types them only at this boundary.

use lockstep_dispatch::Extent;

use crate::error::{Error, Result};

/// A shaped, device-visible view of a host-owned slice.
pub struct Buffer<'h, T: bytemuck::Pod> {
    host: &'h mut [T],
    shape: Extent,
}

impl<'h, T: bytemuck::Pod> Buffer<'h, T> {
    /// Derive a device-visible view of `host` with the given shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when the shape does not cover
    /// exactly `host.len()` elements.
    pub fn from_slice(host: &'h mut [T], shape: Extent) -> Result<Self> {
        if shape.len() != host.len() {
            return Err(Error::ShapeMismatch {
                expected: shape.len(),
                actual: host.len(),
            });
        }
        tracing::debug!(
            shape = %shape,
            bytes = std::mem::size_of_val(host),
            "derived device buffer"
        );
        Ok(Self { host, shape })
    }

    /// Derive a 1D view covering the whole slice.
    pub fn linear(host: &'h mut [T]) -> Result<Self> {
        let shape = Extent::d1(host.len() as u32);
        Self::from_slice(host, shape)
    }

    /// The declared shape.
    pub fn shape(&self) -> Extent {
        self.shape
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.host.len()
    }

    /// True when the view covers no elements.
    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
    }

    /// Element size in bytes.
    pub fn element_size(&self) -> usize {
        std::mem::size_of::<T>()
    }

    /// Total size in bytes.
    pub fn size_bytes(&self) -> usize {
        std::mem::size_of_val(self.host)
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.host)
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(self.host)
    }
}
