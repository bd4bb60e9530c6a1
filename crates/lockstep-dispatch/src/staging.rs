//! Per-group local staging storage.
//!
//! Each group of a dispatch owns a private scratch buffer sized
//! `group_size x multiplier` elements. Members address it by their local
//! linear index plus a slot index below the multiplier, so a member can
//! stage more than one value (the 3D sample stages source and result side
//! by side). Storage is byte-backed; typed access happens at the
//! `bytemuck` boundary, the same way buffers are stored in the engine.
//!
//! Staging lives exactly as long as one group's execution within one
//! dispatch. Contents never persist across submissions.

use crate::error::{DispatchError, Result};

/// Declaration of the staging storage a task needs, carried with the task
/// and validated against the device's local memory size before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagingSpec {
    multiplier: u32,
    elem_size: usize,
}

impl StagingSpec {
    /// Declare staging of `multiplier` slots per group member, each slot
    /// holding one element of `elem_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidStaging`] when `multiplier` is zero.
    pub fn new(multiplier: u32, elem_size: usize) -> Result<Self> {
        if multiplier == 0 {
            return Err(DispatchError::InvalidStaging);
        }
        Ok(Self {
            multiplier,
            elem_size,
        })
    }

    /// Slots per group member.
    pub const fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Element size in bytes.
    pub const fn elem_size(&self) -> usize {
        self.elem_size
    }

    /// Total bytes one group's staging occupies.
    pub const fn bytes_per_group(&self, group_size: usize) -> usize {
        group_size * self.multiplier as usize * self.elem_size
    }

    /// Check the declaration against a device's local memory size.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::StagingTooLarge`] when one group's staging
    /// would not fit.
    pub fn validate(&self, group_size: usize, limit: usize) -> Result<()> {
        let requested = self.bytes_per_group(group_size);
        if requested > limit {
            return Err(DispatchError::StagingTooLarge { requested, limit });
        }
        Ok(())
    }
}

/// One group's staging storage, allocated by the engine for the duration of
/// that group's execution.
pub struct GroupStaging {
    bytes: Vec<u8>,
    multiplier: u32,
    elem_size: usize,
    group_size: usize,
}

impl GroupStaging {
    /// Allocate staging for one group. A task without a staging declaration
    /// gets a zero-capacity instance; any access to it is a kernel fault.
    pub fn allocate(spec: Option<StagingSpec>, group_size: usize) -> Self {
        match spec {
            Some(spec) => Self {
                bytes: vec![0; spec.bytes_per_group(group_size)],
                multiplier: spec.multiplier,
                elem_size: spec.elem_size,
                group_size,
            },
            None => Self {
                bytes: Vec::new(),
                multiplier: 0,
                elem_size: 0,
                group_size,
            },
        }
    }

    fn offset<T: bytemuck::Pod>(&self, local_linear: usize, slot: u32) -> usize {
        assert!(
            self.multiplier > 0,
            "kernel fault: task declared no local staging"
        );
        assert_eq!(
            std::mem::size_of::<T>(),
            self.elem_size,
            "kernel fault: staging element type mismatch"
        );
        assert!(
            local_linear < self.group_size,
            "kernel fault: staging index {local_linear} outside group of {}",
            self.group_size
        );
        assert!(
            slot < self.multiplier,
            "kernel fault: staging slot {slot} >= multiplier {}",
            self.multiplier
        );
        (local_linear * self.multiplier as usize + slot as usize) * self.elem_size
    }

    /// Read the value staged at (local linear index, slot).
    pub fn load<T: bytemuck::Pod>(&self, local_linear: usize, slot: u32) -> T {
        let offset = self.offset::<T>(local_linear, slot);
        *bytemuck::from_bytes(&self.bytes[offset..offset + self.elem_size])
    }

    /// Stage a value at (local linear index, slot).
    pub fn store<T: bytemuck::Pod>(&mut self, local_linear: usize, slot: u32, value: T) {
        let offset = self.offset::<T>(local_linear, slot);
        self.bytes[offset..offset + self.elem_size].copy_from_slice(bytemuck::bytes_of(&value));
    }
}
