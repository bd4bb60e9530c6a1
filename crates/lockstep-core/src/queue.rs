//! The queue: host-side owner of device selection and submission.
//!
//! A [`Queue`] wraps the device chosen by an ordered selection-policy list
//! and submits one unit of work at a time. `submit` blocks until the work's
//! effects are visible in the write bindings - that return is the
//! synchronization point of the buffer lifecycle.

use lockstep_dispatch::{select_device, Device, DeviceKind};

use crate::error::{Error, Result};
use crate::task::Task;

/// Host-side submission queue bound to one selected device.
pub struct Queue {
    device: Box<dyn Device>,
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("device_kind", &self.device.kind())
            .field("device_name", &self.device.name())
            .finish()
    }
}

impl Queue {
    /// Select a device with the samples' default preference: GPU first,
    /// CPU as fallback.
    ///
    /// # Errors
    ///
    /// Returns the dispatch selection error when the whole chain fails.
    pub fn new() -> Result<Self> {
        Self::with_policies(&[DeviceKind::Gpu, DeviceKind::Cpu])
    }

    /// Select a device by trying `policies` in order.
    ///
    /// # Errors
    ///
    /// Returns `NoDeviceAvailable` naming everything tried when no policy
    /// succeeds. Callers decide whether to fall back further or abort with
    /// a diagnostic.
    #[tracing::instrument]
    pub fn with_policies(policies: &[DeviceKind]) -> Result<Self> {
        let device = select_device(policies)?;
        Ok(Self { device })
    }

    /// Wrap an already-constructed device.
    pub fn with_device(device: Box<dyn Device>) -> Self {
        Self { device }
    }

    /// Kind of the selected device.
    pub fn device_kind(&self) -> DeviceKind {
        self.device.kind()
    }

    /// Name of the selected device.
    pub fn device_name(&self) -> &str {
        self.device.name()
    }

    /// Local (group) memory of the selected device, in bytes.
    pub fn local_mem_size(&self) -> usize {
        self.device.local_mem_size()
    }

    /// Submit one unit of work and block until its effects are visible on
    /// the host.
    ///
    /// All writes the kernel produced become visible together when this
    /// returns; there is no partial visibility mid-dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTask`] for a task with no bindings or no
    /// stages, and dispatch errors for staging or engine failures.
    #[tracing::instrument(skip(self, task), fields(range = %task.range(), stages = task.stage_count()))]
    pub fn submit(&self, task: Task<'_>) -> Result<()> {
        if task.binding_count() == 0 {
            return Err(Error::EmptyTask("no buffer views bound"));
        }
        if task.stage_count() == 0 {
            return Err(Error::EmptyTask("no stages pushed"));
        }
        let (spec, plan, mut bindings) = task.into_parts();
        self.device.dispatch(&spec, &plan, &mut bindings)?;
        tracing::debug!(device = self.device.name(), "unit of work retired");
        Ok(())
    }
}
