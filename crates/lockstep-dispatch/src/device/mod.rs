//! Device abstraction and the ordered selection chain.
//!
//! A [`Device`] executes one unit of work: a [`TaskSpec`] (domain +
//! staging), a [`KernelPlan`] (stage table), and the bound host memory.
//!
//! ```text
//! select_device([Gpu, Cpu])
//!   |
//!   |-- probe(Gpu)  -> DeviceUnavailable (no GPU runtime linked)
//!   |-- probe(Cpu)  -> CpuDevice
//!   v
//! Device::dispatch(spec, plan, bindings)
//! ```
//!
//! Selection is an ordered policy list tried in sequence. The first probe
//! that succeeds wins; when all fail the caller gets a structured
//! [`DispatchError::NoDeviceAvailable`] naming everything tried, and
//! decides whether to fall back further or abort with a diagnostic.

mod cpu;

pub use cpu::CpuDevice;

use std::fmt;

use crate::error::{DispatchError, Result};
use crate::plan::{BindingView, KernelPlan, TaskSpec};

/// The kinds of device a selection policy can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// A GPU dispatch runtime. Not linked in this build; probes fail.
    Gpu,
    /// The in-process CPU engine. Always available.
    Cpu,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Gpu => write!(f, "gpu"),
            DeviceKind::Cpu => write!(f, "cpu"),
        }
    }
}

/// A compute device that can execute units of work.
pub trait Device: Send + Sync + std::fmt::Debug {
    /// The kind this device was probed as.
    fn kind(&self) -> DeviceKind;

    /// Human-readable device name.
    fn name(&self) -> &str;

    /// Local (group) memory available to one group, in bytes. Staging
    /// declarations are validated against this before execution.
    fn local_mem_size(&self) -> usize;

    /// Execute one unit of work and block until its effects are visible in
    /// the write bindings.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::StagingTooLarge`] when the staging
    /// declaration exceeds local memory, or [`DispatchError::Fault`] for
    /// unrecoverable engine faults.
    fn dispatch(
        &self,
        spec: &TaskSpec,
        plan: &KernelPlan<'_>,
        bindings: &mut [BindingView<'_>],
    ) -> Result<()>;
}

/// Probe a single device kind.
///
/// # Errors
///
/// Returns [`DispatchError::DeviceUnavailable`] when the kind cannot be
/// provided. GPU probes always fail here: the GPU dispatch runtime is an
/// external collaborator and is not linked into this build.
pub fn probe_device(kind: DeviceKind) -> Result<Box<dyn Device>> {
    match kind {
        DeviceKind::Gpu => Err(DispatchError::DeviceUnavailable(DeviceKind::Gpu)),
        DeviceKind::Cpu => Ok(Box::new(CpuDevice::new())),
    }
}

/// Try an ordered list of selection policies and return the first device
/// that probes successfully.
///
/// # Errors
///
/// Returns [`DispatchError::NoDeviceAvailable`] listing every kind tried
/// when the whole chain fails.
pub fn select_device(policies: &[DeviceKind]) -> Result<Box<dyn Device>> {
    let mut tried = Vec::with_capacity(policies.len());
    for &kind in policies {
        match probe_device(kind) {
            Ok(device) => {
                tracing::info!(device = device.name(), %kind, "selected device");
                return Ok(device);
            }
            Err(err) => {
                tracing::debug!(%kind, error = %err, "device probe failed");
                tried.push(kind);
            }
        }
    }
    Err(DispatchError::NoDeviceAvailable { tried })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_probe_reports_unavailable() {
        assert!(matches!(
            probe_device(DeviceKind::Gpu),
            Err(DispatchError::DeviceUnavailable(DeviceKind::Gpu))
        ));
    }

    #[test]
    fn cpu_probe_succeeds() {
        let device = probe_device(DeviceKind::Cpu).unwrap();
        assert_eq!(device.kind(), DeviceKind::Cpu);
        assert!(device.local_mem_size() > 0);
    }

    #[test]
    fn selection_chain_falls_back_to_cpu() {
        let device = select_device(&[DeviceKind::Gpu, DeviceKind::Cpu]).unwrap();
        assert_eq!(device.kind(), DeviceKind::Cpu);
    }

    #[test]
    fn exhausted_chain_reports_everything_tried() {
        let err = select_device(&[DeviceKind::Gpu]).unwrap_err();
        match err {
            DispatchError::NoDeviceAvailable { tried } => {
                assert_eq!(tried, vec![DeviceKind::Gpu]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_chain_fails() {
        assert!(matches!(
            select_device(&[]),
            Err(DispatchError::NoDeviceAvailable { tried }) if tried.is_empty()
        ));
    }
}
