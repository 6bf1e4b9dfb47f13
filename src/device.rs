//! Compute device selection.
//!
//! Under ONNX Runtime the device is an execution provider bound to the
//! session at build time: the session owns residency for the model
//! parameters, and host tensors are transferred by the runtime on each
//! `run()`. Both providers run the graph in f32, so results are
//! deterministic per device type.

use std::fmt;

use ort::session::builder::SessionBuilder;

/// Where tensor computation executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// NVIDIA GPU via the CUDA execution provider.
    Cuda,
    /// Host CPU.
    Cpu,
}

impl Device {
    /// Register this device's execution provider on a session builder.
    pub(crate) fn apply(self, builder: SessionBuilder) -> Result<SessionBuilder, ort::Error> {
        match self {
            #[cfg(feature = "cuda")]
            Self::Cuda => {
                use ort::execution_providers::CUDAExecutionProvider;
                builder.with_execution_providers([CUDAExecutionProvider::default().build()])
            }
            // Unreachable without the cuda feature: select_device never
            // returns Cuda and the CPU provider is always registered.
            #[cfg(not(feature = "cuda"))]
            Self::Cuda => Ok(builder),
            Self::Cpu => Ok(builder),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cuda => write!(f, "cuda"),
            Self::Cpu => write!(f, "cpu"),
        }
    }
}

/// Pick the compute device for this run.
///
/// Returns [`Device::Cuda`] when the crate is built with the `cuda` feature
/// and the CUDA execution provider reports itself available; otherwise falls
/// back to [`Device::Cpu`]. Never fails.
#[must_use]
pub fn select_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
        if CUDAExecutionProvider::default()
            .is_available()
            .unwrap_or(false)
        {
            return Device::Cuda;
        }
        tracing::debug!("CUDA not available, falling back to CPU");
    }
    Device::Cpu
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_always_succeeds() {
        let device = select_device();
        assert!(matches!(device, Device::Cuda | Device::Cpu));
    }

    #[cfg(not(feature = "cuda"))]
    #[test]
    fn cpu_without_cuda_feature() {
        assert_eq!(select_device(), Device::Cpu);
    }

    #[test]
    fn display_names() {
        assert_eq!(Device::Cpu.to_string(), "cpu");
        assert_eq!(Device::Cuda.to_string(), "cuda");
    }
}
