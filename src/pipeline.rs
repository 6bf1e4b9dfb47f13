//! The super-resolution pipeline: decode, upscale, encode.

use std::path::{Path, PathBuf};

use crate::device::{select_device, Device};
use crate::error::Result;
use crate::image::{self, BgrImage};
use crate::model::{EsrganModel, Network};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the ONNX checkpoint of the RRDB ESRGAN x4 network.
    pub checkpoint: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            checkpoint: PathBuf::from("RRDB_ESRGAN_x4.onnx"),
        }
    }
}

/// Single-image super-resolution pipeline.
///
/// Holds the selected device and the loaded network for the duration of a
/// run. One image per call, synchronous, no internal recovery: the first
/// failure aborts the run and no partial output is written.
pub struct Pipeline {
    device: Device,
    network: Box<dyn Network>,
}

impl Pipeline {
    /// Select a device and load the checkpoint named by `config`.
    ///
    /// # Errors
    ///
    /// Returns a load-kind error if the checkpoint is missing or rejected
    /// by the runtime.
    pub fn new(config: &Config) -> Result<Self> {
        let device = select_device();
        tracing::info!("using device: {device}");

        let model = EsrganModel::load(&config.checkpoint, device)?;

        Ok(Self {
            device,
            network: Box::new(model),
        })
    }

    /// Build a pipeline around an already-constructed network.
    ///
    /// This is the seam for alternative backends and for tests, which
    /// substitute a lightweight fake instead of a real checkpoint.
    #[must_use]
    pub fn with_network(device: Device, network: Box<dyn Network>) -> Self {
        Self { device, network }
    }

    /// Device the pipeline was bound to.
    #[must_use]
    pub fn device(&self) -> Device {
        self.device
    }

    /// Upscale the image at `input_path` and write the result to
    /// `output_path`.
    ///
    /// # Errors
    ///
    /// Propagates decode, compute, and encode failures unchanged; the
    /// output file is only created if every stage succeeds.
    pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input_path: P,
        output_path: Q,
    ) -> Result<()> {
        let input_path = input_path.as_ref();
        let output_path = output_path.as_ref();

        tracing::info!("upscaling {}", input_path.display());

        let img = BgrImage::open(input_path)?;
        let tensor = image::to_tensor(&img);

        tracing::debug!(
            width = img.width(),
            height = img.height(),
            scale = self.network.scale(),
            "running forward pass"
        );
        let upscaled = self.network.forward(&tensor)?;

        let result = image::from_tensor(&upscaled)?;

        tracing::info!("writing {}", output_path.display());
        result.save(output_path)?;

        Ok(())
    }
}
