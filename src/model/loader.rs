//! Checkpoint loading and the ONNX-backed network.

use std::path::Path;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Tensor;

use crate::device::Device;
use crate::error::{Error, Result};
use crate::image::ImageTensor;

use super::{Hyperparams, Network, RRDB_ESRGAN_X4};

/// The production network: an ONNX export of the RRDB ESRGAN x4
/// architecture, executed by ONNX Runtime on the selected device.
///
/// An ONNX checkpoint is self-describing, so loading doubles as strict
/// validation: a graph whose parameters do not match what the export
/// declared fails at `commit_from_file`, never silently. Exported graphs
/// are frozen in inference mode, so there is no eval toggle to set.
#[derive(Debug)]
pub struct EsrganModel {
    session: Session,
    hyperparams: Hyperparams,
}

impl EsrganModel {
    /// Load the checkpoint at `path` and bind it to `device`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CheckpointNotFound`] if the path does not exist and
    /// [`Error::Load`] if the runtime rejects the file.
    pub fn load<P: AsRef<Path>>(path: P, device: Device) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::CheckpointNotFound {
                path: path.to_path_buf(),
            });
        }

        tracing::info!("loading checkpoint {} ({device})", path.display());

        let load_err = |source| Error::Load {
            path: path.to_path_buf(),
            source,
        };

        let builder = Session::builder().map_err(load_err)?;
        let mut builder = device.apply(builder).map_err(load_err)?;
        let session = builder.commit_from_file(path).map_err(load_err)?;

        Ok(Self {
            session,
            hyperparams: RRDB_ESRGAN_X4,
        })
    }
}

impl Network for EsrganModel {
    fn scale(&self) -> u32 {
        self.hyperparams.scale
    }

    fn forward(&mut self, input: &ImageTensor) -> Result<ImageTensor> {
        let in_shape = input.dim();

        let input_value =
            Tensor::from_array(input.clone()).map_err(|source| Error::Compute { source })?;

        let outputs = self
            .session
            .run(ort::inputs![input_value])
            .map_err(|source| Error::Compute { source })?;

        let output = outputs.values().next().ok_or_else(|| Error::ShapeMismatch {
            expected: "one output tensor".to_string(),
            actual: "no output".to_string(),
        })?;

        let result = extract_array4(&output)?;

        // The x4 factor is the network's contract; verify rather than fix up.
        let scale = self.hyperparams.scale as usize;
        let expected = (1, in_shape.1, in_shape.2 * scale, in_shape.3 * scale);
        if result.dim() != expected {
            return Err(Error::ShapeMismatch {
                expected: format!("{expected:?}"),
                actual: format!("{:?}", result.dim()),
            });
        }

        Ok(result)
    }
}

/// Extract a 4D array from an ONNX value.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn extract_array4(value: &ort::value::ValueRef<'_>) -> Result<Array4<f32>> {
    let (shape_info, data) = value
        .try_extract_tensor::<f32>()
        .map_err(|source| Error::Compute { source })?;

    // Safe: tensor dimensions are always non-negative and within bounds
    let dims: Vec<usize> = shape_info.iter().map(|&x| x as usize).collect();

    if dims.len() != 4 {
        return Err(Error::ShapeMismatch {
            expected: "4D tensor".to_string(),
            actual: format!("{}D tensor", dims.len()),
        });
    }

    Array4::from_shape_vec((dims[0], dims[1], dims[2], dims[3]), data.to_vec()).map_err(|_| {
        Error::ShapeMismatch {
            expected: format!("{dims:?}"),
            actual: "reshape failed".to_string(),
        }
    })
}
