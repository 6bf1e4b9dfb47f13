//! Image loading, tensor conversion, and saving utilities.

mod load;
mod save;

pub use load::to_tensor;
pub use save::from_tensor;

use std::path::Path;

use ndarray::Array4;

use crate::error::{Error, Result};

/// Image tensor in NCHW format (batch, channels, height, width).
/// Values are normalized to [0, 1] and channels are in RGB order, the layout
/// the network expects.
pub type ImageTensor = Array4<f32>;

/// Number of channels in a color image.
pub const COLOR_CHANNELS: usize = 3;

/// An 8-bit color image in the on-disk convention: height x width x channel,
/// channels in BGR order, pixel values in [0, 255].
///
/// Decoding and encoding translate between this convention and whatever the
/// codec uses internally, so the rest of the pipeline only ever sees BGR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgrImage {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl BgrImage {
    /// Create an image from a raw HWC/BGR buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != height * width * 3`.
    #[must_use]
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            height as usize * width as usize * COLOR_CHANNELS,
            "buffer length must be height * width * 3"
        );
        Self {
            data,
            width,
            height,
        }
    }

    /// Decode a color image from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the file is missing or not a decodable
    /// raster format.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        load::read_image(path.as_ref())
    }

    /// Encode the image to disk, inferring the format from the extension.
    ///
    /// The file is written to a sibling temporary path and renamed into
    /// place, so a failed encode never leaves a partial output behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] if the location is unwritable or the
    /// encoder fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        save::write_image(self, path.as_ref())
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw HWC/BGR pixel buffer.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn pixel(&self, x: usize, y: usize) -> [u8; COLOR_CHANNELS] {
        let idx = (y * self.width as usize + x) * COLOR_CHANNELS;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// Check that a tensor has the (1, 3, H, W) layout the pipeline works in.
pub(crate) fn check_nchw(tensor: &ImageTensor) -> Result<(usize, usize)> {
    let shape = tensor.shape();
    if shape[0] != 1 || shape[1] != COLOR_CHANNELS {
        return Err(Error::ShapeMismatch {
            expected: format!("(1, {COLOR_CHANNELS}, H, W)"),
            actual: format!("{shape:?}"),
        });
    }
    Ok((shape[2], shape[3]))
}
