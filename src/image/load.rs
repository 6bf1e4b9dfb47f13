//! Image decoding and tensor conversion.

use std::path::Path;

use ndarray::Array4;

use crate::error::{Error, Result};

use super::{BgrImage, ImageTensor, COLOR_CHANNELS};

/// Decode the image at `path` into the on-disk BGR/HWC convention.
pub(super) fn read_image(path: &Path) -> Result<BgrImage> {
    let img = image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    // The codec hands back RGB; swap into the BGR disk convention.
    let mut data = Vec::with_capacity(rgb.as_raw().len());
    for pixel in rgb.pixels() {
        data.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
    }

    Ok(BgrImage::from_raw(data, width, height))
}

/// Convert an 8-bit BGR image to the normalized tensor the network expects.
///
/// The buffer is:
/// 1. Normalized from [0, 255] to [0, 1]
/// 2. Reordered from BGR to RGB (channel permutation [2, 1, 0])
/// 3. Transposed from HWC to CHW
/// 4. Given a leading batch axis of size 1
#[must_use]
pub fn to_tensor(img: &BgrImage) -> ImageTensor {
    let height = img.height() as usize;
    let width = img.width() as usize;

    let mut tensor = Array4::<f32>::zeros((1, COLOR_CHANNELS, height, width));

    for y in 0..height {
        for x in 0..width {
            let [b, g, r] = img.pixel(x, y);
            tensor[[0, 0, y, x]] = f32::from(r) / 255.0;
            tensor[[0, 1, y, x]] = f32::from(g) / 255.0;
            tensor[[0, 2, y, x]] = f32::from(b) / 255.0;
        }
    }

    tensor
}
