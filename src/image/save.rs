//! Tensor denormalization and atomic image encoding.

use std::fs;
use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb};

use crate::error::{Error, Result};

use super::{check_nchw, BgrImage, ImageTensor, COLOR_CHANNELS};

/// Convert a network output tensor back to an 8-bit BGR image.
///
/// The tensor is:
/// 1. Checked for the (1, 3, H, W) layout (the batch axis must be 1)
/// 2. Clamped to [0, 1], guarding against overshoot from the network
/// 3. Reordered from RGB back to BGR (channel permutation [2, 1, 0])
/// 4. Transposed from CHW to HWC
/// 5. Rescaled by 255 and rounded to the nearest integer
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the tensor is not a single-image
/// 3-channel NCHW tensor.
#[allow(clippy::cast_possible_truncation)]
pub fn from_tensor(tensor: &ImageTensor) -> Result<BgrImage> {
    let (height, width) = check_nchw(tensor)?;

    let mut data = Vec::with_capacity(height * width * COLOR_CHANNELS);
    for y in 0..height {
        for x in 0..width {
            let r = denormalize(tensor[[0, 0, y, x]]);
            let g = denormalize(tensor[[0, 1, y, x]]);
            let b = denormalize(tensor[[0, 2, y, x]]);
            data.extend_from_slice(&[b, g, r]);
        }
    }

    Ok(BgrImage::from_raw(data, width as u32, height as u32))
}

/// Denormalize a value from [0, 1] to [0, 255], clamping first and rounding
/// to the nearest integer.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn denormalize(value: f32) -> u8 {
    // Safe: clamped to [0, 255] before casting
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Encode `img` at `path`, writing through a temporary file.
pub(super) fn write_image(img: &BgrImage, path: &Path) -> Result<()> {
    let encode_err = |source| Error::Encode {
        path: path.to_path_buf(),
        source,
    };

    // Format follows the destination extension, PNG when there is none.
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);

    let (width, height) = (img.width(), img.height());
    let mut rgb = ImageBuffer::<Rgb<u8>, Vec<u8>>::new(width, height);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let [b, g, r] = img.pixel(x, y);
            #[allow(clippy::cast_possible_truncation)]
            rgb.put_pixel(x as u32, y as u32, Rgb([r, g, b]));
        }
    }

    // Write to a sibling temporary path, then rename: either the full output
    // appears or nothing does.
    let temp_path = path.with_extension("tmp");
    if let Err(source) = rgb.save_with_format(&temp_path, format) {
        let _ = fs::remove_file(&temp_path);
        return Err(encode_err(source));
    }

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        encode_err(image::ImageError::IoError(source))
    })
}
