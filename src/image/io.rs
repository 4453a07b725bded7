//! Loading and saving pixel buffers via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageKind, PixelBuffer};
use crate::util::{FeatScanError, FeatScanResult};
use std::path::Path;

/// Converts a decoded image, keeping color when the source has any.
pub fn buffer_from_dynamic_image(img: &image::DynamicImage) -> FeatScanResult<PixelBuffer> {
    if img.color().has_color() {
        let rgb = img.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        PixelBuffer::from_rgb(rgb.into_raw(), width, height)
    } else {
        let gray = img.to_luma8();
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        PixelBuffer::from_gray(gray.into_raw(), width, height)
    }
}

/// Loads an image from disk as a gray or RGB buffer.
pub fn load_image<P: AsRef<Path>>(path: P) -> FeatScanResult<PixelBuffer> {
    let img = image::open(path).map_err(|err| FeatScanError::ImageIo {
        reason: err.to_string(),
    })?;
    buffer_from_dynamic_image(&img)
}

/// Saves a buffer; indexed buffers are expanded to RGB first.
pub fn save_image<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> FeatScanResult<()> {
    let width = u32::try_from(buffer.width())
        .map_err(|_| FeatScanError::InvalidInput("image too wide to encode"))?;
    let height = u32::try_from(buffer.height())
        .map_err(|_| FeatScanError::InvalidInput("image too tall to encode"))?;
    let result = match buffer.kind() {
        ImageKind::Gray => image::GrayImage::from_raw(width, height, buffer.as_raw().to_vec())
            .ok_or(FeatScanError::InvalidInput("gray buffer size mismatch"))?
            .save(path),
        ImageKind::Rgb => image::RgbImage::from_raw(width, height, buffer.as_raw().to_vec())
            .ok_or(FeatScanError::InvalidInput("rgb buffer size mismatch"))?
            .save(path),
        ImageKind::Indexed => {
            let rgb = buffer.to_rgb();
            image::RgbImage::from_raw(width, height, rgb.as_raw().to_vec())
                .ok_or(FeatScanError::InvalidInput("rgb buffer size mismatch"))?
                .save(path)
        }
    };
    result.map_err(|err| FeatScanError::ImageIo {
        reason: err.to_string(),
    })
}
