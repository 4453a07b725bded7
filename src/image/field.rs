//! Dense `f32` fields for intermediate per-pixel values.

use crate::image::{ImageKind, PixelBuffer};
use crate::util::{FeatScanError, FeatScanResult};

/// Row-major `height x width` array of floating-point values.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ScalarField {
    /// Creates a zero-filled field.
    pub fn new(width: usize, height: usize) -> FeatScanResult<Self> {
        let len = field_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Wraps a row-major vector.
    pub fn from_vec(data: Vec<f32>, width: usize, height: usize) -> FeatScanResult<Self> {
        let needed = field_len(width, height)?;
        if data.len() != needed {
            return Err(FeatScanError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Converts a grayscale buffer to a field of intensities.
    pub fn from_gray(img: &PixelBuffer) -> FeatScanResult<Self> {
        if img.kind() != ImageKind::Gray {
            return Err(FeatScanError::InvalidInput("expected a grayscale image"));
        }
        let data = img.as_raw().iter().map(|&v| f32::from(v)).collect();
        Self::from_vec(data, img.width(), img.height())
    }

    /// Returns the field width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the field height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the value at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Returns row `y`.
    pub fn row(&self, y: usize) -> &[f32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Returns all values in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

fn field_len(width: usize, height: usize) -> FeatScanResult<usize> {
    if width == 0 || height == 0 {
        return Err(FeatScanError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(FeatScanError::InvalidDimensions { width, height })
}
