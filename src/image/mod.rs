//! Pixel buffers, rectangular views and scalar fields.
//!
//! `PixelBuffer` owns row-major 8-bit samples in one of three layouts
//! (gray, packed RGB, palette indices). Pipelines never mutate the caller's
//! buffer; they read it and produce a freshly allocated output. `Roi` is a
//! borrowed rectangular view whose accesses are checked against the backing
//! buffer rather than against its own rectangle.

use crate::util::{FeatScanError, FeatScanResult};

pub mod field;
#[cfg(feature = "image-io")]
pub mod io;
pub mod roi;

pub use field::ScalarField;
pub use roi::{Rect, Roi, RoiMut};

/// Pixel format of a buffer, used by processors to gate availability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// One 8-bit luminance sample per pixel.
    Gray,
    /// Three 8-bit samples per pixel in R, G, B order.
    Rgb,
    /// One 8-bit palette index per pixel.
    Indexed,
}

impl ImageKind {
    /// Number of stored samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            ImageKind::Rgb => 3,
            ImageKind::Gray | ImageKind::Indexed => 1,
        }
    }
}

/// Owned raster image with row-major samples.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    kind: ImageKind,
    data: Vec<u8>,
    palette: Vec<[u8; 3]>,
}

impl PixelBuffer {
    /// Creates a zero-filled buffer.
    ///
    /// Indexed buffers get a 256-entry gray ramp palette.
    pub fn new(width: usize, height: usize, kind: ImageKind) -> FeatScanResult<Self> {
        let needed = sample_count(width, height, kind)?;
        let palette = match kind {
            ImageKind::Indexed => (0..=255u8).map(|v| [v, v, v]).collect(),
            ImageKind::Gray | ImageKind::Rgb => Vec::new(),
        };
        Ok(Self {
            width,
            height,
            kind,
            data: vec![0u8; needed],
            palette,
        })
    }

    /// Wraps a contiguous grayscale buffer.
    pub fn from_gray(data: Vec<u8>, width: usize, height: usize) -> FeatScanResult<Self> {
        Self::from_parts(data, width, height, ImageKind::Gray, Vec::new())
    }

    /// Wraps a contiguous RGB buffer (3 samples per pixel).
    pub fn from_rgb(data: Vec<u8>, width: usize, height: usize) -> FeatScanResult<Self> {
        Self::from_parts(data, width, height, ImageKind::Rgb, Vec::new())
    }

    /// Wraps palette indices together with their palette.
    pub fn from_indexed(
        data: Vec<u8>,
        width: usize,
        height: usize,
        palette: Vec<[u8; 3]>,
    ) -> FeatScanResult<Self> {
        if palette.is_empty() {
            return Err(FeatScanError::InvalidInput("indexed image requires a palette"));
        }
        if data.iter().any(|&idx| usize::from(idx) >= palette.len()) {
            return Err(FeatScanError::InvalidInput("palette index out of range"));
        }
        Self::from_parts(data, width, height, ImageKind::Indexed, palette)
    }

    fn from_parts(
        data: Vec<u8>,
        width: usize,
        height: usize,
        kind: ImageKind,
        palette: Vec<[u8; 3]>,
    ) -> FeatScanResult<Self> {
        let needed = sample_count(width, height, kind)?;
        if data.len() < needed {
            return Err(FeatScanError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(FeatScanError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            kind,
            data,
            palette,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel layout.
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// Returns the raw samples in row-major order.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Returns the palette (empty unless the buffer is indexed).
    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    /// Returns the raw samples of row `y` (`width * channels` long).
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let stride = self.width * self.kind.channels();
        self.data.get(y * stride..(y + 1) * stride)
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Reads the pixel at `(x, y)`.
    ///
    /// Gray and indexed buffers return the stored sample; RGB buffers return
    /// the color packed as `0xRRGGBB`.
    pub fn get_pixel(&self, x: usize, y: usize) -> FeatScanResult<u32> {
        let idx = self.index_of(x, y)?;
        Ok(match self.kind {
            ImageKind::Gray | ImageKind::Indexed => u32::from(self.data[idx]),
            ImageKind::Rgb => {
                let px = &self.data[idx..idx + 3];
                (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2])
            }
        })
    }

    /// Writes the pixel at `(x, y)`.
    ///
    /// Gray values above 255 saturate. RGB values are `0xRRGGBB`. Indexed
    /// values must address an existing palette entry.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: u32) -> FeatScanResult<()> {
        let idx = self.index_of(x, y)?;
        match self.kind {
            ImageKind::Gray => self.data[idx] = value.min(255) as u8,
            ImageKind::Indexed => {
                if value as usize >= self.palette.len() {
                    return Err(FeatScanError::InvalidInput("palette index out of range"));
                }
                self.data[idx] = value as u8;
            }
            ImageKind::Rgb => {
                self.data[idx] = (value >> 16) as u8;
                self.data[idx + 1] = (value >> 8) as u8;
                self.data[idx + 2] = value as u8;
            }
        }
        Ok(())
    }

    /// Returns the pixel color regardless of layout.
    pub fn rgb_at(&self, x: usize, y: usize) -> FeatScanResult<[u8; 3]> {
        let idx = self.index_of(x, y)?;
        Ok(match self.kind {
            ImageKind::Gray => [self.data[idx]; 3],
            ImageKind::Indexed => self.palette[usize::from(self.data[idx])],
            ImageKind::Rgb => [self.data[idx], self.data[idx + 1], self.data[idx + 2]],
        })
    }

    /// Returns a grayscale copy (BT.601 luma for color input).
    pub fn to_gray(&self) -> PixelBuffer {
        let data = match self.kind {
            ImageKind::Gray => self.data.clone(),
            ImageKind::Rgb => self
                .data
                .chunks_exact(3)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect(),
            ImageKind::Indexed => self
                .data
                .iter()
                .map(|&idx| {
                    let [r, g, b] = self.palette[usize::from(idx)];
                    luma(r, g, b)
                })
                .collect(),
        };
        PixelBuffer {
            width: self.width,
            height: self.height,
            kind: ImageKind::Gray,
            data,
            palette: Vec::new(),
        }
    }

    /// Returns an RGB copy.
    pub fn to_rgb(&self) -> PixelBuffer {
        let data = match self.kind {
            ImageKind::Rgb => self.data.clone(),
            ImageKind::Gray => self.data.iter().flat_map(|&v| [v, v, v]).collect(),
            ImageKind::Indexed => self
                .data
                .iter()
                .flat_map(|&idx| self.palette[usize::from(idx)])
                .collect(),
        };
        PixelBuffer {
            width: self.width,
            height: self.height,
            kind: ImageKind::Rgb,
            data,
            palette: Vec::new(),
        }
    }

    /// Returns a borrowed view over `rect`.
    pub fn roi(&self, rect: Rect) -> Roi<'_> {
        Roi::new(self, rect)
    }

    fn index_of(&self, x: usize, y: usize) -> FeatScanResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(FeatScanError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) * self.kind.channels())
    }
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((sum + 500) / 1000) as u8
}

fn sample_count(width: usize, height: usize, kind: ImageKind) -> FeatScanResult<usize> {
    if width == 0 || height == 0 {
        return Err(FeatScanError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(kind.channels()))
        .ok_or(FeatScanError::InvalidDimensions { width, height })
}
