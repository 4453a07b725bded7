//! Error types for featscan.

use thiserror::Error;

/// Result alias for featscan operations.
pub type FeatScanResult<T> = std::result::Result<T, FeatScanError>;

/// Errors that can occur when running featscan pipelines.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FeatScanError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Width or height is zero or the pixel count overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer is shorter than the declared dimensions require.
    #[error("buffer too small: needed {needed} samples, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A pixel access landed outside the backing buffer.
    #[error("pixel ({x}, {y}) out of range for {width}x{height} buffer")]
    OutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Convolution kernels must be non-empty with odd length.
    #[error("invalid kernel length {len}: must be odd and non-zero")]
    InvalidKernel { len: usize },
    /// The template cannot be correlated (e.g. constant intensity).
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// The worker pool could not be created.
    #[error("thread pool error: {reason}")]
    ThreadPool { reason: String },
    /// Image decoding or encoding failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
}
