//! Corner detection pipelines.
//!
//! Two responses are available: the Harris structure-tensor response and
//! the simpler median-difference response. Both feed the same
//! threshold / suppression stages and return corners strongest first.

pub mod harris;
pub mod median_diff;

pub use harris::{
    detect_harris, harris_response, harris_response_of, local_maxima_above, structure_tensor,
    StructureTensor,
};
pub use median_diff::{detect_median_diff, median_difference};

use crate::candidate::nms::Corner;
use crate::image::{ImageKind, PixelBuffer};
use crate::parallel::ParallelExecutor;
use crate::util::FeatScanResult;
use std::borrow::Cow;

/// Parameters of the Harris pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct HarrisConfig {
    /// Sensitivity `alpha` in `det - alpha * trace^2`.
    pub alpha: f32,
    /// Minimum response for a corner.
    pub threshold: f32,
    /// Minimum distance between reported corners.
    pub dmin: f32,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            threshold: 20000.0,
            dmin: 10.0,
        }
    }
}

/// Parameters of the median-difference pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct MedianDiffConfig {
    /// Minimum absolute deviation from the local median.
    pub threshold: u32,
    /// Minimum distance between reported corners.
    pub dmin: f32,
}

impl Default for MedianDiffConfig {
    fn default() -> Self {
        Self {
            threshold: 50,
            dmin: 10.0,
        }
    }
}

/// Corner response selection.
#[derive(Clone, Debug, PartialEq)]
pub enum CornerMethod {
    /// Harris structure-tensor response.
    Harris(HarrisConfig),
    /// Absolute difference to the 3x3 median.
    MedianDifference(MedianDiffConfig),
}

impl Default for CornerMethod {
    fn default() -> Self {
        CornerMethod::Harris(HarrisConfig::default())
    }
}

/// Runs a corner pipeline on images of any kind.
#[derive(Clone, Debug, Default)]
pub struct CornerDetector {
    method: CornerMethod,
    exec: ParallelExecutor,
}

impl CornerDetector {
    /// Creates a detector using the global worker pool.
    pub fn new(method: CornerMethod) -> Self {
        Self {
            method,
            exec: ParallelExecutor::new(),
        }
    }

    /// Replaces the executor.
    pub fn with_executor(mut self, exec: ParallelExecutor) -> Self {
        self.exec = exec;
        self
    }

    /// Returns the configured method.
    pub fn method(&self) -> &CornerMethod {
        &self.method
    }

    /// Detects corners, converting color input to grayscale first.
    pub fn detect(&self, image: &PixelBuffer) -> FeatScanResult<Vec<Corner>> {
        let gray = as_gray(image);
        match &self.method {
            CornerMethod::Harris(cfg) => detect_harris(&gray, cfg, &self.exec),
            CornerMethod::MedianDifference(cfg) => detect_median_diff(&gray, cfg, &self.exec),
        }
    }
}

/// Borrows gray buffers and converts everything else.
pub(crate) fn as_gray(image: &PixelBuffer) -> Cow<'_, PixelBuffer> {
    match image.kind() {
        ImageKind::Gray => Cow::Borrowed(image),
        ImageKind::Rgb | ImageKind::Indexed => Cow::Owned(image.to_gray()),
    }
}
