//! FeatScan is a CPU image-analysis toolkit for corner detection and
//! correlation-based pattern matching.
//!
//! The engine is built from a row-parallel separable convolution, a Harris
//! structure-tensor response, a median-difference response, non-maximum
//! suppression with minimum-distance deduplication, and an exhaustive NCC
//! matcher backed by a bounded top-K selector. Both pipelines are exposed
//! to host applications through the [`processor::Processor`] interface.
//!
//! Parallelism uses `rayon` (default feature); `tracing` and `image-io`
//! are optional.

pub mod candidate;
pub mod corner;
pub mod filter;
pub mod image;
pub mod matching;
pub mod parallel;
pub mod processor;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io::{load_image, save_image};
pub use image::{ImageKind, PixelBuffer, Rect, Roi, RoiMut, ScalarField};
pub use util::{FeatScanError, FeatScanResult};

pub use candidate::nms::Corner;
pub use candidate::topk::{BoundedTopK, Scored};
pub use corner::{CornerDetector, CornerMethod, HarrisConfig, MedianDiffConfig};
pub use matching::{Match, MatchConfig, Matcher, TemplateStats};
pub use parallel::ParallelExecutor;
pub use processor::{
    registry, Cancel, Defaults, ParamSource, ParamValue, PatternConfig, PatternOperation, Preset,
    Processor,
};
