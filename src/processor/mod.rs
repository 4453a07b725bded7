//! Image processors invoked by a host application.
//!
//! A [`Processor`] declares which image kinds it accepts and turns an input
//! image into a derived output image. Parameters are requested through a
//! [`ParamSource`]; when the source cancels, `run` returns `Ok(None)`.

pub mod corner;
pub mod draw;
pub mod params;
pub mod pattern;

pub use corner::{ask_corner_method, CornerProcessor};
pub use draw::{render_corners, render_matches};
pub use params::{Cancel, Defaults, ParamSource, ParamValue, Preset};
pub use pattern::{match_pattern, PatternConfig, PatternOperation, PatternProcessor};

use crate::image::{ImageKind, PixelBuffer};
use crate::util::{FeatScanError, FeatScanResult};

/// Capability interface of an image processor.
pub trait Processor: Send + Sync {
    /// Short stable name used for lookup.
    fn name(&self) -> &'static str;

    /// Returns true if the processor accepts images of `kind`.
    fn is_enabled(&self, kind: ImageKind) -> bool;

    /// Processes `image`; `Ok(None)` means the user cancelled.
    fn run(
        &self,
        image: &PixelBuffer,
        kind: ImageKind,
        params: &mut dyn ParamSource,
    ) -> FeatScanResult<Option<PixelBuffer>>;
}

/// Returns every built-in processor with default settings.
pub fn registry() -> Vec<Box<dyn Processor>> {
    vec![
        Box::new(CornerProcessor::default()),
        Box::new(PatternProcessor::default()),
    ]
}

/// Looks up a built-in processor by name.
pub fn find_processor(name: &str) -> Option<Box<dyn Processor>> {
    registry().into_iter().find(|p| p.name() == name)
}

pub(crate) fn check_kind(
    processor: &dyn Processor,
    image: &PixelBuffer,
    kind: ImageKind,
) -> FeatScanResult<()> {
    if kind != image.kind() {
        return Err(FeatScanError::InvalidInput("declared kind differs from the image"));
    }
    if !processor.is_enabled(kind) {
        return Err(FeatScanError::InvalidInput("image kind not supported by processor"));
    }
    Ok(())
}
