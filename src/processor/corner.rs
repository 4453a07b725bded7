use crate::corner::{as_gray, CornerDetector, CornerMethod, HarrisConfig, MedianDiffConfig};
use crate::image::{ImageKind, PixelBuffer};
use crate::parallel::ParallelExecutor;
use crate::processor::draw::render_corners;
use crate::processor::{check_kind, ParamSource, Processor};
use crate::trace::trace_event;
use crate::util::FeatScanResult;

/// Title of the method question.
pub const METHOD_TITLE: &str = "Corner Detection Method";
/// Method options, in index order.
pub const METHODS: [&str; 2] = ["Harris", "Median-Difference"];

/// Corner detection on gray, RGB and indexed images.
///
/// Color input is converted to grayscale; the result is the grayscale
/// image at half intensity with a white cross per corner.
#[derive(Clone, Debug, Default)]
pub struct CornerProcessor {
    exec: ParallelExecutor,
}

impl CornerProcessor {
    /// Creates a processor running on `exec`.
    pub fn new(exec: ParallelExecutor) -> Self {
        Self { exec }
    }
}

/// Asks for a corner method and its parameters.
pub fn ask_corner_method(params: &mut dyn ParamSource) -> Option<CornerMethod> {
    match params.choose(METHOD_TITLE, &METHODS, 0)? {
        0 => {
            let d = HarrisConfig::default();
            Some(CornerMethod::Harris(HarrisConfig {
                alpha: params.float("alpha", d.alpha)?,
                threshold: params.float("threshold", d.threshold)?,
                dmin: params.float("dmin", d.dmin)?,
            }))
        }
        1 => {
            let d = MedianDiffConfig::default();
            let threshold = params.integer("threshold", i64::from(d.threshold))?;
            Some(CornerMethod::MedianDifference(MedianDiffConfig {
                threshold: threshold.clamp(0, i64::from(u32::MAX)) as u32,
                dmin: params.float("dmin", d.dmin)?,
            }))
        }
        _ => None,
    }
}

impl Processor for CornerProcessor {
    fn name(&self) -> &'static str {
        "corners"
    }

    fn is_enabled(&self, kind: ImageKind) -> bool {
        matches!(kind, ImageKind::Gray | ImageKind::Rgb | ImageKind::Indexed)
    }

    fn run(
        &self,
        image: &PixelBuffer,
        kind: ImageKind,
        params: &mut dyn ParamSource,
    ) -> FeatScanResult<Option<PixelBuffer>> {
        check_kind(self, image, kind)?;
        let Some(method) = ask_corner_method(params) else {
            return Ok(None);
        };
        let gray = as_gray(image);
        let corners = CornerDetector::new(method)
            .with_executor(self.exec.clone())
            .detect(&gray)?;
        trace_event!(debug: "corners_rendered", count = corners.len());
        Ok(Some(render_corners(&gray, &corners)))
    }
}
