use crate::image::{ImageKind, PixelBuffer, Rect, RoiMut};
use crate::matching::{adjust_pattern, Match, MatchConfig, Matcher, PatternAdjust, TemplateStats};
use crate::parallel::ParallelExecutor;
use crate::processor::draw::render_matches;
use crate::processor::{check_kind, ParamSource, Processor};
use crate::trace::trace_event;
use crate::util::FeatScanResult;
use std::borrow::Cow;

/// Title of the operation question.
pub const OPERATION_TITLE: &str = "Pattern Matching Operation";
/// Operation options, in index order.
pub const OPERATIONS: [&str; 3] = [
    "Pattern Matching",
    "PM with modified Pattern",
    "User defined Pattern",
];

/// How the pattern is obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternOperation {
    /// Use the predefined rectangle as is.
    Predefined,
    /// Use the predefined rectangle after a contrast/intensity change.
    Modified,
    /// Use a rectangle chosen by the user.
    UserDefined,
}

impl PatternOperation {
    /// Maps an option index to an operation.
    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Self::Predefined),
            1 => Some(Self::Modified),
            2 => Some(Self::UserDefined),
            _ => None,
        }
    }
}

/// Pattern-matching parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternConfig {
    /// Pattern rectangle for the predefined operations.
    pub predefined: Rect,
    /// Change applied by [`PatternOperation::Modified`].
    pub adjust: PatternAdjust,
    /// Matching parameters.
    pub matching: MatchConfig,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            predefined: Rect::new(200, 310, 70, 50),
            adjust: PatternAdjust::default(),
            matching: MatchConfig::default(),
        }
    }
}

/// Finds the best non-overlapping occurrences of the pattern at `rect`.
///
/// For [`PatternOperation::Modified`] the pattern is read from an adjusted
/// copy of `image`; the search always runs on `image` itself.
pub fn match_pattern(
    image: &PixelBuffer,
    op: PatternOperation,
    rect: Rect,
    cfg: &PatternConfig,
    exec: &ParallelExecutor,
) -> FeatScanResult<Vec<Match>> {
    let source = if op == PatternOperation::Modified {
        let mut copy = image.clone();
        adjust_pattern(&mut RoiMut::new(&mut copy, rect), &cfg.adjust)?;
        Cow::Owned(copy)
    } else {
        Cow::Borrowed(image)
    };
    let template = TemplateStats::from_roi(&source.roi(rect))?;
    Matcher::new(template)
        .with_config(cfg.matching.clone())
        .with_executor(exec.clone())
        .match_image(image)
}

/// Correlation-based pattern matching on grayscale images.
///
/// The result is an RGB copy of the input with a red outline per match.
#[derive(Clone, Debug, Default)]
pub struct PatternProcessor {
    cfg: PatternConfig,
    exec: ParallelExecutor,
}

impl PatternProcessor {
    /// Creates a processor with explicit configuration.
    pub fn new(cfg: PatternConfig, exec: ParallelExecutor) -> Self {
        Self { cfg, exec }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PatternConfig {
        &self.cfg
    }
}

impl Processor for PatternProcessor {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn is_enabled(&self, kind: ImageKind) -> bool {
        kind == ImageKind::Gray
    }

    fn run(
        &self,
        image: &PixelBuffer,
        kind: ImageKind,
        params: &mut dyn ParamSource,
    ) -> FeatScanResult<Option<PixelBuffer>> {
        check_kind(self, image, kind)?;
        let Some(op) = params
            .choose(OPERATION_TITLE, &OPERATIONS, 0)
            .and_then(PatternOperation::from_index)
        else {
            return Ok(None);
        };
        let rect = match op {
            PatternOperation::UserDefined => match params.rect("pattern", self.cfg.predefined) {
                Some(rect) => rect,
                None => return Ok(None),
            },
            PatternOperation::Predefined | PatternOperation::Modified => self.cfg.predefined,
        };

        let matches = match_pattern(image, op, rect, &self.cfg, &self.exec)?;
        trace_event!(debug: "matches_rendered", count = matches.len());
        Ok(Some(render_matches(image, &matches)))
    }
}
