//! Template matching by normalized cross-correlation.
//!
//! For every top-left offset `(x, y)` where the template fits, the Pearson
//! correlation between the template `T` and the window `I` is
//!
//! ```text
//! r = (sum(I * T) - n * mean(I) * mean(T)) / (sqrt(sum(I^2) - n * mean(I)^2) * std(T) * sqrt(n))
//! ```
//!
//! with `n = width * height`. Template statistics are computed once; the
//! window sums are recomputed from scratch at every offset, so a scan costs
//! `O(W * H * w * h)`. Windows whose variance term is at most
//! [`MatchConfig::min_var_i`] (flat windows) or whose score is not finite
//! are skipped instead of being ranked.

mod pattern;
mod scan;

pub use pattern::{adjust_pattern, PatternAdjust};
pub use scan::{scan_ncc, score_at};

use crate::candidate::overlap::dedup_overlapping;
use crate::candidate::topk::{BoundedTopK, Scored};
use crate::image::{ImageKind, PixelBuffer, Rect, Roi};
use crate::parallel::ParallelExecutor;
use crate::util::{FeatScanError, FeatScanResult};

/// Match location and correlation score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Matched window in image coordinates.
    pub rect: Rect,
    /// Correlation coefficient, approximately in `[-1, 1]`.
    pub score: f32,
}

impl Scored for Match {
    fn score(&self) -> f32 {
        self.score
    }
}

/// Matching parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Number of best windows ranked and the maximum number reported.
    pub n_results: usize,
    /// Windows with `sum(I^2) - n * mean(I)^2` at or below this are skipped.
    pub min_var_i: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            n_results: 100,
            min_var_i: 1e-8,
        }
    }
}

/// Precomputed template samples and statistics.
#[derive(Clone, Debug)]
pub struct TemplateStats {
    width: usize,
    height: usize,
    mean: f64,
    std_dev: f64,
    values: Vec<f64>,
}

impl TemplateStats {
    /// Reads the template through `roi` and computes its mean and
    /// (population) standard deviation.
    ///
    /// Fails with `OutOfRange` if the rectangle reaches past the buffer and
    /// with `DegenerateTemplate` if the template is constant.
    pub fn from_roi(roi: &Roi<'_>) -> FeatScanResult<Self> {
        if roi.buffer().kind() != ImageKind::Gray {
            return Err(FeatScanError::InvalidInput("template must be grayscale"));
        }
        let width = roi.width();
        let height = roi.height();
        if width == 0 || height == 0 {
            return Err(FeatScanError::InvalidDimensions { width, height });
        }

        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                values.push(f64::from(roi.get_pixel(x, y)?));
            }
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        if variance <= 1e-12 {
            return Err(FeatScanError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        Ok(Self {
            width,
            height,
            mean,
            std_dev: variance.sqrt(),
            values,
        })
    }

    /// Returns the template width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the mean template intensity.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the population standard deviation of the template.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Returns the template samples in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Exhaustive NCC matcher for one template.
#[derive(Clone, Debug)]
pub struct Matcher {
    template: TemplateStats,
    cfg: MatchConfig,
    exec: ParallelExecutor,
}

impl Matcher {
    /// Creates a matcher with default configuration.
    pub fn new(template: TemplateStats) -> Self {
        Self {
            template,
            cfg: MatchConfig::default(),
            exec: ParallelExecutor::new(),
        }
    }

    /// Replaces the matching configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Replaces the executor.
    pub fn with_executor(mut self, exec: ParallelExecutor) -> Self {
        self.exec = exec;
        self
    }

    /// Returns the template statistics.
    pub fn template(&self) -> &TemplateStats {
        &self.template
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Ranks every window and keeps the `n_results` best.
    pub fn rank(&self, image: &PixelBuffer) -> FeatScanResult<BoundedTopK<Match>> {
        scan_ncc(image, &self.template, &self.cfg, &self.exec)
    }

    /// Returns the best pairwise non-overlapping matches, best first.
    pub fn match_image(&self, image: &PixelBuffer) -> FeatScanResult<Vec<Match>> {
        let mut ranked = self.rank(image)?;
        Ok(dedup_overlapping(&mut ranked, self.cfg.n_results))
    }
}
