//! Median-difference corner response.
//!
//! The score of a pixel is its absolute deviation from the 3x3 median of
//! its neighbourhood. Isolated structure such as corners and dots deviates
//! strongly from the median, while flat areas and straight edges do not.

use crate::candidate::nms::{suppress_close, Corner};
use crate::corner::MedianDiffConfig;
use crate::filter::median_3x3;
use crate::image::{PixelBuffer, ScalarField};
use crate::parallel::ParallelExecutor;
use crate::trace::{trace_event, trace_span};
use crate::util::FeatScanResult;

/// Returns `|original - median3x3|` for every pixel.
pub fn median_difference(
    gray: &PixelBuffer,
    exec: &ParallelExecutor,
) -> FeatScanResult<ScalarField> {
    let _span = trace_span!("median_difference", width = gray.width(), height = gray.height())
        .entered();
    let median = median_3x3(gray, exec)?;
    let w = gray.width();
    let mut score = ScalarField::new(w, gray.height())?;
    exec.rows(score.as_mut_slice(), w, |y, dst| {
        let orig = gray.as_raw();
        let med = median.as_raw();
        let start = y * w;
        for (x, d) in dst.iter_mut().enumerate() {
            *d = f32::from(orig[start + x].abs_diff(med[start + x]));
        }
        Ok(())
    })?;
    Ok(score)
}

/// Detects median-difference corners at least `cfg.dmin` apart.
pub fn detect_median_diff(
    gray: &PixelBuffer,
    cfg: &MedianDiffConfig,
    exec: &ParallelExecutor,
) -> FeatScanResult<Vec<Corner>> {
    let score = median_difference(gray, exec)?;
    let threshold = cfg.threshold as f32;
    let mut candidates = exec.map_reduce(
        score.height(),
        Vec::new,
        |y, found: &mut Vec<Corner>| {
            for (x, &value) in score.row(y).iter().enumerate() {
                if value > threshold {
                    found.push(Corner { x, y, score: value });
                }
            }
            Ok(())
        },
        Vec::new(),
        |all: &mut Vec<Corner>, part| all.extend(part),
    )?;
    trace_event!("median_candidates", count = candidates.len());
    Ok(suppress_close(&mut candidates, cfg.dmin))
}
