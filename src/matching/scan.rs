//! Dense NCC scan over all template placements.

use crate::candidate::topk::BoundedTopK;
use crate::image::{ImageKind, PixelBuffer, Rect};
use crate::matching::{Match, MatchConfig, TemplateStats};
use crate::parallel::ParallelExecutor;
use crate::trace::{trace_event, trace_span};
use crate::util::{FeatScanError, FeatScanResult};

/// Scores the window with top-left corner `(x, y)`.
///
/// Returns `f32::NEG_INFINITY` when the template does not fit at `(x, y)`,
/// when the window variance term is at most `min_var_i`, or when the score
/// is not finite.
pub fn score_at(
    image: &PixelBuffer,
    tpl: &TemplateStats,
    x: usize,
    y: usize,
    min_var_i: f64,
) -> f32 {
    if image.kind() != ImageKind::Gray
        || image.width() < tpl.width()
        || image.height() < tpl.height()
        || x > image.width() - tpl.width()
        || y > image.height() - tpl.height()
    {
        return f32::NEG_INFINITY;
    }
    window_score(image, tpl, x, y, min_var_i).unwrap_or(f32::NEG_INFINITY)
}

fn window_score(
    image: &PixelBuffer,
    tpl: &TemplateStats,
    x: usize,
    y: usize,
    min_var_i: f64,
) -> Option<f32> {
    let img_width = image.width();
    let tpl_width = tpl.width();
    let raw = image.as_raw();
    let t = tpl.values();
    let n = t.len() as f64;

    let mut dot = 0.0f64;
    let mut sum_i = 0.0f64;
    let mut sum_i2 = 0.0f64;
    for ty in 0..tpl.height() {
        let start = (y + ty) * img_width + x;
        let img_row = &raw[start..start + tpl_width];
        let tpl_row = &t[ty * tpl_width..(ty + 1) * tpl_width];
        for (&value, &tv) in img_row.iter().zip(tpl_row) {
            let value = f64::from(value);
            dot += value * tv;
            sum_i += value;
            sum_i2 += value * value;
        }
    }

    let mean_i = sum_i / n;
    let var_i = sum_i2 - n * mean_i * mean_i;
    if var_i <= min_var_i {
        return None;
    }

    let score = (dot - n * mean_i * tpl.mean()) / (var_i.sqrt() * tpl.std_dev() * n.sqrt());
    if score.is_finite() {
        Some(score as f32)
    } else {
        None
    }
}

/// Scans every placement of `tpl` over `image` and keeps the
/// `cfg.n_results` best-scoring windows.
///
/// Rows of placements are spread over the executor; each partition ranks
/// into its own container and the containers are merged afterwards. A
/// template larger than the image yields an empty container.
pub fn scan_ncc(
    image: &PixelBuffer,
    tpl: &TemplateStats,
    cfg: &MatchConfig,
    exec: &ParallelExecutor,
) -> FeatScanResult<BoundedTopK<Match>> {
    if image.kind() != ImageKind::Gray {
        return Err(FeatScanError::InvalidInput("matching expects a grayscale image"));
    }
    let img_width = image.width();
    let img_height = image.height();
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();

    let _span = trace_span!(
        "scan_ncc",
        width = img_width,
        height = img_height,
        tpl_width = tpl_width,
        tpl_height = tpl_height
    )
    .entered();

    if cfg.n_results == 0 || img_width < tpl_width || img_height < tpl_height {
        return Ok(BoundedTopK::new(cfg.n_results));
    }

    let max_x = img_width - tpl_width;
    let max_y = img_height - tpl_height;

    let ranked = exec.map_reduce(
        max_y + 1,
        || BoundedTopK::new(cfg.n_results),
        |y, topk: &mut BoundedTopK<Match>| {
            for x in 0..=max_x {
                if let Some(score) = window_score(image, tpl, x, y, cfg.min_var_i) {
                    topk.offer(Match {
                        rect: Rect::new(x, y, tpl_width, tpl_height),
                        score,
                    });
                }
            }
            Ok(())
        },
        BoundedTopK::new(cfg.n_results),
        |all: &mut BoundedTopK<Match>, part| all.merge(part),
    )?;

    trace_event!("ranked_windows", count = ranked.len());
    Ok(ranked)
}
