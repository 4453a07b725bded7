use featscan::matching::{scan_ncc, score_at};
use featscan::processor::match_pattern;
use featscan::{
    FeatScanError, MatchConfig, Matcher, ParallelExecutor, PatternConfig, PatternOperation,
    PixelBuffer, Rect, TemplateStats,
};

const BLOB: usize = 9;

fn blob(scale: f64, offset: f64) -> Vec<u8> {
    let mut out = Vec::with_capacity(BLOB * BLOB);
    for y in 0..BLOB {
        for x in 0..BLOB {
            let d2 = ((x as f64 - 4.0).powi(2) + (y as f64 - 4.0).powi(2)) / 8.0;
            let v = (200.0 * scale * (-d2).exp()).round() + offset;
            out.push(v.min(255.0) as u8);
        }
    }
    out
}

/// Flat black scene with a blob at (5, 6) and a dimmer, offset copy at (40, 25).
fn two_blob_scene() -> PixelBuffer {
    let (w, h) = (60, 40);
    let mut data = vec![0u8; w * h];
    for (pattern, (ox, oy)) in [(blob(1.0, 0.0), (5, 6)), (blob(0.5, 20.0), (40, 25))] {
        for y in 0..BLOB {
            for x in 0..BLOB {
                data[(oy + y) * w + ox + x] = pattern[y * BLOB + x];
            }
        }
    }
    PixelBuffer::from_gray(data, w, h).unwrap()
}

#[test]
fn self_match_scores_one() {
    let img = two_blob_scene();
    let tpl = TemplateStats::from_roi(&img.roi(Rect::new(5, 6, BLOB, BLOB))).unwrap();
    let r = score_at(&img, &tpl, 5, 6, 1e-8);
    assert!((r - 1.0).abs() < 1e-5, "r = {r}");
    // Affine intensity change keeps the correlation close to one.
    assert!(score_at(&img, &tpl, 40, 25, 1e-8) > 0.999);
}

#[test]
fn overlapping_windows_collapse_to_two_matches() {
    let img = two_blob_scene();
    let tpl = TemplateStats::from_roi(&img.roi(Rect::new(5, 6, BLOB, BLOB))).unwrap();
    let cfg = MatchConfig {
        n_results: 5,
        ..MatchConfig::default()
    };

    let ranked = scan_ncc(&img, &tpl, &cfg, &ParallelExecutor::new()).unwrap();
    assert_eq!(ranked.len(), 5);

    let matches = Matcher::new(tpl).with_config(cfg).match_image(&img).unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].rect, Rect::new(5, 6, BLOB, BLOB));
    assert_eq!(matches[1].rect, Rect::new(40, 25, BLOB, BLOB));
    assert!(matches[0].score > matches[1].score);
}

#[test]
fn result_count_beyond_window_count_ranks_every_window() {
    let img = two_blob_scene();
    let tpl = TemplateStats::from_roi(&img.roi(Rect::new(5, 6, BLOB, BLOB))).unwrap();
    let matcher = Matcher::new(tpl).with_config(MatchConfig {
        n_results: usize::MAX,
        ..MatchConfig::default()
    });

    let ranked = matcher.rank(&img).unwrap();
    assert_eq!(ranked.capacity(), usize::MAX);
    let windows = (60 - BLOB + 1) * (40 - BLOB + 1);
    assert!(ranked.len() > 2 && ranked.len() <= windows);

    let matches = matcher.match_image(&img).unwrap();
    let rects: Vec<Rect> = matches.iter().map(|m| m.rect).collect();
    assert_eq!(
        rects,
        vec![Rect::new(5, 6, BLOB, BLOB), Rect::new(40, 25, BLOB, BLOB)]
    );
}

#[test]
fn constant_template_is_rejected() {
    let img = two_blob_scene();
    let err = TemplateStats::from_roi(&img.roi(Rect::new(20, 20, 6, 6)))
        .err()
        .unwrap();
    assert!(matches!(err, FeatScanError::DegenerateTemplate { .. }));
}

#[test]
fn template_outside_image_is_out_of_range() {
    let img = two_blob_scene();
    let err = TemplateStats::from_roi(&img.roi(Rect::new(200, 310, 70, 50)))
        .err()
        .unwrap();
    assert!(matches!(err, FeatScanError::OutOfRange { .. }));
}

#[test]
fn modified_pattern_still_finds_both_blobs() {
    let img = two_blob_scene();
    let cfg = PatternConfig {
        predefined: Rect::new(5, 6, BLOB, BLOB),
        ..PatternConfig::default()
    };
    let exec = ParallelExecutor::new();
    let matches = match_pattern(&img, PatternOperation::Modified, cfg.predefined, &cfg, &exec)
        .unwrap();

    let mut rects: Vec<Rect> = matches.iter().map(|m| m.rect).collect();
    rects.sort_by_key(|r| (r.x, r.y));
    assert_eq!(
        rects,
        vec![Rect::new(5, 6, BLOB, BLOB), Rect::new(40, 25, BLOB, BLOB)]
    );
    // The source image is left untouched.
    assert_eq!(img, two_blob_scene());
}

#[test]
fn accepted_matches_never_overlap() {
    let img = two_blob_scene();
    let cfg = PatternConfig {
        predefined: Rect::new(3, 4, 12, 12),
        ..PatternConfig::default()
    };
    let matches = match_pattern(
        &img,
        PatternOperation::Predefined,
        cfg.predefined,
        &cfg,
        &ParallelExecutor::new(),
    )
    .unwrap();
    assert!(!matches.is_empty());
    for (i, a) in matches.iter().enumerate() {
        for b in &matches[i + 1..] {
            assert!(!a.rect.overlaps(&b.rect));
        }
    }
    assert!(matches.windows(2).all(|w| w[0].score >= w[1].score));
}
