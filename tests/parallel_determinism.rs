#![cfg(feature = "rayon")]

use featscan::corner::harris_response_of;
use featscan::filter::median_3x3;
use featscan::matching::scan_ncc;
use featscan::{
    CornerDetector, CornerMethod, MatchConfig, MedianDiffConfig, ParallelExecutor, PixelBuffer,
    Rect, TemplateStats,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn textured(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let base = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            let noise: i32 = rng.random_range(-8..=8);
            data.push((base as i32 + noise).clamp(0, 255) as u8);
        }
    }
    PixelBuffer::from_gray(data, width, height).unwrap()
}

fn executors() -> Vec<ParallelExecutor> {
    vec![
        ParallelExecutor::sequential(),
        ParallelExecutor::new(),
        ParallelExecutor::with_threads(3).unwrap(),
    ]
}

#[test]
fn harris_response_is_bit_identical() {
    let img = textured(97, 61, 1);
    let reference = harris_response_of(&img, 0.05, &ParallelExecutor::sequential()).unwrap();
    for exec in executors() {
        for _ in 0..2 {
            let q = harris_response_of(&img, 0.05, &exec).unwrap();
            let same = q
                .as_slice()
                .iter()
                .zip(reference.as_slice())
                .all(|(a, b)| a.to_bits() == b.to_bits());
            assert!(same);
        }
    }
}

#[test]
fn corners_do_not_depend_on_executor() {
    let img = textured(80, 64, 2);
    let methods = [
        CornerMethod::default(),
        CornerMethod::MedianDifference(MedianDiffConfig::default()),
    ];
    for method in methods {
        let reference = CornerDetector::new(method.clone())
            .with_executor(ParallelExecutor::sequential())
            .detect(&img)
            .unwrap();
        for exec in executors() {
            let corners = CornerDetector::new(method.clone())
                .with_executor(exec)
                .detect(&img)
                .unwrap();
            assert_eq!(corners, reference);
        }
    }
}

#[test]
fn median_filter_does_not_depend_on_executor() {
    let img = textured(33, 17, 3);
    let reference = median_3x3(&img, &ParallelExecutor::sequential()).unwrap();
    for exec in executors() {
        assert_eq!(median_3x3(&img, &exec).unwrap(), reference);
    }
}

#[test]
fn ncc_ranking_does_not_depend_on_executor() {
    let img = textured(48, 40, 4);
    let tpl = TemplateStats::from_roi(&img.roi(Rect::new(10, 12, 7, 5))).unwrap();
    let cfg = MatchConfig {
        n_results: 25,
        ..MatchConfig::default()
    };
    let scores = |exec: &ParallelExecutor| -> Vec<u32> {
        scan_ncc(&img, &tpl, &cfg, exec)
            .unwrap()
            .into_sorted_desc()
            .iter()
            .map(|m| m.score.to_bits())
            .collect()
    };
    let reference = scores(&ParallelExecutor::sequential());
    assert_eq!(reference.len(), 25);
    for exec in executors() {
        assert_eq!(scores(&exec), reference);
    }
}
