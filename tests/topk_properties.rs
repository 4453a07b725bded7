use featscan::candidate::suppress_close;
use featscan::{BoundedTopK, Corner};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn drain(mut topk: BoundedTopK<f32>) -> Vec<f32> {
    let mut out = Vec::with_capacity(topk.len());
    while let Some(v) = topk.remove_max() {
        out.push(v);
    }
    assert!(topk.remove_max().is_none());
    out
}

#[test]
fn keeps_the_largest_scores_for_any_capacity() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for &capacity in &[0usize, 1, 5, 1000] {
        for &count in &[0usize, 3, 200, 4000] {
            let values: Vec<f32> = (0..count).map(|_| rng.random_range(-1.0f32..1.0)).collect();
            let mut topk = BoundedTopK::new(capacity);
            for &v in &values {
                topk.offer(v);
            }
            assert_eq!(topk.len(), count.min(capacity));
            assert_eq!(topk.capacity(), capacity);

            let mut expected = values.clone();
            expected.sort_by(|a, b| b.total_cmp(a));
            expected.truncate(capacity);

            let drained = drain(topk);
            assert_eq!(drained, expected);
        }
    }
}

#[test]
fn merging_partitions_equals_single_container() {
    let mut rng = StdRng::seed_from_u64(7);
    let values: Vec<f32> = (0..500).map(|_| rng.random_range(0.0f32..100.0)).collect();

    let mut single = BoundedTopK::new(12);
    for &v in &values {
        single.offer(v);
    }

    let mut merged = BoundedTopK::new(12);
    for chunk in values.chunks(37) {
        let mut part = BoundedTopK::new(12);
        part.extend(chunk.iter().copied());
        merged.merge(part);
    }

    assert_eq!(drain(merged), single.into_sorted_desc());
}

#[test]
fn equal_scores_do_not_displace_the_minimum() {
    let mut topk = BoundedTopK::new(2);
    assert!(topk.offer(1.0f32));
    assert!(topk.offer(2.0));
    assert!(!topk.offer(1.0));
    assert!(topk.offer(1.5));
    assert_eq!(topk.into_sorted_desc(), vec![2.0, 1.5]);
}

#[test]
fn suppression_keeps_minimum_distance() {
    let mut rng = StdRng::seed_from_u64(42);
    for &dmin in &[0.0f32, 1.0, 4.5, 10.0] {
        let mut corners: Vec<Corner> = (0..400)
            .map(|_| Corner {
                x: rng.random_range(0..64),
                y: rng.random_range(0..64),
                score: rng.random_range(0.0f32..1000.0),
            })
            .collect();
        let best = corners
            .iter()
            .map(|c| c.score)
            .fold(f32::NEG_INFINITY, f32::max);

        let kept = suppress_close(&mut corners, dmin);
        assert_eq!(kept[0].score, best);

        let dmin2 = f64::from(dmin) * f64::from(dmin);
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                assert!(a.dist2(b) as f64 >= dmin2);
            }
        }
        assert!(kept.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
