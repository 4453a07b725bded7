//! Overlap-based pruning of ranked matches.

use crate::candidate::topk::BoundedTopK;
use crate::matching::Match;
use crate::trace::{trace_event, trace_span};

/// Drains `ranked` best-first and keeps matches that overlap no kept match.
///
/// Stops once `count` matches are kept or the container is exhausted. The
/// result is ordered by descending score. Overlap uses the inclusive rule of
/// [`Rect::overlaps`](crate::image::Rect::overlaps), so touching rectangles
/// exclude each other.
pub fn dedup_overlapping(ranked: &mut BoundedTopK<Match>, count: usize) -> Vec<Match> {
    let _span = trace_span!("dedup_overlapping", ranked = ranked.len(), count = count).entered();
    let mut kept: Vec<Match> = Vec::with_capacity(count.min(ranked.len()));

    while kept.len() < count {
        let Some(candidate) = ranked.remove_max() else {
            break;
        };
        if kept.iter().all(|m| !m.rect.overlaps(&candidate.rect)) {
            kept.push(candidate);
        }
    }

    trace_event!("matches_kept", count = kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::dedup_overlapping;
    use crate::candidate::topk::BoundedTopK;
    use crate::image::Rect;
    use crate::matching::Match;

    fn m(x: usize, y: usize, score: f32) -> Match {
        Match {
            rect: Rect::new(x, y, 10, 10),
            score,
        }
    }

    #[test]
    fn keeps_best_of_each_overlapping_cluster() {
        let mut ranked = BoundedTopK::new(8);
        ranked.extend([
            m(0, 0, 0.99),
            m(1, 0, 0.95),
            m(50, 50, 0.97),
            m(51, 51, 0.90),
            m(10, 0, 0.80),
        ]);
        let kept = dedup_overlapping(&mut ranked, 8);
        assert_eq!(kept, vec![m(0, 0, 0.99), m(50, 50, 0.97)]);
    }

    #[test]
    fn stops_at_requested_count() {
        let mut ranked = BoundedTopK::new(8);
        ranked.extend([m(0, 0, 0.9), m(30, 0, 0.8), m(60, 0, 0.7)]);
        let kept = dedup_overlapping(&mut ranked, 2);
        assert_eq!(kept.len(), 2);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn empty_queue_gives_empty_result() {
        let mut ranked = BoundedTopK::<Match>::new(4);
        assert!(dedup_overlapping(&mut ranked, 4).is_empty());
    }
}
