//! Non-maximum suppression for corner responses.

use crate::candidate::topk::Scored;
use crate::image::ScalarField;
use crate::trace::{trace_event, trace_span};
use std::cmp::Ordering;

/// Corner candidate in image space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Corner {
    /// X coordinate (column).
    pub x: usize,
    /// Y coordinate (row).
    pub y: usize,
    /// Response at the corner.
    pub score: f32,
}

impl Corner {
    /// Squared Euclidean distance to `other`.
    pub fn dist2(&self, other: &Corner) -> u64 {
        let dx = self.x.abs_diff(other.x) as u64;
        let dy = self.y.abs_diff(other.y) as u64;
        dx * dx + dy * dy
    }
}

impl Scored for Corner {
    fn score(&self) -> f32 {
        self.score
    }
}

fn corner_cmp_desc(a: &Corner, b: &Corner) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Sorts corners by descending score, breaking ties by row then column.
pub(crate) fn sort_corners_desc(corners: &mut [Corner]) {
    corners.sort_by(corner_cmp_desc);
}

/// Returns true if no existing 8-neighbour of `(x, y)` is larger.
///
/// Neighbours outside the field are ignored; equal neighbours do not
/// suppress the centre.
pub fn is_local_max(field: &ScalarField, x: usize, y: usize) -> bool {
    let Some(center) = field.get(x, y) else {
        return false;
    };
    let y0 = y.saturating_sub(1);
    let y1 = (y + 1).min(field.height() - 1);
    let x0 = x.saturating_sub(1);
    let x1 = (x + 1).min(field.width() - 1);
    for ny in y0..=y1 {
        let row = field.row(ny);
        for (nx, &value) in row.iter().enumerate().take(x1 + 1).skip(x0) {
            if (nx, ny) != (x, y) && center < value {
                return false;
            }
        }
    }
    true
}

/// Greedily keeps the strongest corners at least `dmin` apart.
///
/// Corners are visited in descending score order; each is accepted unless
/// an already accepted corner lies at squared distance `< dmin^2`. This is
/// the same set obtained by repeatedly taking the best remaining corner and
/// discarding its close neighbours. Cost is O(n * k) for `n` candidates and
/// `k` accepted corners, quadratic in the worst case; the response
/// threshold keeps `n` to a small fraction of the pixels.
pub fn suppress_close(corners: &mut [Corner], dmin: f32) -> Vec<Corner> {
    let _span = trace_span!("suppress_close", candidates = corners.len()).entered();
    sort_corners_desc(corners);

    let dmin2 = f64::from(dmin) * f64::from(dmin);
    let mut kept: Vec<Corner> = Vec::new();

    'outer: for corner in corners.iter().copied() {
        for accepted in kept.iter() {
            if (corner.dist2(accepted) as f64) < dmin2 {
                continue 'outer;
            }
        }
        kept.push(corner);
    }

    trace_event!("corners_kept", count = kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::{is_local_max, suppress_close, Corner};
    use crate::image::ScalarField;

    fn corner(x: usize, y: usize, score: f32) -> Corner {
        Corner { x, y, score }
    }

    #[test]
    fn local_max_ignores_missing_neighbours() {
        let field = ScalarField::from_vec(vec![5.0, 1.0, 1.0, 1.0], 2, 2).unwrap();
        assert!(is_local_max(&field, 0, 0));
        assert!(!is_local_max(&field, 1, 1));
    }

    #[test]
    fn plateau_counts_as_local_max() {
        let field = ScalarField::from_vec(vec![3.0; 9], 3, 3).unwrap();
        assert!(is_local_max(&field, 1, 1));
        assert!(!is_local_max(&field, 3, 1));
    }

    #[test]
    fn close_corners_collapse_to_strongest() {
        let mut corners = vec![
            corner(10, 10, 5.0),
            corner(12, 10, 9.0),
            corner(40, 40, 1.0),
            corner(13, 13, 2.0),
        ];
        let kept = suppress_close(&mut corners, 10.0);
        assert_eq!(kept, vec![corner(12, 10, 9.0), corner(40, 40, 1.0)]);
    }

    #[test]
    fn exact_distance_is_kept() {
        let mut corners = vec![corner(0, 0, 2.0), corner(3, 4, 1.0)];
        let kept = suppress_close(&mut corners, 5.0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(suppress_close(&mut [], 10.0).is_empty());
    }
}
