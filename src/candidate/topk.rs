//! Fixed-capacity best-K selection.

use std::cmp::Ordering;

/// Items ranked by a floating-point score (higher is better).
pub trait Scored {
    /// Returns the ranking score.
    fn score(&self) -> f32;
}

fn score_cmp<T: Scored>(a: &T, b: &T) -> Ordering {
    a.score().total_cmp(&b.score())
}

/// Keeps the `K` highest-scoring items offered so far.
///
/// Items live in a binary min-heap over a vector that never grows past its
/// capacity, so the weakest retained item is always at the root. `offer`
/// costs O(log K). The first `remove_max` after an `offer` sorts the heap
/// ascending, which is itself a valid min-heap, and later calls pop the
/// tail; a full drain costs O(K log K). Ties between equal scores are
/// resolved arbitrarily.
///
/// Storage grows with the number of retained items, so `K` may exceed the
/// number of items that will ever be offered.
#[derive(Clone, Debug)]
pub struct BoundedTopK<T> {
    capacity: usize,
    heap: Vec<T>,
    sorted: bool,
}

const RESERVE_LIMIT: usize = 1024;

impl<T: Scored> BoundedTopK<T> {
    /// Creates an empty container holding at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: Vec::with_capacity(capacity.min(RESERVE_LIMIT)),
            sorted: true,
        }
    }

    /// Maximum number of retained items.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained items.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the weakest retained item.
    pub fn peek_min(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Offers an item; returns true if it was retained.
    ///
    /// Below capacity every item is kept. At capacity the item replaces the
    /// current minimum only if its score is strictly greater.
    pub fn offer(&mut self, item: T) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(item);
            self.sift_up(self.heap.len() - 1);
            self.sorted = false;
            return true;
        }
        if score_cmp(&item, &self.heap[0]) != Ordering::Greater {
            return false;
        }
        self.heap[0] = item;
        self.sift_down(0);
        self.sorted = false;
        true
    }

    /// Removes and returns the highest-scoring item.
    ///
    /// Repeated calls drain the container in non-increasing score order and
    /// return `None` once it is empty.
    pub fn remove_max(&mut self) -> Option<T> {
        if !self.sorted {
            self.heap.sort_by(score_cmp);
            self.sorted = true;
        }
        // Popping the tail of an ascending array keeps it a min-heap.
        self.heap.pop()
    }

    /// Offers every retained item of `other`.
    pub fn merge(&mut self, other: BoundedTopK<T>) {
        for item in other.heap {
            self.offer(item);
        }
    }

    /// Returns the retained items sorted by descending score.
    pub fn into_sorted_desc(mut self) -> Vec<T> {
        self.heap.sort_by(|a, b| score_cmp(b, a));
        self.heap
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if score_cmp(&self.heap[idx], &self.heap[parent]) != Ordering::Less {
                break;
            }
            self.heap.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut smallest = left;
            if right < len && score_cmp(&self.heap[right], &self.heap[left]) == Ordering::Less {
                smallest = right;
            }
            if score_cmp(&self.heap[smallest], &self.heap[idx]) != Ordering::Less {
                break;
            }
            self.heap.swap(idx, smallest);
            idx = smallest;
        }
    }
}

impl<T: Scored> Extend<T> for BoundedTopK<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.offer(item);
        }
    }
}

impl Scored for f32 {
    fn score(&self) -> f32 {
        *self
    }
}
