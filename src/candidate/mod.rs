//! Candidate selection and pruning.
//!
//! Includes bounded Top-K collection, local-maximum tests, distance-based
//! suppression for corners and overlap-based pruning for matches.

pub mod nms;
pub mod overlap;
pub mod topk;

pub use nms::{is_local_max, suppress_close, Corner};
pub use overlap::dedup_overlapping;
pub use topk::{BoundedTopK, Scored};
