//! Shared utility helpers.

pub mod error;

pub use error::{FeatScanError, FeatScanResult};
