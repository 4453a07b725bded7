//! Linear and rank filters used by the detection pipelines.

pub mod convolve;
pub mod median;

pub use convolve::{convolve_x, convolve_xy, convolve_y, reflect_index};
pub use median::median_3x3;

/// Three-tap smoothing kernel applied before differentiation.
pub const PRE_SMOOTH: [f32; 3] = [2.0 / 9.0, 5.0 / 9.0, 2.0 / 9.0];

/// Antisymmetric central-difference kernel.
pub const DERIVATIVE: [f32; 3] = [-0.453014, 0.0, 0.453014];

/// Seven-tap binomial kernel averaging the gradient products.
pub const TENSOR_SMOOTH: [f32; 7] = [
    1.0 / 64.0,
    6.0 / 64.0,
    15.0 / 64.0,
    20.0 / 64.0,
    15.0 / 64.0,
    6.0 / 64.0,
    1.0 / 64.0,
];
