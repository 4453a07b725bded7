//! Harris corner response from the smoothed structure tensor.
//!
//! Steps:
//! 1. pre-smooth the intensities with [`PRE_SMOOTH`] on both axes;
//! 2. differentiate with [`DERIVATIVE`] along x and along y;
//! 3. form `A = Ix^2`, `B = Iy^2`, `C = Ix * Iy` per pixel;
//! 4. average each product with the binomial [`TENSOR_SMOOTH`] window;
//! 5. evaluate `q = (A * B - C^2) - alpha * (A + B)^2`.
//!
//! Every stage is row-parallel and writes each pixel from exactly one task,
//! so the response is bit-identical for any executor.

use crate::candidate::nms::{is_local_max, suppress_close, Corner};
use crate::corner::HarrisConfig;
use crate::filter::{convolve_x, convolve_xy, convolve_y, DERIVATIVE, PRE_SMOOTH, TENSOR_SMOOTH};
use crate::image::{PixelBuffer, ScalarField};
use crate::parallel::ParallelExecutor;
use crate::trace::{trace_event, trace_span};
use crate::util::FeatScanResult;

/// Smoothed gradient products forming the 2x2 local structure matrix
/// `[[a, c], [c, b]]` at every pixel.
#[derive(Clone, Debug)]
pub struct StructureTensor {
    /// Smoothed `Ix^2`.
    pub a: ScalarField,
    /// Smoothed `Iy^2`.
    pub b: ScalarField,
    /// Smoothed `Ix * Iy`.
    pub c: ScalarField,
}

/// Builds the smoothed structure tensor of an intensity field.
pub fn structure_tensor(
    intensity: &ScalarField,
    exec: &ParallelExecutor,
) -> FeatScanResult<StructureTensor> {
    let _span = trace_span!("structure_tensor").entered();
    let smoothed = convolve_xy(intensity, &PRE_SMOOTH, &PRE_SMOOTH, exec)?;
    let ix = convolve_x(&smoothed, &DERIVATIVE, exec)?;
    let iy = convolve_y(&smoothed, &DERIVATIVE, exec)?;

    let a = pointwise(&ix, &ix, exec)?;
    let b = pointwise(&iy, &iy, exec)?;
    let c = pointwise(&ix, &iy, exec)?;

    Ok(StructureTensor {
        a: convolve_xy(&a, &TENSOR_SMOOTH, &TENSOR_SMOOTH, exec)?,
        b: convolve_xy(&b, &TENSOR_SMOOTH, &TENSOR_SMOOTH, exec)?,
        c: convolve_xy(&c, &TENSOR_SMOOTH, &TENSOR_SMOOTH, exec)?,
    })
}

fn pointwise(
    lhs: &ScalarField,
    rhs: &ScalarField,
    exec: &ParallelExecutor,
) -> FeatScanResult<ScalarField> {
    let w = lhs.width();
    let mut out = ScalarField::new(w, lhs.height())?;
    exec.rows(out.as_mut_slice(), w, |y, dst| {
        for ((d, &l), &r) in dst.iter_mut().zip(lhs.row(y)).zip(rhs.row(y)) {
            *d = l * r;
        }
        Ok(())
    })?;
    Ok(out)
}

/// Evaluates the Harris response of a structure tensor.
pub fn harris_response(
    tensor: &StructureTensor,
    alpha: f32,
    exec: &ParallelExecutor,
) -> FeatScanResult<ScalarField> {
    let w = tensor.a.width();
    let mut q = ScalarField::new(w, tensor.a.height())?;
    exec.rows(q.as_mut_slice(), w, |y, dst| {
        let rows = tensor.a.row(y).iter().zip(tensor.b.row(y)).zip(tensor.c.row(y));
        for (d, ((&a, &b), &c)) in dst.iter_mut().zip(rows) {
            let trace = a + b;
            *d = (a * b - c * c) - alpha * (trace * trace);
        }
        Ok(())
    })?;
    Ok(q)
}

/// Computes the Harris response of a grayscale image.
pub fn harris_response_of(
    gray: &PixelBuffer,
    alpha: f32,
    exec: &ParallelExecutor,
) -> FeatScanResult<ScalarField> {
    let _span = trace_span!("harris_response", width = gray.width(), height = gray.height())
        .entered();
    let intensity = ScalarField::from_gray(gray)?;
    let tensor = structure_tensor(&intensity, exec)?;
    harris_response(&tensor, alpha, exec)
}

/// Collects pixels whose response exceeds `threshold` and is a local
/// maximum of its 8-neighbourhood.
///
/// The returned order is unspecified.
pub fn local_maxima_above(
    response: &ScalarField,
    threshold: f32,
    exec: &ParallelExecutor,
) -> FeatScanResult<Vec<Corner>> {
    exec.map_reduce(
        response.height(),
        Vec::new,
        |y, found: &mut Vec<Corner>| {
            for (x, &score) in response.row(y).iter().enumerate() {
                if score > threshold && is_local_max(response, x, y) {
                    found.push(Corner { x, y, score });
                }
            }
            Ok(())
        },
        Vec::new(),
        |all: &mut Vec<Corner>, part| all.extend(part),
    )
}

/// Detects Harris corners at least `cfg.dmin` apart, strongest first.
pub fn detect_harris(
    gray: &PixelBuffer,
    cfg: &HarrisConfig,
    exec: &ParallelExecutor,
) -> FeatScanResult<Vec<Corner>> {
    let response = harris_response_of(gray, cfg.alpha, exec)?;
    let mut candidates = local_maxima_above(&response, cfg.threshold, exec)?;
    trace_event!("harris_candidates", count = candidates.len());
    Ok(suppress_close(&mut candidates, cfg.dmin))
}
