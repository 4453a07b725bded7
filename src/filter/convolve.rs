//! Separable convolution with reflective borders.
//!
//! A 2-D filter `k_y * k_x^T` is applied as a horizontal pass followed by a
//! vertical pass into a separate intermediate field. Kernel taps are
//! applied as `out[i] = sum_k src[i - half + k] * kernel[k]` with
//! `half = kernel.len() / 2`.
//!
//! Border samples are mirrored without repeating the edge sample:
//! `-i` for `i < 0` and `2 * len - i - 1` for `i >= len`, repeated until the
//! index lands inside the axis. Interior columns and rows take the
//! unguarded path.

use crate::image::ScalarField;
use crate::parallel::ParallelExecutor;
use crate::trace::trace_span;
use crate::util::{FeatScanError, FeatScanResult};

/// Maps a possibly out-of-range index onto `[0, len)` by reflection.
///
/// An axis of length 1 always resolves to index 0.
pub fn reflect_index(mut i: isize, len: usize) -> usize {
    debug_assert!(len > 0, "axis must not be empty");
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    while i < 0 || i >= len {
        i = if i < 0 { -i } else { 2 * len - i - 1 };
    }
    i as usize
}

fn check_kernel(kernel: &[f32]) -> FeatScanResult<usize> {
    if kernel.is_empty() || kernel.len() % 2 == 0 {
        return Err(FeatScanError::InvalidKernel { len: kernel.len() });
    }
    Ok(kernel.len() / 2)
}

/// Convolves every row of `src` with `kernel` (horizontal pass).
pub fn convolve_x(
    src: &ScalarField,
    kernel: &[f32],
    exec: &ParallelExecutor,
) -> FeatScanResult<ScalarField> {
    let half = check_kernel(kernel)?;
    let w = src.width();
    let mut out = ScalarField::new(w, src.height())?;
    let interior = half..w.saturating_sub(half).max(half);

    exec.rows(out.as_mut_slice(), w, |y, dst| {
        let row = src.row(y);
        for x in (0..w).filter(|x| !interior.contains(x)) {
            let mut acc = 0.0f32;
            for (k, &kv) in kernel.iter().enumerate() {
                let sx = reflect_index(x as isize + k as isize - half as isize, w);
                acc += row[sx] * kv;
            }
            dst[x] = acc;
        }
        for x in interior.clone() {
            let window = &row[x - half..=x + half];
            dst[x] = window.iter().zip(kernel).map(|(&v, &kv)| v * kv).sum();
        }
        Ok(())
    })?;
    Ok(out)
}

/// Convolves every column of `src` with `kernel` (vertical pass).
pub fn convolve_y(
    src: &ScalarField,
    kernel: &[f32],
    exec: &ParallelExecutor,
) -> FeatScanResult<ScalarField> {
    let half = check_kernel(kernel)?;
    let w = src.width();
    let h = src.height();
    let mut out = ScalarField::new(w, h)?;

    exec.rows(out.as_mut_slice(), w, |y, dst| {
        dst.fill(0.0);
        let guarded = y < half || y + half >= h;
        for (k, &kv) in kernel.iter().enumerate() {
            let sy = if guarded {
                reflect_index(y as isize + k as isize - half as isize, h)
            } else {
                y + k - half
            };
            for (d, &s) in dst.iter_mut().zip(src.row(sy)) {
                *d += s * kv;
            }
        }
        Ok(())
    })?;
    Ok(out)
}

/// Applies `kernel_x` horizontally, then `kernel_y` vertically.
pub fn convolve_xy(
    src: &ScalarField,
    kernel_x: &[f32],
    kernel_y: &[f32],
    exec: &ParallelExecutor,
) -> FeatScanResult<ScalarField> {
    let _span = trace_span!(
        "convolve_xy",
        width = src.width(),
        height = src.height(),
        kx = kernel_x.len(),
        ky = kernel_y.len()
    )
    .entered();
    let tmp = convolve_x(src, kernel_x, exec)?;
    convolve_y(&tmp, kernel_y, exec)
}

#[cfg(test)]
mod tests {
    use super::{convolve_x, convolve_xy, convolve_y, reflect_index};
    use crate::image::ScalarField;
    use crate::parallel::ParallelExecutor;
    use crate::util::FeatScanError;

    #[test]
    fn reflection_mirrors_without_edge_duplication() {
        assert_eq!(reflect_index(-1, 5), 1);
        assert_eq!(reflect_index(-2, 5), 2);
        assert_eq!(reflect_index(5, 5), 4);
        assert_eq!(reflect_index(6, 5), 3);
        assert_eq!(reflect_index(3, 5), 3);
    }

    #[test]
    fn length_one_axis_reflects_to_zero() {
        for offset in -7..=7 {
            assert_eq!(reflect_index(offset, 1), 0);
        }
    }

    #[test]
    fn horizontal_pass_matches_direct_sum() {
        let data: Vec<f32> = (0..7).map(|v| (v * v) as f32).collect();
        let src = ScalarField::from_vec(data.clone(), 7, 1).unwrap();
        let kernel = [0.25f32, 0.5, 0.25];
        let out = convolve_x(&src, &kernel, &ParallelExecutor::sequential()).unwrap();

        for x in 0..7isize {
            let mut expected = 0.0f32;
            for k in 0..3isize {
                expected += data[reflect_index(x + k - 1, 7)] * kernel[k as usize];
            }
            assert!((out.get(x as usize, 0).unwrap() - expected).abs() < 1e-5);
        }
        // Left border reflects index -1 onto 1.
        assert!((out.get(0, 0).unwrap() - (0.25 * 1.0 + 0.5 * 0.0 + 0.25 * 1.0)).abs() < 1e-6);
    }

    #[test]
    fn vertical_pass_matches_horizontal_on_transpose() {
        let w = 5;
        let h = 6;
        let data: Vec<f32> = (0..w * h).map(|v| ((v * 7) % 11) as f32).collect();
        let mut transposed = vec![0.0f32; w * h];
        for y in 0..h {
            for x in 0..w {
                transposed[x * h + y] = data[y * w + x];
            }
        }
        let kernel = [1.0f32, -2.0, 3.0, 0.5, 1.5];
        let exec = ParallelExecutor::new();
        let a = convolve_y(&ScalarField::from_vec(data, w, h).unwrap(), &kernel, &exec).unwrap();
        let b = convolve_x(
            &ScalarField::from_vec(transposed, h, w).unwrap(),
            &kernel,
            &exec,
        )
        .unwrap();
        for y in 0..h {
            for x in 0..w {
                assert!((a.get(x, y).unwrap() - b.get(y, x).unwrap()).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn kernel_wider_than_image_stays_in_bounds() {
        let src = ScalarField::from_vec(vec![1.0, 2.0], 2, 1).unwrap();
        let kernel = [1.0f32; 7];
        let out = convolve_xy(&src, &kernel, &[1.0], &ParallelExecutor::sequential()).unwrap();
        assert_eq!(out.width(), 2);
        assert!(out.as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn even_kernels_are_rejected() {
        let src = ScalarField::new(3, 3).unwrap();
        let err = convolve_x(&src, &[0.5, 0.5], &ParallelExecutor::new()).unwrap_err();
        assert_eq!(err, FeatScanError::InvalidKernel { len: 2 });
        assert!(convolve_y(&src, &[], &ParallelExecutor::new()).is_err());
    }
}
