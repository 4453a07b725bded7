//! 3x3 median filter over grayscale buffers.

use crate::image::{ImageKind, PixelBuffer};
use crate::parallel::ParallelExecutor;
use crate::trace::trace_span;
use crate::util::{FeatScanError, FeatScanResult};

/// Returns the 3x3 median of every pixel.
///
/// Neighbours outside the image are left out rather than padded, so corner
/// pixels take the median of 4 samples and edge pixels of 6. With an even
/// sample count the two middle values are averaged (rounding down).
pub fn median_3x3(img: &PixelBuffer, exec: &ParallelExecutor) -> FeatScanResult<PixelBuffer> {
    if img.kind() != ImageKind::Gray {
        return Err(FeatScanError::InvalidInput("median filter expects a grayscale image"));
    }
    let _span = trace_span!("median_3x3", width = img.width(), height = img.height()).entered();

    let w = img.width();
    let h = img.height();
    let src = img.as_raw();
    let mut out = PixelBuffer::new(w, h, ImageKind::Gray)?;

    exec.rows(out.as_raw_mut(), w, |y, dst| {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(h - 1);
        let mut window = [0u8; 9];
        for (x, d) in dst.iter_mut().enumerate() {
            let x0 = x.saturating_sub(1);
            let x1 = (x + 1).min(w - 1);
            let mut n = 0;
            for sy in y0..=y1 {
                for sx in x0..=x1 {
                    window[n] = src[sy * w + sx];
                    n += 1;
                }
            }
            let samples = &mut window[..n];
            samples.sort_unstable();
            let mid = n / 2;
            *d = if n % 2 == 1 {
                samples[mid]
            } else {
                ((u16::from(samples[mid - 1]) + u16::from(samples[mid])) / 2) as u8
            };
        }
        Ok(())
    })?;
    Ok(out)
}
