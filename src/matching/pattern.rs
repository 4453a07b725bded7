use crate::image::RoiMut;
use crate::util::FeatScanResult;

/// Intensity change applied to a pattern before matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternAdjust {
    /// Multiplier applied first.
    pub contrast_factor: i32,
    /// Offset added after the multiplication.
    pub intensity_offset: i32,
}

impl Default for PatternAdjust {
    fn default() -> Self {
        Self {
            contrast_factor: 4,
            intensity_offset: -50,
        }
    }
}

/// Multiplies every pixel in `roi` by the contrast factor, then adds the
/// offset. Each step is clamped to `[0, 255]`.
pub fn adjust_pattern(roi: &mut RoiMut<'_>, adjust: &PatternAdjust) -> FeatScanResult<()> {
    for y in 0..roi.height() {
        for x in 0..roi.width() {
            let value = roi.get_pixel(x, y)? as i64;
            let scaled = clamp8(value * i64::from(adjust.contrast_factor));
            let shifted = clamp8(scaled + i64::from(adjust.intensity_offset));
            roi.set_pixel(x, y, shifted as u32)?;
        }
    }
    Ok(())
}

#[inline]
fn clamp8(value: i64) -> i64 {
    value.clamp(0, 255)
}
