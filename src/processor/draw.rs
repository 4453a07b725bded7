//! Result rendering.

use crate::candidate::nms::Corner;
use crate::image::{ImageKind, PixelBuffer, Rect};
use crate::matching::Match;

const CROSS_ARM: usize = 2;
const WHITE: u8 = 255;
const RED: [u8; 3] = [255, 0, 0];

/// Returns `gray` at half intensity with a white cross over each corner.
///
/// Each cross spans five pixels per axis; arms are clipped at the border.
pub fn render_corners(gray: &PixelBuffer, corners: &[Corner]) -> PixelBuffer {
    let gray = match gray.kind() {
        ImageKind::Gray => gray.clone(),
        ImageKind::Rgb | ImageKind::Indexed => gray.to_gray(),
    };
    let width = gray.width();
    let height = gray.height();
    let mut out = gray;
    for v in out.as_raw_mut() {
        *v /= 2;
    }

    let data = out.as_raw_mut();
    for c in corners.iter().filter(|c| c.x < width && c.y < height) {
        let x0 = c.x.saturating_sub(CROSS_ARM);
        let x1 = (c.x + CROSS_ARM).min(width - 1);
        for x in x0..=x1 {
            data[c.y * width + x] = WHITE;
        }
        let y0 = c.y.saturating_sub(CROSS_ARM);
        let y1 = (c.y + CROSS_ARM).min(height - 1);
        for y in y0..=y1 {
            data[y * width + c.x] = WHITE;
        }
    }
    out
}

/// Returns an RGB copy of `image` with a red outline around each match.
///
/// The outline covers the closed rectangle `[x, x + w] x [y, y + h]`,
/// clipped to the image.
pub fn render_matches(image: &PixelBuffer, matches: &[Match]) -> PixelBuffer {
    let mut out = image.to_rgb();
    for m in matches {
        outline(&mut out, m.rect, RED);
    }
    out
}

fn outline(rgb: &mut PixelBuffer, rect: Rect, color: [u8; 3]) {
    let width = rgb.width();
    let height = rgb.height();
    if rect.x >= width || rect.y >= height {
        return;
    }
    let right = rect.x_max();
    let bottom = rect.y_max();
    let x_end = right.min(width - 1);
    let y_end = bottom.min(height - 1);
    let data = rgb.as_raw_mut();
    let mut put = |x: usize, y: usize| {
        let idx = (y * width + x) * 3;
        data[idx..idx + 3].copy_from_slice(&color);
    };

    for x in rect.x..=x_end {
        put(x, rect.y);
        if bottom < height {
            put(x, bottom);
        }
    }
    for y in rect.y..=y_end {
        put(rect.x, y);
        if right < width {
            put(right, y);
        }
    }
}
