//! Rectangles and borrowed rectangular views.

use crate::image::PixelBuffer;
use crate::util::FeatScanResult;

/// Axis-aligned rectangle in buffer coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left column.
    pub x: usize,
    /// Top row.
    pub y: usize,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge `x + width` (one past the last column).
    pub fn x_max(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge `y + height` (one past the last row).
    pub fn y_max(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    /// Returns true if the rectangles overlap on both axes.
    ///
    /// Each axis is tested on the closed interval `[min, min + size]`, so
    /// rectangles that merely touch (`a.x + a.width == b.x`) overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let x_overlaps = closed_intervals_meet(self.x, self.x_max(), other.x, other.x_max());
        let y_overlaps = closed_intervals_meet(self.y, self.y_max(), other.y, other.y_max());
        x_overlaps && y_overlaps
    }
}

fn closed_intervals_meet(a_min: usize, a_max: usize, b_min: usize, b_max: usize) -> bool {
    let within = |v: usize, lo: usize, hi: usize| lo <= v && v <= hi;
    within(b_min, a_min, a_max)
        || within(b_max, a_min, a_max)
        || within(a_min, b_min, b_max)
        || within(a_max, b_min, b_max)
}

/// Read-only rectangular view into a [`PixelBuffer`].
///
/// The rectangle is not validated against the buffer. Coordinates are local
/// to the view; each access is translated and then checked against the
/// buffer's extent only, so a view reaching past its own rectangle still
/// reads whatever buffer pixel lies there.
#[derive(Clone, Copy, Debug)]
pub struct Roi<'a> {
    buffer: &'a PixelBuffer,
    rect: Rect,
}

impl<'a> Roi<'a> {
    /// Creates a view over `rect` of `buffer`.
    pub fn new(buffer: &'a PixelBuffer, rect: Rect) -> Self {
        Self { buffer, rect }
    }

    /// Returns the view width.
    pub fn width(&self) -> usize {
        self.rect.width
    }

    /// Returns the view height.
    pub fn height(&self) -> usize {
        self.rect.height
    }

    /// Returns the rectangle in buffer coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Returns the backing buffer.
    pub fn buffer(&self) -> &'a PixelBuffer {
        self.buffer
    }

    /// Reads the pixel at view-local `(x, y)`.
    pub fn get_pixel(&self, x: usize, y: usize) -> FeatScanResult<u32> {
        self.buffer
            .get_pixel(self.rect.x.saturating_add(x), self.rect.y.saturating_add(y))
    }

    /// Returns true if the two views' rectangles overlap.
    pub fn overlaps(&self, other: &Roi<'_>) -> bool {
        self.rect.overlaps(&other.rect)
    }
}

/// Mutable rectangular view into a [`PixelBuffer`].
#[derive(Debug)]
pub struct RoiMut<'a> {
    buffer: &'a mut PixelBuffer,
    rect: Rect,
}

impl<'a> RoiMut<'a> {
    /// Creates a mutable view over `rect` of `buffer`.
    pub fn new(buffer: &'a mut PixelBuffer, rect: Rect) -> Self {
        Self { buffer, rect }
    }

    /// Returns the view width.
    pub fn width(&self) -> usize {
        self.rect.width
    }

    /// Returns the view height.
    pub fn height(&self) -> usize {
        self.rect.height
    }

    /// Returns the rectangle in buffer coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Reads the pixel at view-local `(x, y)`.
    pub fn get_pixel(&self, x: usize, y: usize) -> FeatScanResult<u32> {
        self.buffer
            .get_pixel(self.rect.x.saturating_add(x), self.rect.y.saturating_add(y))
    }

    /// Writes the pixel at view-local `(x, y)`.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: u32) -> FeatScanResult<()> {
        self.buffer.set_pixel(
            self.rect.x.saturating_add(x),
            self.rect.y.saturating_add(y),
            value,
        )
    }

    /// Reborrows as a read-only view.
    pub fn as_roi(&self) -> Roi<'_> {
        Roi::new(self.buffer, self.rect)
    }
}
