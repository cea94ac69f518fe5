use serde::{Deserialize, Serialize};

/// A rectangle of screen pixels, `(x, y)` being the top-left corner.
///
/// Sizes are signed because selections arrive straight from pointer input,
/// where a drag up or to the left yields a negative extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// `true` when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Normalise negative extents and clip to a `width × height` screen.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let w = i64::from(width);
        let h = i64::from(height);
        let (x0, x1) = ordered(i64::from(self.x), i64::from(self.x) + i64::from(self.width));
        let (y0, y1) = ordered(i64::from(self.y), i64::from(self.y) + i64::from(self.height));
        let (x0, x1) = (x0.clamp(0, w), x1.clamp(0, w));
        let (y0, y1) = (y0.clamp(0, h), y1.clamp(0, h));
        // Views are built from `i32` sizes, so the clamped values fit back into `i32`.
        Self {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as i32,
            height: (y1 - y0) as i32,
        }
    }
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// A region of the complex plane given by its four bounds.
///
/// `top` is the larger imaginary bound: screen rows grow downward while the
/// imaginary axis grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldRect {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl WorldRect {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Finite bounds spanning a positive area.
    pub fn is_proper(&self) -> bool {
        [self.top, self.bottom, self.left, self.right]
            .iter()
            .all(|v| v.is_finite())
            && self.width() > 0.0
            && self.height() > 0.0
    }
}

impl Default for WorldRect {
    /// The square `[-2, 2] × [-2, 2]`, which contains the whole Mandelbrot set.
    fn default() -> Self {
        Self::new(2.0, -2.0, -2.0, 2.0)
    }
}
