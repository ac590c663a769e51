//! Inclusive texel rectangles over the terrain sample grid.

/// Axis-aligned rectangle of texels with inclusive bounds.
///
/// `min` and `max` both name texels inside the rectangle, so a single texel
/// is `min == max` and a rect never has zero area. Empty results are
/// expressed as `None` by the operations that can produce them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct GridRect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl GridRect {
    #[inline]
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Rect anchored at the origin covering `w x h` texels.
    #[inline]
    pub const fn from_size(w: i32, h: i32) -> Self {
        Self {
            min_x: 0,
            min_y: 0,
            max_x: w - 1,
            max_y: h - 1,
        }
    }

    /// Smallest rect containing the continuous local-space span
    /// `[x0, x1] x [y0, y1]` (mins floored, maxes ceiled).
    #[inline]
    pub fn from_local_span(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            min_x: x0.floor() as i32,
            min_y: y0.floor() as i32,
            max_x: x1.ceil() as i32,
            max_y: y1.ceil() as i32,
        }
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.max_y - self.min_y + 1
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Grow the rect by `margin` texels on every side.
    #[inline]
    pub const fn expanded(&self, margin: i32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Intersection with `bounds`, or `None` when the rects do not overlap.
    #[inline]
    pub fn clamped_to(&self, bounds: &GridRect) -> Option<GridRect> {
        let out = GridRect {
            min_x: self.min_x.max(bounds.min_x),
            min_y: self.min_y.max(bounds.min_y),
            max_x: self.max_x.min(bounds.max_x),
            max_y: self.max_y.min(bounds.max_y),
        };
        if out.min_x > out.max_x || out.min_y > out.max_y {
            None
        } else {
            Some(out)
        }
    }

    /// Smallest rect covering both `self` and `other`.
    #[inline]
    pub fn union(&self, other: &GridRect) -> GridRect {
        GridRect {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Row-major offset of `(x, y)` into a buffer covering this rect.
    /// Callers guarantee containment.
    #[inline]
    pub fn idx(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.contains(x, y));
        (y - self.min_y) as usize * self.width() as usize + (x - self.min_x) as usize
    }
}
