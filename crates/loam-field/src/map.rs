//! Dense row-major sample buffers for height and weight fields.

use loam_grid::GridRect;

use crate::{EditError, EditResult};

/// Dense rect of samples, row-major from the rect's min corner.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMap<T> {
    rect: GridRect,
    data: Vec<T>,
}

/// Encoded terrain heights (`MID_HEIGHT` is the origin plane).
pub type HeightMap = FieldMap<u16>;

/// Paint weights, 0 = absent, 255 = fully painted.
pub type WeightMap = FieldMap<u8>;

impl<T: Copy> FieldMap<T> {
    pub fn filled(rect: GridRect, value: T) -> Self {
        Self {
            rect,
            data: vec![value; rect.area()],
        }
    }

    pub fn from_vec(rect: GridRect, data: Vec<T>) -> EditResult<Self> {
        if data.len() != rect.area() {
            return Err(EditError::invalid(format!(
                "sample buffer holds {} values but rect {:?} covers {} texels",
                data.len(),
                rect,
                rect.area()
            )));
        }
        Ok(Self { rect, data })
    }

    #[inline]
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    #[inline]
    pub fn samples(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn samples_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn into_samples(self) -> Vec<T> {
        self.data
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<T> {
        self.rect
            .contains(x, y)
            .then(|| self.data[self.rect.idx(x, y)])
    }

    /// Copy out `rect`, which must lie fully inside this map.
    pub fn copy_rect(&self, rect: GridRect) -> EditResult<FieldMap<T>> {
        self.check_inside(rect)?;
        let w = rect.width() as usize;
        let mut out = Vec::with_capacity(rect.area());
        for y in rect.min_y..=rect.max_y {
            let row = self.rect.idx(rect.min_x, y);
            out.extend_from_slice(&self.data[row..row + w]);
        }
        Ok(FieldMap { rect, data: out })
    }

    /// Overwrite `rect` from a row-major slice of matching length.
    pub fn write_rect(&mut self, rect: GridRect, values: &[T]) -> EditResult<()> {
        self.check_inside(rect)?;
        if values.len() != rect.area() {
            return Err(EditError::invalid(format!(
                "wrote {} values into rect {:?} covering {} texels",
                values.len(),
                rect,
                rect.area()
            )));
        }
        let w = rect.width() as usize;
        for (row, y) in (rect.min_y..=rect.max_y).enumerate() {
            let dst = self.rect.idx(rect.min_x, y);
            self.data[dst..dst + w].copy_from_slice(&values[row * w..(row + 1) * w]);
        }
        Ok(())
    }

    fn check_inside(&self, rect: GridRect) -> EditResult<()> {
        match rect.clamped_to(&self.rect) {
            Some(c) if c == rect => Ok(()),
            _ => Err(EditError::OutOfBounds {
                rect,
                extent: self.rect,
            }),
        }
    }
}
