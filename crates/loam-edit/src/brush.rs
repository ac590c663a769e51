//! Circular brush footprints on the texel grid.

use loam_field::{EditError, EditResult, Terrain};
use loam_grid::GridRect;

/// What a brush application touched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrushOutcome {
    /// Texels with a falloff weight above zero.
    pub modified: usize,
    /// Texels clamped at an encoding limit.
    pub saturated: usize,
    /// Revision stamped on the dirty region.
    pub rev: u64,
}

/// Grid footprint of a circular world-space brush, clamped to the extent.
pub(crate) struct Footprint {
    pub rect: GridRect,
    /// Centre in continuous local texels.
    pub cx: f32,
    pub cy: f32,
    /// Radius in local texels.
    pub radius: f32,
}

impl Footprint {
    /// Map a world-space brush onto a terrain's grid. Rejects degenerate
    /// radii and brushes that miss the grid entirely.
    pub fn resolve(terrain: &Terrain, wx: f32, wy: f32, radius: f32) -> EditResult<Footprint> {
        if !(wx.is_finite() && wy.is_finite() && radius.is_finite()) {
            return Err(EditError::invalid("brush centre and radius must be finite"));
        }
        let t = terrain.transform();
        let (cx, cy) = t.world_to_local(wx, wy);
        let local_radius = t.radius_to_local(radius);
        if local_radius <= 0.0 {
            return Err(EditError::invalid(format!(
                "brush radius {radius} maps to {local_radius} texels"
            )));
        }
        let span = GridRect::from_local_span(
            cx - local_radius,
            cy - local_radius,
            cx + local_radius,
            cy + local_radius,
        );
        let extent = terrain.extent();
        let rect = span
            .clamped_to(&extent)
            .ok_or(EditError::OutOfBounds { rect: span, extent })?;
        Ok(Footprint {
            rect,
            cx,
            cy,
            radius: local_radius,
        })
    }

    /// Local-texel distance from the brush centre.
    #[inline]
    pub fn distance(&self, x: i32, y: i32) -> f32 {
        let dx = x as f32 - self.cx;
        let dy = y as f32 - self.cy;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Clamp a requested rect to the terrain, erroring when nothing overlaps.
pub(crate) fn clamp_to_extent(terrain: &Terrain, rect: GridRect) -> EditResult<GridRect> {
    let extent = terrain.extent();
    rect.clamped_to(&extent)
        .ok_or(EditError::OutOfBounds { rect, extent })
}
