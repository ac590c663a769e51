//! Component/section layout of a terrain and the legal grid sizes.

use thiserror::Error;

use crate::GridRect;

/// Section sizes the renderer's LOD scheme can consume (quads per side).
pub const LEGAL_QUADS_PER_SECTION: [u32; 6] = [7, 15, 31, 63, 127, 255];

/// Sections per component side; larger values break component streaming.
pub const MAX_SECTIONS_PER_COMPONENT: u32 = 2;

/// Components per terrain side. Keeps the densest legal grid
/// (`32 * 510 + 1` texels per axis) far inside i32 texel coordinates and
/// within what hosts stream.
pub const MAX_COMPONENTS_PER_SIDE: u32 = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("component count {0}x{1} is invalid; both sides need at least one component")]
    NoComponents(u32, u32),
    #[error("component count {0}x{1} exceeds {MAX_COMPONENTS_PER_SIDE} per side")]
    TooManyComponents(u32, u32),
    #[error("quads per section {0} is not one of {LEGAL_QUADS_PER_SECTION:?}")]
    IllegalQuads(u32),
    #[error("sections per component {0} is out of range 1..={MAX_SECTIONS_PER_COMPONENT}")]
    IllegalSections(u32),
}

/// Validated grid layout: a rectangle of components, each split into
/// `sections_per_component`^2 sections of `quads_per_section`^2 quads.
///
/// The sample grid covers the quad corners, so a terrain spans
/// `components * sections * quads + 1` texels per side and neighbouring
/// components share their border row/column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainLayout {
    components_x: u32,
    components_y: u32,
    quads_per_section: u32,
    sections_per_component: u32,
}

impl TerrainLayout {
    pub fn new(
        components_x: u32,
        components_y: u32,
        quads_per_section: u32,
        sections_per_component: u32,
    ) -> Result<Self, LayoutError> {
        if components_x == 0 || components_y == 0 {
            return Err(LayoutError::NoComponents(components_x, components_y));
        }
        if components_x > MAX_COMPONENTS_PER_SIDE || components_y > MAX_COMPONENTS_PER_SIDE {
            return Err(LayoutError::TooManyComponents(components_x, components_y));
        }
        if !LEGAL_QUADS_PER_SECTION.contains(&quads_per_section) {
            return Err(LayoutError::IllegalQuads(quads_per_section));
        }
        if sections_per_component == 0 || sections_per_component > MAX_SECTIONS_PER_COMPONENT {
            return Err(LayoutError::IllegalSections(sections_per_component));
        }
        Ok(Self {
            components_x,
            components_y,
            quads_per_section,
            sections_per_component,
        })
    }

    #[inline]
    pub const fn components_x(&self) -> u32 {
        self.components_x
    }

    #[inline]
    pub const fn components_y(&self) -> u32 {
        self.components_y
    }

    #[inline]
    pub const fn quads_per_section(&self) -> u32 {
        self.quads_per_section
    }

    #[inline]
    pub const fn sections_per_component(&self) -> u32 {
        self.sections_per_component
    }

    /// Quads along one side of a component.
    #[inline]
    pub const fn quads_per_component(&self) -> u32 {
        self.quads_per_section * self.sections_per_component
    }

    #[inline]
    pub const fn grid_width(&self) -> u32 {
        self.components_x * self.quads_per_component() + 1
    }

    #[inline]
    pub const fn grid_height(&self) -> u32 {
        self.components_y * self.quads_per_component() + 1
    }

    /// Full sample grid as a rect anchored at the local origin.
    #[inline]
    pub const fn extent(&self) -> GridRect {
        GridRect::new(
            0,
            0,
            self.grid_width() as i32 - 1,
            self.grid_height() as i32 - 1,
        )
    }
}
