//! Grid math shared across the terrain crates: texel rectangles, component
//! layout validation, and the world/local transform with its fixed-point
//! height codec.
#![forbid(unsafe_code)]

mod layout;
mod rect;
mod transform;

pub use layout::{
    LayoutError, TerrainLayout, LEGAL_QUADS_PER_SECTION, MAX_COMPONENTS_PER_SIDE,
    MAX_SECTIONS_PER_COMPONENT,
};
pub use rect::GridRect;
pub use transform::{TerrainTransform, Vec3, MID_HEIGHT, Z_SCALE};
