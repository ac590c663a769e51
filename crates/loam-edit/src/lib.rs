//! Brush-driven edit operations over terrain field storage: sculpting,
//! flattening, smoothing, noise, painting, holes, and whole-terrain resize.
#![forbid(unsafe_code)]

mod brush;
mod falloff;
mod height;
mod registry;
mod resize;
mod weight;

pub use brush::BrushOutcome;
pub use falloff::Falloff;
pub use height::{
    apply_noise, flatten, get_height_region, raise_lower_region, sculpt, set_height_region,
    smooth, NoiseOutcome,
};
pub use registry::TerrainRegistry;
pub use resize::{resize, ResizeReport};
pub use weight::{
    get_hole, get_weights_region, paint, set_hole, set_hole_region, set_weights_region,
};
