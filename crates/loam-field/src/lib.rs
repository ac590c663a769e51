//! Terrain sample storage: merged height/weight views composited from a
//! stack of named edit layers, with scoped resolves, staged write guards
//! and republish tracking for the host renderer.
#![forbid(unsafe_code)]

mod error;
mod layer;
mod map;
mod store;
mod terrain;


pub use error::{EditError, EditResult};
pub use layer::{EditLayer, PaintLayerDesc, HOLE_THRESHOLD, VISIBILITY_LAYER};
pub use map::{FieldMap, HeightMap, WeightMap};
pub use store::{HeightWrite, RepublishRequest, ResolveScope, TerrainStorage, WeightWrite};
pub use terrain::{Terrain, DEFAULT_EDIT_LAYER};
