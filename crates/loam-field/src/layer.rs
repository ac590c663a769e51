//! Edit layers and paint-layer descriptors.

use std::collections::HashMap;

use loam_grid::{GridRect, MID_HEIGHT};

/// Paint layer reserved for surface holes.
pub const VISIBILITY_LAYER: &str = "Visibility";

/// Visibility weights at or above this cut the surface.
pub const HOLE_THRESHOLD: u8 = 128;

/// Host-facing description of a paint target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaintLayerDesc {
    pub name: String,
    /// Weight-blended layers renormalise against their siblings when the
    /// renderer composites; alpha layers stand alone. The edit path treats
    /// both the same and stores the flag for the host.
    pub weight_blended: bool,
}

impl PaintLayerDesc {
    pub fn blended(name: &str) -> Self {
        Self {
            name: name.into(),
            weight_blended: true,
        }
    }

    pub fn alpha(name: &str) -> Self {
        Self {
            name: name.into(),
            weight_blended: false,
        }
    }
}

/// One stacked edit layer.
///
/// Fields are allocated on first write, per paint layer for weights. Height
/// samples are stored biased around `MID_HEIGHT` so an untouched layer
/// contributes nothing to the composite.
#[derive(Clone, Debug)]
pub struct EditLayer {
    name: String,
    pub(crate) height: Option<Vec<u16>>,
    pub(crate) weights: HashMap<String, Vec<u8>>,
}

impl EditLayer {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            height: None,
            weights: HashMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_height(&self) -> bool {
        self.height.is_some()
    }

    /// True when this layer stores weight deltas for `paint`.
    pub fn backs_weights(&self, paint: &str) -> bool {
        self.weights.contains_key(paint)
    }

    pub(crate) fn height_mut(&mut self, extent: GridRect) -> &mut Vec<u16> {
        self.height
            .get_or_insert_with(|| vec![MID_HEIGHT; extent.area()])
    }

    pub(crate) fn weights_mut(&mut self, paint: &str, extent: GridRect) -> &mut Vec<u8> {
        self.weights
            .entry(paint.to_string())
            .or_insert_with(|| vec![0; extent.area()])
    }
}
