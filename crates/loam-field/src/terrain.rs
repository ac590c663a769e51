//! A placed terrain: label, transform, layout and sample storage.

use loam_grid::{GridRect, TerrainLayout, TerrainTransform};

use crate::TerrainStorage;

/// Name of the edit layer every fresh terrain starts with.
pub const DEFAULT_EDIT_LAYER: &str = "Base";

pub struct Terrain {
    label: String,
    transform: TerrainTransform,
    layout: TerrainLayout,
    storage: TerrainStorage,
}

impl Terrain {
    /// Flat terrain with one default edit layer and no explicit selection.
    pub fn new(label: &str, transform: TerrainTransform, layout: TerrainLayout) -> Self {
        let mut storage = TerrainStorage::new(layout.extent());
        // fresh storage holds no layers, the name cannot collide
        let _ = storage.add_edit_layer(DEFAULT_EDIT_LAYER);
        Self {
            label: label.into(),
            transform,
            layout,
            storage,
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn transform(&self) -> &TerrainTransform {
        &self.transform
    }

    #[inline]
    pub fn layout(&self) -> &TerrainLayout {
        &self.layout
    }

    #[inline]
    pub fn extent(&self) -> GridRect {
        self.storage.extent()
    }

    #[inline]
    pub fn storage(&self) -> &TerrainStorage {
        &self.storage
    }

    #[inline]
    pub fn storage_mut(&mut self) -> &mut TerrainStorage {
        &mut self.storage
    }
}
