//! Labelled collection of live terrains.

use hashbrown::HashMap;

use loam_field::{EditError, EditResult, RepublishRequest, Terrain};
use loam_grid::{TerrainLayout, TerrainTransform};

/// Terrains addressable by label. All edit entry points look their target
/// up here; a label that misses resolves to `NotFound` rather than a panic.
#[derive(Default)]
pub struct TerrainRegistry {
    terrains: HashMap<String, Terrain>,
}

impl TerrainRegistry {
    pub fn new() -> Self {
        Self {
            terrains: HashMap::new(),
        }
    }

    /// Create and register a fresh flat terrain.
    pub fn create(
        &mut self,
        label: &str,
        transform: TerrainTransform,
        layout: TerrainLayout,
    ) -> EditResult<&mut Terrain> {
        if self.terrains.contains_key(label) {
            return Err(EditError::invalid(format!(
                "terrain `{label}` already registered"
            )));
        }
        log::info!(
            target: "edit",
            "terrain {} registered ({}x{} texels)",
            label,
            layout.grid_width(),
            layout.grid_height()
        );
        Ok(self
            .terrains
            .entry(label.to_string())
            .or_insert_with(|| Terrain::new(label, transform, layout)))
    }

    /// Register an externally built terrain under its own label.
    pub fn insert(&mut self, terrain: Terrain) -> EditResult<()> {
        if self.terrains.contains_key(terrain.label()) {
            return Err(EditError::invalid(format!(
                "terrain `{}` already registered",
                terrain.label()
            )));
        }
        self.terrains.insert(terrain.label().to_string(), terrain);
        Ok(())
    }

    /// Swap in a staged replacement for an existing label, returning the
    /// terrain it displaced.
    pub fn replace(&mut self, terrain: Terrain) -> EditResult<Terrain> {
        let old = self
            .terrains
            .remove(terrain.label())
            .ok_or_else(|| EditError::not_found("terrain", terrain.label()))?;
        self.terrains.insert(terrain.label().to_string(), terrain);
        Ok(old)
    }

    pub fn get(&self, label: &str) -> EditResult<&Terrain> {
        self.terrains
            .get(label)
            .ok_or_else(|| EditError::not_found("terrain", label))
    }

    pub fn get_mut(&mut self, label: &str) -> EditResult<&mut Terrain> {
        self.terrains
            .get_mut(label)
            .ok_or_else(|| EditError::not_found("terrain", label))
    }

    pub fn remove(&mut self, label: &str) -> EditResult<Terrain> {
        self.terrains
            .remove(label)
            .ok_or_else(|| EditError::not_found("terrain", label))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.terrains.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.terrains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrains.is_empty()
    }

    /// Labels in sorted order, for stable host iteration.
    pub fn labels(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.terrains.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    /// Drain pending dirty regions across every terrain, sorted by label.
    /// Each entry is one republish the host owes its renderer.
    pub fn drain_republish(&mut self) -> Vec<(String, RepublishRequest)> {
        let mut out: Vec<(String, RepublishRequest)> = self
            .terrains
            .iter_mut()
            .filter_map(|(label, t)| {
                t.storage_mut()
                    .take_pending()
                    .map(|req| (label.clone(), req))
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}
