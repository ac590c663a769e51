//! Merged-view sample storage over a stack of edit layers.
//!
//! Reads always see the merged composite. Writes go through staged guards
//! that target exactly one edit layer: the guard borrows the storage
//! mutably, so opening a second write or resolving mid-write is rejected at
//! compile time. Committing absorbs the staged samples into the layer as
//! deltas against the old merged view and then publishes them at the
//! requested [`ResolveScope`].

use loam_grid::{GridRect, MID_HEIGHT};

use crate::layer::{EditLayer, PaintLayerDesc};
use crate::map::{HeightMap, WeightMap};
use crate::{EditError, EditResult};

/// How much derived state a committed write recomputes.
///
/// `Touched` patches only the merged field the write staged, over the
/// written rect. `Full` rebuilds the merged heightfield and every merged
/// weightfield from edit-layer data alone; merged content no layer backs
/// (host-imported weightmaps, for instance) does not survive a full
/// resolve, so routine brush work must always commit `Touched`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveScope {
    Touched,
    Full,
}

/// Dirty region handed to the host for mesh/collision republish.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepublishRequest {
    pub rev: u64,
    pub rect: GridRect,
}

/// Sample storage for one terrain.
pub struct TerrainStorage {
    extent: GridRect,
    merged_height: HeightMap,
    merged_weights: Vec<(PaintLayerDesc, WeightMap)>,
    layers: Vec<EditLayer>,
    active: Option<usize>,
    dirty_rev: u64,
    published_rev: u64,
    pending: Option<GridRect>,
}

impl TerrainStorage {
    /// Flat storage covering `extent`, no edit layers, nothing attached.
    pub fn new(extent: GridRect) -> Self {
        Self {
            extent,
            merged_height: HeightMap::filled(extent, MID_HEIGHT),
            merged_weights: Vec::new(),
            layers: Vec::new(),
            active: None,
            dirty_rev: 0,
            published_rev: 0,
            pending: None,
        }
    }

    #[inline]
    pub fn extent(&self) -> GridRect {
        self.extent
    }

    // --- edit layer lifecycle ---

    pub fn add_edit_layer(&mut self, name: &str) -> EditResult<usize> {
        if self.layers.iter().any(|l| l.name() == name) {
            return Err(EditError::invalid(format!(
                "edit layer `{name}` already exists"
            )));
        }
        self.layers.push(EditLayer::new(name));
        Ok(self.layers.len() - 1)
    }

    /// Drop a layer and rebuild the merged views without its contribution.
    pub fn remove_edit_layer(&mut self, name: &str) -> EditResult<()> {
        let idx = self.layer_index(name)?;
        self.layers.remove(idx);
        self.active = match self.active {
            Some(a) if a == idx => None,
            Some(a) if a > idx => Some(a - 1),
            other => other,
        };
        self.resolve_full();
        let extent = self.extent;
        self.bump(extent);
        Ok(())
    }

    #[inline]
    pub fn edit_layers(&self) -> &[EditLayer] {
        &self.layers
    }

    pub fn layer_index(&self, name: &str) -> EditResult<usize> {
        self.layers
            .iter()
            .position(|l| l.name() == name)
            .ok_or_else(|| EditError::not_found("edit layer", name))
    }

    pub fn set_active_layer(&mut self, name: &str) -> EditResult<()> {
        self.active = Some(self.layer_index(name)?);
        Ok(())
    }

    pub fn clear_active_layer(&mut self) {
        self.active = None;
    }

    pub fn active_layer(&self) -> Option<&str> {
        self.active.map(|i| self.layers[i].name())
    }

    /// Layer that writes land on: the explicit selection, else the first
    /// layer in the stack. Terrains owning no layers cannot accept writes.
    pub fn target_layer(&self) -> EditResult<usize> {
        match self.active {
            Some(i) => Ok(i),
            None if !self.layers.is_empty() => Ok(0),
            None => Err(EditError::StorageUnavailable("terrain owns no edit layers")),
        }
    }

    // --- paint layer lifecycle ---

    /// Attach a paint target, optionally seeding its merged weights with
    /// host-provided data. Seeded weights are merged-only until some layer
    /// write backs them, which a later full resolve will not preserve.
    pub fn attach_paint_layer(
        &mut self,
        desc: PaintLayerDesc,
        initial: Option<Vec<u8>>,
    ) -> EditResult<()> {
        if self.paint_index(&desc.name).is_ok() {
            return Err(EditError::invalid(format!(
                "paint layer `{}` already attached",
                desc.name
            )));
        }
        let merged = match initial {
            Some(data) => {
                let map = WeightMap::from_vec(self.extent, data)?;
                if map.samples().iter().any(|&w| w != 0) {
                    log::debug!(
                        target: "field",
                        "paint layer {} attached with merged-only weights",
                        desc.name
                    );
                }
                map
            }
            None => WeightMap::filled(self.extent, 0),
        };
        self.merged_weights.push((desc, merged));
        Ok(())
    }

    pub fn paint_layers(&self) -> impl Iterator<Item = &PaintLayerDesc> {
        self.merged_weights.iter().map(|(desc, _)| desc)
    }

    pub fn has_paint_layer(&self, name: &str) -> bool {
        self.paint_index(name).is_ok()
    }

    fn paint_index(&self, name: &str) -> EditResult<usize> {
        self.merged_weights
            .iter()
            .position(|(desc, _)| desc.name == name)
            .ok_or_else(|| EditError::not_found("paint layer", name))
    }

    // --- merged reads ---

    pub fn read_height(&self, rect: GridRect) -> EditResult<HeightMap> {
        self.merged_height.copy_rect(rect)
    }

    pub fn read_weights(&self, paint: &str, rect: GridRect) -> EditResult<WeightMap> {
        let i = self.paint_index(paint)?;
        self.merged_weights[i].1.copy_rect(rect)
    }

    #[inline]
    pub fn height_at(&self, x: i32, y: i32) -> Option<u16> {
        self.merged_height.get(x, y)
    }

    // --- write path ---

    /// Open a staged height write into `layer` over `rect`, which must lie
    /// fully inside the extent.
    pub fn height_write(&mut self, layer: usize, rect: GridRect) -> EditResult<HeightWrite<'_>> {
        self.check_layer(layer)?;
        let rect = self.check_rect(rect)?;
        Ok(HeightWrite {
            store: self,
            layer,
            rect,
            staged: None,
        })
    }

    /// Open a staged weight write into `layer` for the named paint target.
    pub fn weight_write(
        &mut self,
        layer: usize,
        paint: &str,
        rect: GridRect,
    ) -> EditResult<WeightWrite<'_>> {
        self.check_layer(layer)?;
        let paint = self.paint_index(paint)?;
        let rect = self.check_rect(rect)?;
        Ok(WeightWrite {
            store: self,
            layer,
            paint,
            rect,
            staged: None,
        })
    }

    fn check_layer(&self, layer: usize) -> EditResult<()> {
        if layer >= self.layers.len() {
            return Err(EditError::StorageUnavailable("edit layer index is stale"));
        }
        Ok(())
    }

    fn check_rect(&self, rect: GridRect) -> EditResult<GridRect> {
        match rect.clamped_to(&self.extent) {
            Some(c) if c == rect => Ok(rect),
            _ => Err(EditError::OutOfBounds {
                rect,
                extent: self.extent,
            }),
        }
    }

    // --- resolve ---

    /// Rebuild merged height and every merged weightfield from layer data
    /// alone. Intended for terminal actions (layer removal, flattening a
    /// stack); merged-only weight content is lost and logged per field.
    pub fn resolve_full(&mut self) {
        let extent = self.extent;
        let mut acc = vec![i32::from(MID_HEIGHT); extent.area()];
        for layer in &self.layers {
            if let Some(h) = &layer.height {
                for (a, &s) in acc.iter_mut().zip(h) {
                    *a += i32::from(s) - i32::from(MID_HEIGHT);
                }
            }
        }
        for (dst, a) in self.merged_height.samples_mut().iter_mut().zip(acc) {
            *dst = a.clamp(0, 65535) as u16;
        }

        for (desc, merged) in self.merged_weights.iter_mut() {
            let mut acc = vec![0u16; extent.area()];
            let mut backed = false;
            for layer in &self.layers {
                if let Some(w) = layer.weights.get(&desc.name) {
                    backed = true;
                    for (a, &s) in acc.iter_mut().zip(w) {
                        *a = (*a + u16::from(s)).min(255);
                    }
                }
            }
            if !backed && merged.samples().iter().any(|&w| w != 0) {
                log::warn!(
                    target: "field",
                    "full resolve dropped merged-only weights for paint layer {}",
                    desc.name
                );
            }
            for (dst, a) in merged.samples_mut().iter_mut().zip(acc) {
                *dst = a as u8;
            }
        }
    }

    // --- republish tracking ---

    /// Mark `rect` dirty, advancing the edit revision.
    pub fn bump(&mut self, rect: GridRect) -> u64 {
        self.dirty_rev += 1;
        self.pending = Some(match self.pending {
            Some(p) => p.union(&rect),
            None => rect,
        });
        self.dirty_rev
    }

    /// Hand the accumulated dirty region to the host, emptying it.
    pub fn take_pending(&mut self) -> Option<RepublishRequest> {
        let rev = self.dirty_rev;
        self.pending.take().map(|rect| RepublishRequest { rev, rect })
    }

    /// Host acknowledgement that meshes up to `rev` were republished.
    pub fn mark_published(&mut self, rev: u64) {
        if rev > self.published_rev {
            self.published_rev = rev;
        }
    }

    #[inline]
    pub fn dirty_rev(&self) -> u64 {
        self.dirty_rev
    }

    #[inline]
    pub fn published_rev(&self) -> u64 {
        self.published_rev
    }

    pub fn is_dirty(&self) -> bool {
        self.published_rev < self.dirty_rev
    }
}

/// Exclusive staged write into one edit layer's heightfield.
pub struct HeightWrite<'a> {
    store: &'a mut TerrainStorage,
    layer: usize,
    rect: GridRect,
    staged: Option<Vec<u16>>,
}

impl HeightWrite<'_> {
    #[inline]
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    /// Merged samples currently under the write rect.
    pub fn current(&self) -> EditResult<HeightMap> {
        self.store.merged_height.copy_rect(self.rect)
    }

    /// Stage the post-edit merged values for the whole rect, row-major.
    pub fn stage(&mut self, samples: &[u16]) -> EditResult<()> {
        if samples.len() != self.rect.area() {
            return Err(EditError::invalid(format!(
                "staged {} height samples for rect {:?} covering {} texels",
                samples.len(),
                self.rect,
                self.rect.area()
            )));
        }
        self.staged = Some(samples.to_vec());
        Ok(())
    }

    /// Absorb the staged samples into the target layer and publish them at
    /// `scope`. Returns the revision stamped on the dirty region.
    pub fn commit(self, scope: ResolveScope) -> EditResult<u64> {
        let staged = self
            .staged
            .ok_or_else(|| EditError::invalid("commit without staged height samples"))?;
        let store = self.store;
        let rect = self.rect;
        let extent = store.extent;

        // The layer absorbs target minus old merged, so the composite lands
        // exactly on the staged values.
        let mut deltas = Vec::with_capacity(rect.area());
        {
            let merged = store.merged_height.samples();
            for y in rect.min_y..=rect.max_y {
                for x in rect.min_x..=rect.max_x {
                    let old = merged[extent.idx(x, y)];
                    deltas.push(i32::from(staged[rect.idx(x, y)]) - i32::from(old));
                }
            }
        }
        let layer_data = store.layers[self.layer].height_mut(extent);
        let mut k = 0;
        for y in rect.min_y..=rect.max_y {
            for x in rect.min_x..=rect.max_x {
                let i = extent.idx(x, y);
                layer_data[i] = (i32::from(layer_data[i]) + deltas[k]).clamp(0, 65535) as u16;
                k += 1;
            }
        }

        match scope {
            ResolveScope::Touched => store.merged_height.write_rect(rect, &staged)?,
            ResolveScope::Full => store.resolve_full(),
        }
        Ok(store.bump(rect))
    }
}

/// Exclusive staged write into one edit layer's weights for one paint target.
pub struct WeightWrite<'a> {
    store: &'a mut TerrainStorage,
    layer: usize,
    paint: usize,
    rect: GridRect,
    staged: Option<Vec<u8>>,
}

impl WeightWrite<'_> {
    #[inline]
    pub fn rect(&self) -> GridRect {
        self.rect
    }

    /// Merged weights currently under the write rect.
    pub fn current(&self) -> EditResult<WeightMap> {
        self.store.merged_weights[self.paint].1.copy_rect(self.rect)
    }

    /// Stage the post-edit merged weights for the whole rect, row-major.
    pub fn stage(&mut self, weights: &[u8]) -> EditResult<()> {
        if weights.len() != self.rect.area() {
            return Err(EditError::invalid(format!(
                "staged {} weights for rect {:?} covering {} texels",
                weights.len(),
                self.rect,
                self.rect.area()
            )));
        }
        self.staged = Some(weights.to_vec());
        Ok(())
    }

    /// Absorb the staged weights into the target layer and publish them at
    /// `scope`. Returns the revision stamped on the dirty region.
    pub fn commit(self, scope: ResolveScope) -> EditResult<u64> {
        let staged = self
            .staged
            .ok_or_else(|| EditError::invalid("commit without staged weights"))?;
        let store = self.store;
        let rect = self.rect;
        let extent = store.extent;
        let paint_name = store.merged_weights[self.paint].0.name.clone();

        let mut deltas = Vec::with_capacity(rect.area());
        {
            let merged = store.merged_weights[self.paint].1.samples();
            for y in rect.min_y..=rect.max_y {
                for x in rect.min_x..=rect.max_x {
                    let old = merged[extent.idx(x, y)];
                    deltas.push(i32::from(staged[rect.idx(x, y)]) - i32::from(old));
                }
            }
        }
        let layer_data = store.layers[self.layer].weights_mut(&paint_name, extent);
        let mut k = 0;
        for y in rect.min_y..=rect.max_y {
            for x in rect.min_x..=rect.max_x {
                let i = extent.idx(x, y);
                layer_data[i] = (i32::from(layer_data[i]) + deltas[k]).clamp(0, 255) as u8;
                k += 1;
            }
        }

        match scope {
            ResolveScope::Touched => store.merged_weights[self.paint].1.write_rect(rect, &staged)?,
            ResolveScope::Full => store.resolve_full(),
        }
        Ok(store.bump(rect))
    }
}
