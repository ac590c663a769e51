//! Weightfield operations: painting named layers and cutting holes.

use loam_field::{
    EditError, EditResult, ResolveScope, Terrain, WeightMap, HOLE_THRESHOLD, VISIBILITY_LAYER,
};
use loam_grid::GridRect;

use crate::brush::{clamp_to_extent, BrushOutcome, Footprint};
use crate::Falloff;

/// Merged weights of a paint layer under `rect`, clamped to the extent.
pub fn get_weights_region(terrain: &Terrain, paint: &str, rect: GridRect) -> EditResult<WeightMap> {
    let clamped = clamp_to_extent(terrain, rect)?;
    terrain.storage().read_weights(paint, clamped)
}

/// Write merged target weights through the layer path. `weights` is
/// row-major and must match the clamped rect exactly.
pub fn set_weights_region(
    terrain: &mut Terrain,
    paint: &str,
    rect: GridRect,
    weights: &[u8],
) -> EditResult<u64> {
    let clamped = clamp_to_extent(terrain, rect)?;
    let layer = terrain.storage().target_layer()?;
    let mut write = terrain.storage_mut().weight_write(layer, paint, clamped)?;
    write.stage(weights)?;
    write.commit(ResolveScope::Touched)
}

/// Paint a named layer under a circular brush. `strength` is the weight
/// fraction added at full falloff, clamped into `-1..=1`; negative values
/// erase. Paint strokes always use the smooth falloff.
pub fn paint(
    terrain: &mut Terrain,
    paint: &str,
    wx: f32,
    wy: f32,
    radius: f32,
    strength: f32,
) -> EditResult<BrushOutcome> {
    if !strength.is_finite() {
        return Err(EditError::invalid(format!(
            "paint strength must be finite, got {strength}"
        )));
    }
    let strength = strength.clamp(-1.0, 1.0);
    let fp = Footprint::resolve(terrain, wx, wy, radius)?;
    let layer = terrain.storage().target_layer()?;

    let mut write = terrain.storage_mut().weight_write(layer, paint, fp.rect)?;
    let mut staged = write.current()?.into_samples();
    let mut out = BrushOutcome::default();
    let mut k = 0;
    for y in fp.rect.min_y..=fp.rect.max_y {
        for x in fp.rect.min_x..=fp.rect.max_x {
            let weight = Falloff::Smooth.weight(fp.distance(x, y), fp.radius);
            if weight > 0.0 {
                out.modified += 1;
                let raw = f32::from(staged[k]) / 255.0 + strength * weight;
                let clamped = raw.clamp(0.0, 1.0);
                if clamped != raw {
                    out.saturated += 1;
                }
                staged[k] = (clamped * 255.0).round() as u8;
            }
            k += 1;
        }
    }
    write.stage(&staged)?;
    out.rev = write.commit(ResolveScope::Touched)?;
    Ok(out)
}

/// Cut (`create`) or fill a hole under a circular brush by saturating the
/// visibility layer. The layer must be attached before holes can be edited.
pub fn set_hole(
    terrain: &mut Terrain,
    wx: f32,
    wy: f32,
    radius: f32,
    create: bool,
) -> EditResult<BrushOutcome> {
    if !terrain.storage().has_paint_layer(VISIBILITY_LAYER) {
        return Err(EditError::not_found("paint layer", VISIBILITY_LAYER));
    }
    let fp = Footprint::resolve(terrain, wx, wy, radius)?;
    let layer = terrain.storage().target_layer()?;
    let fill = if create { u8::MAX } else { 0 };

    let mut write = terrain
        .storage_mut()
        .weight_write(layer, VISIBILITY_LAYER, fp.rect)?;
    let mut staged = write.current()?.into_samples();
    let mut out = BrushOutcome::default();
    let mut k = 0;
    for y in fp.rect.min_y..=fp.rect.max_y {
        for x in fp.rect.min_x..=fp.rect.max_x {
            if Falloff::Smooth.weight(fp.distance(x, y), fp.radius) > 0.0 {
                out.modified += 1;
                staged[k] = fill;
            }
            k += 1;
        }
    }
    write.stage(&staged)?;
    out.rev = write.commit(ResolveScope::Touched)?;
    Ok(out)
}

/// Rectangular variant of [`set_hole`], saturating the clamped rect.
pub fn set_hole_region(terrain: &mut Terrain, rect: GridRect, create: bool) -> EditResult<u64> {
    if !terrain.storage().has_paint_layer(VISIBILITY_LAYER) {
        return Err(EditError::not_found("paint layer", VISIBILITY_LAYER));
    }
    let clamped = clamp_to_extent(terrain, rect)?;
    let fill = vec![if create { u8::MAX } else { 0 }; clamped.area()];
    set_weights_region(terrain, VISIBILITY_LAYER, clamped, &fill)
}

/// True when any visibility weight inside the brush footprint crosses the
/// hole threshold. Terrains without a visibility layer have no holes.
pub fn get_hole(terrain: &Terrain, wx: f32, wy: f32, radius: f32) -> EditResult<bool> {
    if !terrain.storage().has_paint_layer(VISIBILITY_LAYER) {
        return Ok(false);
    }
    let fp = Footprint::resolve(terrain, wx, wy, radius)?;
    let weights = terrain.storage().read_weights(VISIBILITY_LAYER, fp.rect)?;
    let mut k = 0;
    for y in fp.rect.min_y..=fp.rect.max_y {
        for x in fp.rect.min_x..=fp.rect.max_x {
            let inside = Falloff::Smooth.weight(fp.distance(x, y), fp.radius) > 0.0;
            if inside && weights.samples()[k] >= HOLE_THRESHOLD {
                return Ok(true);
            }
            k += 1;
        }
    }
    Ok(false)
}
