//! Heightfield edit operations.
//!
//! Every operation reads the merged view, computes post-edit samples for
//! its footprint, and commits them through a staged layer write with a
//! touched-field resolve. Height never escalates to a full resolve here;
//! that would cost sibling weightfields their merged-only data.

use loam_field::{EditError, EditResult, HeightMap, ResolveScope, Terrain};
use loam_grid::GridRect;

use crate::brush::{clamp_to_extent, BrushOutcome, Footprint};
use crate::Falloff;

/// What a noise application did to the heightfield.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NoiseOutcome {
    /// Texels inside the brush footprint.
    pub modified: usize,
    /// Texels clamped at an encoding limit.
    pub saturated: usize,
    /// Revision stamped on the dirty region.
    pub rev: u64,
    /// Smallest realised world-height change.
    pub min_delta_z: f32,
    /// Largest realised world-height change.
    pub max_delta_z: f32,
}

fn finite(value: f32, what: &str) -> EditResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EditError::invalid(format!("{what} must be finite, got {value}")))
    }
}

/// Merged heights under `rect`, clamped to the extent.
pub fn get_height_region(terrain: &Terrain, rect: GridRect) -> EditResult<HeightMap> {
    let clamped = clamp_to_extent(terrain, rect)?;
    terrain.storage().read_height(clamped)
}

/// Write merged target heights through the layer path. `samples` is
/// row-major and must match the clamped rect exactly.
pub fn set_height_region(terrain: &mut Terrain, rect: GridRect, samples: &[u16]) -> EditResult<u64> {
    let clamped = clamp_to_extent(terrain, rect)?;
    let layer = terrain.storage().target_layer()?;
    let mut write = terrain.storage_mut().height_write(layer, clamped)?;
    write.stage(samples)?;
    write.commit(ResolveScope::Touched)
}

/// Raise (negative `strength` lowers) the surface under a circular brush.
/// `strength` is the world-height change at full falloff weight.
pub fn sculpt(
    terrain: &mut Terrain,
    wx: f32,
    wy: f32,
    radius: f32,
    strength: f32,
    falloff: Falloff,
) -> EditResult<BrushOutcome> {
    finite(strength, "sculpt strength")?;
    let fp = Footprint::resolve(terrain, wx, wy, radius)?;
    let units = strength * terrain.transform().height_units_per_world();
    let layer = terrain.storage().target_layer()?;

    let mut write = terrain.storage_mut().height_write(layer, fp.rect)?;
    let mut staged = write.current()?.into_samples();
    let mut out = BrushOutcome::default();
    let mut k = 0;
    for y in fp.rect.min_y..=fp.rect.max_y {
        for x in fp.rect.min_x..=fp.rect.max_x {
            let weight = falloff.weight(fp.distance(x, y), fp.radius);
            if weight > 0.0 {
                out.modified += 1;
                let target = (f32::from(staged[k]) + units * weight).round();
                let clamped = target.clamp(0.0, 65535.0);
                if clamped != target {
                    out.saturated += 1;
                }
                staged[k] = clamped as u16;
            }
            k += 1;
        }
    }
    write.stage(&staged)?;
    out.rev = write.commit(ResolveScope::Touched)?;
    Ok(out)
}

/// Pull the surface towards `target_z` (world units). `strength` is the
/// blend fraction at full falloff weight, clamped into `0..=1`.
pub fn flatten(
    terrain: &mut Terrain,
    wx: f32,
    wy: f32,
    radius: f32,
    target_z: f32,
    strength: f32,
    falloff: Falloff,
) -> EditResult<BrushOutcome> {
    finite(target_z, "flatten target height")?;
    let strength = finite(strength, "flatten strength")?.clamp(0.0, 1.0);
    let fp = Footprint::resolve(terrain, wx, wy, radius)?;
    let target = f32::from(terrain.transform().encode_height(target_z));
    let layer = terrain.storage().target_layer()?;

    let mut write = terrain.storage_mut().height_write(layer, fp.rect)?;
    let mut staged = write.current()?.into_samples();
    let mut out = BrushOutcome::default();
    let mut k = 0;
    for y in fp.rect.min_y..=fp.rect.max_y {
        for x in fp.rect.min_x..=fp.rect.max_x {
            let weight = falloff.weight(fp.distance(x, y), fp.radius);
            if weight > 0.0 {
                out.modified += 1;
                let cur = f32::from(staged[k]);
                staged[k] = (cur + (target - cur) * (strength * weight)).round() as u16;
            }
            k += 1;
        }
    }
    write.stage(&staged)?;
    out.rev = write.commit(ResolveScope::Touched)?;
    Ok(out)
}

/// Gaussian-blur the surface under a circular brush. The kernel radius
/// follows brush size and strength; texels whose kernel window would leave
/// the grid keep their value.
pub fn smooth(
    terrain: &mut Terrain,
    wx: f32,
    wy: f32,
    radius: f32,
    strength: f32,
    falloff: Falloff,
) -> EditResult<BrushOutcome> {
    let strength = finite(strength, "smooth strength")?.clamp(0.0, 1.0);
    let fp = Footprint::resolve(terrain, wx, wy, radius)?;
    let extent = terrain.extent();
    let k = ((fp.radius * strength * 0.1).round() as i32).clamp(1, 32);
    let read_rect = fp.rect.expanded(k).clamped_to(&extent).unwrap_or(fp.rect);
    let source = terrain.storage().read_height(read_rect)?;

    // normalised (2k+1)^2 Gaussian, sigma tied to the kernel radius
    let sigma = k as f32 / 2.0;
    let side = (2 * k + 1) as usize;
    let mut kernel = Vec::with_capacity(side * side);
    let mut norm = 0.0;
    for dy in -k..=k {
        for dx in -k..=k {
            let g = (-((dx * dx + dy * dy) as f32) / (2.0 * sigma * sigma)).exp();
            kernel.push(g);
            norm += g;
        }
    }

    let layer = terrain.storage().target_layer()?;
    let mut write = terrain.storage_mut().height_write(layer, fp.rect)?;
    let mut staged = write.current()?.into_samples();
    let mut out = BrushOutcome::default();
    let mut i = 0;
    for y in fp.rect.min_y..=fp.rect.max_y {
        for x in fp.rect.min_x..=fp.rect.max_x {
            let window_inside = x - k >= extent.min_x
                && x + k <= extent.max_x
                && y - k >= extent.min_y
                && y + k <= extent.max_y;
            let weight = falloff.weight(fp.distance(x, y), fp.radius);
            if window_inside && weight > 0.0 {
                out.modified += 1;
                let mut acc = 0.0;
                let mut ki = 0;
                for dy in -k..=k {
                    for dx in -k..=k {
                        let s = source.samples()[read_rect.idx(x + dx, y + dy)];
                        acc += f32::from(s) * kernel[ki];
                        ki += 1;
                    }
                }
                let blurred = acc / norm;
                let cur = f32::from(staged[i]);
                staged[i] = (cur + (blurred - cur) * (strength * weight)).round() as u16;
            }
            i += 1;
        }
    }
    write.stage(&staged)?;
    out.rev = write.commit(ResolveScope::Touched)?;
    Ok(out)
}

/// Apply a uniform world-height `delta_z` over an axis-aligned world rect
/// centred at (`wx`, `wy`), with a cosine skirt `falloff_width` wide
/// outside it. Texels beyond the skirt are untouched.
pub fn raise_lower_region(
    terrain: &mut Terrain,
    wx: f32,
    wy: f32,
    width: f32,
    height: f32,
    delta_z: f32,
    falloff_width: f32,
) -> EditResult<BrushOutcome> {
    if !(wx.is_finite() && wy.is_finite()) {
        return Err(EditError::invalid("region centre must be finite"));
    }
    finite(delta_z, "region delta")?;
    let falloff_width = finite(falloff_width, "region falloff width")?;
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(EditError::invalid(format!(
            "region size {width}x{height} must be positive"
        )));
    }
    if falloff_width < 0.0 {
        return Err(EditError::invalid(format!(
            "region falloff width {falloff_width} must not be negative"
        )));
    }

    let t = terrain.transform();
    let (cx, cy) = t.world_to_local(wx, wy);
    let half_w = width * 0.5 / t.scale.x;
    let half_h = height * 0.5 / t.scale.y;
    let band = t.radius_to_local(falloff_width);
    let units = delta_z * t.height_units_per_world();
    let (lo_x, hi_x) = (cx - half_w, cx + half_w);
    let (lo_y, hi_y) = (cy - half_h, cy + half_h);

    let span = GridRect::from_local_span(lo_x - band, lo_y - band, hi_x + band, hi_y + band);
    let rect = clamp_to_extent(terrain, span)?;
    let layer = terrain.storage().target_layer()?;

    let mut write = terrain.storage_mut().height_write(layer, rect)?;
    let mut staged = write.current()?.into_samples();
    let mut out = BrushOutcome::default();
    let mut k = 0;
    for y in rect.min_y..=rect.max_y {
        for x in rect.min_x..=rect.max_x {
            let dx = (lo_x - x as f32).max(x as f32 - hi_x).max(0.0);
            let dy = (lo_y - y as f32).max(y as f32 - hi_y).max(0.0);
            let dist = (dx * dx + dy * dy).sqrt();
            // inside gets the full delta, the skirt eases it out
            let weight = if dist <= 0.0 {
                1.0
            } else if band > 0.0 && dist < band {
                0.5 * ((dist / band * std::f32::consts::PI).cos() + 1.0)
            } else {
                k += 1;
                continue;
            };
            out.modified += 1;
            let target = (f32::from(staged[k]) + units * weight).round();
            let clamped = target.clamp(0.0, 65535.0);
            if clamped != target {
                out.saturated += 1;
            }
            staged[k] = clamped as u16;
            k += 1;
        }
    }
    write.stage(&staged)?;
    out.rev = write.commit(ResolveScope::Touched)?;
    Ok(out)
}

/// Add fractal value noise under a circular brush with a cosine edge.
/// `amplitude` scales the world-height contribution of a full-weight texel;
/// the noise field is sampled in world space, so overlapping brushes from
/// the same seed line up.
#[allow(clippy::too_many_arguments)]
pub fn apply_noise(
    terrain: &mut Terrain,
    wx: f32,
    wy: f32,
    radius: f32,
    amplitude: f32,
    frequency: f32,
    seed: i32,
    octaves: u32,
) -> EditResult<NoiseOutcome> {
    finite(amplitude, "noise amplitude")?;
    let frequency = finite(frequency, "noise frequency")?;
    let fp = Footprint::resolve(terrain, wx, wy, radius)?;
    let t = *terrain.transform();
    let units = amplitude * t.height_units_per_world();
    let per_unit = t.height_units_per_world();
    let layer = terrain.storage().target_layer()?;

    let mut write = terrain.storage_mut().height_write(layer, fp.rect)?;
    let mut staged = write.current()?.into_samples();
    let mut out = NoiseOutcome::default();
    let mut min_d = f32::MAX;
    let mut max_d = f32::MIN;
    let mut k = 0;
    for y in fp.rect.min_y..=fp.rect.max_y {
        for x in fp.rect.min_x..=fp.rect.max_x {
            let weight = Falloff::Smooth.weight(fp.distance(x, y), fp.radius);
            if weight > 0.0 {
                out.modified += 1;
                let (nx, ny) = t.local_to_world(x as f32, y as f32);
                let n = loam_noise::fbm(nx, ny, frequency, octaves, seed);
                let cur = f32::from(staged[k]);
                let target = (cur + n * units * weight).round();
                let clamped = target.clamp(0.0, 65535.0);
                if clamped != target {
                    out.saturated += 1;
                }
                staged[k] = clamped as u16;
                let realised = (f32::from(staged[k]) - cur) / per_unit;
                min_d = min_d.min(realised);
                max_d = max_d.max(realised);
            }
            k += 1;
        }
    }
    if out.modified > 0 {
        out.min_delta_z = min_d;
        out.max_delta_z = max_d;
    }
    write.stage(&staged)?;
    out.rev = write.commit(ResolveScope::Touched)?;
    Ok(out)
}
