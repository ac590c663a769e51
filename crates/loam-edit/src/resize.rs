//! Whole-terrain resize.
//!
//! The pipeline stages a complete replacement before anything is removed:
//! export the live fields, build the new terrain off to the side, restore
//! paint layers and resampled data into it through the normal write path,
//! and only then swap it into the registry. Any failure along the way
//! leaves the original terrain registered and untouched.

use loam_field::{EditError, EditResult, PaintLayerDesc, Terrain, WeightMap};
use loam_grid::{GridRect, TerrainLayout};

use crate::height::set_height_region;
use crate::registry::TerrainRegistry;
use crate::weight::set_weights_region;

/// What a completed resize did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizeReport {
    pub label: String,
    /// Texel dimensions before, width by height.
    pub old_size: (u32, u32),
    /// Texel dimensions after.
    pub new_size: (u32, u32),
    /// Paint layers carried over, in restore order.
    pub restored_layers: Vec<String>,
}

/// Resize `label` to a new component layout, bilinearly resampling the
/// heightfield and every paint layer. The replacement keeps the label and
/// transform; its republish region covers the whole new grid.
pub fn resize(
    registry: &mut TerrainRegistry,
    label: &str,
    components_x: u32,
    components_y: u32,
    quads_per_section: u32,
    sections_per_component: u32,
) -> EditResult<ResizeReport> {
    let layout = TerrainLayout::new(
        components_x,
        components_y,
        quads_per_section,
        sections_per_component,
    )?;

    // export from the live terrain; it stays registered until the swap
    let (transform, old_extent, heights, paint_exports) = {
        let old = registry.get(label)?;
        let storage = old.storage();
        let extent = storage.extent();
        let heights = storage.read_height(extent)?;
        let exports: Vec<(PaintLayerDesc, WeightMap)> = storage
            .paint_layers()
            .map(|desc| {
                storage
                    .read_weights(&desc.name, extent)
                    .map(|weights| (desc.clone(), weights))
            })
            .collect::<EditResult<_>>()?;
        (*old.transform(), extent, heights, exports)
    };
    log::info!(
        target: "edit",
        "resize {}: exported {}x{} heights and {} paint layers",
        label,
        old_extent.width(),
        old_extent.height(),
        paint_exports.len()
    );

    let mut staged = Terrain::new(label, transform, layout);
    let new_extent = staged.extent();

    let restored = restore_paint_layers(&mut staged, paint_exports)?;

    // height goes through the write path so the base layer backs it
    let resampled = resample_u16(heights.samples(), old_extent, new_extent);
    set_height_region(&mut staged, new_extent, &resampled)?;

    registry.replace(staged)?;
    log::info!(
        target: "edit",
        "resize {}: now {}x{} texels",
        label,
        new_extent.width(),
        new_extent.height()
    );

    Ok(ResizeReport {
        label: label.to_string(),
        old_size: (old_extent.width() as u32, old_extent.height() as u32),
        new_size: (new_extent.width() as u32, new_extent.height() as u32),
        restored_layers: restored,
    })
}

/// Attach and refill every exported paint layer on the staged terrain.
/// Individual failures are collected rather than aborting the loop, then
/// surfaced together so the caller knows exactly which layers made it.
pub(crate) fn restore_paint_layers(
    staged: &mut Terrain,
    exports: Vec<(PaintLayerDesc, WeightMap)>,
) -> EditResult<Vec<String>> {
    let new_extent = staged.extent();
    let mut restored = Vec::new();
    let mut failed = Vec::new();
    for (desc, weights) in exports {
        let name = desc.name.clone();
        let outcome = match staged.storage_mut().attach_paint_layer(desc, None) {
            Ok(()) => {
                let resampled = resample_u8(weights.samples(), weights.rect(), new_extent);
                set_weights_region(staged, &name, new_extent, &resampled).map(|_rev| ())
            }
            Err(err) => Err(err),
        };
        match outcome {
            Ok(()) => restored.push(name),
            Err(err) => {
                log::warn!(target: "edit", "resize: paint layer {name} not restored: {err}");
                failed.push(format!("{name} ({err})"));
            }
        }
    }
    if failed.is_empty() {
        Ok(restored)
    } else {
        Err(EditError::PartialFailure {
            stage: "restore paint layers",
            detail: failed.join("; "),
        })
    }
}

/// Bilinear resample between two grids. Corners map to corners, so equal
/// sizes copy through unchanged (up to rounding).
fn resample<T: Copy + Into<f32>>(
    src: &[T],
    src_rect: GridRect,
    dst_rect: GridRect,
    mut encode: impl FnMut(f32) -> T,
) -> Vec<T> {
    let (sw, sh) = (src_rect.width() as usize, src_rect.height() as usize);
    let (dw, dh) = (dst_rect.width() as usize, dst_rect.height() as usize);
    let mut out = Vec::with_capacity(dw * dh);
    for y in 0..dh {
        let sy = grid_pos(y, dh, sh);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(sh - 1);
        let ty = sy - y0 as f32;
        for x in 0..dw {
            let sx = grid_pos(x, dw, sw);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(sw - 1);
            let tx = sx - x0 as f32;
            let a: f32 = src[y0 * sw + x0].into();
            let b: f32 = src[y0 * sw + x1].into();
            let c: f32 = src[y1 * sw + x0].into();
            let d: f32 = src[y1 * sw + x1].into();
            let top = a + (b - a) * tx;
            let bottom = c + (d - c) * tx;
            out.push(encode(top + (bottom - top) * ty));
        }
    }
    out
}

/// Continuous source position for destination index `i`. Endpoints pin to
/// endpoints; a one-texel destination samples the source centre.
#[inline]
fn grid_pos(i: usize, dst_len: usize, src_len: usize) -> f32 {
    if dst_len > 1 {
        (i * (src_len - 1)) as f32 / (dst_len - 1) as f32
    } else {
        0.5 * (src_len - 1) as f32
    }
}

fn resample_u16(src: &[u16], src_rect: GridRect, dst_rect: GridRect) -> Vec<u16> {
    resample(src, src_rect, dst_rect, |v| {
        v.round().clamp(0.0, 65535.0) as u16
    })
}

fn resample_u8(src: &[u8], src_rect: GridRect, dst_rect: GridRect) -> Vec<u8> {
    resample(src, src_rect, dst_rect, |v| v.round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_grid::TerrainTransform;

    fn rect(w: i32, h: i32) -> GridRect {
        GridRect::from_size(w, h)
    }

    #[test]
    fn identity_resample_is_exact() {
        let src: Vec<u16> = (0..64).map(|i| 30_000 + i * 97).collect();
        let out = resample_u16(&src, rect(8, 8), rect(8, 8));
        assert_eq!(out, src);
    }

    #[test]
    fn corners_pin_to_corners() {
        let src: Vec<u16> = (0..=15).map(|i| 1_000 * i).collect();
        let out = resample_u16(&src, rect(4, 4), rect(9, 9));
        assert_eq!(out[0], src[0]);
        assert_eq!(out[8], src[3]);
        assert_eq!(out[8 * 9], src[12]);
        assert_eq!(out[8 * 9 + 8], src[15]);
        // interior stays inside the source envelope
        let (lo, hi) = (src.iter().min().unwrap(), src.iter().max().unwrap());
        assert!(out.iter().all(|v| v >= lo && v <= hi));
    }

    #[test]
    fn one_texel_destination_samples_the_centre() {
        // 3x1 ramp: the centre column is the middle sample
        let src: Vec<u8> = vec![0, 100, 200];
        let out = resample_u8(&src, rect(3, 1), rect(1, 1));
        assert_eq!(out, vec![100]);
    }

    #[test]
    fn restore_reports_partial_failure() {
        let layout = loam_grid::TerrainLayout::new(1, 1, 7, 1).unwrap();
        let mut staged = Terrain::new("t", TerrainTransform::default(), layout);
        // pre-attached layer forces a collision for the first export
        staged
            .storage_mut()
            .attach_paint_layer(PaintLayerDesc::blended("Grass"), None)
            .unwrap();

        let exports = vec![
            (
                PaintLayerDesc::blended("Grass"),
                WeightMap::filled(staged.extent(), 40),
            ),
            (
                PaintLayerDesc::alpha("Rock"),
                WeightMap::filled(staged.extent(), 90),
            ),
        ];
        let err = restore_paint_layers(&mut staged, exports).unwrap_err();
        match err {
            EditError::PartialFailure { stage, detail } => {
                assert_eq!(stage, "restore paint layers");
                assert!(detail.contains("Grass"));
                assert!(!detail.contains("Rock"));
            }
            other => panic!("expected PartialFailure, got {other:?}"),
        }
        // the healthy layer still landed
        assert!(staged.storage().has_paint_layer("Rock"));
        let rock = staged
            .storage()
            .read_weights("Rock", staged.extent())
            .unwrap();
        assert!(rock.samples().iter().all(|&w| w == 90));
    }

    #[test]
    fn grid_pos_endpoints() {
        assert_eq!(grid_pos(0, 9, 4), 0.0);
        assert_eq!(grid_pos(8, 9, 4), 3.0);
        assert_eq!(grid_pos(0, 1, 3), 1.0);
    }
}
