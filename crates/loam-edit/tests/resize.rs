use loam_edit::{
    get_height_region, get_weights_region, resize, set_height_region, set_weights_region,
    TerrainRegistry,
};
use loam_field::{EditError, PaintLayerDesc};
use loam_grid::{TerrainLayout, TerrainTransform, Vec3};

fn registry_with(label: &str, quads: u32) -> TerrainRegistry {
    let mut reg = TerrainRegistry::new();
    let layout = TerrainLayout::new(1, 1, quads, 1).unwrap();
    let transform = TerrainTransform::new(
        Vec3::new(-800.0, 400.0, 25.0),
        0.0,
        Vec3::new(100.0, 100.0, 200.0),
    );
    reg.create(label, transform, layout).unwrap();
    reg
}

fn fill_fields(reg: &mut TerrainRegistry, label: &str) {
    let t = reg.get_mut(label).unwrap();
    let extent = t.extent();
    let heights: Vec<u16> = (0..extent.area())
        .map(|i| 30_000 + (i as u16).wrapping_mul(37) % 9_000)
        .collect();
    set_height_region(t, extent, &heights).unwrap();

    t.storage_mut()
        .attach_paint_layer(PaintLayerDesc::blended("Grass"), None)
        .unwrap();
    let weights: Vec<u8> = (0..extent.area()).map(|i| (i * 13 % 251) as u8).collect();
    set_weights_region(t, "Grass", extent, &weights).unwrap();
    // consume the setup edits so later assertions see only the resize
    t.storage_mut().take_pending();
}

fn max_height_diff(a: &[u16], b: &[u16]) -> u16 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| x.abs_diff(y))
        .max()
        .unwrap_or(0)
}

#[test]
fn identity_resize_preserves_fields() {
    let mut reg = registry_with("isle", 63);
    fill_fields(&mut reg, "isle");

    let extent = reg.get("isle").unwrap().extent();
    let heights_before = get_height_region(reg.get("isle").unwrap(), extent).unwrap();
    let weights_before = get_weights_region(reg.get("isle").unwrap(), "Grass", extent).unwrap();
    let transform_before = *reg.get("isle").unwrap().transform();

    let report = resize(&mut reg, "isle", 1, 1, 63, 1).unwrap();
    assert_eq!(report.old_size, (64, 64));
    assert_eq!(report.new_size, (64, 64));
    assert_eq!(report.restored_layers, vec!["Grass".to_string()]);

    let t = reg.get("isle").unwrap();
    assert_eq!(*t.transform(), transform_before);
    let heights_after = get_height_region(t, extent).unwrap();
    assert!(max_height_diff(heights_before.samples(), heights_after.samples()) <= 1);

    let weights_after = get_weights_region(t, "Grass", extent).unwrap();
    let max_w = weights_before
        .samples()
        .iter()
        .zip(weights_after.samples())
        .map(|(&a, &b)| a.abs_diff(b))
        .max()
        .unwrap();
    assert!(max_w <= 1);

    // everything was imported through the layer path, so even a full
    // resolve reproduces the restored fields
    let t = reg.get_mut("isle").unwrap();
    t.storage_mut().resolve_full();
    let heights_resolved = get_height_region(t, extent).unwrap();
    assert_eq!(heights_resolved.samples(), heights_after.samples());
    let weights_resolved = get_weights_region(t, "Grass", extent).unwrap();
    assert_eq!(weights_resolved.samples(), weights_after.samples());
}

#[test]
fn upsample_pins_corners_and_stays_in_envelope() {
    let mut reg = registry_with("mesa", 7);
    fill_fields(&mut reg, "mesa");

    let old_extent = reg.get("mesa").unwrap().extent();
    let old = get_height_region(reg.get("mesa").unwrap(), old_extent).unwrap();

    let report = resize(&mut reg, "mesa", 1, 1, 15, 1).unwrap();
    assert_eq!(report.old_size, (8, 8));
    assert_eq!(report.new_size, (16, 16));

    let t = reg.get("mesa").unwrap();
    let new_extent = t.extent();
    let new = get_height_region(t, new_extent).unwrap();

    let corner = |m: &loam_field::HeightMap, x, y| m.get(x, y).unwrap();
    assert_eq!(corner(&new, 0, 0), corner(&old, 0, 0));
    assert_eq!(corner(&new, 15, 0), corner(&old, 7, 0));
    assert_eq!(corner(&new, 0, 15), corner(&old, 0, 7));
    assert_eq!(corner(&new, 15, 15), corner(&old, 7, 7));

    let lo = *old.samples().iter().min().unwrap();
    let hi = *old.samples().iter().max().unwrap();
    assert!(new.samples().iter().all(|&v| v >= lo && v <= hi));

    // the replacement owes the host a full republish
    let pending = reg.drain_republish();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].0, "mesa");
    assert_eq!(pending[0].1.rect, new_extent);
}

#[test]
fn upsample_carries_uniform_paint_coverage() {
    let mut reg = registry_with("heath", 63);
    let t = reg.get_mut("heath").unwrap();
    let extent = t.extent();
    t.storage_mut()
        .attach_paint_layer(PaintLayerDesc::blended("Grass"), None)
        .unwrap();
    // half coverage everywhere
    set_weights_region(t, "Grass", extent, &vec![128u8; extent.area()]).unwrap();

    let report = resize(&mut reg, "heath", 1, 1, 127, 1).unwrap();
    assert_eq!(report.new_size, (128, 128));
    assert_eq!(report.restored_layers, vec!["Grass".to_string()]);

    let t = reg.get_mut("heath").unwrap();
    let new_extent = t.extent();
    let grass = get_weights_region(t, "Grass", new_extent).unwrap();
    assert!(grass.samples().iter().all(|&w| w == 128));

    // restored through the layer path, so a full resolve keeps the coverage
    t.storage_mut().resolve_full();
    let grass = get_weights_region(t, "Grass", new_extent).unwrap();
    assert!(grass.samples().iter().all(|&w| w == 128));
}

#[test]
fn downsample_keeps_the_surface_envelope() {
    let mut reg = registry_with("butte", 15);
    fill_fields(&mut reg, "butte");

    let old_extent = reg.get("butte").unwrap().extent();
    let old = get_height_region(reg.get("butte").unwrap(), old_extent).unwrap();

    resize(&mut reg, "butte", 1, 1, 7, 1).unwrap();

    let t = reg.get("butte").unwrap();
    let new = get_height_region(t, t.extent()).unwrap();
    assert_eq!(new.get(7, 7), old.get(15, 15));
    let lo = *old.samples().iter().min().unwrap();
    let hi = *old.samples().iter().max().unwrap();
    assert!(new.samples().iter().all(|&v| v >= lo && v <= hi));
}

#[test]
fn failed_resize_leaves_the_original_registered() {
    let mut reg = registry_with("tor", 63);
    fill_fields(&mut reg, "tor");
    let extent = reg.get("tor").unwrap().extent();
    let before = get_height_region(reg.get("tor").unwrap(), extent).unwrap();

    assert!(matches!(
        resize(&mut reg, "gone", 1, 1, 63, 1),
        Err(EditError::NotFound { .. })
    ));
    assert!(matches!(
        resize(&mut reg, "tor", 1, 1, 64, 1),
        Err(EditError::InvalidParameter(_))
    ));
    assert!(matches!(
        resize(&mut reg, "tor", 0, 1, 63, 1),
        Err(EditError::InvalidParameter(_))
    ));

    let after = get_height_region(reg.get("tor").unwrap(), extent).unwrap();
    assert_eq!(before.samples(), after.samples());
}
