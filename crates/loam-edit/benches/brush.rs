use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use loam_edit::{Falloff, TerrainRegistry, apply_noise, paint, resize, sculpt, smooth};
use loam_field::{PaintLayerDesc, Terrain};
use loam_grid::{TerrainLayout, TerrainTransform, Vec3};

fn make_terrain() -> Terrain {
    // 255x255 texels, one sample every 100 world units
    let layout = TerrainLayout::new(2, 2, 127, 1).unwrap();
    let transform = TerrainTransform::new(
        Vec3::new(0.0, 0.0, 0.0),
        0.0,
        Vec3::new(100.0, 100.0, 100.0),
    );
    Terrain::new("bench", transform, layout)
}

const CENTRE: f32 = 12_700.0;

fn bench_sculpt_brush(c: &mut Criterion) {
    let mut group = c.benchmark_group("sculpt_brush");
    let mut terrain = make_terrain();
    let mut up = true;
    group.bench_function("smooth_r32_255x255", |b| {
        b.iter(|| {
            // alternating sign keeps repeated strokes off the encoding limits
            let strength = if up { 2.0 } else { -2.0 };
            up = !up;
            let out = sculpt(&mut terrain, CENTRE, CENTRE, 3200.0, strength, Falloff::Smooth)
                .unwrap();
            black_box(out);
        })
    });
    group.finish();
}

fn bench_smooth_brush(c: &mut Criterion) {
    let mut group = c.benchmark_group("smooth_brush");
    let mut terrain = make_terrain();
    group.bench_function("kernel7_r32_255x255", |b| {
        b.iter(|| {
            let out = smooth(&mut terrain, CENTRE, CENTRE, 3200.0, 1.0, Falloff::Smooth).unwrap();
            black_box(out);
        })
    });
    group.finish();
}

fn bench_noise_brush(c: &mut Criterion) {
    let mut group = c.benchmark_group("noise_brush");
    let mut terrain = make_terrain();
    let mut up = true;
    group.bench_function("fbm4_r32_255x255", |b| {
        b.iter(|| {
            let amplitude = if up { 5.0 } else { -5.0 };
            up = !up;
            let out = apply_noise(&mut terrain, CENTRE, CENTRE, 3200.0, amplitude, 0.01, 7, 4)
                .unwrap();
            black_box(out);
        })
    });
    group.finish();
}

fn bench_paint_brush(c: &mut Criterion) {
    let mut group = c.benchmark_group("paint_brush");
    let mut terrain = make_terrain();
    terrain
        .storage_mut()
        .attach_paint_layer(PaintLayerDesc::blended("Grass"), None)
        .unwrap();
    let mut up = true;
    group.bench_function("smooth_r32_255x255", |b| {
        b.iter(|| {
            let strength = if up { 0.4 } else { -0.4 };
            up = !up;
            let out = paint(&mut terrain, "Grass", CENTRE, CENTRE, 3200.0, strength).unwrap();
            black_box(out);
        })
    });
    group.finish();
}

fn bench_full_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_resolve");
    let mut terrain = make_terrain();
    for name in ["Grass", "Rock", "Snow"] {
        terrain
            .storage_mut()
            .attach_paint_layer(PaintLayerDesc::blended(name), None)
            .unwrap();
        paint(&mut terrain, name, CENTRE, CENTRE, 6000.0, 0.7).unwrap();
    }
    sculpt(&mut terrain, CENTRE, CENTRE, 6000.0, 40.0, Falloff::Smooth).unwrap();
    group.bench_function("three_layers_255x255", |b| {
        b.iter(|| {
            terrain.storage_mut().resolve_full();
            black_box(terrain.storage().height_at(127, 127));
        })
    });
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");
    group.bench_function("upsample_127_to_255", |b| {
        b.iter(|| {
            let mut reg = TerrainRegistry::new();
            let layout = TerrainLayout::new(1, 1, 63, 2).unwrap();
            reg.create("bench", TerrainTransform::default(), layout)
                .unwrap();
            reg.get_mut("bench")
                .unwrap()
                .storage_mut()
                .attach_paint_layer(PaintLayerDesc::blended("Grass"), Some(vec![160; 127 * 127]))
                .unwrap();
            let report = resize(&mut reg, "bench", 2, 2, 127, 1).unwrap();
            black_box(report);
        })
    });
    group.finish();
}

fn brush_config() -> Criterion {
    Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .warm_up_time(Duration::from_secs(3))
}

criterion_group! {
    name = benches;
    config = brush_config();
    targets =
        bench_sculpt_brush,
        bench_smooth_brush,
        bench_noise_brush,
        bench_paint_brush,
        bench_full_resolve,
        bench_resize
}
criterion_main!(benches);
