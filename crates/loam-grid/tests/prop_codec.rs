use loam_grid::{TerrainTransform, Vec3};
use proptest::prelude::*;

fn height_scale() -> impl Strategy<Value = f32> {
    1.0f32..=512.0
}

fn origin_z() -> impl Strategy<Value = f32> {
    -10_000.0f32..=10_000.0
}

proptest! {
    // Decoding a sample and encoding it back is lossless up to one unit
    #[test]
    fn decode_encode_round_trips(sample in any::<u16>(), sz in height_scale(), oz in origin_z()) {
        let t = TerrainTransform::new(
            Vec3::new(0.0, 0.0, oz),
            0.0,
            Vec3::new(100.0, 100.0, sz),
        );
        let back = t.encode_height(t.decode_height(sample));
        prop_assert!(i32::from(back).abs_diff(i32::from(sample)) <= 1,
            "sample {} came back as {}", sample, back);
    }

    // Higher samples decode to higher world heights
    #[test]
    fn decode_is_monotonic(a in any::<u16>(), b in any::<u16>(), sz in height_scale()) {
        prop_assume!(a < b);
        let t = TerrainTransform::new(Vec3::ZERO, 0.0, Vec3::new(1.0, 1.0, sz));
        prop_assert!(t.decode_height(a) < t.decode_height(b));
    }

    // Local and world mappings invert each other
    #[test]
    fn world_local_inverse(
        wx in -50_000.0f32..=50_000.0,
        wy in -50_000.0f32..=50_000.0,
        ox in -5_000.0f32..=5_000.0,
        oy in -5_000.0f32..=5_000.0,
        sx in 1.0f32..=512.0,
        sy in 1.0f32..=512.0,
    ) {
        let t = TerrainTransform::new(Vec3::new(ox, oy, 0.0), 0.0, Vec3::new(sx, sy, 1.0));
        let (lx, ly) = t.world_to_local(wx, wy);
        let (bx, by) = t.local_to_world(lx, ly);
        // rounding scales with the subtraction magnitude, origin included
        prop_assert!((bx - wx).abs() <= (wx.abs() + ox.abs()).max(1.0) * 1e-5);
        prop_assert!((by - wy).abs() <= (wy.abs() + oy.abs()).max(1.0) * 1e-5);
    }
}
