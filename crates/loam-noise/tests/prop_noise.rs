use loam_noise::{fbm, interpolated_noise, lattice_noise, smooth_noise, MAX_OCTAVES};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -10_000.0f32..=10_000.0
}

proptest! {
    // Same inputs, same field, any point
    #[test]
    fn fully_deterministic(x in coord(), y in coord(), seed in any::<i32>()) {
        prop_assert_eq!(interpolated_noise(x, y, seed), interpolated_noise(x, y, seed));
        prop_assert_eq!(fbm(x, y, 0.01, 4, seed), fbm(x, y, 0.01, 4, seed));
    }

    // Lattice hash never leaves [-1, 1], even at extreme inputs
    #[test]
    fn lattice_bounded(x in any::<i32>(), y in any::<i32>(), seed in any::<i32>()) {
        let v = lattice_noise(x, y, seed);
        prop_assert!((-1.0..=1.0).contains(&v));
    }

    // Blur and interpolation are convex combinations of lattice values
    #[test]
    fn smooth_and_interpolated_bounded(x in coord(), y in coord(), seed in any::<i32>()) {
        prop_assert!(smooth_noise(x as i32, y as i32, seed).abs() <= 1.0);
        prop_assert!(interpolated_noise(x, y, seed).abs() <= 1.0 + 1e-6);
    }

    // Normalised octave sum keeps fbm in roughly unit range
    #[test]
    fn fbm_bounded(
        x in coord(),
        y in coord(),
        freq in 0.001f32..=1.0,
        octaves in 0u32..=16,
        seed in any::<i32>(),
    ) {
        prop_assert!(fbm(x, y, freq, octaves, seed).abs() <= 1.0 + 1e-5);
    }

    // Requests outside 1..=MAX_OCTAVES behave like the clamped count
    #[test]
    fn octaves_clamp(x in coord(), y in coord(), seed in any::<i32>(), over in 9u32..=64) {
        prop_assert_eq!(fbm(x, y, 0.05, 0, seed), fbm(x, y, 0.05, 1, seed));
        prop_assert_eq!(fbm(x, y, 0.05, over, seed), fbm(x, y, 0.05, MAX_OCTAVES, seed));
    }

    // Integer sample points reproduce the smoothed lattice exactly
    #[test]
    fn lattice_points_exact(x in -5_000i32..=5_000, y in -5_000i32..=5_000, seed in any::<i32>()) {
        prop_assert_eq!(interpolated_noise(x as f32, y as f32, seed), smooth_noise(x, y, seed));
    }
}
