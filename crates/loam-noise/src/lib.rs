//! Deterministic 2D value noise for procedural terrain edits.
//!
//! Everything here is a pure function of its inputs. The lattice hash is
//! integer-only, so a (coordinate, seed) pair produces the same field on
//! every platform, and brush previews can be replayed exactly.
#![forbid(unsafe_code)]

use std::f32::consts::PI;

/// Octave counts above this add nothing visible at texel resolution.
pub const MAX_OCTAVES: u32 = 8;

/// Hash of an integer lattice point into `[-1, 1]`.
#[inline]
pub fn lattice_noise(x: i32, y: i32, seed: i32) -> f32 {
    let mut n = x
        .wrapping_add(y.wrapping_mul(57))
        .wrapping_add(seed.wrapping_mul(131));
    n = (n << 13) ^ n;
    let t = n
        .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15_731).wrapping_add(789_221))
        .wrapping_add(1_376_312_589)
        & 0x7fff_ffff;
    1.0 - t as f32 / 1_073_741_824.0
}

/// Lattice value blurred with its eight neighbours (1/16, 1/8, 1/4 kernel).
pub fn smooth_noise(x: i32, y: i32, seed: i32) -> f32 {
    let corners = lattice_noise(x.wrapping_sub(1), y.wrapping_sub(1), seed)
        + lattice_noise(x.wrapping_add(1), y.wrapping_sub(1), seed)
        + lattice_noise(x.wrapping_sub(1), y.wrapping_add(1), seed)
        + lattice_noise(x.wrapping_add(1), y.wrapping_add(1), seed);
    let edges = lattice_noise(x.wrapping_sub(1), y, seed)
        + lattice_noise(x.wrapping_add(1), y, seed)
        + lattice_noise(x, y.wrapping_sub(1), seed)
        + lattice_noise(x, y.wrapping_add(1), seed);
    corners / 16.0 + edges / 8.0 + lattice_noise(x, y, seed) / 4.0
}

#[inline]
fn cosine_lerp(a: f32, b: f32, t: f32) -> f32 {
    let f = (1.0 - (t * PI).cos()) * 0.5;
    a + (b - a) * f
}

/// Smoothed noise sampled at a continuous point via cosine-eased bilinear
/// interpolation of the surrounding cell. Floor semantics keep negative
/// coordinates continuous across zero.
pub fn interpolated_noise(x: f32, y: f32, seed: i32) -> f32 {
    let xf = x.floor();
    let yf = y.floor();
    let xi = xf as i32;
    let yi = yf as i32;
    let tx = x - xf;
    let ty = y - yf;
    let v00 = smooth_noise(xi, yi, seed);
    let v10 = smooth_noise(xi.wrapping_add(1), yi, seed);
    let v01 = smooth_noise(xi, yi.wrapping_add(1), seed);
    let v11 = smooth_noise(xi.wrapping_add(1), yi.wrapping_add(1), seed);
    cosine_lerp(
        cosine_lerp(v00, v10, tx),
        cosine_lerp(v01, v11, tx),
        ty,
    )
}

/// Fractal sum of `octaves` interpolated layers. Each octave doubles the
/// frequency, halves the amplitude and offsets the seed so layers decorrelate.
/// The sum is renormalised back into roughly `[-1, 1]`.
pub fn fbm(x: f32, y: f32, frequency: f32, octaves: u32, seed: i32) -> f32 {
    let octaves = octaves.clamp(1, MAX_OCTAVES);
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut norm = 0.0;
    let mut freq = frequency;
    for i in 0..octaves {
        let layer_seed = seed.wrapping_add((i as i32).wrapping_mul(1_000));
        total += interpolated_noise(x * freq, y * freq, layer_seed) * amplitude;
        norm += amplitude;
        amplitude *= 0.5;
        freq *= 2.0;
    }
    total / norm
}
