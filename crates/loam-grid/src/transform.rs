//! World/local mapping and the fixed-point height codec.

/// World height units per sample step at scale z = 1.
pub const Z_SCALE: f32 = 1.0 / 128.0;

/// Sample value that decodes to the terrain origin height.
pub const MID_HEIGHT: u16 = 32768;

/// Z-up world vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Placement of a terrain in the world: origin, yaw and non-uniform scale.
///
/// The grid mapping is translation and scale only; `yaw_deg` is carried for
/// hosts that orient the rendered terrain but plays no part in texel lookup.
/// Scales are expected to be non-zero on every axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainTransform {
    pub origin: Vec3,
    pub yaw_deg: f32,
    pub scale: Vec3,
}

impl Default for TerrainTransform {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            yaw_deg: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl TerrainTransform {
    #[inline]
    pub const fn new(origin: Vec3, yaw_deg: f32, scale: Vec3) -> Self {
        Self {
            origin,
            yaw_deg,
            scale,
        }
    }

    /// Continuous texel coordinates of a world-space point.
    #[inline]
    pub fn world_to_local(&self, wx: f32, wy: f32) -> (f32, f32) {
        (
            (wx - self.origin.x) / self.scale.x,
            (wy - self.origin.y) / self.scale.y,
        )
    }

    #[inline]
    pub fn local_to_world(&self, lx: f32, ly: f32) -> (f32, f32) {
        (
            lx * self.scale.x + self.origin.x,
            ly * self.scale.y + self.origin.y,
        )
    }

    /// Brush radii convert through the X scale alone; anisotropic X/Y
    /// placements therefore distort circular brushes. Kept as observed
    /// editor behaviour, see DESIGN.md.
    #[inline]
    pub fn radius_to_local(&self, radius: f32) -> f32 {
        radius / self.scale.x
    }

    /// Encoded sample steps that make up one world height unit.
    #[inline]
    pub fn height_units_per_world(&self) -> f32 {
        1.0 / (Z_SCALE * self.scale.z)
    }

    /// World height of an encoded sample.
    #[inline]
    pub fn decode_height(&self, sample: u16) -> f32 {
        self.origin.z + (f32::from(sample) - f32::from(MID_HEIGHT)) * Z_SCALE * self.scale.z
    }

    /// Nearest encoded sample for a world height, clamped to the u16 range.
    #[inline]
    pub fn encode_height(&self, world_z: f32) -> u16 {
        let units = (world_z - self.origin.z) * self.height_units_per_world();
        (units + f32::from(MID_HEIGHT)).round().clamp(0.0, 65535.0) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anisotropic() -> TerrainTransform {
        TerrainTransform::new(
            Vec3::new(1000.0, -500.0, 250.0),
            45.0,
            Vec3::new(100.0, 50.0, 200.0),
        )
    }

    #[test]
    fn world_local_round_trip() {
        let t = anisotropic();
        let (lx, ly) = t.world_to_local(1350.0, -400.0);
        assert_eq!((lx, ly), (3.5, 2.0));
        let (wx, wy) = t.local_to_world(lx, ly);
        assert!((wx - 1350.0).abs() < 1e-3);
        assert!((wy - -400.0).abs() < 1e-3);
    }

    #[test]
    fn mid_sample_decodes_to_origin_height() {
        let t = anisotropic();
        assert_eq!(t.decode_height(MID_HEIGHT), 250.0);
    }

    #[test]
    fn one_sample_step_is_z_scale_times_scale() {
        let t = anisotropic();
        let step = t.decode_height(MID_HEIGHT + 1) - t.decode_height(MID_HEIGHT);
        assert!((step - Z_SCALE * 200.0).abs() < 1e-3);
    }

    #[test]
    fn encode_clamps_to_sample_range() {
        let t = TerrainTransform::default();
        assert_eq!(t.encode_height(1e9), 65535);
        assert_eq!(t.encode_height(-1e9), 0);
    }

    #[test]
    fn radius_uses_x_scale_only() {
        let t = anisotropic();
        assert_eq!(t.radius_to_local(300.0), 3.0);
    }
}
