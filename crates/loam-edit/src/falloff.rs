//! Radial brush falloff curves.

use std::f32::consts::PI;
use std::str::FromStr;

/// Falloff profile from the brush centre (weight 1) out to the radius
/// (weight 0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Falloff {
    /// Cosine ease; the profile paint strokes always use.
    Smooth,
    /// Hemisphere profile, steep at the rim.
    Spherical,
    /// Inverted parabola, soft peak.
    Tip,
    #[default]
    Linear,
}

impl Falloff {
    /// Blend weight for a texel `distance` from the centre of a brush with
    /// `radius`, both in local texels. Zero at and beyond the rim; brushes
    /// with a non-positive radius touch nothing.
    pub fn weight(self, distance: f32, radius: f32) -> f32 {
        if radius <= 0.0 || distance >= radius {
            return 0.0;
        }
        let r = (distance / radius).clamp(0.0, 1.0);
        match self {
            Falloff::Smooth => 0.5 * ((r * PI).cos() + 1.0),
            Falloff::Spherical => (1.0 - r * r).sqrt(),
            Falloff::Tip => 1.0 - r * r,
            Falloff::Linear => 1.0 - r,
        }
    }
}

impl FromStr for Falloff {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "smooth" => Ok(Falloff::Smooth),
            "spherical" => Ok(Falloff::Spherical),
            "tip" => Ok(Falloff::Tip),
            "linear" => Ok(Falloff::Linear),
            other => Err(format!("unknown falloff `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Falloff; 4] = [
        Falloff::Smooth,
        Falloff::Spherical,
        Falloff::Tip,
        Falloff::Linear,
    ];

    #[test]
    fn centre_is_full_weight() {
        for f in ALL {
            assert_eq!(f.weight(0.0, 10.0), 1.0, "{f:?}");
        }
    }

    #[test]
    fn rim_and_beyond_are_zero() {
        for f in ALL {
            assert_eq!(f.weight(10.0, 10.0), 0.0, "{f:?}");
            assert_eq!(f.weight(25.0, 10.0), 0.0, "{f:?}");
        }
    }

    #[test]
    fn degenerate_radius_touches_nothing() {
        for f in ALL {
            assert_eq!(f.weight(0.0, 0.0), 0.0, "{f:?}");
            assert_eq!(f.weight(1.0, -5.0), 0.0, "{f:?}");
        }
    }

    #[test]
    fn curves_are_strictly_decreasing_inside() {
        for f in ALL {
            let samples: Vec<f32> = (0..=8).map(|i| f.weight(i as f32, 8.0)).collect();
            for pair in samples.windows(2) {
                assert!(pair[0] > pair[1], "{f:?}: {pair:?}");
            }
        }
    }

    #[test]
    fn linear_midpoint_is_half() {
        assert_eq!(Falloff::Linear.weight(5.0, 10.0), 0.5);
    }

    #[test]
    fn names_parse_case_insensitive() {
        assert_eq!("Smooth".parse::<Falloff>().unwrap(), Falloff::Smooth);
        assert_eq!("LINEAR".parse::<Falloff>().unwrap(), Falloff::Linear);
        assert!("cone".parse::<Falloff>().is_err());
    }
}
