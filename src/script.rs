//! TOML stroke scripts: one `[terrain]` setup table plus an ordered
//! `[[ops]]` list, executed against a fresh registry.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use loam_edit::{
    Falloff, TerrainRegistry, apply_noise, flatten, paint, raise_lower_region, resize, sculpt,
    set_hole, set_hole_region, smooth,
};
use loam_field::{PaintLayerDesc, VISIBILITY_LAYER};
use loam_grid::{GridRect, TerrainLayout, TerrainTransform, Vec3};

#[derive(Debug, Deserialize)]
pub struct Script {
    pub terrain: TerrainSetup,
    #[serde(default)]
    pub ops: Vec<Op>,
}

#[derive(Debug, Deserialize)]
pub struct TerrainSetup {
    pub label: String,
    pub components_x: u32,
    pub components_y: u32,
    pub quads_per_section: u32,
    pub sections_per_component: u32,
    #[serde(default = "default_origin")]
    pub origin: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub paint_layers: Vec<String>,
    #[serde(default)]
    pub visibility_layer: bool,
}

fn default_origin() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    Sculpt {
        x: f32,
        y: f32,
        radius: f32,
        strength: f32,
        falloff: Option<String>,
    },
    Flatten {
        x: f32,
        y: f32,
        radius: f32,
        target: f32,
        strength: f32,
        falloff: Option<String>,
    },
    Smooth {
        x: f32,
        y: f32,
        radius: f32,
        strength: f32,
        falloff: Option<String>,
    },
    RaiseLower {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        delta: f32,
        #[serde(default)]
        falloff_width: f32,
    },
    Noise {
        x: f32,
        y: f32,
        radius: f32,
        amplitude: f32,
        frequency: f32,
        #[serde(default)]
        seed: i32,
        #[serde(default = "default_octaves")]
        octaves: u32,
    },
    Paint {
        layer: String,
        x: f32,
        y: f32,
        radius: f32,
        strength: f32,
    },
    Hole {
        x: f32,
        y: f32,
        radius: f32,
        #[serde(default = "default_true")]
        create: bool,
    },
    HoleRegion {
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
        #[serde(default = "default_true")]
        create: bool,
    },
    Resize {
        components_x: u32,
        components_y: u32,
        quads_per_section: u32,
        sections_per_component: u32,
    },
}

fn default_octaves() -> u32 {
    4
}

fn default_true() -> bool {
    true
}

impl Op {
    fn name(&self) -> &'static str {
        match self {
            Op::Sculpt { .. } => "sculpt",
            Op::Flatten { .. } => "flatten",
            Op::Smooth { .. } => "smooth",
            Op::RaiseLower { .. } => "raise_lower",
            Op::Noise { .. } => "noise",
            Op::Paint { .. } => "paint",
            Op::Hole { .. } => "hole",
            Op::HoleRegion { .. } => "hole_region",
            Op::Resize { .. } => "resize",
        }
    }
}

impl Script {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("parsing script {}", path.display()))
    }
}

fn parse_falloff(name: &Option<String>) -> anyhow::Result<Falloff> {
    match name {
        Some(s) => s.parse::<Falloff>().map_err(anyhow::Error::msg),
        None => Ok(Falloff::default()),
    }
}

/// Builds the terrain, runs every op in order, and returns the terrain
/// label for follow-up reads.
pub fn execute(script: &Script, registry: &mut TerrainRegistry) -> anyhow::Result<String> {
    let setup = &script.terrain;
    let layout = TerrainLayout::new(
        setup.components_x,
        setup.components_y,
        setup.quads_per_section,
        setup.sections_per_component,
    )?;
    let transform = TerrainTransform::new(
        Vec3::new(setup.origin[0], setup.origin[1], setup.origin[2]),
        0.0,
        Vec3::new(setup.scale[0], setup.scale[1], setup.scale[2]),
    );
    let terrain = registry.create(&setup.label, transform, layout)?;
    for name in &setup.paint_layers {
        terrain
            .storage_mut()
            .attach_paint_layer(PaintLayerDesc::blended(name), None)?;
    }
    if setup.visibility_layer {
        terrain
            .storage_mut()
            .attach_paint_layer(PaintLayerDesc::alpha(VISIBILITY_LAYER), None)?;
    }

    for (i, op) in script.ops.iter().enumerate() {
        run_op(registry, &setup.label, op)
            .with_context(|| format!("script op {} ({})", i + 1, op.name()))?;
    }
    Ok(setup.label.clone())
}

fn run_op(registry: &mut TerrainRegistry, label: &str, op: &Op) -> anyhow::Result<()> {
    match op {
        Op::Sculpt {
            x,
            y,
            radius,
            strength,
            falloff,
        } => {
            let f = parse_falloff(falloff)?;
            let out = sculpt(registry.get_mut(label)?, *x, *y, *radius, *strength, f)?;
            log::info!(
                "sculpt: {} texels, {} saturated",
                out.modified,
                out.saturated
            );
        }
        Op::Flatten {
            x,
            y,
            radius,
            target,
            strength,
            falloff,
        } => {
            let f = parse_falloff(falloff)?;
            let out = flatten(
                registry.get_mut(label)?,
                *x,
                *y,
                *radius,
                *target,
                *strength,
                f,
            )?;
            log::info!("flatten to {target}: {} texels", out.modified);
        }
        Op::Smooth {
            x,
            y,
            radius,
            strength,
            falloff,
        } => {
            let f = parse_falloff(falloff)?;
            let out = smooth(registry.get_mut(label)?, *x, *y, *radius, *strength, f)?;
            log::info!("smooth: {} texels", out.modified);
        }
        Op::RaiseLower {
            x,
            y,
            width,
            height,
            delta,
            falloff_width,
        } => {
            let out = raise_lower_region(
                registry.get_mut(label)?,
                *x,
                *y,
                *width,
                *height,
                *delta,
                *falloff_width,
            )?;
            log::info!(
                "raise_lower by {delta}: {} texels, {} saturated",
                out.modified,
                out.saturated
            );
        }
        Op::Noise {
            x,
            y,
            radius,
            amplitude,
            frequency,
            seed,
            octaves,
        } => {
            let out = apply_noise(
                registry.get_mut(label)?,
                *x,
                *y,
                *radius,
                *amplitude,
                *frequency,
                *seed,
                *octaves,
            )?;
            log::info!(
                "noise: {} texels, world delta {:.2}..{:.2}",
                out.modified,
                out.min_delta_z,
                out.max_delta_z
            );
        }
        Op::Paint {
            layer,
            x,
            y,
            radius,
            strength,
        } => {
            let out = paint(registry.get_mut(label)?, layer, *x, *y, *radius, *strength)?;
            log::info!(
                "paint `{layer}`: {} texels, {} saturated",
                out.modified,
                out.saturated
            );
        }
        Op::Hole {
            x,
            y,
            radius,
            create,
        } => {
            let out = set_hole(registry.get_mut(label)?, *x, *y, *radius, *create)?;
            let verb = if *create { "cut" } else { "filled" };
            log::info!("hole {verb}: {} texels", out.modified);
        }
        Op::HoleRegion {
            min_x,
            min_y,
            max_x,
            max_y,
            create,
        } => {
            let rect = GridRect::new(*min_x, *min_y, *max_x, *max_y);
            set_hole_region(registry.get_mut(label)?, rect, *create)?;
            let verb = if *create { "cut" } else { "filled" };
            log::info!("hole region {verb}: {} texels", rect.area());
        }
        Op::Resize {
            components_x,
            components_y,
            quads_per_section,
            sections_per_component,
        } => {
            let report = resize(
                registry,
                label,
                *components_x,
                *components_y,
                *quads_per_section,
                *sections_per_component,
            )?;
            log::info!(
                "resize: {}x{} -> {}x{}, {} paint layers restored",
                report.old_size.0,
                report.old_size.1,
                report.new_size.0,
                report.new_size.1,
                report.restored_layers.len()
            );
        }
    }
    Ok(())
}
