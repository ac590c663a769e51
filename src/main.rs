use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use loam_edit::{
    Falloff, TerrainRegistry, apply_noise, flatten, get_height_region, get_hole, paint, sculpt,
    set_hole, smooth,
};
use loam_field::{PaintLayerDesc, VISIBILITY_LAYER};
use loam_grid::{MID_HEIGHT, TerrainLayout, TerrainTransform, Vec3};

mod script;

#[derive(Parser)]
#[command(name = "loam", version, about = "Sculpt, paint and resample heightfield terrains")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a small terrain and run a representative edit sequence.
    Demo,
    /// Execute a TOML stroke script against a fresh terrain registry.
    Run {
        /// Script path.
        script: PathBuf,
    },
    /// Run a script, then dump the merged heightfield as little-endian u16 RAW.
    ExportHeight {
        /// Script path.
        script: PathBuf,
        /// Output file.
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match Cli::parse().command {
        Command::Demo => demo(),
        Command::Run { script } => {
            let parsed = script::Script::from_path(&script)?;
            let mut registry = TerrainRegistry::new();
            let label = script::execute(&parsed, &mut registry)?;
            report_republish(&mut registry);
            log::info!("script finished against terrain `{label}`");
            Ok(())
        }
        Command::ExportHeight { script, out } => export_height(&script, &out),
    }
}

fn demo() -> anyhow::Result<()> {
    let mut registry = TerrainRegistry::new();
    let layout = TerrainLayout::new(2, 2, 63, 1)?;
    let transform = TerrainTransform::new(Vec3::ZERO, 0.0, Vec3::new(100.0, 100.0, 100.0));
    let t = registry.create("demo", transform, layout)?;
    t.storage_mut()
        .attach_paint_layer(PaintLayerDesc::blended("Grass"), None)?;
    t.storage_mut()
        .attach_paint_layer(PaintLayerDesc::alpha(VISIBILITY_LAYER), None)?;

    let centre = 6300.0;
    let hill = sculpt(t, centre, centre, 2500.0, 80.0, Falloff::Smooth)?;
    log::info!("sculpt: {} texels, {} saturated", hill.modified, hill.saturated);

    let plateau = flatten(t, centre + 1500.0, centre, 1200.0, 60.0, 0.8, Falloff::Linear)?;
    log::info!("flatten: {} texels", plateau.modified);

    let blur = smooth(t, centre, centre, 2000.0, 1.0, Falloff::Smooth)?;
    log::info!("smooth: {} texels", blur.modified);

    let rough = apply_noise(t, centre - 1000.0, centre + 500.0, 1800.0, 6.0, 0.02, 1234, 5)?;
    log::info!(
        "noise: {} texels, world delta {:.2}..{:.2}",
        rough.modified,
        rough.min_delta_z,
        rough.max_delta_z
    );

    let grass = paint(t, "Grass", centre, centre, 2200.0, 0.9)?;
    log::info!("paint: {} texels, {} saturated", grass.modified, grass.saturated);

    let cave = set_hole(t, centre - 2000.0, centre - 2000.0, 400.0, true)?;
    log::info!(
        "hole: {} texels, query says {}",
        cave.modified,
        get_hole(t, centre - 2000.0, centre - 2000.0, 100.0)?
    );

    let peak = t.storage().height_at(63, 63).unwrap_or(MID_HEIGHT);
    log::info!("peak world height at the centre: {:.1}", t.transform().decode_height(peak));

    report_republish(&mut registry);
    Ok(())
}

fn export_height(script_path: &Path, out: &Path) -> anyhow::Result<()> {
    let parsed = script::Script::from_path(script_path)?;
    let mut registry = TerrainRegistry::new();
    let label = script::execute(&parsed, &mut registry)?;
    report_republish(&mut registry);

    let terrain = registry.get(&label)?;
    let extent = terrain.extent();
    let field = get_height_region(terrain, extent)?;
    let mut bytes = Vec::with_capacity(field.samples().len() * 2);
    for s in field.samples() {
        bytes.extend_from_slice(&s.to_le_bytes());
    }
    fs::write(out, &bytes).with_context(|| format!("writing {}", out.display()))?;
    log::info!(
        "wrote {}x{} u16 samples to {}",
        extent.width(),
        extent.height(),
        out.display()
    );
    Ok(())
}

fn report_republish(registry: &mut TerrainRegistry) {
    for (label, req) in registry.drain_republish() {
        log::info!(
            "terrain `{label}` wants republish of {}x{} texels at rev {}",
            req.rect.width(),
            req.rect.height(),
            req.rev
        );
    }
}
