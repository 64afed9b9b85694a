use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use holotrack_core::background::BackgroundImage;
use holotrack_core::detection::localize;
use holotrack_core::filters::BandpassCache;
use holotrack_core::focus::depth_max_projection;
use holotrack_core::io::{load_image, save_image};
use holotrack_core::pipeline::reconstruct_volumes;
use holotrack_core::propagate::PropagatorKind;

use super::load_config;

#[derive(Args)]
pub struct ReconstructArgs {
    /// Hologram image
    pub frame: PathBuf,

    /// Background image (as written by `holotrack background`)
    #[arg(short, long)]
    pub background: PathBuf,

    /// Config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Use the gradient-enhanced propagator
    #[arg(long)]
    pub modified: bool,

    /// Override the number of defocus planes
    #[arg(long)]
    pub num_steps: Option<usize>,

    /// Output path for the depth-max projection of the focus volume
    #[arg(short, long, default_value = "projection.png")]
    pub output: PathBuf,
}

pub fn run(args: &ReconstructArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if args.modified {
        config.reconstruction.propagator = PropagatorKind::Modified;
    }
    if let Some(n) = args.num_steps {
        config.optics.num_steps = n;
    }

    let frame = load_image(&args.frame)
        .with_context(|| format!("Failed to read {}", args.frame.display()))?;
    let background = load_image(&args.background)
        .with_context(|| format!("Failed to read {}", args.background.display()))?;
    let background = BackgroundImage::new(background.data)?;

    let volumes = reconstruct_volumes(&frame, &background, &config, &BandpassCache::new())?;
    let projection = depth_max_projection(volumes.focus.view());
    save_image(&projection, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let detections = localize(
        volumes.reconstruction.view(),
        volumes.focus.view(),
        frame.index(),
        &config.localizer,
    )?;

    println!(
        "{} planes, {} detection(s); projection saved to {}",
        config.optics.num_steps,
        detections.len(),
        args.output.display()
    );
    for d in &detections {
        let p = d.to_physical(&config.optics);
        println!(
            "  x={:>8.2} y={:>8.2} z={:>8.2}  ({:.2} um, {:.2} um, {:.2} um){}",
            d.x,
            d.y,
            d.z,
            p.x,
            p.y,
            p.z,
            if d.refined { "" } else { "  coarse" }
        );
    }
    Ok(())
}
