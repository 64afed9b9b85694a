use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use holotrack_core::io::load_frame_sequence;
use holotrack_core::pipeline::{run_pipeline, HoloConfig};
use holotrack_core::propagate::PropagatorKind;
use tracing::info;

use crate::progress::BarReporter;
use crate::summary::{print_pipeline_summary, print_run_result};

use super::{load_config, sorted_paths};

#[derive(Args)]
pub struct RunArgs {
    /// Input hologram images (one frame each, sorted by name)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Acquisition rate used to timestamp frames
    #[arg(long, default_value = "1.0")]
    pub fps: f64,

    /// Frames sampled for the median background
    #[arg(long)]
    pub samples: Option<usize>,

    /// Number of defocus planes
    #[arg(long)]
    pub num_steps: Option<usize>,

    /// Use the gradient-enhanced propagator
    #[arg(long)]
    pub modified: bool,

    /// Linking search radius (pixels / planes)
    #[arg(long)]
    pub search_radius: Option<f64>,

    /// Missed frames tolerated before a track ends
    #[arg(long)]
    pub frame_skip: Option<usize>,

    /// Shortest track written
    #[arg(long)]
    pub min_length: Option<usize>,

    /// Write positions in micrometres instead of pixels / planes
    #[arg(long)]
    pub physical: bool,

    /// Output CSV path
    #[arg(short, long, default_value = "tracks.csv")]
    pub output: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;
    let paths = sorted_paths(&args.files);

    print_pipeline_summary(&config, paths.len(), &args.output);

    let frames = load_frame_sequence(&paths, args.fps)?;
    let reporter = BarReporter::new()?;
    let output = run_pipeline(&frames, &config, &reporter)?;

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for track in &output.tracks {
        for record in track.records() {
            if args.physical {
                writer.serialize(record.to_physical(&config.optics))?;
            } else {
                writer.serialize(record)?;
            }
        }
    }
    writer.flush()?;
    info!(
        tracks = output.tracks.len(),
        path = %args.output.display(),
        "Wrote track table"
    );

    print_run_result(&output, &args.output);
    Ok(())
}

fn build_config(args: &RunArgs) -> Result<HoloConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(n) = args.samples {
        config.background_samples = n;
    }
    if let Some(n) = args.num_steps {
        config.optics.num_steps = n;
    }
    if args.modified {
        config.reconstruction.propagator = PropagatorKind::Modified;
    }
    if let Some(r) = args.search_radius {
        config.linker.search_radius = r;
    }
    if let Some(n) = args.frame_skip {
        config.linker.frame_skip = n;
    }
    if let Some(n) = args.min_length {
        config.linker.min_track_length = n;
    }
    config.validate()?;
    Ok(config)
}
