use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use holotrack_core::background::estimate_background;
use holotrack_core::consts::DEFAULT_BACKGROUND_SAMPLES;
use holotrack_core::io::{load_frame_sequence, save_unit_tiff};

use super::sorted_paths;

#[derive(Args)]
pub struct BackgroundArgs {
    /// Input image files (one frame each)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Number of evenly spaced frames to sample
    #[arg(long, default_value_t = DEFAULT_BACKGROUND_SAMPLES)]
    pub samples: usize,

    /// Output TIFF path (unscaled 16-bit, reloadable as a background)
    #[arg(short, long, default_value = "background.tiff")]
    pub output: PathBuf,
}

pub fn run(args: &BackgroundArgs) -> Result<()> {
    let paths = sorted_paths(&args.files);
    let frames = load_frame_sequence(&paths, 1.0)?;
    let background = estimate_background(&frames, args.samples)?;

    save_unit_tiff(background.data(), &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "Background ({} samples over {} frames) saved to {}",
        args.samples,
        frames.len(),
        args.output.display()
    );
    Ok(())
}
