use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use holotrack_core::io::load_frame_sequence;

use super::sorted_paths;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image files (one frame each)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let paths = sorted_paths(&args.files);
    let frames = load_frame_sequence(&paths, 1.0)?;

    let (lo, hi) = frames
        .iter()
        .flat_map(|f| f.data.iter())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    println!("First:       {}", paths[0].display());
    println!("Frames:      {}", frames.len());
    println!("Dimensions:  {}x{}", frames[0].width(), frames[0].height());
    println!("Range:       {:.4} .. {:.4}", lo, hi);

    let total_mb = (frames.len() * frames[0].width() * frames[0].height() * 4) as f64
        / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}
