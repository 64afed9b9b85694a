pub mod background;
pub mod config;
pub mod info;
pub mod pipeline;
pub mod reconstruct;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use holotrack_core::pipeline::HoloConfig;

/// Load a TOML config file, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<HoloConfig> {
    let Some(path) = path else {
        return Ok(HoloConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: HoloConfig = toml::from_str(&contents).context("Invalid config")?;
    Ok(config)
}

/// Sort input paths so numbered frames load in order.
pub fn sorted_paths(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = files.to_vec();
    paths.sort();
    paths
}
