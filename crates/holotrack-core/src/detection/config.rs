use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAGNIFICATION, DEFAULT_PEAK_MIN_DISTANCE};

/// Configuration for 3D particle localization in one focus volume.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocalizerConfig {
    /// Minimum separation (pixels) between peaks of the depth-max projection.
    #[serde(default = "default_peak_min_distance")]
    pub peak_min_distance: usize,
    /// Half-size (pixels) of the square window summed into a depth profile.
    #[serde(default = "default_neighborhood_size")]
    pub neighborhood_size: usize,
    /// Keep at most this many peaks, strongest first.
    #[serde(default)]
    pub num_particles: Option<usize>,
    /// Focus values below this are zeroed before peak search.
    #[serde(default)]
    pub focus_threshold: Option<f32>,
}

fn default_peak_min_distance() -> usize {
    DEFAULT_PEAK_MIN_DISTANCE
}
fn default_neighborhood_size() -> usize {
    neighborhood_for_magnification(DEFAULT_MAGNIFICATION)
}

/// Window half-size used at a given objective magnification (one pixel per
/// 10x).
pub fn neighborhood_for_magnification(magnification: f64) -> usize {
    (magnification / 10.0).max(0.0) as usize
}

impl LocalizerConfig {
    pub fn from_magnification(magnification: f64) -> Self {
        Self {
            neighborhood_size: neighborhood_for_magnification(magnification),
            ..Self::default()
        }
    }
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            peak_min_distance: DEFAULT_PEAK_MIN_DISTANCE,
            neighborhood_size: default_neighborhood_size(),
            num_particles: None,
            focus_threshold: None,
        }
    }
}
