use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FRAME_SKIP, DEFAULT_MIN_TRACK_LENGTH, DEFAULT_SEARCH_RADIUS};
use crate::error::{HoloError, Result};

/// Search-sphere linking parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkerConfig {
    /// Largest distance (detection units) a track may jump between points.
    #[serde(default = "default_search_radius")]
    pub search_radius: f64,
    /// Consecutive missed frames tolerated before a track terminates.
    #[serde(default = "default_frame_skip")]
    pub frame_skip: usize,
    /// Tracks with fewer points are dropped.
    #[serde(default = "default_min_track_length")]
    pub min_track_length: usize,
}

fn default_search_radius() -> f64 {
    DEFAULT_SEARCH_RADIUS
}
fn default_frame_skip() -> usize {
    DEFAULT_FRAME_SKIP
}
fn default_min_track_length() -> usize {
    DEFAULT_MIN_TRACK_LENGTH
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            search_radius: DEFAULT_SEARCH_RADIUS,
            frame_skip: DEFAULT_FRAME_SKIP,
            min_track_length: DEFAULT_MIN_TRACK_LENGTH,
        }
    }
}

impl LinkerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.search_radius.is_finite() || self.search_radius < 0.0 {
            return Err(HoloError::InvalidConfig(format!(
                "search_radius must be finite and non-negative, got {}",
                self.search_radius
            )));
        }
        Ok(())
    }
}
