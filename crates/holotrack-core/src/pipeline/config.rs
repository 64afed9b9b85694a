use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_BACKGROUND_SAMPLES;
use crate::detection::LocalizerConfig;
use crate::error::{HoloError, Result};
use crate::propagate::{OpticsConfig, ReconstructionConfig};
use crate::track::LinkerConfig;

/// Everything needed to turn a hologram sequence into tracks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HoloConfig {
    /// Frames sampled for the median background.
    #[serde(default = "default_background_samples")]
    pub background_samples: usize,
    #[serde(default)]
    pub optics: OpticsConfig,
    #[serde(default)]
    pub reconstruction: ReconstructionConfig,
    #[serde(default)]
    pub localizer: LocalizerConfig,
    #[serde(default)]
    pub linker: LinkerConfig,
}

fn default_background_samples() -> usize {
    DEFAULT_BACKGROUND_SAMPLES
}

impl Default for HoloConfig {
    fn default() -> Self {
        Self {
            background_samples: DEFAULT_BACKGROUND_SAMPLES,
            optics: OpticsConfig::default(),
            reconstruction: ReconstructionConfig::default(),
            localizer: LocalizerConfig::default(),
            linker: LinkerConfig::default(),
        }
    }
}

impl HoloConfig {
    pub fn validate(&self) -> Result<()> {
        self.optics.validate()?;
        self.linker.validate()?;
        if self.background_samples == 0 {
            return Err(HoloError::InvalidConfig(
                "background_samples must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
