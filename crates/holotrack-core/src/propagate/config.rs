use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BANDPASS_LARGE, DEFAULT_BANDPASS_SMALL, DEFAULT_NUM_STEPS, DEFAULT_PRE_FILTER_SIZE,
    DEFAULT_REFRACTIVE_INDEX, DEFAULT_SAMPLING_FREQUENCY, DEFAULT_STEP_SIZE, DEFAULT_WAVELENGTH_UM,
};
use crate::error::{HoloError, Result};

/// Physical parameters of the holographic microscope and the defocus sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpticsConfig {
    /// Refractive index of the medium.
    #[serde(default = "default_refractive_index")]
    pub refractive_index: f64,
    /// Illumination wavelength in micrometres.
    #[serde(default = "default_wavelength")]
    pub wavelength: f64,
    /// Pixels per micrometre in the object plane.
    #[serde(default = "default_sampling_frequency")]
    pub sampling_frequency: f64,
    /// Distance between defocus planes in micrometres.
    #[serde(default = "default_step_size")]
    pub step_size: f64,
    /// Number of defocus planes.
    #[serde(default = "default_num_steps")]
    pub num_steps: usize,
}

fn default_refractive_index() -> f64 {
    DEFAULT_REFRACTIVE_INDEX
}
fn default_wavelength() -> f64 {
    DEFAULT_WAVELENGTH_UM
}
fn default_sampling_frequency() -> f64 {
    DEFAULT_SAMPLING_FREQUENCY
}
fn default_step_size() -> f64 {
    DEFAULT_STEP_SIZE
}
fn default_num_steps() -> usize {
    DEFAULT_NUM_STEPS
}

impl Default for OpticsConfig {
    fn default() -> Self {
        Self {
            refractive_index: DEFAULT_REFRACTIVE_INDEX,
            wavelength: DEFAULT_WAVELENGTH_UM,
            sampling_frequency: DEFAULT_SAMPLING_FREQUENCY,
            step_size: DEFAULT_STEP_SIZE,
            num_steps: DEFAULT_NUM_STEPS,
        }
    }
}

impl OpticsConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("refractive_index", self.refractive_index),
            ("wavelength", self.wavelength),
            ("sampling_frequency", self.sampling_frequency),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(HoloError::InvalidConfig(format!(
                    "{name} must be finite and positive, got {value}"
                )));
            }
        }
        if !self.step_size.is_finite() {
            return Err(HoloError::InvalidConfig(format!(
                "step_size must be finite, got {}",
                self.step_size
            )));
        }
        if self.num_steps == 0 {
            return Err(HoloError::InvalidConfig(
                "num_steps must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Wavenumber in the medium, `2*pi*N/lambda`.
    pub fn wavenumber(&self) -> f64 {
        std::f64::consts::TAU * self.refractive_index / self.wavelength
    }

    /// Convert an `(x, y, z)` position in pixels and plane indices to
    /// micrometres.
    pub fn to_physical(&self, [x, y, z]: [f64; 3]) -> [f64; 3] {
        [
            x / self.sampling_frequency,
            y / self.sampling_frequency,
            z * self.step_size,
        ]
    }

    /// Defocus distance of every plane, `step_size * k`.
    pub fn distances(&self) -> Vec<f64> {
        (0..self.num_steps)
            .map(|k| self.step_size * k as f64)
            .collect()
    }
}

/// Transfer function used to back-propagate the hologram.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagatorKind {
    /// Plain Rayleigh–Sommerfeld propagation; the volume holds intensity.
    #[default]
    Standard,
    /// Transfer function multiplied by `2*pi*i*q`; the volume is already a
    /// gradient-enhanced focus stack.
    Modified,
}

impl std::fmt::Display for PropagatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "Rayleigh-Sommerfeld"),
            Self::Modified => write!(f, "Modified (gradient)"),
        }
    }
}

/// Hologram preprocessing and propagation options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionConfig {
    #[serde(default)]
    pub propagator: PropagatorKind,
    #[serde(default = "default_true")]
    pub bandpass_enabled: bool,
    /// Small bandpass cutoff radius in pixels.
    #[serde(default = "default_bandpass_small")]
    pub bandpass_small: f64,
    /// Large bandpass cutoff radius in pixels.
    #[serde(default = "default_bandpass_large")]
    pub bandpass_large: f64,
    #[serde(default)]
    pub pre_filter_enabled: bool,
    /// Median pre-filter window size in pixels.
    #[serde(default = "default_pre_filter_size")]
    pub pre_filter_size: usize,
}

fn default_true() -> bool {
    true
}
fn default_bandpass_small() -> f64 {
    DEFAULT_BANDPASS_SMALL
}
fn default_bandpass_large() -> f64 {
    DEFAULT_BANDPASS_LARGE
}
fn default_pre_filter_size() -> usize {
    DEFAULT_PRE_FILTER_SIZE
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            propagator: PropagatorKind::default(),
            bandpass_enabled: true,
            bandpass_small: DEFAULT_BANDPASS_SMALL,
            bandpass_large: DEFAULT_BANDPASS_LARGE,
            pre_filter_enabled: false,
            pre_filter_size: DEFAULT_PRE_FILTER_SIZE,
        }
    }
}
