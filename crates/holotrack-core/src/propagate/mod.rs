pub mod config;
pub mod rayleigh_sommerfeld;

pub use config::{OpticsConfig, PropagatorKind, ReconstructionConfig};
pub use rayleigh_sommerfeld::{
    modified_propagator, normalize_hologram, propagate, rayleigh_sommerfeld, wave_field,
};
