pub mod config;
pub mod localizer;
pub mod peaks;
pub mod refine;
pub mod types;

pub use config::LocalizerConfig;
pub use localizer::localize;
pub use peaks::peak_local_max;
pub use refine::{fit_quadratic, refine_depth};
pub use types::{Detection, FrameDetections};
