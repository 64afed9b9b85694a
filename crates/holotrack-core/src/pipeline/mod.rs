pub mod config;
mod orchestrator;
mod types;

pub use config::HoloConfig;
pub use orchestrator::{
    detect_frames, reconstruct_and_detect, reconstruct_and_detect_cached, reconstruct_volumes,
    run_pipeline, FrameVolumes,
};
pub use types::{NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter};
