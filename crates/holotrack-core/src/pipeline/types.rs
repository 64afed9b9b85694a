use std::collections::BTreeMap;

use crate::background::BackgroundImage;
use crate::detection::FrameDetections;
use crate::track::{LinkSummary, Track};

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Background,
    Reconstruction,
    Linking,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Background => write!(f, "Estimating background"),
            Self::Reconstruction => write!(f, "Reconstructing frames"),
            Self::Linking => write!(f, "Linking tracks"),
        }
    }
}

/// Result of a full pipeline run.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub background: BackgroundImage,
    /// Detections keyed by frame index.
    pub detections: BTreeMap<usize, FrameDetections>,
    pub tracks: Vec<Track>,
    pub summary: LinkSummary,
}

impl PipelineOutput {
    pub fn detection_count(&self) -> usize {
        self.detections.values().map(|f| f.detections.len()).sum()
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
