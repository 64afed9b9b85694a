use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array3;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::background::{estimate_background, BackgroundImage};
use crate::detection::{localize, Detection, FrameDetections};
use crate::error::{HoloError, Result};
use crate::filters::BandpassCache;
use crate::focus::z_gradient_stack;
use crate::frame::Frame;
use crate::propagate::{propagate, PropagatorKind};
use crate::track::link_with_summary;

use super::config::HoloConfig;
use super::types::{PipelineOutput, PipelineStage, ProgressReporter};

/// Reconstruction and focus volumes of one frame.
#[derive(Clone, Debug)]
pub struct FrameVolumes {
    pub reconstruction: Array3<f32>,
    pub focus: Array3<f32>,
}

/// Propagate one frame and compute its focus volume.
///
/// The modified propagator already yields a gradient-enhanced stack, which
/// then serves as both volumes.
pub fn reconstruct_volumes(
    frame: &Frame,
    background: &BackgroundImage,
    config: &HoloConfig,
    masks: &BandpassCache,
) -> Result<FrameVolumes> {
    let reconstruction = propagate(
        &frame.data,
        background,
        &config.optics,
        &config.reconstruction,
        masks,
    )?;
    match config.reconstruction.propagator {
        PropagatorKind::Standard => {
            let focus = z_gradient_stack(reconstruction.view())?;
            Ok(FrameVolumes {
                reconstruction,
                focus,
            })
        }
        PropagatorKind::Modified => Ok(FrameVolumes {
            focus: reconstruction.clone(),
            reconstruction,
        }),
    }
}

/// Detect particles in one frame.
pub fn reconstruct_and_detect(
    frame: &Frame,
    background: &BackgroundImage,
    config: &HoloConfig,
) -> Result<Vec<Detection>> {
    reconstruct_and_detect_cached(frame, background, config, &BandpassCache::new())
}

/// [`reconstruct_and_detect`] sharing bandpass masks across calls.
pub fn reconstruct_and_detect_cached(
    frame: &Frame,
    background: &BackgroundImage,
    config: &HoloConfig,
    masks: &BandpassCache,
) -> Result<Vec<Detection>> {
    let volumes = reconstruct_volumes(frame, background, config, masks)?;
    localize(
        volumes.reconstruction.view(),
        volumes.focus.view(),
        frame.index(),
        &config.localizer,
    )
}

/// Detect particles in every frame in parallel, keyed by frame index.
pub fn detect_frames(
    frames: &[Frame],
    background: &BackgroundImage,
    config: &HoloConfig,
    reporter: &dyn ProgressReporter,
) -> Result<BTreeMap<usize, FrameDetections>> {
    let mut seen = BTreeSet::new();
    if let Some(dup) = frames.iter().find(|f| !seen.insert(f.index())) {
        return Err(HoloError::InvalidConfig(format!(
            "duplicate frame index {}",
            dup.index()
        )));
    }

    let masks = BandpassCache::new();
    let done = AtomicUsize::new(0);
    reporter.begin_stage(PipelineStage::Reconstruction, Some(frames.len()));

    let results = frames
        .par_iter()
        .map(|frame| -> Result<(usize, FrameDetections)> {
            let detections = reconstruct_and_detect_cached(frame, background, config, &masks)?;
            debug!(
                frame = frame.index(),
                detections = detections.len(),
                "Frame reconstructed"
            );
            reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
            Ok((
                frame.index(),
                FrameDetections::new(frame.index(), frame.timestamp(), detections),
            ))
        })
        .collect::<Result<BTreeMap<usize, FrameDetections>>>()?;

    reporter.finish_stage();
    info!(
        frames = results.len(),
        detections = results.values().map(|f| f.detections.len()).sum::<usize>(),
        "Frames reconstructed"
    );
    Ok(results)
}

/// Background, per-frame detection and linking in one call.
pub fn run_pipeline(
    frames: &[Frame],
    config: &HoloConfig,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineOutput> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Background, None);
    let background = estimate_background(frames, config.background_samples)?;
    reporter.finish_stage();

    let detections = detect_frames(frames, &background, config, reporter)?;

    reporter.begin_stage(PipelineStage::Linking, None);
    let per_frame: Vec<FrameDetections> = detections.values().cloned().collect();
    let (tracks, summary) = link_with_summary(&per_frame, &config.linker)?;
    reporter.finish_stage();

    Ok(PipelineOutput {
        background,
        detections,
        tracks,
        summary,
    })
}
