use ndarray::{s, ArrayView3};
use tracing::{debug, warn};

use crate::error::{HoloError, Result};
use crate::focus::{apply_threshold, depth_max_projection};

use super::config::LocalizerConfig;
use super::peaks::peak_local_max;
use super::refine::refine_depth;
use super::types::Detection;

/// Locate particles in one frame's volumes.
///
/// Pipeline: optional focus threshold -> depth-max projection -> 2D peak
/// search -> windowed depth profile -> coarse maximum -> sub-plane refinement.
///
/// Every depth index attaining a profile's maximum yields its own detection.
/// No peaks gives an empty list.
pub fn localize(
    reconstruction: ArrayView3<'_, f32>,
    focus: ArrayView3<'_, f32>,
    frame_index: usize,
    config: &LocalizerConfig,
) -> Result<Vec<Detection>> {
    if reconstruction.dim() != focus.dim() {
        return Err(HoloError::InvalidVolumeShape {
            shape: focus.shape().to_vec(),
            reason: format!(
                "focus volume must match the reconstruction volume {:?}",
                reconstruction.shape()
            ),
        });
    }
    let (h, w, depth) = focus.dim();
    if h == 0 || w == 0 || depth == 0 {
        return Err(HoloError::InvalidVolumeShape {
            shape: vec![h, w, depth],
            reason: "focus volume has an empty dimension".into(),
        });
    }

    let thresholded;
    let focus = match config.focus_threshold {
        Some(t) => {
            thresholded = apply_threshold(&focus.to_owned(), t);
            thresholded.view()
        }
        None => focus,
    };

    let projection = depth_max_projection(focus);
    let peaks = peak_local_max(&projection, config.peak_min_distance, config.num_particles);

    let radius = config.neighborhood_size;
    let mut detections = Vec::new();
    for (row, col) in peaks {
        let r0 = row.saturating_sub(radius);
        let r1 = (row + radius).min(h - 1);
        let c0 = col.saturating_sub(radius);
        let c1 = (col + radius).min(w - 1);
        if r1 - r0 != 2 * radius || c1 - c0 != 2 * radius {
            warn!(
                frame = frame_index,
                row, col, radius, "Localization window truncated at image border"
            );
        }

        let window = focus.slice(s![r0..=r1, c0..=c1, ..]);
        let profile: Vec<f64> = (0..depth)
            .map(|k| window.slice(s![.., .., k]).iter().map(|&v| v as f64).sum())
            .collect();

        let peak = profile.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for (coarse, _) in profile.iter().enumerate().filter(|&(_, &v)| v == peak) {
            let (z, refined) = match refine_depth(&profile, coarse) {
                Some(z) => (z, true),
                None => (coarse as f64, false),
            };
            let plane = (z.round().max(0.0) as usize).min(depth - 1);
            detections.push(Detection {
                frame: frame_index,
                x: col as f64,
                y: row as f64,
                z,
                refined,
                reconstruction_value: reconstruction[[row, col, plane]],
                focus_value: focus[[row, col, plane]],
            });
        }
    }

    debug!(frame = frame_index, count = detections.len(), "Localized particles");
    Ok(detections)
}
