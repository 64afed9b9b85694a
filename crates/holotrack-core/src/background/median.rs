use ndarray::Array2;
use rayon::prelude::*;
use tracing::info;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{HoloError, Result};
use crate::frame::Frame;

use super::BackgroundImage;

/// Estimate the static background as the per-pixel median of
/// `sample_count` frames spread evenly over the sequence.
///
/// Sampled indices are `round(linspace(0, n - 1, sample_count))`; asking for
/// more samples than there are frames repeats indices rather than failing.
/// The median of an even sample count is the mean of the two middle values.
pub fn estimate_background(frames: &[Frame], sample_count: usize) -> Result<BackgroundImage> {
    if frames.is_empty() {
        return Err(HoloError::EmptySequence);
    }
    if sample_count == 0 {
        return Err(HoloError::InvalidConfig(
            "background sample count must be at least 1".into(),
        ));
    }

    let expected = frames[0].data.dim();
    for frame in frames {
        if frame.data.dim() != expected {
            return Err(HoloError::ShapeMismatch {
                expected,
                actual: frame.data.dim(),
            });
        }
    }

    let indices = spaced_indices(frames.len(), sample_count);
    let sampled: Vec<&Frame> = indices.iter().map(|&i| &frames[i]).collect();
    let median = median_stack(&sampled);

    info!(
        frames = frames.len(),
        samples = sampled.len(),
        "Background estimated"
    );
    BackgroundImage::new(median)
}

/// `count` indices evenly spaced over `0..len`, rounded to the nearest
/// integer with ties going to the even index.
pub fn spaced_indices(len: usize, count: usize) -> Vec<usize> {
    if len == 0 || count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![0];
    }
    let last = (len - 1) as f64;
    (0..count)
        .map(|k| (last * k as f64 / (count - 1) as f64).round_ties_even() as usize)
        .collect()
}

fn median_stack(frames: &[&Frame]) -> Array2<f32> {
    let (h, w) = frames[0].data.dim();
    let n = frames.len();

    if h * w >= PARALLEL_PIXEL_THRESHOLD && n > 1 {
        // Row-parallel: each row allocates its own pixel_values
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| {
                let mut pixel_values = vec![0.0f32; n];
                let mut row_result = vec![0.0f32; w];
                for (col, result) in row_result.iter_mut().enumerate() {
                    for (i, frame) in frames.iter().enumerate() {
                        pixel_values[i] = frame.data[[row, col]];
                    }
                    *result = compute_median(&mut pixel_values);
                }
                row_result
            })
            .collect();

        let mut result = Array2::<f32>::zeros((h, w));
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
        result
    } else {
        let mut result = Array2::<f32>::zeros((h, w));
        let mut pixel_values = vec![0.0f32; n];

        for row in 0..h {
            for col in 0..w {
                for (i, frame) in frames.iter().enumerate() {
                    pixel_values[i] = frame.data[[row, col]];
                }
                result[[row, col]] = compute_median(&mut pixel_values);
            }
        }
        result
    }
}

fn compute_median(pixel_values: &mut [f32]) -> f32 {
    let n = pixel_values.len();
    if n == 1 {
        pixel_values[0]
    } else if n % 2 == 1 {
        let mid = n / 2;
        *pixel_values
            .select_nth_unstable_by(mid, |a, b| a.total_cmp(b))
            .1
    } else {
        let mid = n / 2;
        pixel_values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        pixel_values[..mid].select_nth_unstable_by(mid - 1, |a, b| a.total_cmp(b));
        (pixel_values[mid - 1] + pixel_values[mid]) / 2.0
    }
}
