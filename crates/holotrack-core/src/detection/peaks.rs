use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Local maxima of a 2D image, strongest first, as `(row, col)`.
///
/// A pixel is a candidate when it equals the maximum of its
/// `(2 * min_distance + 1)` square neighbourhood, is strictly greater than
/// the image minimum, and lies at least `min_distance` pixels from every
/// border. Candidates are ordered by value (row-major order among equal
/// values) and greedily thinned so that kept peaks are more than
/// `min_distance` apart in Chebyshev distance. `num_peaks` caps the result.
pub fn peak_local_max(
    image: &Array2<f32>,
    min_distance: usize,
    num_peaks: Option<usize>,
) -> Vec<(usize, usize)> {
    let (h, w) = image.dim();
    if h == 0 || w == 0 || num_peaks == Some(0) {
        return Vec::new();
    }

    let floor = image.iter().cloned().fold(f32::INFINITY, f32::min);
    let local_max = max_filter(image, min_distance);

    let mut candidates: Vec<(usize, usize, f32)> = Vec::new();
    if h > 2 * min_distance && w > 2 * min_distance {
        for row in min_distance..h - min_distance {
            for col in min_distance..w - min_distance {
                let v = image[[row, col]];
                if v > floor && v == local_max[[row, col]] {
                    candidates.push((row, col, v));
                }
            }
        }
    }

    // Stable sort keeps row-major order among equal values.
    candidates.sort_by(|a, b| b.2.total_cmp(&a.2));

    let limit = num_peaks.unwrap_or(usize::MAX);
    let mut peaks: Vec<(usize, usize)> = Vec::new();
    for (row, col, _) in candidates {
        let crowded = peaks
            .iter()
            .any(|&(pr, pc)| pr.abs_diff(row).max(pc.abs_diff(col)) <= min_distance);
        if !crowded {
            peaks.push((row, col));
            if peaks.len() >= limit {
                break;
            }
        }
    }
    peaks
}

/// Separable square maximum filter of half-size `radius`, clamping at the
/// borders.
pub fn max_filter(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    if radius == 0 {
        return data.clone();
    }
    let row_pass = max_rows(data, radius);
    let transposed = row_pass.t().to_owned();
    max_rows(&transposed, radius).t().to_owned()
}

fn max_rows(data: &Array2<f32>, radius: usize) -> Array2<f32> {
    let (h, w) = data.dim();
    let row_max = |row: usize| -> Vec<f32> {
        (0..w)
            .map(|col| {
                let lo = col.saturating_sub(radius);
                let hi = (col + radius).min(w - 1);
                (lo..=hi)
                    .map(|c| data[[row, c]])
                    .fold(f32::NEG_INFINITY, f32::max)
            })
            .collect()
    };

    let rows: Vec<Vec<f32>> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(row_max).collect()
    } else {
        (0..h).map(row_max).collect()
    };

    let mut result = Array2::<f32>::zeros((h, w));
    for (row, row_data) in rows.into_iter().enumerate() {
        for (col, val) in row_data.into_iter().enumerate() {
            result[[row, col]] = val;
        }
    }
    result
}
