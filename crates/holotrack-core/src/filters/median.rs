use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Square-window median (rank) filter.
///
/// The window spans `size` pixels per axis starting `size / 2` pixels before
/// the centre, so odd sizes are centred and even sizes lean towards lower
/// indices. Out-of-bounds samples are clamped to the nearest edge pixel.
/// Even window counts take the upper of the two middle values, as a rank
/// filter does. `size <= 1` returns a copy of the input.
pub fn median_filter(data: &Array2<f32>, size: usize) -> Array2<f32> {
    if size <= 1 {
        return data.clone();
    }

    let (h, w) = data.dim();
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| {
                let mut window = Vec::with_capacity(size * size);
                (0..w)
                    .map(|col| window_median(data, row, col, size, &mut window))
                    .collect()
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
        let mut window = Vec::with_capacity(size * size);
        let mut result = Array2::<f32>::zeros((h, w));
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = window_median(data, row, col, size, &mut window);
            }
        }
        result
    }
}

fn window_median(
    data: &Array2<f32>,
    row: usize,
    col: usize,
    size: usize,
    window: &mut Vec<f32>,
) -> f32 {
    let (h, w) = data.dim();
    let before = (size / 2) as isize;
    window.clear();

    for dr in 0..size as isize {
        let r = (row as isize + dr - before).clamp(0, h as isize - 1) as usize;
        for dc in 0..size as isize {
            let c = (col as isize + dc - before).clamp(0, w as isize - 1) as usize;
            window.push(data[[r, c]]);
        }
    }

    let mid = window.len() / 2;
    *window.select_nth_unstable_by(mid, |a, b| a.total_cmp(b)).1
}
