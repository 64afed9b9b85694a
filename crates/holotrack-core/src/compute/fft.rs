use std::sync::Arc;

use ndarray::{Array2, ArrayViewMut1, Axis};
use num_complex::Complex;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// 2D forward FFT of a real image.
pub fn fft2d_real(data: &Array2<f32>) -> Array2<Complex<f64>> {
    let complex = data.mapv(|v| Complex::new(v as f64, 0.0));
    fft2d(&complex)
}

/// 2D forward FFT: row-wise pass, then column-wise pass.
pub fn fft2d(data: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(w);
    let fft_col = planner.plan_fft_forward(h);

    let mut work = data.clone();
    let parallel = h * w >= PARALLEL_PIXEL_THRESHOLD;
    transform_lanes(&mut work, Axis(0), &fft_row, parallel);
    transform_lanes(&mut work, Axis(1), &fft_col, parallel);
    work
}

/// 2D inverse FFT, normalized by `1/(h*w)` so that `ifft2d(fft2d(x)) == x`.
pub fn ifft2d(data: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let ifft_row = planner.plan_fft_inverse(w);
    let ifft_col = planner.plan_fft_inverse(h);

    let mut work = data.clone();
    let parallel = h * w >= PARALLEL_PIXEL_THRESHOLD;
    transform_lanes(&mut work, Axis(1), &ifft_col, parallel);
    transform_lanes(&mut work, Axis(0), &ifft_row, parallel);

    let scale = 1.0 / (h * w).max(1) as f64;
    work.mapv_inplace(|v| v * scale);
    work
}

/// Move the zero-frequency bin to the array centre (numpy `fftshift`).
pub fn fftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (h, w) = data.dim();
    roll(data, h / 2, w / 2)
}

/// Inverse of [`fftshift`], also correct for odd dimensions.
pub fn ifftshift<T: Clone>(data: &Array2<T>) -> Array2<T> {
    let (h, w) = data.dim();
    roll(data, h - h / 2, w - w / 2)
}

/// Circular shift: element `(r, c)` moves to `((r + dr) % h, (c + dc) % w)`.
fn roll<T: Clone>(data: &Array2<T>, dr: usize, dc: usize) -> Array2<T> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return data.clone();
    }
    Array2::from_shape_fn((h, w), |(r, c)| {
        let src_r = (r + h - dr % h) % h;
        let src_c = (c + w - dc % w) % w;
        data[[src_r, src_c]].clone()
    })
}

/// Run `plan` over every lane of `work`. `Axis(0)` iterates rows (transform
/// along columns of each row), `Axis(1)` iterates columns.
fn transform_lanes(
    work: &mut Array2<Complex<f64>>,
    lanes: Axis,
    plan: &Arc<dyn Fft<f64>>,
    parallel: bool,
) {
    if parallel {
        work.axis_iter_mut(lanes)
            .into_par_iter()
            .for_each(|mut lane| transform_lane(&mut lane, plan.as_ref()));
    } else {
        for mut lane in work.axis_iter_mut(lanes) {
            transform_lane(&mut lane, plan.as_ref());
        }
    }
}

fn transform_lane(lane: &mut ArrayViewMut1<Complex<f64>>, plan: &dyn Fft<f64>) {
    let mut buf: Vec<Complex<f64>> = lane.to_vec();
    plan.process(&mut buf);
    for (dst, src) in lane.iter_mut().zip(buf) {
        *dst = src;
    }
}
