#![allow(dead_code)]

use ndarray::{Array2, Array3};

use holotrack_core::detection::{Detection, FrameDetections};
use holotrack_core::frame::Frame;

/// `n` frames of a constant value.
pub fn constant_frames(n: usize, h: usize, w: usize, value: f32) -> Vec<Frame> {
    (0..n)
        .map(|i| Frame::new(Array2::from_elem((h, w), value), i, i as f64))
        .collect()
}

/// Smooth, strictly positive test pattern.
pub fn pattern(h: usize, w: usize) -> Array2<f32> {
    Array2::from_shape_fn((h, w), |(r, c)| {
        0.5 + 0.2 * ((r as f32) * 0.7).sin() * ((c as f32) * 0.3).cos()
    })
}

/// Holograms of a bright compact spot over a flat 0.5 background, drifting
/// `step` pixels per frame along `row` from `start_col`. Frame `i` is stamped
/// `0.1 * i` seconds.
pub fn drifting_spot(
    n: usize,
    (h, w): (usize, usize),
    row: usize,
    start_col: usize,
    step: usize,
) -> Vec<Frame> {
    const RADIUS_SQ: f64 = 9.0;
    (0..n)
        .map(|i| {
            let col = (start_col + step * i) as f64;
            let data = Array2::from_shape_fn((h, w), |(r, c)| {
                let dr = r as f64 - row as f64;
                let dc = c as f64 - col;
                let d2 = dr * dr + dc * dc;
                let bump = if d2 < RADIUS_SQ {
                    (1.0 - d2 / RADIUS_SQ).powi(2)
                } else {
                    0.0
                };
                (0.5 * (1.0 + 0.4 * bump)) as f32
            });
            Frame::new(data, i, i as f64 * 0.1)
        })
        .collect()
}

/// Separable Gaussian blob centred at `(row, col, z0)`.
pub fn gaussian_volume(
    (h, w, depth): (usize, usize, usize),
    (row, col): (usize, usize),
    z0: f64,
    sigma_xy: f64,
    sigma_z: f64,
) -> Array3<f32> {
    Array3::from_shape_fn((h, w, depth), |(r, c, k)| {
        let dr = r as f64 - row as f64;
        let dc = c as f64 - col as f64;
        let dz = k as f64 - z0;
        let xy = (-(dr * dr + dc * dc) / (2.0 * sigma_xy * sigma_xy)).exp();
        let z = (-(dz * dz) / (2.0 * sigma_z * sigma_z)).exp();
        (xy * z) as f32
    })
}

pub fn detection(frame: usize, x: f64, y: f64, z: f64) -> Detection {
    Detection {
        frame,
        x,
        y,
        z,
        refined: true,
        reconstruction_value: 1.0,
        focus_value: 1.0,
    }
}

/// One frame of detections at the given positions.
pub fn frame_of(frame: usize, positions: &[[f64; 3]]) -> FrameDetections {
    FrameDetections::new(
        frame,
        frame as f64 * 0.1,
        positions
            .iter()
            .map(|p| detection(frame, p[0], p[1], p[2]))
            .collect(),
    )
}

/// A particle moving `step` pixels per frame along x from `start`.
pub fn straight_line(frames: impl IntoIterator<Item = usize>, start: [f64; 3], step: f64) -> Vec<FrameDetections> {
    frames
        .into_iter()
        .map(|f| {
            frame_of(
                f,
                &[[start[0] + step * f as f64, start[1], start[2]]],
            )
        })
        .collect()
}
