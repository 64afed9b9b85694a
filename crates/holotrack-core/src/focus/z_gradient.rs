use ndarray::{Array3, ArrayD, ArrayView3, Ix3, Zip};

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, Z_GRADIENT_WEIGHTS};
use crate::error::{HoloError, Result};

/// Depth-gradient focus volume of a reconstruction.
///
/// Convolves with the 3x3x3 kernel whose depth slices are `-W, 0, +W`
/// (`W` = [`Z_GRADIENT_WEIGHTS`]) after padding the depth axis by repeating
/// the first and last planes; x/y borders are mirrored about the edge pixel.
/// For plane `k` this is `W * (V[k-1] - V[k+1])` with the depth index
/// clamped to the volume, so the output has the input's shape.
pub fn z_gradient_stack(volume: ArrayView3<'_, f32>) -> Result<Array3<f32>> {
    let (h, w, depth) = volume.dim();
    if h == 0 || w == 0 || depth == 0 {
        return Err(HoloError::InvalidVolumeShape {
            shape: vec![h, w, depth],
            reason: "focus metric needs a non-empty volume".into(),
        });
    }

    let diff = Array3::from_shape_fn((h, w, depth), |(r, c, k)| {
        let before = k.saturating_sub(1);
        let after = (k + 1).min(depth - 1);
        volume[[r, c, before]] - volume[[r, c, after]]
    });

    let weighted = |(r, c, k): (usize, usize, usize)| -> f32 {
        let mut sum = 0.0f32;
        for (di, weights) in Z_GRADIENT_WEIGHTS.iter().enumerate() {
            let rr = mirror(r as isize + di as isize - 1, h);
            for (dj, &weight) in weights.iter().enumerate() {
                let cc = mirror(c as isize + dj as isize - 1, w);
                sum += weight * diff[[rr, cc, k]];
            }
        }
        sum
    };

    let mut focus = Array3::<f32>::zeros((h, w, depth));
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        Zip::indexed(&mut focus).par_for_each(|idx, out| *out = weighted(idx));
    } else {
        Zip::indexed(&mut focus).for_each(|idx, out| *out = weighted(idx));
    }
    Ok(focus)
}

/// Same as [`z_gradient_stack`] for arrays whose dimensionality is only
/// known at runtime. Anything other than a 3D array is rejected.
pub fn z_gradient_stack_dyn(volume: &ArrayD<f32>) -> Result<Array3<f32>> {
    let shape = volume.shape().to_vec();
    if shape.len() != 3 {
        return Err(HoloError::InvalidVolumeShape {
            reason: format!(
                "expected a 3D (height, width, depth) volume, got {} dimensions",
                shape.len()
            ),
            shape,
        });
    }
    let view = volume
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|e| HoloError::InvalidVolumeShape {
            shape: shape.clone(),
            reason: e.to_string(),
        })?;
    z_gradient_stack(view)
}

/// Reflect an index about the edge samples: `-1 -> 1`, `n -> n - 2`.
fn mirror(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - m) as usize
    }
}
