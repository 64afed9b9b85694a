use ndarray::{Array2, Array3, Axis, Zip};
use num_complex::Complex;
use rayon::prelude::*;
use tracing::debug;

use crate::background::BackgroundImage;
use crate::compute::{fft2d_real, fftshift, ifft2d, ifftshift};
use crate::consts::PARALLEL_PLANE_THRESHOLD;
use crate::error::{HoloError, Result};
use crate::filters::{median_filter, BandpassCache};

use super::config::{OpticsConfig, PropagatorKind, ReconstructionConfig};

/// Back-propagate a hologram into a volume of `optics.num_steps` defocus
/// planes using the transfer function selected in `reconstruction`.
///
/// Output shape is `(height, width, num_steps)`; plane `k` lies at
/// `step_size * k` from the sensor.
pub fn propagate(
    hologram: &Array2<f32>,
    background: &BackgroundImage,
    optics: &OpticsConfig,
    reconstruction: &ReconstructionConfig,
    masks: &BandpassCache,
) -> Result<Array3<f32>> {
    optics.validate()?;
    let normalized = normalize_hologram(hologram, background)?;
    let normalized = if reconstruction.pre_filter_enabled {
        median_filter(&normalized, reconstruction.pre_filter_size)
    } else {
        normalized
    };
    let field = wave_field(&normalized, reconstruction, masks);

    match reconstruction.propagator {
        PropagatorKind::Standard => Ok(rayleigh_sommerfeld(&field, optics)),
        PropagatorKind::Modified => Ok(modified_propagator(&field, optics)),
    }
}

/// Divide the hologram by the background image.
pub fn normalize_hologram(
    hologram: &Array2<f32>,
    background: &BackgroundImage,
) -> Result<Array2<f32>> {
    if hologram.dim() != background.dim() {
        return Err(HoloError::ShapeMismatch {
            expected: background.dim(),
            actual: hologram.dim(),
        });
    }
    Ok(Zip::from(hologram)
        .and(background.data())
        .map_collect(|&h, &b| h / b))
}

/// Centered spectrum of `normalized - 1`, bandpass filtered when enabled.
pub fn wave_field(
    normalized: &Array2<f32>,
    reconstruction: &ReconstructionConfig,
    masks: &BandpassCache,
) -> Array2<Complex<f64>> {
    let (h, w) = normalized.dim();
    let contrast = normalized.mapv(|v| v - 1.0);
    let mut field = fftshift(&fft2d_real(&contrast));

    if reconstruction.bandpass_enabled {
        let mask = masks.get(
            h,
            w,
            reconstruction.bandpass_small,
            reconstruction.bandpass_large,
        );
        Zip::from(&mut field)
            .and(&*mask)
            .for_each(|e, &m| *e *= m);
    }
    field
}

/// Standard Rayleigh–Sommerfeld propagation:
/// `R_k = exp(-i * K * Z_k * Q)`, plane = `Re(1 + ifft2(E * R_k))`.
pub fn rayleigh_sommerfeld(field: &Array2<Complex<f64>>, optics: &OpticsConfig) -> Array3<f32> {
    let distances = optics.distances();
    let conjugate = distances.iter().all(|&z| z >= 0.0);
    let grid = TransferGrid::new(field.dim(), optics, conjugate);
    let k = optics.wavenumber();

    build_volume(field, &distances, |z| {
        let phase = Complex::new(0.0, -k * z);
        grid.q.mapv(|q| (phase * q).exp())
    })
}

/// Gradient-enhanced propagation:
/// `R_k = 2*pi*i*q * exp(+i * K * Z_k * Q)`.
///
/// The phase sign is the opposite of [`rayleigh_sommerfeld`], so for real
/// `Q` each plane carries `-sin(K * Z_k * Q)` where the standard propagator
/// carries `cos(K * Z_k * Q)`. `Q` is conjugated only when every distance is
/// strictly positive, which never holds while plane 0 sits at `Z = 0`.
///
/// The extra `q` factor is the unscaled squared spatial frequency, which
/// amplifies edges so the planes respond like a focus metric directly.
pub fn modified_propagator(field: &Array2<Complex<f64>>, optics: &OpticsConfig) -> Array3<f32> {
    let distances = optics.distances();
    let conjugate = distances.iter().all(|&z| z > 0.0);
    let grid = TransferGrid::new(field.dim(), optics, conjugate);
    let k = optics.wavenumber();
    let gain = Complex::new(0.0, std::f64::consts::TAU);

    build_volume(field, &distances, |z| {
        let phase = Complex::new(0.0, k * z);
        Zip::from(&grid.q)
            .and(&grid.freq_sq)
            .map_collect(|&q, &f| gain * f * (phase * q).exp())
    })
}

/// Spatial-frequency terms shared by every plane of one propagation.
struct TransferGrid {
    /// `(i - h/2)^2 + (j - w/2)^2` in frequency bins.
    freq_sq: Array2<f64>,
    /// `sqrt(1 - P) - 1`, conjugated when requested.
    q: Array2<Complex<f64>>,
}

impl TransferGrid {
    fn new((h, w): (usize, usize), optics: &OpticsConfig, conjugate: bool) -> Self {
        let ci = (h / 2) as f64;
        let cj = (w / 2) as f64;
        let freq_sq = Array2::from_shape_fn((h, w), |(i, j)| {
            let di = i as f64 - ci;
            let dj = j as f64 - cj;
            di * di + dj * dj
        });

        let scale = (optics.wavelength * optics.sampling_frequency
            / (h.max(w) as f64 * optics.refractive_index))
            .powi(2);
        let mut p = freq_sq.mapv(|f| scale * f);

        // Evanescent components: keep P <= 1 so sqrt(1 - P) stays real.
        let p_max = p.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if p_max > 1.0 {
            debug!(p_max, "Rescaling evanescent spatial frequencies");
            p.mapv_inplace(|v| v / p_max);
        }

        let q = p.mapv(|v| {
            let root = Complex::new(1.0 - v, 0.0).sqrt() - 1.0;
            if conjugate {
                root.conj()
            } else {
                root
            }
        });

        Self { freq_sq, q }
    }
}

/// Apply one transfer function per distance and stack the real planes.
fn build_volume<F>(field: &Array2<Complex<f64>>, distances: &[f64], transfer: F) -> Array3<f32>
where
    F: Fn(f64) -> Array2<Complex<f64>> + Sync,
{
    let (h, w) = field.dim();
    let plane_at = |z: f64| -> Array2<f32> {
        let r = transfer(z);
        let filtered = Zip::from(field).and(&r).map_collect(|&e, &t| e * t);
        ifft2d(&ifftshift(&filtered)).mapv(|v| (1.0 + v.re) as f32)
    };

    let planes: Vec<Array2<f32>> = if distances.len() >= PARALLEL_PLANE_THRESHOLD {
        distances.par_iter().map(|&z| plane_at(z)).collect()
    } else {
        distances.iter().map(|&z| plane_at(z)).collect()
    };

    let mut volume = Array3::<f32>::zeros((h, w, distances.len()));
    for (k, plane) in planes.iter().enumerate() {
        volume.index_axis_mut(Axis(2), k).assign(plane);
    }
    volume
}
