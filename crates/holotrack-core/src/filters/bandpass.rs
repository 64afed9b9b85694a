use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use ndarray::Array2;
use num_complex::Complex;

use crate::compute::{fft2d_real, fftshift, ifft2d, ifftshift};

/// Difference-of-Gaussians bandpass mask in centered frequency layout.
///
/// Both Gaussians are centered on the zero-frequency bin of an
/// `fftshift`-ed spectrum, `(height/2, width/2)`. Each is scaled by
/// `2 * cutoff / height`, so the row count is the reference size for both
/// axes. The small cutoff produces the wide response and the large cutoff
/// the narrow one; their difference removes the DC term and the
/// highest frequencies.
pub fn bandpass_mask(
    height: usize,
    width: usize,
    small_cutoff: f64,
    large_cutoff: f64,
) -> Array2<f64> {
    let size = height.max(1) as f64;
    let ci = (height / 2) as f64;
    let cj = (width / 2) as f64;
    let small_scale = (2.0 * small_cutoff / size).powi(2);
    let large_scale = (2.0 * large_cutoff / size).powi(2);

    Array2::from_shape_fn((height, width), |(i, j)| {
        let di = i as f64 - ci;
        let dj = j as f64 - cj;
        let r2 = di * di + dj * dj;
        (-r2 * small_scale).exp() - (-r2 * large_scale).exp()
    })
}

/// Apply the bandpass mask to an image and return the real part of the
/// filtered result.
pub fn bandpass_filter(data: &Array2<f32>, small_cutoff: f64, large_cutoff: f64) -> Array2<f32> {
    let (h, w) = data.dim();
    let mask = bandpass_mask(h, w, small_cutoff, large_cutoff);
    let mut spectrum = fftshift(&fft2d_real(data));
    ndarray::Zip::from(&mut spectrum)
        .and(&mask)
        .for_each(|s, &m| *s *= m);
    let filtered = ifft2d(&ifftshift(&spectrum));
    filtered.mapv(|v: Complex<f64>| v.re as f32)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct MaskKey {
    height: usize,
    width: usize,
    small_bits: u64,
    large_bits: u64,
}

/// Thread-safe cache of bandpass masks keyed by shape and cutoff pair.
///
/// Masks are immutable once built and handed out as `Arc`s, so workers
/// reconstructing different frames share one copy per shape.
#[derive(Debug, Default)]
pub struct BandpassCache {
    masks: RwLock<HashMap<MaskKey, Arc<Array2<f64>>>>,
}

impl BandpassCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        height: usize,
        width: usize,
        small_cutoff: f64,
        large_cutoff: f64,
    ) -> Arc<Array2<f64>> {
        let key = MaskKey {
            height,
            width,
            small_bits: small_cutoff.to_bits(),
            large_bits: large_cutoff.to_bits(),
        };

        if let Some(mask) = self
            .masks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(mask);
        }

        let mask = Arc::new(bandpass_mask(height, width, small_cutoff, large_cutoff));
        let mut masks = self.masks.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(masks.entry(key).or_insert(mask))
    }

    /// Number of distinct masks built so far.
    pub fn len(&self) -> usize {
        self.masks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
