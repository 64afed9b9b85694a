pub mod median;

use ndarray::Array2;

use crate::error::{HoloError, Result};

pub use median::{estimate_background, spaced_indices};

/// Reference image used to normalize holograms.
///
/// Exactly-zero pixels are replaced by the image mean on construction so
/// that dividing a frame by the background never divides by zero. Every
/// pixel is strictly positive afterwards.
#[derive(Clone, Debug)]
pub struct BackgroundImage {
    data: Array2<f32>,
}

impl BackgroundImage {
    pub fn new(mut data: Array2<f32>) -> Result<Self> {
        let (h, w) = data.dim();
        if h == 0 || w == 0 {
            return Err(HoloError::InvalidBackground(format!(
                "empty image ({h}x{w})"
            )));
        }

        let mean = data.iter().map(|&v| v as f64).sum::<f64>() / (h * w) as f64;
        let mean = mean as f32;
        data.mapv_inplace(|v| if v == 0.0 { mean } else { v });

        if let Some(bad) = data.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            return Err(HoloError::InvalidBackground(format!(
                "pixel value {bad} is not strictly positive after zero replacement (mean {mean})"
            )));
        }

        Ok(Self { data })
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn into_inner(self) -> Array2<f32> {
        self.data
    }
}
