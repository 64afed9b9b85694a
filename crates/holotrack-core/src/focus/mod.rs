pub mod z_gradient;

use ndarray::{Array2, Array3, ArrayView3, Axis};

pub use z_gradient::{z_gradient_stack, z_gradient_stack_dyn};

/// Maximum over the depth axis of a `(height, width, depth)` volume.
pub fn depth_max_projection(volume: ArrayView3<'_, f32>) -> Array2<f32> {
    volume.fold_axis(Axis(2), f32::NEG_INFINITY, |&acc, &v| acc.max(v))
}

/// Zero every value below `threshold`.
pub fn apply_threshold(volume: &Array3<f32>, threshold: f32) -> Array3<f32> {
    volume.mapv(|v| if v < threshold { 0.0 } else { v })
}
