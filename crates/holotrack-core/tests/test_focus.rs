use approx::assert_abs_diff_eq;
use ndarray::{Array3, ArrayD, Axis, IxDyn};

use holotrack_core::error::HoloError;
use holotrack_core::focus::{
    apply_threshold, depth_max_projection, z_gradient_stack, z_gradient_stack_dyn,
};

#[test]
fn test_constant_volume_has_zero_gradient() {
    let volume = Array3::from_elem((6, 7, 5), 2.5f32);
    let focus = z_gradient_stack(volume.view()).unwrap();
    assert_eq!(focus.dim(), (6, 7, 5));
    for &v in focus.iter() {
        assert_abs_diff_eq!(v, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_linear_depth_ramp() {
    // V[k] = k: interior planes see W * (-2), end planes W * (-1);
    // the weights sum to 16.
    let volume = Array3::from_shape_fn((5, 5, 6), |(_, _, k)| k as f32);
    let focus = z_gradient_stack(volume.view()).unwrap();
    for ((_, _, k), &v) in focus.indexed_iter() {
        let expected = if k == 0 || k == 5 { -16.0 } else { -32.0 };
        assert_abs_diff_eq!(v, expected, epsilon = 1e-4);
    }
}

#[test]
fn test_single_plane_volume_is_zero() {
    let volume = Array3::from_shape_fn((4, 4, 1), |(r, c, _)| (r + c) as f32);
    let focus = z_gradient_stack(volume.view()).unwrap();
    assert!(focus.iter().all(|&v| v == 0.0));
}

#[test]
fn test_mirror_border_weights() {
    // Difference image is an impulse at the corner of plane 1's neighbours.
    let mut volume = Array3::<f32>::zeros((4, 4, 3));
    volume[[0, 0, 0]] = 1.0;
    let focus = z_gradient_stack(volume.view()).unwrap();
    // Plane 1 = W * (V[0] - V[2]); corner impulse with mirrored borders.
    assert_abs_diff_eq!(focus[[0, 0, 1]], 4.0, epsilon = 1e-6);
    assert_abs_diff_eq!(focus[[0, 1, 1]], 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(focus[[1, 1, 1]], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(focus[[2, 2, 1]], 0.0, epsilon = 1e-6);
}

#[test]
fn test_empty_volume_is_error() {
    let volume = Array3::<f32>::zeros((0, 4, 3));
    let err = z_gradient_stack(volume.view()).unwrap_err();
    assert!(matches!(err, HoloError::InvalidVolumeShape { .. }));
}

#[test]
fn test_dyn_rejects_2d() {
    let image = ArrayD::<f32>::zeros(IxDyn(&[4, 4]));
    let err = z_gradient_stack_dyn(&image).unwrap_err();
    match err {
        HoloError::InvalidVolumeShape { shape, .. } => assert_eq!(shape, vec![4, 4]),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_dyn_matches_static() {
    let volume = Array3::from_shape_fn((5, 6, 4), |(r, c, k)| ((r * 3 + c * 5 + k * k) % 7) as f32);
    let a = z_gradient_stack(volume.view()).unwrap();
    let b = z_gradient_stack_dyn(&volume.clone().into_dyn()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_depth_max_projection_and_threshold() {
    let volume = Array3::from_shape_fn((3, 3, 4), |(r, _, k)| (r * 10 + k) as f32);
    let projection = depth_max_projection(volume.view());
    assert_eq!(projection.dim(), (3, 3));
    assert_eq!(projection[[2, 1]], 23.0);

    let thresholded = apply_threshold(&volume, 12.0);
    assert_eq!(thresholded[[1, 0, 1]], 0.0);
    assert_eq!(thresholded[[1, 0, 2]], 12.0);
    assert_eq!(thresholded.index_axis(Axis(0), 2).iter().filter(|&&v| v == 0.0).count(), 0);
}
