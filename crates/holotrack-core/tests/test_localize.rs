mod common;

use approx::assert_abs_diff_eq;
use ndarray::{Array2, Array3};

use holotrack_core::detection::{
    fit_quadratic, localize, peak_local_max, refine_depth, LocalizerConfig,
};
use holotrack_core::error::HoloError;
use holotrack_core::propagate::OpticsConfig;

fn config(min_distance: usize, window: usize) -> LocalizerConfig {
    LocalizerConfig {
        peak_min_distance: min_distance,
        neighborhood_size: window,
        ..LocalizerConfig::default()
    }
}

// ---------------------------------------------------------------------------
// peak_local_max
// ---------------------------------------------------------------------------

#[test]
fn test_peaks_sorted_strongest_first() {
    let mut image = Array2::<f32>::zeros((30, 30));
    image[[8, 8]] = 0.5;
    image[[20, 22]] = 0.9;
    let peaks = peak_local_max(&image, 3, None);
    assert_eq!(peaks, vec![(20, 22), (8, 8)]);
}

#[test]
fn test_peak_count_cap() {
    let mut image = Array2::<f32>::zeros((30, 30));
    image[[8, 8]] = 0.5;
    image[[20, 22]] = 0.9;
    assert_eq!(peak_local_max(&image, 3, Some(1)), vec![(20, 22)]);
    assert!(peak_local_max(&image, 3, Some(0)).is_empty());
}

#[test]
fn test_flat_image_has_no_peaks() {
    let image = Array2::from_elem((20, 20), 0.3f32);
    assert!(peak_local_max(&image, 2, None).is_empty());
}

#[test]
fn test_border_peaks_excluded() {
    let mut image = Array2::<f32>::zeros((20, 20));
    image[[1, 1]] = 1.0;
    image[[10, 18]] = 1.0;
    assert!(peak_local_max(&image, 3, None).is_empty());
}

#[test]
fn test_plateau_keeps_first_in_row_major_order() {
    let mut image = Array2::<f32>::zeros((20, 20));
    image[[10, 10]] = 1.0;
    image[[10, 12]] = 1.0;
    assert_eq!(peak_local_max(&image, 3, None), vec![(10, 10)]);
}

#[test]
fn test_weaker_neighbour_suppressed() {
    let mut image = Array2::<f32>::zeros((20, 20));
    image[[10, 10]] = 1.0;
    image[[10, 13]] = 0.8;
    assert_eq!(peak_local_max(&image, 4, None), vec![(10, 10)]);
    // Far enough apart with a smaller spacing.
    assert_eq!(peak_local_max(&image, 2, None), vec![(10, 10), (10, 13)]);
}

// ---------------------------------------------------------------------------
// fit_quadratic / refine_depth
// ---------------------------------------------------------------------------

#[test]
fn test_fit_recovers_exact_parabola() {
    let xs: Vec<f64> = (0..6).map(|x| x as f64).collect();
    let ys: Vec<f64> = xs.iter().map(|x| -2.0 * x * x + 3.0 * x + 1.0).collect();
    let [a, b, c] = fit_quadratic(&xs, &ys).unwrap();
    assert_abs_diff_eq!(a, -2.0, epsilon = 1e-9);
    assert_abs_diff_eq!(b, 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(c, 1.0, epsilon = 1e-9);
}

#[test]
fn test_fit_needs_four_points() {
    assert!(fit_quadratic(&[0.0, 1.0, 2.0], &[1.0, 2.0, 1.0]).is_none());
}

#[test]
fn test_fit_singular_is_none() {
    assert!(fit_quadratic(&[1.0; 5], &[0.0, 1.0, 2.0, 3.0, 4.0]).is_none());
}

#[test]
fn test_refine_symmetric_profile_stays_on_plane() {
    let profile = [0.0, 1.0, 3.0, 5.0, 3.0, 1.0, 0.0];
    let z = refine_depth(&profile, 3).unwrap();
    assert_abs_diff_eq!(z, 3.0, epsilon = 1e-6);
}

#[test]
fn test_refine_short_profile_is_none() {
    assert!(refine_depth(&[1.0, 2.0, 1.0], 1).is_none());
}

#[test]
fn test_refine_at_profile_edge_uses_zero_padding() {
    let profile = [5.0, 3.0, 1.0, 0.5, 0.2];
    let z = refine_depth(&profile, 0).unwrap();
    assert!((-2.0..=2.0).contains(&z));
}

// ---------------------------------------------------------------------------
// localize
// ---------------------------------------------------------------------------

#[test]
fn test_gaussian_focus_peak_recovered() {
    let volume = common::gaussian_volume((32, 32, 21), (16, 16), 10.3, 2.0, 3.0);
    let detections = localize(volume.view(), volume.view(), 4, &config(3, 1)).unwrap();
    assert_eq!(detections.len(), 1);

    let d = &detections[0];
    assert_eq!(d.frame, 4);
    assert_eq!((d.x, d.y), (16.0, 16.0));
    assert!(d.refined);
    assert_abs_diff_eq!(d.z, 10.3, epsilon = 0.1);
    assert_eq!(d.focus_value, volume[[16, 16, 10]]);
}

#[test]
fn test_gaussian_peak_recovered_off_centre() {
    let volume = common::gaussian_volume((40, 36, 25), (12, 22), 7.6, 2.0, 2.5);
    let detections = localize(volume.view(), volume.view(), 0, &config(4, 1)).unwrap();
    assert_eq!(detections.len(), 1);
    let d = &detections[0];
    assert_eq!((d.x, d.y), (22.0, 12.0));
    assert_abs_diff_eq!(d.z, 7.6, epsilon = 0.1);
}

#[test]
fn test_equal_profile_maxima_emit_one_detection_each() {
    let mut focus = Array3::<f32>::zeros((17, 17, 11));
    focus[[8, 8, 3]] = 1.0;
    focus[[8, 8, 7]] = 1.0;
    let reconstruction = Array3::from_shape_fn((17, 17, 11), |(_, _, k)| k as f32);

    let detections = localize(reconstruction.view(), focus.view(), 2, &config(2, 0)).unwrap();
    assert_eq!(detections.len(), 2);
    assert_abs_diff_eq!(detections[0].z, 3.0, epsilon = 1e-6);
    assert_abs_diff_eq!(detections[1].z, 7.0, epsilon = 1e-6);
    assert_eq!(detections[0].reconstruction_value, 3.0);
    assert_eq!(detections[1].reconstruction_value, 7.0);
    assert!(detections.iter().all(|d| (d.x, d.y) == (8.0, 8.0)));
}

#[test]
fn test_shallow_volume_keeps_coarse_depth() {
    let volume = common::gaussian_volume((16, 16, 3), (8, 8), 1.0, 1.5, 1.0);
    let detections = localize(volume.view(), volume.view(), 0, &config(2, 1)).unwrap();
    assert_eq!(detections.len(), 1);
    assert!(!detections[0].refined);
    assert_eq!(detections[0].z, 1.0);
}

#[test]
fn test_empty_volume_gives_no_detections() {
    let volume = Array3::<f32>::zeros((16, 16, 8));
    let detections = localize(volume.view(), volume.view(), 0, &config(2, 1)).unwrap();
    assert!(detections.is_empty());
}

#[test]
fn test_focus_threshold_suppresses_weak_peaks() {
    let mut volume = common::gaussian_volume((32, 32, 9), (10, 10), 4.0, 1.5, 1.5);
    let strong = common::gaussian_volume((32, 32, 9), (22, 22), 4.0, 1.5, 1.5);
    volume.zip_mut_with(&strong, |a, &b| *a = 0.3 * *a + b);

    let mut cfg = config(3, 1);
    assert_eq!(localize(volume.view(), volume.view(), 0, &cfg).unwrap().len(), 2);

    cfg.focus_threshold = Some(0.5);
    let detections = localize(volume.view(), volume.view(), 0, &cfg).unwrap();
    assert_eq!(detections.len(), 1);
    assert_eq!((detections[0].x, detections[0].y), (22.0, 22.0));
}

#[test]
fn test_window_truncated_at_border_still_detects() {
    let volume = common::gaussian_volume((16, 16, 9), (3, 8), 4.0, 1.0, 1.5);
    let detections = localize(volume.view(), volume.view(), 0, &config(3, 5)).unwrap();
    assert_eq!(detections.len(), 1);
    assert_abs_diff_eq!(detections[0].z, 4.0, epsilon = 0.1);
}

#[test]
fn test_mismatched_volumes_are_error() {
    let a = Array3::<f32>::zeros((8, 8, 4));
    let b = Array3::<f32>::zeros((8, 9, 4));
    let err = localize(a.view(), b.view(), 0, &config(2, 1)).unwrap_err();
    assert!(matches!(err, HoloError::InvalidVolumeShape { .. }));
}

#[test]
fn test_depth_mismatch_reports_both_volumes() {
    let reconstruction = Array3::<f32>::zeros((8, 8, 4));
    let focus = Array3::<f32>::zeros((8, 8, 5));
    let err = localize(reconstruction.view(), focus.view(), 0, &config(2, 1)).unwrap_err();
    match err {
        HoloError::InvalidVolumeShape { shape, reason } => {
            assert_eq!(shape, vec![8, 8, 5]);
            assert!(reason.contains("[8, 8, 4]"), "{reason}");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_physical_units_conversion() {
    let volume = common::gaussian_volume((32, 32, 21), (16, 16), 10.0, 2.0, 3.0);
    let d = localize(volume.view(), volume.view(), 0, &config(3, 1)).unwrap()[0];
    let optics = OpticsConfig::default();
    let p = d.to_physical(&optics);
    assert_abs_diff_eq!(p.x, 16.0 / optics.sampling_frequency, epsilon = 1e-9);
    assert_abs_diff_eq!(p.z, d.z * optics.step_size, epsilon = 1e-9);
}

#[test]
fn test_neighborhood_from_magnification() {
    assert_eq!(LocalizerConfig::from_magnification(10.0).neighborhood_size, 1);
    assert_eq!(LocalizerConfig::from_magnification(20.0).neighborhood_size, 2);
    assert_eq!(LocalizerConfig::from_magnification(40.0).neighborhood_size, 4);
}
