mod common;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use holotrack_core::background::{estimate_background, spaced_indices, BackgroundImage};
use holotrack_core::error::HoloError;
use holotrack_core::frame::Frame;

// ---------------------------------------------------------------------------
// spaced_indices
// ---------------------------------------------------------------------------

#[test]
fn test_spaced_indices_even_spread() {
    assert_eq!(spaced_indices(10, 4), vec![0, 3, 6, 9]);
    assert_eq!(spaced_indices(5, 3), vec![0, 2, 4]);
}

#[test]
fn test_spaced_indices_ties_round_to_even() {
    // linspace(0, 3, 3) = [0, 1.5, 3]
    assert_eq!(spaced_indices(4, 3), vec![0, 2, 3]);
    // linspace(0, 5, 3) = [0, 2.5, 5]
    assert_eq!(spaced_indices(6, 3), vec![0, 2, 5]);
}

#[test]
fn test_spaced_indices_more_samples_than_frames_repeats() {
    assert_eq!(spaced_indices(2, 4), vec![0, 0, 1, 1]);
}

#[test]
fn test_spaced_indices_single_sample() {
    assert_eq!(spaced_indices(7, 1), vec![0]);
}

// ---------------------------------------------------------------------------
// estimate_background
// ---------------------------------------------------------------------------

#[test]
fn test_constant_frames_give_constant_background() {
    let frames = common::constant_frames(12, 8, 10, 0.4);
    let bg = estimate_background(&frames, 5).unwrap();
    assert_eq!(bg.dim(), (8, 10));
    for &v in bg.data().iter() {
        assert_abs_diff_eq!(v, 0.4, epsilon = 1e-6);
    }
}

#[test]
fn test_background_is_per_pixel_median() {
    let values = [0.1f32, 0.5, 0.3];
    let frames: Vec<Frame> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| Frame::new(Array2::from_elem((4, 4), v), i, 0.0))
        .collect();
    let bg = estimate_background(&frames, 3).unwrap();
    for &v in bg.data().iter() {
        assert_abs_diff_eq!(v, 0.3, epsilon = 1e-6);
    }
}

#[test]
fn test_even_sample_count_averages_middle_values() {
    let values = [0.2f32, 0.4, 0.6, 0.8];
    let frames: Vec<Frame> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| Frame::new(Array2::from_elem((3, 3), v), i, 0.0))
        .collect();
    let bg = estimate_background(&frames, 4).unwrap();
    for &v in bg.data().iter() {
        assert_abs_diff_eq!(v, 0.5, epsilon = 1e-6);
    }
}

#[test]
fn test_large_frames_use_parallel_path() {
    let frames = common::constant_frames(3, 300, 300, 0.25);
    let bg = estimate_background(&frames, 3).unwrap();
    for &v in bg.data().iter() {
        assert_abs_diff_eq!(v, 0.25, epsilon = 1e-6);
    }
}

#[test]
fn test_zero_pixels_replaced_by_mean() {
    let mut data = Array2::from_elem((2, 2), 0.8f32);
    data[[0, 0]] = 0.0;
    let frames = vec![Frame::new(data, 0, 0.0)];
    let bg = estimate_background(&frames, 1).unwrap();
    // mean of [0, 0.8, 0.8, 0.8]
    assert_abs_diff_eq!(bg.data()[[0, 0]], 0.6, epsilon = 1e-6);
    assert!(bg.data().iter().all(|&v| v > 0.0));
}

#[test]
fn test_empty_sequence_is_error() {
    let err = estimate_background(&[], 5).unwrap_err();
    assert!(matches!(err, HoloError::EmptySequence));
}

#[test]
fn test_zero_samples_is_error() {
    let frames = common::constant_frames(3, 4, 4, 0.5);
    let err = estimate_background(&frames, 0).unwrap_err();
    assert!(matches!(err, HoloError::InvalidConfig(_)));
}

#[test]
fn test_mismatched_frames_are_error() {
    let frames = vec![
        Frame::new(Array2::from_elem((4, 4), 0.5), 0, 0.0),
        Frame::new(Array2::from_elem((4, 5), 0.5), 1, 0.1),
    ];
    let err = estimate_background(&frames, 2).unwrap_err();
    assert!(matches!(
        err,
        HoloError::ShapeMismatch {
            expected: (4, 4),
            actual: (4, 5)
        }
    ));
}

// ---------------------------------------------------------------------------
// BackgroundImage
// ---------------------------------------------------------------------------

#[test]
fn test_all_zero_background_is_rejected() {
    let err = BackgroundImage::new(Array2::zeros((3, 3))).unwrap_err();
    assert!(matches!(err, HoloError::InvalidBackground(_)));
}

#[test]
fn test_negative_background_is_rejected() {
    let mut data = Array2::from_elem((3, 3), 0.5f32);
    data[[1, 1]] = -0.1;
    assert!(BackgroundImage::new(data).is_err());
}

#[test]
fn test_empty_background_is_rejected() {
    assert!(BackgroundImage::new(Array2::zeros((0, 4))).is_err());
}
