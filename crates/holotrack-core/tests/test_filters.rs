use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ndarray::Array2;

use holotrack_core::filters::{bandpass_filter, bandpass_mask, median_filter, BandpassCache};

// ---------------------------------------------------------------------------
// bandpass_mask
// ---------------------------------------------------------------------------

#[test]
fn test_bandpass_mask_zero_at_dc() {
    let mask = bandpass_mask(16, 20, 2.0, 30.0);
    assert_eq!(mask.dim(), (16, 20));
    assert_abs_diff_eq!(mask[[8, 10]], 0.0, epsilon = 1e-12);
}

#[test]
fn test_bandpass_mask_symmetric_under_half_turn() {
    for &(h, w) in &[(16usize, 20usize), (32, 32), (12, 18)] {
        let mask = bandpass_mask(h, w, 2.0, 30.0);
        let (ci, cj) = ((h / 2) as isize, (w / 2) as isize);
        for i in 0..h as isize {
            for j in 0..w as isize {
                let (mi, mj) = (2 * ci - i, 2 * cj - j);
                if mi < 0 || mj < 0 || mi >= h as isize || mj >= w as isize {
                    continue;
                }
                let a = mask[[i as usize, j as usize]];
                let b = mask[[mi as usize, mj as usize]];
                assert_abs_diff_eq!(a, b, epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_bandpass_mask_bounded() {
    let mask = bandpass_mask(32, 32, 2.0, 30.0);
    // exp(-a r^2) - exp(-b r^2) with a < b lies in [0, 1).
    assert!(mask.iter().all(|&v| (0.0..1.0).contains(&v)));
}

#[test]
fn test_bandpass_filter_removes_constant_offset() {
    let data = Array2::from_elem((16, 16), 3.0f32);
    let filtered = bandpass_filter(&data, 2.0, 30.0);
    for &v in filtered.iter() {
        assert_abs_diff_eq!(v, 0.0, epsilon = 1e-4);
    }
}

// ---------------------------------------------------------------------------
// BandpassCache
// ---------------------------------------------------------------------------

#[test]
fn test_cache_reuses_masks() {
    let cache = BandpassCache::new();
    assert!(cache.is_empty());
    let a = cache.get(16, 16, 2.0, 30.0);
    let b = cache.get(16, 16, 2.0, 30.0);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(cache.len(), 1);

    let _ = cache.get(16, 16, 3.0, 30.0);
    let _ = cache.get(8, 16, 2.0, 30.0);
    assert_eq!(cache.len(), 3);
}

#[test]
fn test_cached_mask_matches_direct() {
    let cache = BandpassCache::new();
    let cached = cache.get(10, 14, 2.0, 5.0);
    assert_eq!(*cached, bandpass_mask(10, 14, 2.0, 5.0));
}

// ---------------------------------------------------------------------------
// median_filter
// ---------------------------------------------------------------------------

#[test]
fn test_median_size_one_is_identity() {
    let data = Array2::from_shape_fn((5, 7), |(r, c)| (r * 7 + c) as f32);
    assert_eq!(median_filter(&data, 1), data);
    assert_eq!(median_filter(&data, 0), data);
}

#[test]
fn test_median_removes_isolated_spike() {
    let mut data = Array2::from_elem((9, 9), 0.5f32);
    data[[4, 4]] = 1.0;
    let filtered = median_filter(&data, 3);
    for &v in filtered.iter() {
        assert_abs_diff_eq!(v, 0.5, epsilon = 1e-6);
    }
}

#[test]
fn test_median_clamps_borders() {
    let mut data = Array2::from_elem((6, 6), 0.5f32);
    data[[0, 0]] = 1.0;
    // The clamped corner window holds the spike 4 times out of 9.
    let filtered = median_filter(&data, 3);
    assert_abs_diff_eq!(filtered[[0, 0]], 0.5, epsilon = 1e-6);
}

#[test]
fn test_median_preserves_constant_large_image() {
    let data = Array2::from_elem((300, 300), 0.7f32);
    let filtered = median_filter(&data, 3);
    for &v in filtered.iter() {
        assert_abs_diff_eq!(v, 0.7, epsilon = 1e-6);
    }
}
