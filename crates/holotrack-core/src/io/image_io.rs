use std::path::Path;

use image::{GrayImage, ImageBuffer, ImageFormat, Luma};
use ndarray::Array2;
use rayon::prelude::*;
use tracing::info;

use crate::error::{HoloError, Result};
use crate::frame::Frame;

/// Rescale an array to `[0, 1]` using its own range. Flat arrays map to 0.
pub fn normalize_to_unit(data: &Array2<f32>) -> Array2<f32> {
    let (lo, hi) = data
        .iter()
        .filter(|v| v.is_finite())
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return Array2::zeros(data.dim());
    }
    data.mapv(|v| ((v - lo) / span).clamp(0.0, 1.0))
}

/// Save an array as 16-bit grayscale TIFF, normalized to its range.
pub fn save_tiff(data: &Array2<f32>, path: &Path) -> Result<()> {
    write_tiff16(&normalize_to_unit(data), path)
}

/// Save an array as 16-bit grayscale TIFF without rescaling.
///
/// Values are clamped to `[0, 1]`, the scale [`load_image`] produces, so a
/// saved background loads back unchanged up to quantization.
pub fn save_unit_tiff(data: &Array2<f32>, path: &Path) -> Result<()> {
    write_tiff16(&data.mapv(|v| v.clamp(0.0, 1.0)), path)
}

fn write_tiff16(unit: &Array2<f32>, path: &Path) -> Result<()> {
    let (h, w) = unit.dim();
    let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_fn(w as u32, h as u32, |x, y| {
        Luma([(unit[[y as usize, x as usize]] * 65535.0).round() as u16])
    });
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save an array as 8-bit grayscale PNG, normalized to its range.
pub fn save_png(data: &Array2<f32>, path: &Path) -> Result<()> {
    let unit = normalize_to_unit(data);
    let (h, w) = unit.dim();
    let img = GrayImage::from_fn(w as u32, h as u32, |x, y| {
        Luma([(unit[[y as usize, x as usize]] * 255.0) as u8])
    });
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save an array, choosing format from file extension (TIFF by default).
pub fn save_image(data: &Array2<f32>, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => save_png(data, path),
        _ => save_tiff(data, path),
    }
}

/// Load a grayscale image file into a frame with index 0.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let data = Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
        gray.get_pixel(col as u32, row as u32).0[0] as f32 / 65535.0
    });
    Ok(Frame::new(data, 0, 0.0))
}

/// Load an ordered image sequence; frame `i` is stamped `i / fps` seconds.
///
/// All images must share the first image's dimensions.
pub fn load_frame_sequence<P: AsRef<Path> + Sync>(paths: &[P], fps: f64) -> Result<Vec<Frame>> {
    if paths.is_empty() {
        return Err(HoloError::EmptySequence);
    }

    let frames = paths
        .par_iter()
        .enumerate()
        .map(|(i, p)| load_image(p.as_ref()).map(|f| Frame::at_rate(f.data, i, fps)))
        .collect::<Result<Vec<Frame>>>()?;

    let expected = frames[0].data.dim();
    if let Some(bad) = frames.iter().find(|f| f.data.dim() != expected) {
        return Err(HoloError::ShapeMismatch {
            expected,
            actual: bad.data.dim(),
        });
    }

    info!(
        count = frames.len(),
        width = expected.1,
        height = expected.0,
        "Loaded frame sequence"
    );
    Ok(frames)
}
