//! Adaptive binarization
//!
//! The page is thresholded against its own mean luma: anything more than
//! [`THRESHOLD_OFFSET`] below the mean is ink. Dark text on a light
//! background therefore survives moderate changes in overall brightness.

use glyphscan_core::BitGrid;
use image::{Rgba, RgbaImage};

use crate::colorspace::luma_plane;
use crate::error::ColorResult;

/// Distance below the mean luma at which a pixel turns black
pub const THRESHOLD_OFFSET: f64 = 90.0;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Threshold used for a luma plane: `mean - THRESHOLD_OFFSET`
pub fn compute_adaptive_threshold(luma: &[f64]) -> f64 {
    if luma.is_empty() {
        return 0.0;
    }
    let mean = luma.iter().sum::<f64>() / luma.len() as f64;
    mean - THRESHOLD_OFFSET
}

/// Binarize an RGBA image
///
/// Pixels whose luma is above the adaptive threshold become opaque white,
/// the rest opaque black. The output has the input's dimensions.
///
/// # Arguments
///
/// * `image` - Source image
/// * `contrast` - Contrast adjustment in `[-255, 255]` applied before thresholding
///
/// # Errors
///
/// Returns an error if `contrast` is out of range.
pub fn binarize(image: &RgbaImage, contrast: i32) -> ColorResult<RgbaImage> {
    let luma = luma_plane(image, contrast)?;
    let threshold = compute_adaptive_threshold(&luma);
    log::trace!(
        "binarize {}x{}: threshold {:.1}",
        image.width(),
        image.height(),
        threshold
    );

    let mut out = RgbaImage::new(image.width(), image.height());
    for (pixel, &value) in out.pixels_mut().zip(&luma) {
        *pixel = if value > threshold { WHITE } else { BLACK };
    }
    Ok(out)
}

/// Convert a binarized image to a grid with black pixels set
///
/// Any pixel whose red channel is below 128 counts as black.
pub fn to_bit_grid(binary: &RgbaImage) -> BitGrid {
    let mut grid = BitGrid::new(binary.width(), binary.height());
    for (x, y, &Rgba([r, _, _, _])) in binary.enumerate_pixels() {
        if r < 128 {
            grid.set_unchecked(x, y, true);
        }
    }
    grid
}

/// Binarize straight to a grid, skipping the intermediate RGBA image
///
/// Equivalent to `to_bit_grid(&binarize(image, contrast)?)`.
///
/// # Errors
///
/// Returns an error if `contrast` is out of range.
pub fn binarize_to_grid(image: &RgbaImage, contrast: i32) -> ColorResult<BitGrid> {
    let luma = luma_plane(image, contrast)?;
    let threshold = compute_adaptive_threshold(&luma);
    let mut grid = BitGrid::new(image.width(), image.height());
    let cols = image.width() as usize;
    for (i, &value) in luma.iter().enumerate() {
        if value <= threshold {
            grid.set_unchecked((i % cols) as u32, (i / cols) as u32, true);
        }
    }
    Ok(grid)
}
