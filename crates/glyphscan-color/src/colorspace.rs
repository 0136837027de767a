//! Grayscale conversion and contrast adjustment

use image::{Rgba, RgbaImage};

use crate::error::{ColorError, ColorResult};

/// Largest magnitude accepted for a contrast adjustment
pub const MAX_CONTRAST: i32 = 255;

/// ITU-R BT.601 luma of an RGB triple, in `[0, 255]`
#[inline]
pub fn rgb_to_luma(r: u8, g: u8, b: u8) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Multiplicative factor for a contrast adjustment in `[-255, 255]`
///
/// `259 * (c + 255) / (255 * (259 - c))`; 0 gives a factor of 1.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] if `contrast` is out of range.
pub fn contrast_factor(contrast: i32) -> ColorResult<f64> {
    if !(-MAX_CONTRAST..=MAX_CONTRAST).contains(&contrast) {
        return Err(ColorError::InvalidParameters(format!(
            "contrast must be in [-{MAX_CONTRAST}, {MAX_CONTRAST}], got {contrast}"
        )));
    }
    let c = contrast as f64;
    Ok(259.0 * (c + 255.0) / (255.0 * (259.0 - c)))
}

/// Stretch `value` around the midpoint 128 and clamp to `[0, 255]`
#[inline]
pub fn apply_contrast(value: f64, factor: f64) -> f64 {
    (factor * (value - 128.0) + 128.0).clamp(0.0, 255.0)
}

/// Per-pixel luma of an RGBA image after contrast adjustment, row-major
///
/// Alpha is ignored.
///
/// # Errors
///
/// Returns [`ColorError::InvalidParameters`] if `contrast` is out of range.
pub fn luma_plane(image: &RgbaImage, contrast: i32) -> ColorResult<Vec<f64>> {
    let factor = contrast_factor(contrast)?;
    Ok(image
        .pixels()
        .map(|&Rgba([r, g, b, _])| apply_contrast(rgb_to_luma(r, g, b), factor))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_weights() {
        assert_eq!(rgb_to_luma(0, 0, 0), 0.0);
        assert!((rgb_to_luma(255, 255, 255) - 255.0).abs() < 1e-9);
        assert!((rgb_to_luma(255, 0, 0) - 76.245).abs() < 1e-9);
    }

    #[test]
    fn test_contrast_factor() {
        assert!((contrast_factor(0).unwrap() - 1.0).abs() < 1e-12);
        assert!(contrast_factor(100).unwrap() > 1.0);
        assert!(contrast_factor(-100).unwrap() < 1.0);
        assert!(contrast_factor(-255).unwrap().abs() < 1e-12);
        assert!(contrast_factor(256).is_err());
        assert!(contrast_factor(-256).is_err());
    }

    #[test]
    fn test_apply_contrast_clamps() {
        assert_eq!(apply_contrast(250.0, 4.0), 255.0);
        assert_eq!(apply_contrast(10.0, 4.0), 0.0);
        assert_eq!(apply_contrast(128.0, 4.0), 128.0);
    }
}
