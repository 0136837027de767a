//! glyphscan color - page preprocessing
//!
//! Converts an RGBA page into the binary grid the rest of the pipeline
//! works on:
//!
//! - **Color space** ([`colorspace`]): luma, contrast adjustment
//! - **Thresholding** ([`threshold`]): mean-relative adaptive binarization

pub mod colorspace;
pub mod error;
pub mod threshold;

pub use glyphscan_core;

pub use error::{ColorError, ColorResult};

pub use colorspace::{MAX_CONTRAST, apply_contrast, contrast_factor, luma_plane, rgb_to_luma};
pub use threshold::{
    THRESHOLD_OFFSET, binarize, binarize_to_grid, compute_adaptive_threshold, to_bit_grid,
};
