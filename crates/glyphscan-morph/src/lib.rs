//! glyphscan morph - binary morphology
//!
//! Square-kernel dilation and erosion over [`BitGrid`]s. Dilation glues
//! the glyphs of a word or line together so the region finder sees one
//! blob per block of text; closing repairs broken strokes.
//!
//! [`BitGrid`]: glyphscan_core::BitGrid

pub mod binary;
mod error;

pub use error::{MorphError, MorphResult};

pub use binary::{
    DEFAULT_KERNEL_RATIO, close, default_kernel_size, dilate, erode, kernel_offsets,
};
