//! glyphscan - Template-matching text recognition
//!
//! glyphscan reads text from clean, digitally rendered images by comparing
//! each glyph with handcrafted per-font templates. No training data, no
//! network and no external OCR engine are involved.
//!
//! # Overview
//!
//! A recognition call runs these stages:
//!
//! - Binarization with an adaptive threshold
//! - Dilation and connected-component region finding
//! - Line and glyph segmentation, with touching glyphs split apart
//! - Template matching against the catalog
//! - Correction of look-alike characters, dictionary words and casing
//!
//! # Example
//!
//! ```no_run
//! use glyphscan::{Configuration, Engine, Preset};
//!
//! let engine = Engine::new(Configuration::preset(Preset::Accurate)).unwrap();
//! let page = image::RgbaImage::new(640, 120);
//! let result = engine.recognize(&page).unwrap();
//! println!("{} ({} characters in {:?})", result.text, result.matched_characters, result.elapsed);
//! ```

pub mod config;
pub mod engine;
mod error;

pub use config::{Configuration, ConfigurationBuilder, Dilation, Preset};
pub use engine::{Engine, PipelineState, Recognition};
pub use error::{ConfigError, Error, Result};

// Re-export core types (primary data structures used everywhere)
pub use glyphscan_core::{Anchor, Artifact, Band, Bands, BitGrid, GlyphMatch, Point, Rect};

// Re-export layer crates as modules to avoid name conflicts
pub use glyphscan_color as color;
pub use glyphscan_morph as morph;
pub use glyphscan_recog as recog;
pub use glyphscan_region as region;
