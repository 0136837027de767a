//! glyphscan-recog - Segmentation, matching and correction
//!
//! This crate turns a binarized page into text:
//!
//! - **Band assembly**: Cut regions into lines and glyph artifacts
//! - **Character splitting**: Separate touching glyphs at histogram valleys
//! - **Template matching**: Score artifacts against the template catalog
//! - **Correction**: Fix look-alike characters, dictionary words and casing
//!
//! # Quick Start
//!
//! ```no_run
//! use glyphscan_core::{BitGrid, Rect};
//! use glyphscan_recog::{
//!     CharacterDefinitions, MatchOptions, SegmentOptions, apply_correction,
//!     get_bands_of_artifacts, recognize_bands,
//! };
//!
//! let page = BitGrid::new(200, 50);
//! let regions = vec![Rect::new_unchecked(0, 0, 200, 50)];
//! let catalog = CharacterDefinitions::bundled().unwrap();
//!
//! let mut bands = get_bands_of_artifacts(&page, &regions, &SegmentOptions::default()).unwrap();
//! recognize_bands(&mut bands, &catalog, &MatchOptions::default()).unwrap();
//! let text = apply_correction(&bands.text(), None);
//! ```
//!
//! # Modules
//!
//! - [`segment`]: Band assembly
//! - [`splitter`]: Character splitting
//! - [`catalog`]: Template catalog loading
//! - [`charset`]: Allowed character sets
//! - [`matcher`]: Template matching
//! - [`correction`]: Text correction

pub mod catalog;
pub mod charset;
pub mod correction;
mod error;
pub mod matcher;
pub mod segment;
pub mod splitter;

pub use error::{RecogError, RecogResult};

// Re-export commonly used types
pub use catalog::{CharacterDefinition, CharacterDefinitions, CharacterTraits, TemplateSize};
pub use charset::AllowedCharacters;
pub use correction::{Dictionary, apply_correction, levenshtein};
pub use matcher::{LineBox, MatchOptions, ScoreMatch, match_artifact, recognize_bands};
pub use segment::{SegmentOptions, get_bands_of_artifacts};
pub use splitter::{SplitOptions, calculate_valley_threshold, split_wide_artifacts};

// Re-export core for convenience
pub use glyphscan_core;
