//! glyphscan core - basic data structures for template-matching recognition
//!
//! This crate provides the data structures shared by every stage of the
//! recognizer:
//!
//! - [`Point`] / [`Rect`] - Integer geometry in image space
//! - [`BitGrid`] - Packed binary grid (page, artifact and template bitmaps)
//! - [`Artifact`] - A grid with its source rectangle and optional match
//! - [`Band`] / [`Bands`] - Lines of artifacts, top to bottom

pub mod artifact;
pub mod band;
pub mod error;
pub mod geom;
pub mod grid;

pub use artifact::{Artifact, GlyphMatch};
pub use band::{Band, Bands};
pub use error::{Error, Result};
pub use geom::{Point, Rect};
pub use grid::{Anchor, BitGrid};
