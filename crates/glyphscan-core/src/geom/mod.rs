//! Geometry primitives
//!
//! Integer points and axis-aligned rectangles used to describe where
//! regions, artifacts and bands sit in the source image.

mod point;
mod rect;

pub use point::Point;
pub use rect::Rect;
