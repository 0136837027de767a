//! Artifact - one candidate glyph cut out of the page
//!
//! An artifact pairs a [`BitGrid`] with the rectangle it occupies in the
//! source image. The grid's dimensions always equal the rectangle's
//! dimensions. A 0x0 artifact is a space placeholder inserted between
//! words.
//!
//! Artifacts are built during segmentation, reshaped by merge, trim, pad
//! and column slicing, and finally frozen when the matcher assigns a
//! character. Every mutating operation fails once a match is recorded.

use crate::error::{Error, Result};
use crate::geom::{Point, Rect};
use crate::grid::{Anchor, BitGrid};

/// The character assigned to an artifact by the matcher
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMatch {
    /// Recognized character
    pub character: char,
    /// Font of the best-scoring template variant, if any template was used
    pub font: Option<String>,
    /// Aggregate score in `[0, 1]`
    pub score: f64,
}

/// A bit-grid with its position in the source image
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Artifact {
    grid: BitGrid,
    bounds: Rect,
    matched: Option<GlyphMatch>,
}

impl Artifact {
    /// Create an artifact whose grid starts at `origin` in image space
    pub fn new(grid: BitGrid, origin: Point) -> Self {
        let bounds = Rect::new_unchecked(
            origin.x,
            origin.y,
            grid.cols() as i32,
            grid.rows() as i32,
        );
        Self {
            grid,
            bounds,
            matched: None,
        }
    }

    /// Cut the window `rect` out of `source`
    pub fn from_region(source: &BitGrid, rect: &Rect) -> Self {
        Self::new(source.crop(rect), rect.origin())
    }

    /// Create a space placeholder at `origin`
    pub fn space(origin: Point) -> Self {
        Self::new(BitGrid::new(0, 0), origin)
    }

    /// The artifact's cells
    #[inline]
    pub fn grid(&self) -> &BitGrid {
        &self.grid
    }

    /// Position and size in the source image
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Recorded match, if the matcher has processed this artifact
    #[inline]
    pub fn matched(&self) -> Option<&GlyphMatch> {
        self.matched.as_ref()
    }

    /// Check if a character has been assigned
    #[inline]
    pub fn is_matched(&self) -> bool {
        self.matched.is_some()
    }

    /// Check if this is a space placeholder (0x0 grid)
    #[inline]
    pub fn is_space(&self) -> bool {
        self.grid.is_empty()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.w
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.h
    }

    fn ensure_unmatched(&self) -> Result<()> {
        match &self.matched {
            Some(m) => Err(Error::ArtifactMatched(m.character)),
            None => Ok(()),
        }
    }

    /// Record the matched character
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArtifactMatched`] if a character was already assigned.
    pub fn assign(&mut self, glyph: GlyphMatch) -> Result<()> {
        self.ensure_unmatched()?;
        self.matched = Some(glyph);
        Ok(())
    }

    /// Bitwise-OR `other` into this artifact over the union of both bounds
    ///
    /// Merging a space placeholder is a no-op. The resulting bounds do not
    /// depend on the order of the operands.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArtifactMatched`] if this artifact is frozen.
    pub fn merge(&mut self, other: &Artifact) -> Result<()> {
        self.ensure_unmatched()?;
        if other.is_space() {
            return Ok(());
        }
        if self.is_space() {
            self.grid = other.grid.clone();
            self.bounds = other.bounds;
            return Ok(());
        }

        let union = self.bounds.union(&other.bounds);
        let mut grid = BitGrid::new(union.w as u32, union.h as u32);
        grid.or_at(&self.grid, self.bounds.x - union.x, self.bounds.y - union.y);
        grid.or_at(
            &other.grid,
            other.bounds.x - union.x,
            other.bounds.y - union.y,
        );
        self.grid = grid;
        self.bounds = union;
        Ok(())
    }

    /// Shrink to the tight bounding box of the set cells
    ///
    /// An artifact with no set cells becomes a 0x0 grid at its current
    /// origin. Trimming twice is the same as trimming once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArtifactMatched`] if this artifact is frozen.
    pub fn trim(&mut self) -> Result<()> {
        self.ensure_unmatched()?;
        match self.grid.tight_bounds() {
            Some(tight) => {
                if tight.w as u32 != self.grid.cols() || tight.h as u32 != self.grid.rows() {
                    self.grid = self.grid.crop(&tight);
                    self.bounds = tight.translate(self.bounds.x, self.bounds.y);
                }
            }
            None => {
                self.grid = BitGrid::new(0, 0);
                self.bounds = Rect::new_unchecked(self.bounds.x, self.bounds.y, 0, 0);
            }
        }
        Ok(())
    }

    /// Surround with `amount` unset cells on every side
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArtifactMatched`] if this artifact is frozen.
    pub fn pad(&mut self, amount: u32) -> Result<()> {
        self.ensure_unmatched()?;
        self.grid = self.grid.padded(amount);
        self.bounds = self.bounds.expand(amount as i32);
        Ok(())
    }

    /// Copy out the columns `start..end` (artifact-local) as a new artifact
    ///
    /// The slice keeps the full height; the range is clamped to the grid.
    pub fn column_slice(&self, start: u32, end: u32) -> Artifact {
        let end = end.min(self.grid.cols());
        let start = start.min(end);
        let window = Rect::new_unchecked(
            start as i32,
            0,
            (end - start) as i32,
            self.grid.rows() as i32,
        );
        Artifact::new(
            self.grid.crop(&window),
            Point::new(self.bounds.x + start as i32, self.bounds.y),
        )
    }

    /// Resample onto a `cols` x `rows` canvas
    ///
    /// The set cells are trimmed, scaled with their aspect ratio preserved
    /// and centered. A space or blank artifact gives a blank canvas.
    pub fn normalize(&self, cols: u32, rows: u32) -> BitGrid {
        match self.grid.tight_bounds() {
            Some(tight) => self.grid.crop(&tight).fit(cols, rows, Anchor::Center),
            None => BitGrid::new(cols, rows),
        }
    }

    /// Resample relative to the text line the artifact sits on
    ///
    /// Only the columns are trimmed; the rows span `line_top..line_bottom`
    /// in image coordinates so a glyph keeps its height and position
    /// within the line. The result is bottom-anchored on the canvas. Used
    /// for punctuation, whose shape alone is ambiguous (`,` vs `'`).
    pub fn normalize_in_line(
        &self,
        line_top: i32,
        line_bottom: i32,
        cols: u32,
        rows: u32,
    ) -> BitGrid {
        if line_bottom <= line_top {
            return self.normalize(cols, rows);
        }
        let Some(tight) = self.grid.tight_bounds() else {
            return BitGrid::new(cols, rows);
        };
        let window = Rect::new_unchecked(
            tight.x,
            line_top - self.bounds.y,
            tight.w,
            line_bottom - line_top,
        );
        self.grid.crop(&window).fit(cols, rows, Anchor::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(rows: &[&str], x: i32, y: i32) -> Artifact {
        Artifact::new(BitGrid::from_rows(rows).unwrap(), Point::new(x, y))
    }

    #[test]
    fn test_bounds_match_grid() {
        let a = artifact(&["##.", "..#"], 4, 7);
        assert_eq!(a.bounds(), Rect::new_unchecked(4, 7, 3, 2));
        assert!(!a.is_space());
        assert!(Artifact::space(Point::new(1, 1)).is_space());
    }

    #[test]
    fn test_merge_is_order_independent() {
        let a = artifact(&["#"], 0, 0);
        let b = artifact(&["##"], 3, 2);

        let mut ab = a.clone();
        ab.merge(&b).unwrap();
        let mut ba = b.clone();
        ba.merge(&a).unwrap();

        assert_eq!(ab.bounds(), Rect::new_unchecked(0, 0, 5, 3));
        assert_eq!(ab.bounds(), ba.bounds());
        assert_eq!(ab.grid(), ba.grid());
        assert_eq!(ab.grid().to_rows(), vec!["#....", ".....", "...##"]);
    }

    #[test]
    fn test_merge_with_space_is_noop() {
        let a = artifact(&["#.", ".#"], 2, 2);
        let mut merged = a.clone();
        merged.merge(&Artifact::space(Point::new(50, 50))).unwrap();
        assert_eq!(merged, a);

        let mut space = Artifact::space(Point::new(0, 0));
        space.merge(&a).unwrap();
        assert_eq!(space.bounds(), a.bounds());
        assert_eq!(space.grid(), a.grid());
    }

    #[test]
    fn test_trim_idempotent() {
        let mut a = artifact(&["....", ".##.", "...."], 10, 10);
        a.trim().unwrap();
        assert_eq!(a.bounds(), Rect::new_unchecked(11, 11, 2, 1));
        let once = a.clone();
        a.trim().unwrap();
        assert_eq!(a, once);
    }

    #[test]
    fn test_trim_blank_gives_empty() {
        let mut a = artifact(&["...", "..."], 3, 4);
        a.trim().unwrap();
        assert_eq!((a.grid().cols(), a.grid().rows()), (0, 0));
        assert!(a.is_space());
        assert_eq!(a.bounds().origin(), Point::new(3, 4));
    }

    #[test]
    fn test_pad() {
        let mut a = artifact(&["#"], 5, 5);
        a.pad(2).unwrap();
        assert_eq!(a.bounds(), Rect::new_unchecked(3, 3, 5, 5));
        assert_eq!(a.grid().count_ones(), 1);
        assert!(a.grid().get(2, 2).unwrap());
    }

    #[test]
    fn test_frozen_after_assign() {
        let mut a = artifact(&["#"], 0, 0);
        let glyph = GlyphMatch {
            character: 'x',
            font: None,
            score: 0.9,
        };
        a.assign(glyph.clone()).unwrap();
        assert!(a.is_matched());
        assert!(a.trim().is_err());
        assert!(a.pad(1).is_err());
        assert!(a.merge(&artifact(&["#"], 1, 0)).is_err());
        assert!(a.assign(glyph).is_err());
    }

    #[test]
    fn test_normalize_dimensions() {
        for rows in [&["#"][..], &["#....", "....#"][..], &["..."][..]] {
            let a = artifact(rows, 0, 0);
            let n = a.normalize(20, 28);
            assert_eq!((n.cols(), n.rows()), (20, 28));
        }
        let n = Artifact::space(Point::new(0, 0)).normalize(7, 3);
        assert_eq!((n.cols(), n.rows()), (7, 3));
        assert!(n.is_blank());
    }

    #[test]
    fn test_normalize_in_line_keeps_position() {
        // A dot at the top of a 4-row line and one at the bottom
        let high = artifact(&["#"], 0, 10);
        let low = artifact(&["#"], 0, 13);
        let h = high.normalize_in_line(10, 14, 4, 4);
        let l = low.normalize_in_line(10, 14, 4, 4);
        assert_eq!((h.cols(), h.rows()), (4, 4));
        assert_ne!(h, l);
        assert!(l.get(1, 3).unwrap());
        assert!(h.get(1, 0).unwrap());
    }

    #[test]
    fn test_column_slice() {
        let a = artifact(&["#.#", "#.#"], 10, 0);
        let right = a.column_slice(2, 3);
        assert_eq!(right.bounds(), Rect::new_unchecked(12, 0, 1, 2));
        assert_eq!(right.grid().count_ones(), 2);
        let clamped = a.column_slice(2, 10);
        assert_eq!(clamped.width(), 1);
    }
}
