//! Grid similarity
//!
//! The matcher scores an artifact against a template by the fraction of
//! cells on which the two grids agree (XNOR), computed a word at a time.

use super::BitGrid;
use crate::error::{Error, Result};
use crate::geom::Rect;

impl BitGrid {
    fn check_same_size(&self, other: &BitGrid) -> Result<()> {
        if self.cols != other.cols || self.rows != other.rows {
            return Err(Error::DimensionMismatch {
                expected: (self.cols, self.rows),
                actual: (other.cols, other.rows),
            });
        }
        Ok(())
    }

    /// Fraction of cells that agree between two equally sized grids
    ///
    /// Returns a value in `[0, 1]`; two empty grids agree fully.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the grids differ in size.
    pub fn xnor_ratio(&self, other: &BitGrid) -> Result<f64> {
        self.check_same_size(other)?;
        if self.is_empty() {
            return Ok(1.0);
        }

        let mask = self.last_word_mask();
        let last = self.wpl as usize - 1;
        let mut agree = 0u64;
        for y in 0..self.rows {
            let a = self.row_data(y);
            let b = other.row_data(y);
            for (i, (&wa, &wb)) in a.iter().zip(b).enumerate() {
                let same = if i == last { !(wa ^ wb) & mask } else { !(wa ^ wb) };
                agree += same.count_ones() as u64;
            }
        }
        Ok(agree as f64 / self.area() as f64)
    }

    /// Fraction of agreeing cells restricted to `block`
    ///
    /// The block is clipped to the grid; an empty block agrees fully.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the grids differ in size.
    pub fn xnor_ratio_in(&self, other: &BitGrid, block: &Rect) -> Result<f64> {
        self.check_same_size(other)?;
        let bounds = Rect::new_unchecked(0, 0, self.cols as i32, self.rows as i32);
        let Some(block) = block.intersect(&bounds) else {
            return Ok(1.0);
        };

        let mut agree = 0u64;
        for y in block.y..block.bottom() {
            for x in block.x..block.right() {
                let (x, y) = (x as u32, y as u32);
                if self.get_unchecked(x, y) == other.get_unchecked(x, y) {
                    agree += 1;
                }
            }
        }
        Ok(agree as f64 / block.area() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xnor_identical() {
        let a = BitGrid::from_rows(&["#.#", ".#."]).unwrap();
        assert_eq!(a.xnor_ratio(&a).unwrap(), 1.0);
        assert_eq!(a.xnor_ratio(&a.inverted()).unwrap(), 0.0);
    }

    #[test]
    fn test_xnor_ignores_padding_bits() {
        // 20 columns leave 12 unused bits per word; they must not count
        let a = BitGrid::new(20, 2);
        let mut b = BitGrid::new(20, 2);
        b.set(0, 0, true).unwrap();
        let ratio = a.xnor_ratio(&b).unwrap();
        assert!((ratio - 39.0 / 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_xnor_size_mismatch() {
        let a = BitGrid::new(2, 2);
        let b = BitGrid::new(3, 2);
        assert!(a.xnor_ratio(&b).is_err());
    }

    #[test]
    fn test_xnor_in_block() {
        let a = BitGrid::from_rows(&["##..", "##..", "....", "...."]).unwrap();
        let b = BitGrid::from_rows(&["#...", "##..", "....", "...#"]).unwrap();
        let top_left = Rect::new_unchecked(0, 0, 2, 2);
        assert!((a.xnor_ratio_in(&b, &top_left).unwrap() - 0.75).abs() < 1e-12);
        let bottom_right = Rect::new_unchecked(2, 2, 2, 2);
        assert!((a.xnor_ratio_in(&b, &bottom_right).unwrap() - 0.75).abs() < 1e-12);
        let top_right = Rect::new_unchecked(2, 0, 2, 2);
        assert_eq!(a.xnor_ratio_in(&b, &top_right).unwrap(), 1.0);
    }
}
