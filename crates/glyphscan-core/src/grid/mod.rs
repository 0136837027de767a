//! BitGrid - packed two-dimensional boolean grid
//!
//! A `BitGrid` is the binary image type shared by every stage of the
//! recognizer: the binarized page, the dilated page, artifact bitmaps and
//! glyph templates are all grids.
//!
//! # Packing
//!
//! Cells are packed MSB-to-LSB within each 32-bit word, one row after the
//! other, with `wpl` words per row. Cell 0 of a row occupies bit 31 of the
//! row's first word. Bits past the last column of a row are always zero,
//! so grids with equal contents compare equal word for word.

mod compare;
mod histogram;
mod ops;

pub use ops::Anchor;

use crate::error::{Error, Result};

/// Number of 32-bit words needed to hold `cols` cells
#[inline]
fn words_per_line(cols: u32) -> u32 {
    cols.div_ceil(32)
}

/// A packed binary grid
///
/// `true` cells are "set" (ink); `false` cells are background. A grid
/// with zero columns or rows is valid and represents "no content".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitGrid {
    cols: u32,
    rows: u32,
    wpl: u32,
    data: Vec<u32>,
}

impl BitGrid {
    /// Create an all-unset grid
    pub fn new(cols: u32, rows: u32) -> Self {
        let wpl = words_per_line(cols);
        Self {
            cols,
            rows,
            wpl,
            data: vec![0; (wpl as usize) * (rows as usize)],
        }
    }

    /// Create a grid from row-major booleans
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `bits.len() != cols * rows`.
    pub fn from_bits(cols: u32, rows: u32, bits: &[bool]) -> Result<Self> {
        let expected = cols as usize * rows as usize;
        if bits.len() != expected {
            return Err(Error::InvalidParameter(format!(
                "expected {} cells for {}x{} grid, got {}",
                expected,
                cols,
                rows,
                bits.len()
            )));
        }
        let mut grid = Self::new(cols, rows);
        for (i, &bit) in bits.iter().enumerate() {
            if bit {
                let x = (i % cols as usize) as u32;
                let y = (i / cols as usize) as u32;
                grid.set_unchecked(x, y, true);
            }
        }
        Ok(grid)
    }

    /// Create a grid from a row-major string of `'0'` and `'1'` characters
    ///
    /// This is the encoding used by template matrices in the character
    /// catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] on a length mismatch or an
    /// unexpected character.
    pub fn from_bit_string(cols: u32, rows: u32, data: &str) -> Result<Self> {
        let bits = data
            .chars()
            .map(|c| match c {
                '1' => Ok(true),
                '0' => Ok(false),
                other => Err(Error::InvalidParameter(format!(
                    "unexpected character {:?} in bit string",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_bits(cols, rows, &bits)
    }

    /// Create a grid from text rows where `'#'` or `'1'` marks a set cell
    /// and `'.'` or `'0'` marks an unset one
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for ragged rows or unknown
    /// characters.
    pub fn from_rows(lines: &[&str]) -> Result<Self> {
        let rows = lines.len() as u32;
        let cols = lines.first().map_or(0, |l| l.chars().count()) as u32;
        let mut grid = Self::new(cols, rows);
        for (y, line) in lines.iter().enumerate() {
            if line.chars().count() as u32 != cols {
                return Err(Error::InvalidParameter(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    line.chars().count(),
                    cols
                )));
            }
            for (x, c) in line.chars().enumerate() {
                match c {
                    '#' | '1' => grid.set_unchecked(x as u32, y as u32, true),
                    '.' | '0' => {}
                    other => {
                        return Err(Error::InvalidParameter(format!(
                            "unexpected character {:?} in grid row {}",
                            other, y
                        )));
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Render the grid as text rows using `'#'` and `'.'`
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.rows)
            .map(|y| {
                (0..self.cols)
                    .map(|x| if self.get_unchecked(x, y) { '#' } else { '.' })
                    .collect()
            })
            .collect()
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Words per line
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.wpl
    }

    /// Check if the grid has zero columns or rows
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }

    /// Total number of cells
    #[inline]
    pub fn area(&self) -> u64 {
        self.cols as u64 * self.rows as u64
    }

    /// Raw packed words of one row
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y * self.wpl) as usize;
        &self.data[start..start + self.wpl as usize]
    }

    /// All packed words, row after row
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.data
    }

    /// Mutable packed words
    ///
    /// Word-level writers must call [`BitGrid::clear_unused_bits`] when
    /// they are done.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Mask of the valid bits in the last word of a row
    #[inline]
    pub(crate) fn last_word_mask(&self) -> u32 {
        match self.cols % 32 {
            0 => u32::MAX,
            used => u32::MAX << (32 - used),
        }
    }

    /// Zero the bits past the last column of every row
    pub fn clear_unused_bits(&mut self) {
        let mask = self.last_word_mask();
        if mask == u32::MAX || self.wpl == 0 {
            return;
        }
        let wpl = self.wpl as usize;
        for line in self.data.chunks_mut(wpl) {
            line[wpl - 1] &= mask;
        }
    }

    /// Get a cell value
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<bool> {
        if x < self.cols && y < self.rows {
            Some(self.get_unchecked(x, y))
        } else {
            None
        }
    }

    /// Get a cell value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if the computed word index is outside the grid data.
    #[inline]
    pub fn get_unchecked(&self, x: u32, y: u32) -> bool {
        let word = self.data[(y * self.wpl + (x >> 5)) as usize];
        (word >> (31 - (x & 31))) & 1 == 1
    }

    /// Check a cell using signed coordinates; anything outside the grid is unset
    #[inline]
    pub fn is_set(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as u32) < self.cols
            && (y as u32) < self.rows
            && self.get_unchecked(x as u32, y as u32)
    }

    /// Set a cell value
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if coordinates are out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: bool) -> Result<()> {
        if x >= self.cols || y >= self.rows {
            return Err(Error::OutOfBounds {
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            });
        }
        self.set_unchecked(x, y, value);
        Ok(())
    }

    /// Set a cell value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if the computed word index is outside the grid data.
    #[inline]
    pub fn set_unchecked(&mut self, x: u32, y: u32, value: bool) {
        let idx = (y * self.wpl + (x >> 5)) as usize;
        let mask = 1u32 << (31 - (x & 31));
        if value {
            self.data[idx] |= mask;
        } else {
            self.data[idx] &= !mask;
        }
    }

    /// Number of set cells
    pub fn count_ones(&self) -> u64 {
        self.data.iter().map(|w| w.count_ones() as u64).sum()
    }

    /// Check if no cell is set
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&w| w == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_blank() {
        let grid = BitGrid::new(40, 3);
        assert_eq!(grid.wpl(), 2);
        assert!(grid.is_blank());
        assert!(!grid.is_empty());
        assert!(BitGrid::new(0, 0).is_empty());
    }

    #[test]
    fn test_set_get_msb_first() {
        let mut grid = BitGrid::new(33, 2);
        grid.set(0, 0, true).unwrap();
        grid.set(32, 1, true).unwrap();
        assert_eq!(grid.row_data(0)[0], 0x8000_0000);
        assert_eq!(grid.row_data(1)[1], 0x8000_0000);
        assert_eq!(grid.get(0, 0), Some(true));
        assert_eq!(grid.get(1, 0), Some(false));
        assert_eq!(grid.get(33, 0), None);
        assert_eq!(grid.count_ones(), 2);

        grid.set(0, 0, false).unwrap();
        assert_eq!(grid.count_ones(), 1);
        assert!(grid.set(33, 0, true).is_err());
    }

    #[test]
    fn test_is_set_signed() {
        let grid = BitGrid::from_rows(&["#."]).unwrap();
        assert!(grid.is_set(0, 0));
        assert!(!grid.is_set(-1, 0));
        assert!(!grid.is_set(0, 1));
    }

    #[test]
    fn test_from_bit_string() {
        let grid = BitGrid::from_bit_string(3, 2, "101010").unwrap();
        assert_eq!(grid.to_rows(), vec!["#.#", ".#."]);
        assert!(BitGrid::from_bit_string(3, 2, "10101").is_err());
        assert!(BitGrid::from_bit_string(3, 2, "10101x").is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(BitGrid::from_rows(&["##", "#"]).is_err());
        assert!(BitGrid::from_rows(&["#?"]).is_err());
    }

    #[test]
    fn test_last_word_mask() {
        assert_eq!(BitGrid::new(32, 1).last_word_mask(), u32::MAX);
        assert_eq!(BitGrid::new(1, 1).last_word_mask(), 0x8000_0000);
        assert_eq!(BitGrid::new(20, 1).last_word_mask(), 0xFFFF_F000);
    }
}
