//! Binary morphological operations
//!
//! Dilation and erosion with a square `size` x `size` kernel, computed as
//! two separable passes (horizontal, then vertical). Each pass folds
//! shifted copies of the packed rows into the output a word at a time.
//!
//! Boundary conditions are asymmetric: pixels outside the grid are unset
//! for both operations, so erosion shrinks blobs that touch the border.

use std::ops::RangeInclusive;

use glyphscan_core::{BitGrid, Rect};

use crate::{MorphError, MorphResult};

/// Fraction of the image width used by [`default_kernel_size`]
pub const DEFAULT_KERNEL_RATIO: f64 = 0.02;

/// Kernel size derived from the image width: `0.02 * width`, clamped to
/// `[1, width]`
pub fn default_kernel_size(width: u32) -> u32 {
    let size = (width as f64 * DEFAULT_KERNEL_RATIO).round() as u32;
    size.max(1).min(width.max(1))
}

/// Offsets covered by a kernel of `size` cells, origin included
///
/// Even sizes extend one cell further right/down than left/up.
pub fn kernel_offsets(size: u32) -> RangeInclusive<i32> {
    let before = (size.saturating_sub(1) / 2) as i32;
    let after = (size / 2) as i32;
    -before..=after
}

fn check_size(size: u32) -> MorphResult<()> {
    if size == 0 {
        return Err(MorphError::InvalidParameters(
            "kernel size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Dilate with a `size` x `size` square kernel
///
/// A cell is set in the output if any cell under the kernel is set in the
/// input.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if `size` is 0.
pub fn dilate(grid: &BitGrid, size: u32) -> MorphResult<BitGrid> {
    check_size(size)?;
    if size == 1 || grid.is_empty() {
        return Ok(grid.clone());
    }
    let offsets = kernel_offsets(size);
    let horizontal = horizontal_pass(grid, offsets.clone(), Fold::Any);
    Ok(vertical_pass(&horizontal, offsets, Fold::Any))
}

/// Erode with a `size` x `size` square kernel
///
/// A cell stays set only if every cell under the reflected kernel is set.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if `size` is 0.
pub fn erode(grid: &BitGrid, size: u32) -> MorphResult<BitGrid> {
    check_size(size)?;
    if size == 1 || grid.is_empty() {
        return Ok(grid.clone());
    }
    let offsets = kernel_offsets(size);
    let horizontal = horizontal_pass(grid, offsets.clone(), Fold::All);
    Ok(vertical_pass(&horizontal, offsets, Fold::All))
}

/// Close: dilation followed by erosion
///
/// Bridges gaps narrower than the kernel without growing the strokes.
/// The grid is padded by `size` before the two passes and cropped back
/// afterwards, so ink touching the border is not eroded away.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if `size` is 0.
pub fn close(grid: &BitGrid, size: u32) -> MorphResult<BitGrid> {
    check_size(size)?;
    if size == 1 || grid.is_empty() {
        return Ok(grid.clone());
    }
    let padded = grid.padded(size);
    let closed = erode(&dilate(&padded, size)?, size)?;
    let window = Rect::new_unchecked(
        size as i32,
        size as i32,
        grid.cols() as i32,
        grid.rows() as i32,
    );
    Ok(closed.crop(&window))
}

/// How a pass combines the cells under the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fold {
    /// Set if any covered cell is set (dilation)
    Any,
    /// Set if every cell under the reflected kernel is set (erosion)
    All,
}

impl Fold {
    fn identity(self) -> u32 {
        match self {
            Fold::Any => 0,
            Fold::All => u32::MAX,
        }
    }

    /// Offset of the source cell read for kernel offset `d`
    fn source_offset(self, d: i32) -> i32 {
        match self {
            Fold::Any => d,
            Fold::All => -d,
        }
    }

    fn apply(self, acc: &mut u32, word: u32) {
        match self {
            Fold::Any => *acc |= word,
            Fold::All => *acc &= word,
        }
    }
}

fn word_at(row: &[u32], index: i64) -> u32 {
    usize::try_from(index)
        .ok()
        .and_then(|i| row.get(i))
        .copied()
        .unwrap_or(0)
}

/// Word `i` of `row` after moving every cell `shift` columns right (left
/// when negative); cells moved in from outside the row are unset
fn shifted_word(row: &[u32], i: usize, shift: i32) -> u32 {
    let j = i as i64 - i64::from(shift.div_euclid(32));
    let bits = shift.rem_euclid(32) as u32;
    if bits == 0 {
        word_at(row, j)
    } else {
        (word_at(row, j) >> bits) | (word_at(row, j - 1) << (32 - bits))
    }
}

/// One row of the kernel applied along each grid row
fn horizontal_pass(src: &BitGrid, offsets: RangeInclusive<i32>, fold: Fold) -> BitGrid {
    let mut out = BitGrid::new(src.cols(), src.rows());
    out.data_mut().fill(fold.identity());
    let wpl = src.wpl() as usize;
    for y in 0..src.rows() {
        let src_row = src.row_data(y);
        let start = y as usize * wpl;
        let dst_row = &mut out.data_mut()[start..start + wpl];
        for d in offsets.clone() {
            // out(x) reads src(x + offset), i.e. the row moved by -offset
            let shift = -fold.source_offset(d);
            for (i, acc) in dst_row.iter_mut().enumerate() {
                fold.apply(acc, shifted_word(src_row, i, shift));
            }
        }
    }
    out.clear_unused_bits();
    out
}

/// One column of the kernel applied across whole rows
fn vertical_pass(src: &BitGrid, offsets: RangeInclusive<i32>, fold: Fold) -> BitGrid {
    let mut out = BitGrid::new(src.cols(), src.rows());
    out.data_mut().fill(fold.identity());
    let wpl = src.wpl() as usize;
    let rows = src.rows() as i32;
    for y in 0..rows {
        let start = y as usize * wpl;
        for d in offsets.clone() {
            let sy = y + fold.source_offset(d);
            let dst_row = &mut out.data_mut()[start..start + wpl];
            if (0..rows).contains(&sy) {
                for (acc, &word) in dst_row.iter_mut().zip(src.row_data(sy as u32)) {
                    fold.apply(acc, word);
                }
            } else {
                dst_row.iter_mut().for_each(|acc| fold.apply(acc, 0));
            }
        }
    }
    out.clear_unused_bits();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center_dot(size: u32) -> BitGrid {
        let mut grid = BitGrid::new(size, size);
        grid.set(size / 2, size / 2, true).unwrap();
        grid
    }

    /// Cell-by-cell reference dilation
    fn naive_dilate(grid: &BitGrid, size: u32) -> BitGrid {
        let mut out = BitGrid::new(grid.cols(), grid.rows());
        for y in 0..grid.rows() as i32 {
            for x in 0..grid.cols() as i32 {
                let hit = kernel_offsets(size)
                    .any(|dy| kernel_offsets(size).any(|dx| grid.is_set(x + dx, y + dy)));
                if hit {
                    out.set_unchecked(x as u32, y as u32, true);
                }
            }
        }
        out
    }

    #[test]
    fn test_kernel_offsets() {
        assert_eq!(kernel_offsets(1), 0..=0);
        assert_eq!(kernel_offsets(3), -1..=1);
        assert_eq!(kernel_offsets(4), -1..=2);
        assert_eq!(kernel_offsets(22).count(), 22);
    }

    #[test]
    fn test_default_kernel_size() {
        assert_eq!(default_kernel_size(1000), 20);
        assert_eq!(default_kernel_size(10), 1);
        assert_eq!(default_kernel_size(0), 1);
        assert_eq!(default_kernel_size(1), 1);
    }

    #[test]
    fn test_zero_size_rejected() {
        let grid = BitGrid::new(4, 4);
        assert!(dilate(&grid, 0).is_err());
        assert!(erode(&grid, 0).is_err());
    }

    #[test]
    fn test_dilate_dot_to_square() {
        let out = dilate(&center_dot(7), 3).unwrap();
        assert_eq!(out.count_ones(), 9);
        assert_eq!(out.tight_bounds().unwrap().w, 3);
    }

    #[test]
    fn test_dilate_matches_reference_across_words() {
        let mut grid = BitGrid::new(70, 5);
        for &(x, y) in &[(0, 0), (31, 2), (32, 2), (63, 4), (69, 1)] {
            grid.set(x, y, true).unwrap();
        }
        for size in [2, 3, 5, 34] {
            assert_eq!(dilate(&grid, size).unwrap(), naive_dilate(&grid, size));
        }
    }

    #[test]
    fn test_shifted_word_moves_cells() {
        let row = [0x8000_0001, 0x8000_0000];
        assert_eq!(shifted_word(&row, 0, 0), 0x8000_0001);
        // cell 31 moves into cell 32, cell 32 into cell 33
        assert_eq!(shifted_word(&row, 0, 1), 0x4000_0000);
        assert_eq!(shifted_word(&row, 1, 1), 0xC000_0000);
        // cell 0 falls off the left edge, cell 32 becomes cell 31
        assert_eq!(shifted_word(&row, 0, -1), 0x0000_0003);
        assert_eq!(shifted_word(&row, 1, 32), 0x8000_0001);
        assert_eq!(shifted_word(&row, 0, -32), 0x8000_0000);
        assert_eq!(shifted_word(&row, 1, -32), 0);
    }

    #[test]
    fn test_erode_matches_reference_across_words() {
        let mut grid = BitGrid::new(70, 6);
        for y in 1..5 {
            for x in 3..66 {
                grid.set(x, y, true).unwrap();
            }
        }
        grid.set(40, 2, false).unwrap();
        for size in [2, 3, 4] {
            let mut expected = BitGrid::new(grid.cols(), grid.rows());
            for y in 0..grid.rows() as i32 {
                for x in 0..grid.cols() as i32 {
                    let all = kernel_offsets(size)
                        .all(|dy| kernel_offsets(size).all(|dx| grid.is_set(x - dx, y - dy)));
                    if all {
                        expected.set_unchecked(x as u32, y as u32, true);
                    }
                }
            }
            assert_eq!(erode(&grid, size).unwrap(), expected);
        }
    }

    #[test]
    fn test_erode_inverts_dilate_on_dot() {
        let dot = center_dot(9);
        let grown = dilate(&dot, 3).unwrap();
        assert_eq!(erode(&grown, 3).unwrap(), dot);
    }

    #[test]
    fn test_erode_border_clears() {
        let mut full = BitGrid::new(5, 5);
        full.data_mut().fill(u32::MAX);
        full.clear_unused_bits();
        let eroded = erode(&full, 3).unwrap();
        assert_eq!(eroded.count_ones(), 9);
        assert!(!eroded.get(0, 0).unwrap());
        assert!(eroded.get(2, 2).unwrap());
    }

    #[test]
    fn test_close_is_extensive_and_bridges() {
        let grid = BitGrid::from_rows(&["##.##", "##.##"]).unwrap();
        let closed = close(&grid, 2).unwrap();
        for y in 0..grid.rows() {
            for x in 0..grid.cols() {
                if grid.get_unchecked(x, y) {
                    assert!(closed.get_unchecked(x, y));
                }
            }
        }
        assert!(closed.get(2, 0).unwrap());
    }
}
