//! Structural grid operations: cropping, combining, padding and resampling

use super::BitGrid;
use crate::geom::Rect;

/// Placement of resampled content inside a fixed-size canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Centered horizontally and vertically
    #[default]
    Center,
    /// Centered horizontally, touching the bottom edge
    Bottom,
}

/// `round(num / den)` with halves rounded up, for positive operands
#[inline]
fn div_round(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

impl BitGrid {
    /// Bounding rectangle of the set cells, in grid coordinates
    ///
    /// Returns `None` for a blank or empty grid.
    pub fn tight_bounds(&self) -> Option<Rect> {
        if self.is_empty() {
            return None;
        }
        let wpl = self.wpl as usize;
        let mut columns = vec![0u32; wpl];
        let mut top = None;
        let mut bottom = 0;
        for y in 0..self.rows {
            let line = self.row_data(y);
            if line.iter().any(|&w| w != 0) {
                top.get_or_insert(y);
                bottom = y;
                for (acc, &w) in columns.iter_mut().zip(line) {
                    *acc |= w;
                }
            }
        }
        let top = top?;

        let first_word = columns.iter().position(|&w| w != 0)?;
        let last_word = columns.iter().rposition(|&w| w != 0)?;
        let left = first_word as u32 * 32 + columns[first_word].leading_zeros();
        let right = last_word as u32 * 32 + 31 - columns[last_word].trailing_zeros();

        Some(Rect::from_edges(
            left as i32,
            top as i32,
            right as i32 + 1,
            bottom as i32 + 1,
        ))
    }

    /// Copy out a rectangular window
    ///
    /// The result has the rectangle's dimensions; parts of the window that
    /// fall outside this grid are unset.
    pub fn crop(&self, rect: &Rect) -> BitGrid {
        let mut out = BitGrid::new(rect.w.max(0) as u32, rect.h.max(0) as u32);
        let bounds = Rect::new_unchecked(0, 0, self.cols as i32, self.rows as i32);
        let Some(visible) = rect.intersect(&bounds) else {
            return out;
        };
        for y in visible.y..visible.bottom() {
            for x in visible.x..visible.right() {
                if self.get_unchecked(x as u32, y as u32) {
                    out.set_unchecked((x - rect.x) as u32, (y - rect.y) as u32, true);
                }
            }
        }
        out
    }

    /// Bitwise-OR `src` into this grid with its origin at (dx, dy)
    ///
    /// Cells of `src` that land outside this grid are dropped.
    pub fn or_at(&mut self, src: &BitGrid, dx: i32, dy: i32) {
        for y in 0..src.rows {
            let ty = y as i32 + dy;
            if ty < 0 || ty >= self.rows as i32 {
                continue;
            }
            for x in 0..src.cols {
                let tx = x as i32 + dx;
                if tx < 0 || tx >= self.cols as i32 {
                    continue;
                }
                if src.get_unchecked(x, y) {
                    self.set_unchecked(tx as u32, ty as u32, true);
                }
            }
        }
    }

    /// Return a copy surrounded by `amount` unset cells on every side
    pub fn padded(&self, amount: u32) -> BitGrid {
        let mut out = BitGrid::new(self.cols + 2 * amount, self.rows + 2 * amount);
        out.or_at(self, amount as i32, amount as i32);
        out
    }

    /// Return a copy with every cell flipped
    pub fn inverted(&self) -> BitGrid {
        let mut out = self.clone();
        let mask = self.last_word_mask();
        let wpl = self.wpl as usize;
        for line in out.data.chunks_mut(wpl.max(1)) {
            for w in line.iter_mut() {
                *w = !*w;
            }
            if let Some(last) = line.last_mut() {
                *last &= mask;
            }
        }
        out
    }

    /// Resample into a `cols` x `rows` canvas, preserving aspect ratio
    ///
    /// The content is scaled by `min(cols / width, rows / height)` with
    /// nearest-neighbour sampling and placed according to `anchor`. An
    /// empty or blank source gives a blank canvas.
    pub fn fit(&self, cols: u32, rows: u32, anchor: Anchor) -> BitGrid {
        let mut out = BitGrid::new(cols, rows);
        if self.is_empty() || out.is_empty() || self.is_blank() {
            return out;
        }

        let (w, h) = (self.cols as u64, self.rows as u64);
        let (cw, ch) = (cols as u64, rows as u64);
        // Width-limited when cols / w <= rows / h
        let (tw, th) = if cw * h <= ch * w {
            (cw, div_round(h * cw, w))
        } else {
            (div_round(w * ch, h), ch)
        };
        let tw = tw.clamp(1, cw) as u32;
        let th = th.clamp(1, ch) as u32;

        let ox = (cols - tw) / 2;
        let oy = match anchor {
            Anchor::Center => (rows - th) / 2,
            Anchor::Bottom => rows - th,
        };

        for ty in 0..th {
            let sy = (ty as u64 * h / th as u64) as u32;
            for tx in 0..tw {
                let sx = (tx as u64 * w / tw as u64) as u32;
                if self.get_unchecked(sx, sy) {
                    out.set_unchecked(ox + tx, oy + ty, true);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tight_bounds() {
        let grid = BitGrid::from_rows(&["....", ".#..", "...#", "...."]).unwrap();
        assert_eq!(grid.tight_bounds(), Some(Rect::new_unchecked(1, 1, 3, 2)));
        assert_eq!(BitGrid::new(5, 5).tight_bounds(), None);
        assert_eq!(BitGrid::new(0, 0).tight_bounds(), None);
    }

    #[test]
    fn test_tight_bounds_across_words() {
        let mut grid = BitGrid::new(70, 3);
        grid.set(5, 0, true).unwrap();
        grid.set(66, 2, true).unwrap();
        assert_eq!(grid.tight_bounds(), Some(Rect::new_unchecked(5, 0, 62, 3)));
    }

    #[test]
    fn test_crop_outside_is_unset() {
        let grid = BitGrid::from_rows(&["##", "##"]).unwrap();
        let out = grid.crop(&Rect::new_unchecked(-1, 1, 3, 2));
        assert_eq!(out.to_rows(), vec![".##", "..."]);
    }

    #[test]
    fn test_or_at() {
        let mut dst = BitGrid::new(4, 2);
        let src = BitGrid::from_rows(&["##"]).unwrap();
        dst.or_at(&src, 3, 1);
        dst.or_at(&src, -1, 0);
        assert_eq!(dst.to_rows(), vec!["#...", "...#"]);
    }

    #[test]
    fn test_padded_and_inverted() {
        let grid = BitGrid::from_rows(&["#"]).unwrap();
        let p = grid.padded(1);
        assert_eq!(p.to_rows(), vec!["...", ".#.", "..."]);
        let inv = p.inverted();
        assert_eq!(inv.count_ones(), 8);
        assert_eq!(inv.inverted(), p);
    }

    #[test]
    fn test_fit_center_preserves_aspect() {
        // 2x4 block into a 4x4 canvas: height-limited, width 2, centered
        let grid = BitGrid::from_rows(&["##", "##", "##", "##"]).unwrap();
        let out = grid.fit(4, 4, Anchor::Center);
        assert_eq!(out.to_rows(), vec![".##.", ".##.", ".##.", ".##."]);
    }

    #[test]
    fn test_fit_bottom_anchor() {
        let grid = BitGrid::from_rows(&["####"]).unwrap();
        let out = grid.fit(4, 3, Anchor::Bottom);
        assert_eq!(out.to_rows(), vec!["....", "....", "####"]);
        let centered = grid.fit(4, 3, Anchor::Center);
        assert_eq!(centered.to_rows(), vec!["....", "####", "...."]);
    }

    #[test]
    fn test_fit_upscales() {
        let grid = BitGrid::from_rows(&["#.", ".#"]).unwrap();
        let out = grid.fit(4, 4, Anchor::Center);
        assert_eq!(out.to_rows(), vec!["##..", "##..", "..##", "..##"]);
    }

    #[test]
    fn test_fit_blank_source() {
        let out = BitGrid::new(3, 3).fit(5, 7, Anchor::Center);
        assert_eq!((out.cols(), out.rows()), (5, 7));
        assert!(out.is_blank());
    }
}
