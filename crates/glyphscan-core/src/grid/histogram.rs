//! Row and column projections

use super::BitGrid;

impl BitGrid {
    /// Number of set cells in each column
    pub fn column_counts(&self) -> Vec<u32> {
        let mut counts = vec![0u32; self.cols as usize];
        for y in 0..self.rows {
            let line = self.row_data(y);
            for (wi, &word) in line.iter().enumerate() {
                let mut bits = word;
                while bits != 0 {
                    let lead = bits.leading_zeros();
                    counts[wi * 32 + lead as usize] += 1;
                    bits &= !(0x8000_0000 >> lead);
                }
            }
        }
        counts
    }

    /// Number of set cells in each row
    pub fn row_counts(&self) -> Vec<u32> {
        (0..self.rows)
            .map(|y| self.row_data(y).iter().map(|w| w.count_ones()).sum())
            .collect()
    }
}
