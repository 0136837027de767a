//! Connected component analysis
//!
//! Components are discovered by a row-major sweep: the first unvisited
//! set cell seeds a flood fill, and the component is reported before the
//! sweep moves on. The output order is therefore the order of each
//! component's first cell in reading order.

use glyphscan_core::{BitGrid, Rect};

use crate::error::RegionResult;
use crate::seedfill::flood_fill;

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    FourWay,
    /// 8-way connectivity (includes diagonals)
    #[default]
    EightWay,
}

/// A connected component in a grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    /// Number of cells in this component
    pub pixel_count: u32,
    /// Bounding rectangle of this component
    pub bounds: Rect,
}

/// Find all connected components of set cells
///
/// # Returns
///
/// Components in row-major discovery order.
pub fn find_connected_components(
    grid: &BitGrid,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    let mut visited = BitGrid::new(grid.cols(), grid.rows());
    let mut components = Vec::new();

    for y in 0..grid.rows() {
        let line = grid.row_data(y);
        for (wi, &word) in line.iter().enumerate() {
            // Skip words with no ink
            if word == 0 {
                continue;
            }
            for bit in 0..32u32 {
                if word & (0x8000_0000 >> bit) == 0 {
                    continue;
                }
                let x = wi as u32 * 32 + bit;
                if visited.get_unchecked(x, y) {
                    continue;
                }
                let cells = flood_fill(grid, &mut visited, x as i32, y as i32, connectivity)?;
                let (mut left, mut top) = (i32::MAX, i32::MAX);
                let (mut right, mut bottom) = (i32::MIN, i32::MIN);
                for p in &cells {
                    left = left.min(p.x);
                    top = top.min(p.y);
                    right = right.max(p.x);
                    bottom = bottom.max(p.y);
                }
                components.push(ConnectedComponent {
                    pixel_count: cells.len() as u32,
                    bounds: Rect::from_edges(left, top, right + 1, bottom + 1),
                });
            }
        }
    }

    Ok(components)
}
