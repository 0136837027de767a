//! Seed fill operations
//!
//! Flood fill over a [`BitGrid`] with an explicit work stack, so blobs of
//! any size are filled without recursion. A separate `visited` mask
//! records the cells already claimed, letting a caller sweep the whole
//! grid without reprocessing a cell.

use glyphscan_core::{BitGrid, Point};

use crate::conncomp::ConnectivityType;
use crate::error::{RegionError, RegionResult};

/// Collect the component of cells whose value equals `target` that
/// contains (x, y), marking each one in `visited`
fn fill_matching(
    grid: &BitGrid,
    visited: &mut BitGrid,
    x: i32,
    y: i32,
    target: bool,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<Point>> {
    if visited.cols() != grid.cols() || visited.rows() != grid.rows() {
        return Err(RegionError::MaskMismatch {
            visited: (visited.cols(), visited.rows()),
            grid: (grid.cols(), grid.rows()),
        });
    }

    let inside = |p: Point| {
        p.x >= 0 && p.y >= 0 && (p.x as u32) < grid.cols() && (p.y as u32) < grid.rows()
    };
    let claimable = |p: Point, visited: &BitGrid| {
        inside(p)
            && grid.get_unchecked(p.x as u32, p.y as u32) == target
            && !visited.get_unchecked(p.x as u32, p.y as u32)
    };

    let seed = Point::new(x, y);
    if !claimable(seed, visited) {
        return Ok(Vec::new());
    }

    let mut filled = Vec::new();
    let mut stack = vec![seed];
    visited.set_unchecked(seed.x as u32, seed.y as u32, true);

    while let Some(p) = stack.pop() {
        filled.push(p);
        let mut push = |n: Point, visited: &mut BitGrid| {
            if claimable(n, visited) {
                visited.set_unchecked(n.x as u32, n.y as u32, true);
                stack.push(n);
            }
        };
        match connectivity {
            ConnectivityType::FourWay => {
                for n in p.neighbors4() {
                    push(n, visited);
                }
            }
            ConnectivityType::EightWay => {
                for n in p.neighbors8() {
                    push(n, visited);
                }
            }
        }
    }

    Ok(filled)
}

/// Flood fill the set cells connected to (x, y)
///
/// Every returned cell is marked in `visited`, and exactly those cells are
/// newly marked.
///
/// # Arguments
///
/// * `grid` - Grid to explore
/// * `visited` - Mask of already claimed cells, same size as `grid`
/// * `x`, `y` - Seed position
/// * `connectivity` - Neighborhood used to grow the fill
///
/// # Returns
///
/// The filled cells in visiting order. Empty if the seed is outside the
/// grid, unset, or already visited.
///
/// # Errors
///
/// Returns [`RegionError::MaskMismatch`] if `visited` differs in size.
pub fn flood_fill(
    grid: &BitGrid,
    visited: &mut BitGrid,
    x: i32,
    y: i32,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<Point>> {
    fill_matching(grid, visited, x, y, true, connectivity)
}

/// Count the holes in a glyph
///
/// A hole is a 4-connected group of unset cells that cannot reach the
/// border of the trimmed grid padded by one cell. `0` has one hole in most
/// fonts, `8` and `B` have two.
///
/// # Errors
///
/// Propagates fill errors; none occur for a well-formed grid.
pub fn count_enclosures(grid: &BitGrid) -> RegionResult<u32> {
    let Some(tight) = grid.tight_bounds() else {
        return Ok(0);
    };
    let glyph = grid.crop(&tight).padded(1);
    let mut visited = BitGrid::new(glyph.cols(), glyph.rows());

    // Outside background: the padding ring is one connected component
    fill_matching(
        &glyph,
        &mut visited,
        0,
        0,
        false,
        ConnectivityType::FourWay,
    )?;

    let mut holes = 0;
    for y in 0..glyph.rows() {
        for x in 0..glyph.cols() {
            let cells = fill_matching(
                &glyph,
                &mut visited,
                x as i32,
                y as i32,
                false,
                ConnectivityType::FourWay,
            )?;
            if !cells.is_empty() {
                holes += 1;
            }
        }
    }
    Ok(holes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_out_of_bounds_is_empty() {
        let grid = BitGrid::from_rows(&["##", "##"]).unwrap();
        let mut visited = BitGrid::new(2, 2);
        let pts = flood_fill(&grid, &mut visited, -1, 0, ConnectivityType::EightWay).unwrap();
        assert!(pts.is_empty());
        let pts = flood_fill(&grid, &mut visited, 0, 5, ConnectivityType::EightWay).unwrap();
        assert!(pts.is_empty());
        assert!(visited.is_blank());
    }

    #[test]
    fn test_fill_unset_seed_is_empty() {
        let grid = BitGrid::from_rows(&["#.", ".."]).unwrap();
        let mut visited = BitGrid::new(2, 2);
        let pts = flood_fill(&grid, &mut visited, 1, 1, ConnectivityType::EightWay).unwrap();
        assert!(pts.is_empty());
        assert_eq!(visited.count_ones(), 0);
    }

    #[test]
    fn test_fill_visited_matches_returned() {
        let grid = BitGrid::from_rows(&["##..#", ".#...", "..#.#", "....#"]).unwrap();
        let mut visited = BitGrid::new(grid.cols(), grid.rows());
        let pts = flood_fill(&grid, &mut visited, 0, 0, ConnectivityType::EightWay).unwrap();
        assert_eq!(pts.len(), 4);
        assert_eq!(visited.count_ones(), pts.len() as u64);

        // Filling again from the same seed claims nothing
        let again = flood_fill(&grid, &mut visited, 1, 1, ConnectivityType::EightWay).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_fill_connectivity() {
        let grid = BitGrid::from_rows(&["#.", ".#"]).unwrap();
        let mut visited = BitGrid::new(2, 2);
        let four = flood_fill(&grid, &mut visited, 0, 0, ConnectivityType::FourWay).unwrap();
        assert_eq!(four.len(), 1);
        let mut visited = BitGrid::new(2, 2);
        let eight = flood_fill(&grid, &mut visited, 0, 0, ConnectivityType::EightWay).unwrap();
        assert_eq!(eight.len(), 2);
    }

    #[test]
    fn test_fill_large_blob() {
        let mut grid = BitGrid::new(300, 300);
        grid.data_mut().fill(u32::MAX);
        grid.clear_unused_bits();
        let mut visited = BitGrid::new(300, 300);
        let pts = flood_fill(&grid, &mut visited, 150, 150, ConnectivityType::EightWay).unwrap();
        assert_eq!(pts.len(), 90_000);
    }

    #[test]
    fn test_mask_mismatch() {
        let grid = BitGrid::new(3, 3);
        let mut visited = BitGrid::new(2, 3);
        assert!(flood_fill(&grid, &mut visited, 0, 0, ConnectivityType::FourWay).is_err());
    }

    #[test]
    fn test_count_enclosures() {
        let ring = BitGrid::from_rows(&["###", "#.#", "###"]).unwrap();
        assert_eq!(count_enclosures(&ring).unwrap(), 1);

        let eight = BitGrid::from_rows(&["###", "#.#", "###", "#.#", "###"]).unwrap();
        assert_eq!(count_enclosures(&eight).unwrap(), 2);

        let open = BitGrid::from_rows(&["###", "#..", "###"]).unwrap();
        assert_eq!(count_enclosures(&open).unwrap(), 0);

        // Diagonal gap: background does not leak through a corner
        let diag = BitGrid::from_rows(&[".##", "#.#", "##."]).unwrap();
        assert_eq!(count_enclosures(&diag).unwrap(), 1);

        assert_eq!(count_enclosures(&BitGrid::new(4, 4)).unwrap(), 0);
    }
}
