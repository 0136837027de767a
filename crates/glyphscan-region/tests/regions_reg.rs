//! Region finding regression test
//!
//!   Test 0: flood fill handles a large blob and rejects bad seeds
//!   Test 1: the dilation size decides between glyph and block regions
//!   Test 2: ruled lines are dropped only when requested
//!   Test 3: enclosures of rendered glyphs
//!
//! Run with:
//! ```
//! cargo test -p glyphscan-region --test regions_reg
//! ```

use glyphscan_core::BitGrid;
use glyphscan_morph::dilate;
use glyphscan_region::{
    ConnectivityType, RegionOptions, count_enclosures, find_regions, flood_fill,
};
use glyphscan_test::{RegParams, RenderOptions, render_text};
use image::RgbaImage;

fn to_grid(image: &RgbaImage) -> BitGrid {
    let mut grid = BitGrid::new(image.width(), image.height());
    for (x, y, p) in image.enumerate_pixels() {
        if p.0[0] < 128 {
            grid.set_unchecked(x, y, true);
        }
    }
    grid
}

fn regions(grid: &BitGrid, kernel: u32, exclude_long_lines: bool) -> usize {
    let dilated = dilate(grid, kernel).expect("dilate");
    let options = RegionOptions::default()
        .with_kernel_size(kernel)
        .with_exclude_long_lines(exclude_long_lines);
    find_regions(&dilated, &options).expect("regions").len()
}

#[test]
fn test_0_flood_fill() {
    let mut rp = RegParams::new("regions_0_flood_fill");

    // Big enough that a recursive fill would exhaust the stack
    let blob = BitGrid::from_bits(600, 600, &vec![true; 600 * 600]).expect("blob");
    let mut visited = BitGrid::new(600, 600);
    let cells = flood_fill(&blob, &mut visited, 300, 300, ConnectivityType::FourWay)
        .expect("fill");
    rp.compare_values(360_000.0, cells.len() as f64, 0.0);
    rp.compare_values(cells.len() as f64, visited.count_ones() as f64, 0.0);

    // Already visited, outside, and unset seeds give nothing
    let again = flood_fill(&blob, &mut visited, 0, 0, ConnectivityType::FourWay).expect("fill");
    rp.compare_values(0.0, again.len() as f64, 0.0);
    let mut fresh = BitGrid::new(600, 600);
    let outside =
        flood_fill(&blob, &mut fresh, -1, 5, ConnectivityType::EightWay).expect("fill");
    rp.compare_values(0.0, outside.len() as f64, 0.0);
    let outside =
        flood_fill(&blob, &mut fresh, 5, 600, ConnectivityType::EightWay).expect("fill");
    rp.compare_values(0.0, outside.len() as f64, 0.0);
    let empty = BitGrid::new(600, 600);
    let unset = flood_fill(&empty, &mut fresh, 5, 5, ConnectivityType::EightWay).expect("fill");
    rp.compare_values(0.0, unset.len() as f64, 0.0);
    rp.compare_values(0.0, fresh.count_ones() as f64, 0.0);

    // A mask of the wrong size is an error
    let mut small = BitGrid::new(10, 10);
    let mismatch = flood_fill(&blob, &mut small, 0, 0, ConnectivityType::FourWay);
    rp.compare_values(1.0, mismatch.is_err() as u8 as f64, 0.0);

    assert!(rp.cleanup(), "regions flood fill test failed");
}

#[test]
fn test_1_dilation_size() {
    let mut rp = RegParams::new("regions_1_dilation");

    let grid = to_grid(&render_text("12 34\n56", &RenderOptions::default()).expect("render"));
    // A small kernel keeps glyphs apart
    rp.compare_values(6.0, regions(&grid, 3, true) as f64, 0.0);
    // A large one joins words and lines into one block
    rp.compare_values(1.0, regions(&grid, 22, true) as f64, 0.0);

    assert!(rp.cleanup(), "regions dilation test failed");
}

#[test]
fn test_2_long_lines() {
    let mut rp = RegParams::new("regions_2_long_lines");

    let options = RenderOptions::default().with_margin(60);
    let mut grid = to_grid(&render_text("42", &options).expect("render"));
    let (cols, rows) = (grid.cols(), grid.rows());
    for y in rows - 12..rows - 10 {
        for x in 5..cols - 5 {
            grid.set_unchecked(x, y, true);
        }
    }

    rp.compare_values(1.0, regions(&grid, 22, true) as f64, 0.0);
    rp.compare_values(2.0, regions(&grid, 22, false) as f64, 0.0);

    assert!(rp.cleanup(), "regions long lines test failed");
}

#[test]
fn test_3_enclosures() {
    let mut rp = RegParams::new("regions_3_enclosures");

    for (c, holes) in [('0', 2), ('8', 2), ('A', 1), ('e', 1), ('1', 0), ('&', 2), ('M', 0)] {
        let page = render_text(&c.to_string(), &RenderOptions::default()).expect("render");
        let count = count_enclosures(&to_grid(&page)).expect("enclosures");
        rp.compare_values(holes as f64, count as f64, 0.0);
    }

    assert!(rp.cleanup(), "regions enclosures test failed");
}
