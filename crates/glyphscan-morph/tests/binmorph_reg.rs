//! Binary morphology regression test
//!
//!   Test 0: dilation grows a rendered page and keeps every ink pixel
//!   Test 1: erosion only removes ink
//!   Test 2: closing matches dilate-then-erode away from the border
//!
//! Run with:
//! ```
//! cargo test -p glyphscan-morph --test binmorph_reg
//! ```

use glyphscan_core::BitGrid;
use glyphscan_morph::{close, dilate, erode};
use glyphscan_test::{RegParams, RenderOptions, render_text};

/// Rendered text as a grid with the ink set
fn page(text: &str) -> BitGrid {
    let image = render_text(text, &RenderOptions::default()).expect("render");
    let mut grid = BitGrid::new(image.width(), image.height());
    for (x, y, p) in image.enumerate_pixels() {
        if p.0[0] < 128 {
            grid.set_unchecked(x, y, true);
        }
    }
    grid
}

/// Every set cell of `inner` is set in `outer`
fn contains(outer: &BitGrid, inner: &BitGrid) -> bool {
    (0..inner.rows()).all(|y| {
        (0..inner.cols()).all(|x| !inner.get_unchecked(x, y) || outer.get_unchecked(x, y))
    })
}

#[test]
fn test_0_dilate() {
    let mut rp = RegParams::new("binmorph_0_dilate");

    let grid = page("ABC 123");
    let bounds = grid.tight_bounds().expect("ink");
    let mut previous = grid.count_ones();
    for size in [1, 3, 5, 9] {
        let dilated = dilate(&grid, size).expect("dilate");
        rp.compare_values(1.0, contains(&dilated, &grid) as u8 as f64, 0.0);
        rp.compare_values(1.0, (dilated.count_ones() >= previous) as u8 as f64, 0.0);
        previous = dilated.count_ones();

        // Ink is far from the border, so the bounds grow by size - 1
        let grown = dilated.tight_bounds().expect("ink");
        rp.compare_values((bounds.w + size as i32 - 1) as f64, grown.w as f64, 0.0);
        rp.compare_values((bounds.h + size as i32 - 1) as f64, grown.h as f64, 0.0);
    }

    assert!(rp.cleanup(), "binmorph dilate test failed");
}

#[test]
fn test_1_erode() {
    let mut rp = RegParams::new("binmorph_1_erode");

    let grid = page("HIMW");
    for size in [2, 3] {
        let eroded = erode(&grid, size).expect("erode");
        rp.compare_values(1.0, contains(&grid, &eroded) as u8 as f64, 0.0);
        rp.compare_values(1.0, (eroded.count_ones() < grid.count_ones()) as u8 as f64, 0.0);
    }
    // Strokes are 3 pixels thick; a 4-pixel kernel removes them all
    let gone = erode(&grid, 4).expect("erode");
    rp.compare_values(0.0, gone.count_ones() as f64, 0.0);

    assert!(rp.cleanup(), "binmorph erode test failed");
}

#[test]
fn test_2_close() {
    let mut rp = RegParams::new("binmorph_2_close");

    let grid = page("e3 %");
    for size in [2, 3] {
        let closed = close(&grid, size).expect("close");
        let manual = erode(&dilate(&grid, size).expect("dilate"), size).expect("erode");
        rp.compare_grids(&manual, &closed);
        rp.compare_values(1.0, contains(&closed, &grid) as u8 as f64, 0.0);
    }

    assert!(rp.cleanup(), "binmorph close test failed");
}
