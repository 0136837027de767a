//! Binarization regression test
//!
//!   Test 0: a rendered page keeps exactly its ink pixels
//!   Test 1: binarize and binarize_to_grid agree, output is opaque
//!   Test 2: the threshold follows the page brightness
//!   Test 3: contrast outside [-255, 255] is rejected
//!
//! Run with:
//! ```
//! cargo test -p glyphscan-color --test threshold_reg
//! ```

use glyphscan_color::{
    THRESHOLD_OFFSET, binarize, binarize_to_grid, compute_adaptive_threshold, luma_plane,
    to_bit_grid,
};
use glyphscan_test::{RegParams, RenderOptions, render_text};
use image::{Rgba, RgbaImage};

fn dark_pixels(image: &RgbaImage) -> u64 {
    image.pixels().filter(|p| p.0[0] < 128).count() as u64
}

#[test]
fn test_0_rendered_page() {
    let mut rp = RegParams::new("threshold_0_rendered");

    let page = render_text("8 & 3", &RenderOptions::default()).expect("render");
    let grid = binarize_to_grid(&page, 0).expect("binarize");
    rp.compare_values(page.width() as f64, grid.cols() as f64, 0.0);
    rp.compare_values(page.height() as f64, grid.rows() as f64, 0.0);
    rp.compare_values(dark_pixels(&page) as f64, grid.count_ones() as f64, 0.0);

    assert!(rp.cleanup(), "threshold rendered test failed");
}

#[test]
fn test_1_image_and_grid_agree() {
    let mut rp = RegParams::new("threshold_1_agree");

    let mut page = render_text("42", &RenderOptions::default()).expect("render");
    // Transparent pixels still binarize by color; the output is opaque
    for x in 0..page.width() {
        page.put_pixel(x, 0, Rgba([255, 255, 255, 0]));
    }
    let binary = binarize(&page, 0).expect("binarize");
    let opaque = binary.pixels().all(|p| p.0[3] == 255);
    rp.compare_values(1.0, opaque as u8 as f64, 0.0);

    let direct = binarize_to_grid(&page, 0).expect("binarize");
    rp.compare_grids(&to_bit_grid(&binary), &direct);

    assert!(rp.cleanup(), "threshold agree test failed");
}

#[test]
fn test_2_threshold_tracks_brightness() {
    let mut rp = RegParams::new("threshold_2_brightness");

    // Mid-gray text on a light gray page
    let mut page = RgbaImage::from_pixel(40, 20, Rgba([200, 200, 200, 255]));
    for x in 10..30 {
        for y in 8..12 {
            page.put_pixel(x, y, Rgba([60, 60, 60, 255]));
        }
    }
    let luma = luma_plane(&page, 0).expect("luma");
    let mean = luma.iter().sum::<f64>() / luma.len() as f64;
    rp.compare_values(mean - THRESHOLD_OFFSET, compute_adaptive_threshold(&luma), 1e-9);
    let grid = binarize_to_grid(&page, 0).expect("binarize");
    rp.compare_values(80.0, grid.count_ones() as f64, 0.0);

    // A uniform page has no ink at all
    let flat = RgbaImage::from_pixel(16, 16, Rgba([128, 128, 128, 255]));
    let grid = binarize_to_grid(&flat, 0).expect("binarize");
    rp.compare_values(0.0, grid.count_ones() as f64, 0.0);

    assert!(rp.cleanup(), "threshold brightness test failed");
}

#[test]
fn test_3_contrast_range() {
    let mut rp = RegParams::new("threshold_3_contrast");

    let page = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
    for contrast in [-255, -50, 0, 50, 255] {
        rp.compare_values(1.0, binarize_to_grid(&page, contrast).is_ok() as u8 as f64, 0.0);
    }
    for contrast in [-256, 256, 1000] {
        rp.compare_values(1.0, binarize_to_grid(&page, contrast).is_err() as u8 as f64, 0.0);
    }

    assert!(rp.cleanup(), "threshold contrast test failed");
}
