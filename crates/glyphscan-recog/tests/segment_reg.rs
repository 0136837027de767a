//! Band assembly and character splitting regression test
//!
//! Pages are rendered from the bundled font, binarized, dilated and cut
//! into regions, then assembled into bands:
//!
//!   Test 0: one line of digits gives one band of ten glyphs
//!   Test 1: two lines give two bands in reading order
//!   Test 2: a word gap gives a space artifact
//!   Test 3: glyphs one pixel apart are split only when splitting is on
//!   Test 4: valley thresholds of representative histograms

use glyphscan_color::binarize_to_grid;
use glyphscan_core::{Bands, BitGrid};
use glyphscan_morph::dilate;
use glyphscan_recog::{
    SegmentOptions, SplitOptions, calculate_valley_threshold, get_bands_of_artifacts,
    split_wide_artifacts,
};
use glyphscan_region::{RegionOptions, find_regions};
use glyphscan_test::{RegParams, RenderOptions, dump_grid, init_logger, render_text};

const KERNEL: u32 = 22;

fn page(text: &str, options: &RenderOptions) -> BitGrid {
    let image = render_text(text, options).expect("render fixture");
    binarize_to_grid(&image, 0).expect("binarize")
}

fn bands_of(grid: &BitGrid) -> Bands {
    let dilated = dilate(grid, KERNEL).expect("dilate");
    let options = RegionOptions::default().with_kernel_size(KERNEL);
    let regions = find_regions(&dilated, &options).expect("find regions");
    get_bands_of_artifacts(grid, &regions, &SegmentOptions::default()).expect("assemble bands")
}

#[test]
fn test_0_digit_line() {
    init_logger();
    let mut rp = RegParams::new("segment_0_digit_line");

    let grid = page("0123456789", &RenderOptions::default());
    if rp.display() {
        dump_grid("digits", &grid);
    }
    let bands = bands_of(&grid);
    rp.compare_values(1.0, bands.len() as f64, 0.0);
    let band = bands.get(0).expect("one band");
    rp.compare_values(10.0, band.len() as f64, 0.0);
    rp.compare_values(10.0, band.glyph_count() as f64, 0.0);

    // Glyphs are ordered left to right and keep the full digit height
    let xs: Vec<i32> = band.artifacts().iter().map(|a| a.bounds().x).collect();
    let sorted = xs.windows(2).all(|w| w[0] < w[1]);
    rp.compare_values(1.0, if sorted { 1.0 } else { 0.0 }, 0.0);
    for artifact in band.artifacts() {
        rp.compare_values(21.0, artifact.height() as f64, 0.0);
    }

    assert!(rp.cleanup(), "segment digit line test failed");
}

#[test]
fn test_1_two_lines() {
    init_logger();
    let mut rp = RegParams::new("segment_1_two_lines");

    let bands = bands_of(&page("12\n34", &RenderOptions::default()));
    rp.compare_values(2.0, bands.len() as f64, 0.0);
    if let (Some(first), Some(second)) = (bands.get(0), bands.get(1)) {
        rp.compare_values(1.0, (first.bounds().y < second.bounds().y) as u8 as f64, 0.0);
        rp.compare_values(2.0, first.glyph_count() as f64, 0.0);
        rp.compare_values(2.0, second.glyph_count() as f64, 0.0);
    }

    assert!(rp.cleanup(), "segment two lines test failed");
}

#[test]
fn test_2_word_gap() {
    init_logger();
    let mut rp = RegParams::new("segment_2_word_gap");

    let bands = bands_of(&page("12 34", &RenderOptions::default()));
    rp.compare_values(1.0, bands.len() as f64, 0.0);
    let band = bands.get(0).expect("one band");
    rp.compare_values(5.0, band.len() as f64, 0.0);
    let spaces: Vec<usize> = band
        .artifacts()
        .iter()
        .enumerate()
        .filter(|(_, a)| a.is_space())
        .map(|(i, _)| i)
        .collect();
    rp.compare_values(1.0, spaces.len() as f64, 0.0);
    rp.compare_values(2.0, spaces.first().copied().unwrap_or(0) as f64, 0.0);

    assert!(rp.cleanup(), "segment word gap test failed");
}

#[test]
fn test_3_touching_glyphs() {
    init_logger();
    let mut rp = RegParams::new("segment_3_touching_glyphs");

    let options = RenderOptions::default().with_letter_spacing(1);
    let grid = page("00", &options);

    // Without splitting the pair stays one artifact
    let merged = bands_of(&grid);
    let band = merged.get(0).expect("one band");
    rp.compare_values(1.0, band.glyph_count() as f64, 0.0);
    rp.compare_values(31.0, band.artifacts()[0].width() as f64, 0.0);

    // With splitting it becomes two digit-sized pieces
    let mut split = merged.clone();
    let added = split_wide_artifacts(&mut split, &SplitOptions::default()).expect("split");
    rp.compare_values(1.0, added as f64, 0.0);
    let band = split.get(0).expect("one band");
    rp.compare_values(2.0, band.glyph_count() as f64, 0.0);
    for artifact in band.artifacts() {
        rp.compare_values(15.0, artifact.width() as f64, 0.0);
    }

    assert!(rp.cleanup(), "segment touching glyphs test failed");
}

#[test]
fn test_4_valley_threshold() {
    let mut rp = RegParams::new("segment_4_valley_threshold");

    rp.compare_values(-1.0, calculate_valley_threshold(&[7, 3]) as f64, 0.0);
    rp.compare_values(-1.0, calculate_valley_threshold(&[1, 2, 4, 8, 9]) as f64, 0.0);
    rp.compare_values(-1.0, calculate_valley_threshold(&[9, 6, 4, 1]) as f64, 0.0);
    rp.compare_values(0.0, calculate_valley_threshold(&[15, 9, 15, 0, 15, 9, 15]) as f64, 0.0);
    rp.compare_values(4.0, calculate_valley_threshold(&[9, 4, 9, 6, 9]) as f64, 0.0);

    assert!(rp.cleanup(), "valley threshold test failed");
}
