//! Synthetic fixture rendering
//!
//! End-to-end tests need images of known text. Instead of shipping image
//! files, fixtures are drawn from the glyph matrices of the bundled
//! template catalog: every font cell becomes a `scale` x `scale` block of
//! black pixels on a white page.

use std::collections::HashMap;

use glyphscan_core::BitGrid;
use image::{Rgba, RgbaImage};
use serde::Deserialize;

use crate::error::{TestError, TestResult};
use crate::templates_path;

/// Name of the font used by [`render_text`]
pub const FIXTURE_FONT: &str = "mono";

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

#[derive(Deserialize)]
struct RawCatalog {
    templates: Vec<RawTemplate>,
}

#[derive(Deserialize)]
struct RawTemplate {
    character: String,
    matrices: Vec<RawMatrix>,
}

#[derive(Deserialize)]
struct RawMatrix {
    font: String,
    cols: u32,
    rows: u32,
    data: RawData,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawData {
    Bits(String),
    Cells(Vec<u8>),
}

/// Glyph bitmaps of one font, keyed by character
#[derive(Debug, Clone)]
pub struct Font {
    name: String,
    cell_rows: u32,
    glyphs: HashMap<char, BitGrid>,
}

impl Font {
    /// Load a font from the bundled template catalog
    pub fn load(name: &str) -> TestResult<Font> {
        let path = templates_path();
        let json = std::fs::read_to_string(&path).map_err(|e| TestError::AssetLoad {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json, name).map_err(|e| match e {
            TestError::AssetLoad { message, .. } => TestError::AssetLoad { path, message },
            other => other,
        })
    }

    /// Extract a font from catalog JSON
    pub fn from_json_str(json: &str, name: &str) -> TestResult<Font> {
        let raw: RawCatalog = serde_json::from_str(json).map_err(|e| TestError::AssetLoad {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;

        let mut glyphs = HashMap::new();
        let mut cell_rows = 0;
        for template in raw.templates {
            let mut chars = template.character.chars();
            let (Some(character), None) = (chars.next(), chars.next()) else {
                continue;
            };
            let Some(matrix) = template.matrices.into_iter().find(|m| m.font == name) else {
                continue;
            };
            let grid = match &matrix.data {
                RawData::Bits(s) => BitGrid::from_bit_string(matrix.cols, matrix.rows, s),
                RawData::Cells(v) => {
                    let bits: Vec<bool> = v.iter().map(|&c| c != 0).collect();
                    BitGrid::from_bits(matrix.cols, matrix.rows, &bits)
                }
            }
            .map_err(|e| TestError::MalformedGlyph {
                character,
                message: e.to_string(),
            })?;
            cell_rows = cell_rows.max(grid.rows());
            glyphs.insert(character, grid);
        }

        Ok(Font {
            name: name.to_string(),
            cell_rows,
            glyphs,
        })
    }

    /// Font name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Height of a glyph cell in font units
    pub fn cell_rows(&self) -> u32 {
        self.cell_rows
    }

    /// Full glyph cell for a character
    pub fn glyph(&self, character: char) -> TestResult<&BitGrid> {
        self.glyphs.get(&character).ok_or(TestError::MissingGlyph {
            font: self.name.clone(),
            character,
        })
    }

    /// Check if the font can draw a character
    pub fn contains(&self, character: char) -> bool {
        self.glyphs.contains_key(&character)
    }
}

/// Layout parameters for [`render_text`]
///
/// All spacings are in output pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Output pixels per font cell, in each direction
    pub scale: u32,
    /// Gap between adjacent glyphs of a word
    pub letter_spacing: u32,
    /// Extra advance for a space character
    pub word_spacing: u32,
    /// Blank rows between text lines
    pub line_gap: u32,
    /// White border around the text
    pub margin: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::with_scale(3)
    }
}

impl RenderOptions {
    /// Options for a scale, with spacings proportional to it
    pub fn with_scale(scale: u32) -> Self {
        Self {
            scale,
            letter_spacing: scale,
            word_spacing: 5 * scale,
            line_gap: 4 * scale,
            margin: 10,
        }
    }

    /// Set the gap between glyphs
    pub fn with_letter_spacing(mut self, px: u32) -> Self {
        self.letter_spacing = px;
        self
    }

    /// Set the advance of a space
    pub fn with_word_spacing(mut self, px: u32) -> Self {
        self.word_spacing = px;
        self
    }

    /// Set the gap between lines
    pub fn with_line_gap(mut self, px: u32) -> Self {
        self.line_gap = px;
        self
    }

    /// Set the page margin
    pub fn with_margin(mut self, px: u32) -> Self {
        self.margin = px;
        self
    }
}

/// Column range of a glyph's ink, or `None` for a blank cell
fn ink_columns(glyph: &BitGrid) -> Option<(u32, u32)> {
    glyph
        .tight_bounds()
        .map(|r| (r.x as u32, (r.x + r.w) as u32))
}

/// Width in pixels of one line of text
fn line_width(font: &Font, line: &str, options: &RenderOptions) -> TestResult<u32> {
    let mut width = 0u32;
    let mut previous_glyph = false;
    for c in line.chars() {
        if c == ' ' {
            width += options.word_spacing;
            previous_glyph = false;
            continue;
        }
        let Some((start, end)) = ink_columns(font.glyph(c)?) else {
            continue;
        };
        if previous_glyph {
            width += options.letter_spacing;
        }
        width += (end - start) * options.scale;
        previous_glyph = true;
    }
    Ok(width)
}

/// Draw text with a specific font
///
/// Glyphs are trimmed to their ink columns but keep the full cell height,
/// so baselines line up. Lines are separated by `'\n'`.
///
/// # Errors
///
/// Returns [`TestError::MissingGlyph`] for a character the font lacks.
pub fn render_text_with(font: &Font, text: &str, options: &RenderOptions) -> TestResult<RgbaImage> {
    let lines: Vec<&str> = text.split('\n').collect();
    let scale = options.scale.max(1);
    let line_height = font.cell_rows() * scale;

    let mut max_width = 0;
    for line in &lines {
        max_width = max_width.max(line_width(font, line, options)?);
    }
    let n = lines.len() as u32;
    let width = 2 * options.margin + max_width;
    let height = 2 * options.margin + n * line_height + n.saturating_sub(1) * options.line_gap;

    let mut image = RgbaImage::from_pixel(width, height, WHITE);
    for (li, line) in lines.iter().enumerate() {
        let top = options.margin + li as u32 * (line_height + options.line_gap);
        let mut x = options.margin;
        let mut previous_glyph = false;
        for c in line.chars() {
            if c == ' ' {
                x += options.word_spacing;
                previous_glyph = false;
                continue;
            }
            let glyph = font.glyph(c)?;
            let Some((start, end)) = ink_columns(glyph) else {
                continue;
            };
            if previous_glyph {
                x += options.letter_spacing;
            }
            for gy in 0..glyph.rows() {
                for gx in start..end {
                    if !glyph.get_unchecked(gx, gy) {
                        continue;
                    }
                    let px = x + (gx - start) * scale;
                    let py = top + gy * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            image.put_pixel(px + dx, py + dy, BLACK);
                        }
                    }
                }
            }
            x += (end - start) * scale;
            previous_glyph = true;
        }
    }

    Ok(image)
}

/// Draw text in the bundled fixture font
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or a character has no
/// glyph.
pub fn render_text(text: &str, options: &RenderOptions) -> TestResult<RgbaImage> {
    let font = Font::load(FIXTURE_FONT)?;
    render_text_with(&font, text, options)
}

/// A white page of the given size
pub fn blank_page(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, WHITE)
}

/// Print a grid as text rows to stderr
pub fn dump_grid(label: &str, grid: &BitGrid) {
    eprintln!("{} ({}x{}):", label, grid.cols(), grid.rows());
    for row in grid.to_rows() {
        eprintln!("  {}", row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_loads() {
        let font = Font::load(FIXTURE_FONT).unwrap();
        assert_eq!(font.cell_rows(), 9);
        assert!(font.contains('0'));
        assert!(font.contains('g'));
        assert!(!font.contains(' '));
        assert!(font.glyph('~').is_err());
    }

    #[test]
    fn test_render_digits_dimensions() {
        let options = RenderOptions::with_scale(3);
        let image = render_text("0123456789", &options).unwrap();
        assert_eq!(image.height(), 2 * 10 + 27);
        assert!(image.width() > 2 * 10);
        // Corners are margin
        assert_eq!(*image.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn test_render_spacing() {
        let options = RenderOptions::with_scale(1).with_margin(0);
        let one = render_text("1", &options).unwrap();
        let two = render_text("11", &options).unwrap();
        let spaced = render_text("1 1", &options).unwrap();
        assert_eq!(two.width(), 2 * one.width() + options.letter_spacing);
        assert_eq!(spaced.width(), 2 * one.width() + options.word_spacing);
    }

    #[test]
    fn test_render_lines() {
        let options = RenderOptions::with_scale(2);
        let image = render_text("A\nB", &options).unwrap();
        assert_eq!(image.height(), 2 * 10 + 2 * 18 + options.line_gap);
    }

    #[test]
    fn test_inline_font_cells() {
        let json = r#"{"templates":[{"character":"x",
            "matrices":[{"font":"f","cols":2,"rows":1,"data":[1,0]}]}]}"#;
        let font = Font::from_json_str(json, "f").unwrap();
        assert_eq!(font.glyph('x').unwrap().count_ones(), 1);
    }
}
