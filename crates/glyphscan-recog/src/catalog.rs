//! Template catalog
//!
//! The catalog holds, for every recognizable character, its traits and one
//! normalized template per font. It is parsed once from JSON:
//!
//! ```json
//! {"templateSize": {"cols": 20, "rows": 28},
//!  "templates": [{"character": "0", "enclosures": 1, "isDigit": true,
//!                 "matrices": [{"font": "mono", "cols": 5, "rows": 9,
//!                               "data": "0111010001..."}]}]}
//! ```
//!
//! Matrix `data` is row-major, either a string of `'0'`/`'1'` or an array
//! of 0/1 integers. Templates are resampled to the template size while
//! loading, so matching compares equal-sized grids only. Punctuation gets
//! a second, line-relative template that keeps the glyph's height and
//! position within its cell.

use std::collections::HashMap;

use glyphscan_core::{Artifact, BitGrid, Point};
use serde::Deserialize;

use crate::error::{RecogError, RecogResult};

/// Default template canvas width
pub const DEFAULT_TEMPLATE_COLS: u32 = 20;

/// Default template canvas height
pub const DEFAULT_TEMPLATE_ROWS: u32 = 28;

const BUNDLED_CATALOG: &str = include_str!("../../../assets/templates.json");

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    #[serde(default)]
    template_size: Option<RawSize>,
    templates: Vec<RawTemplate>,
}

#[derive(Deserialize)]
struct RawSize {
    cols: u32,
    rows: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemplate {
    character: String,
    #[serde(default)]
    enclosures: u32,
    #[serde(default)]
    is_letter: bool,
    #[serde(default)]
    is_digit: bool,
    #[serde(default)]
    is_punctuation: bool,
    #[serde(default)]
    is_amount: bool,
    #[serde(default)]
    is_date: bool,
    #[serde(default)]
    line_left: bool,
    #[serde(default)]
    line_right: bool,
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

impl RawMatrix {
    fn to_grid(&self) -> glyphscan_core::Result<BitGrid> {
        match &self.data {
            RawData::Bits(s) => BitGrid::from_bit_string(self.cols, self.rows, s),
            RawData::Cells(v) => {
                let bits: Vec<bool> = v.iter().map(|&c| c != 0).collect();
                BitGrid::from_bits(self.cols, self.rows, &bits)
            }
        }
    }
}

/// Size of the canvas every template is resampled to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSize {
    pub cols: u32,
    pub rows: u32,
}

impl Default for TemplateSize {
    fn default() -> Self {
        Self {
            cols: DEFAULT_TEMPLATE_COLS,
            rows: DEFAULT_TEMPLATE_ROWS,
        }
    }
}

/// Catalog flags of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharacterTraits {
    pub is_letter: bool,
    pub is_digit: bool,
    pub is_punctuation: bool,
    pub is_amount: bool,
    pub is_date: bool,
    /// Number of closed holes
    pub enclosures: u32,
    /// A full-height stroke on the left edge
    pub line_left: bool,
    /// A full-height stroke on the right edge
    pub line_right: bool,
}

/// One font variant of a character, already normalized
#[derive(Debug, Clone)]
pub struct Template {
    pub font: String,
    /// Trimmed and centered on the canvas
    pub grid: BitGrid,
    /// Positioned within the full glyph cell; punctuation only
    pub line_grid: Option<BitGrid>,
}

/// A character with its traits and templates
#[derive(Debug, Clone)]
pub struct CharacterDefinition {
    character: char,
    traits: CharacterTraits,
    templates: Vec<Template>,
}

impl CharacterDefinition {
    pub fn character(&self) -> char {
        self.character
    }

    pub fn traits(&self) -> &CharacterTraits {
        &self.traits
    }

    /// Normalized templates, one per font
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }
}

/// Vertical proportions of the catalog's glyph cells
///
/// `body_rows` is the height from the top of a cell to the baseline, taken
/// from the digits; `cell_rows` adds the descender area. The matcher uses
/// the ratio to extend a text line down to where a glyph cell would end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMetrics {
    pub cell_rows: u32,
    pub body_rows: u32,
}

/// The loaded template catalog
#[derive(Debug, Clone)]
pub struct CharacterDefinitions {
    template_size: TemplateSize,
    metrics: LineMetrics,
    definitions: Vec<CharacterDefinition>,
    index: HashMap<char, usize>,
}

impl CharacterDefinitions {
    /// Parse a catalog from JSON
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidCatalog`] if the JSON is malformed, the
    /// catalog is empty, a `character` is not exactly one character, a
    /// character appears twice, a template has no matrices, or a matrix's
    /// data length disagrees with `cols` x `rows`.
    pub fn from_json_str(json: &str) -> RecogResult<Self> {
        let raw: RawCatalog =
            serde_json::from_str(json).map_err(|e| RecogError::InvalidCatalog(e.to_string()))?;

        if raw.templates.is_empty() {
            return Err(RecogError::InvalidCatalog(
                "catalog has no templates".to_string(),
            ));
        }
        let template_size = match raw.template_size {
            Some(s) if s.cols == 0 || s.rows == 0 => {
                return Err(RecogError::InvalidCatalog(format!(
                    "template size {}x{} is empty",
                    s.cols, s.rows
                )));
            }
            Some(s) => TemplateSize {
                cols: s.cols,
                rows: s.rows,
            },
            None => TemplateSize::default(),
        };

        let mut definitions = Vec::with_capacity(raw.templates.len());
        let mut index = HashMap::new();
        let mut cell_rows = 0;
        let mut body_rows = 0;

        for template in raw.templates {
            let mut chars = template.character.chars();
            let character = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(RecogError::InvalidCatalog(format!(
                        "character {:?} must be a single character",
                        template.character
                    )));
                }
            };
            if index.contains_key(&character) {
                return Err(RecogError::InvalidCatalog(format!(
                    "character {:?} is defined twice",
                    character
                )));
            }
            if template.matrices.is_empty() {
                return Err(RecogError::InvalidCatalog(format!(
                    "character {:?} has no matrices",
                    character
                )));
            }

            let traits = CharacterTraits {
                is_letter: template.is_letter,
                is_digit: template.is_digit,
                is_punctuation: template.is_punctuation,
                is_amount: template.is_amount,
                is_date: template.is_date,
                enclosures: template.enclosures,
                line_left: template.line_left,
                line_right: template.line_right,
            };

            let mut templates = Vec::with_capacity(template.matrices.len());
            for matrix in &template.matrices {
                let grid = matrix.to_grid().map_err(|e| {
                    RecogError::InvalidCatalog(format!(
                        "character {:?}, font {:?}: {}",
                        character, matrix.font, e
                    ))
                })?;
                cell_rows = cell_rows.max(grid.rows());
                if traits.is_digit
                    && let Some(tight) = grid.tight_bounds()
                {
                    body_rows = body_rows.max(tight.bottom() as u32);
                }

                let cell = Artifact::new(grid, Point::new(0, 0));
                let line_grid = traits.is_punctuation.then(|| {
                    cell.normalize_in_line(
                        0,
                        matrix.rows as i32,
                        template_size.cols,
                        template_size.rows,
                    )
                });
                templates.push(Template {
                    font: matrix.font.clone(),
                    grid: cell.normalize(template_size.cols, template_size.rows),
                    line_grid,
                });
            }

            index.insert(character, definitions.len());
            definitions.push(CharacterDefinition {
                character,
                traits,
                templates,
            });
        }

        if body_rows == 0 {
            body_rows = cell_rows;
        }
        log::debug!(
            "loaded {} character definitions, template size {}x{}",
            definitions.len(),
            template_size.cols,
            template_size.rows
        );

        Ok(Self {
            template_size,
            metrics: LineMetrics {
                cell_rows,
                body_rows,
            },
            definitions,
            index,
        })
    }

    /// Read and parse a catalog file
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::AssetRead`] if the file cannot be read, or the
    /// errors of [`CharacterDefinitions::from_json_str`].
    pub fn load(path: &str) -> RecogResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| RecogError::AssetRead {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    /// The catalog compiled into the library
    pub fn bundled() -> RecogResult<Self> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    pub fn template_size(&self) -> TemplateSize {
        self.template_size
    }

    pub fn line_metrics(&self) -> LineMetrics {
        self.metrics
    }

    /// Number of characters
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Look up a character
    pub fn get(&self, character: char) -> Option<&CharacterDefinition> {
        self.index.get(&character).map(|&i| &self.definitions[i])
    }

    /// Definitions in catalog order
    pub fn iter(&self) -> std::slice::Iter<'_, CharacterDefinition> {
        self.definitions.iter()
    }

    pub fn definitions(&self) -> &[CharacterDefinition] {
        &self.definitions
    }
}
