//! Template matching
//!
//! An artifact is resampled to the catalog's template canvas and compared
//! cell by cell with every template of every allowed character. The score
//! of a character is the fraction of agreeing cells averaged over all of
//! its font variants; the character with the highest average wins.
//!
//! Refinements applied on top of the plain score:
//!
//! - When punctuation wins, the punctuation characters are ranked again in
//!   line-relative form, so `,` and `'` differ by their height on the line
//! - Near ties are broken by shape traits measured on the artifact (holes
//!   and full-height edge strokes)
//! - A weak best match is rescored on 2x2 sub-blocks, ignoring the worst
//!   block, which tolerates local noise
//!
//! A character is always chosen; there is no "unknown" result.

use glyphscan_core::{Artifact, Band, Bands, BitGrid, GlyphMatch, Rect};
use glyphscan_region::count_enclosures;

use crate::catalog::{CharacterDefinition, CharacterDefinitions, LineMetrics, Template};
use crate::charset::AllowedCharacters;
use crate::error::{RecogError, RecogResult};

/// Default minimum score below which sub-block rescoring is tried
pub const DEFAULT_MATCHING_THRESHOLD: f64 = 0.4;

/// Scores this close to the best are decided by shape traits
pub const TIE_TOLERANCE: f64 = 0.01;

/// Best match for one artifact
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatch {
    /// Chosen character
    pub character: char,
    /// Index of the best-scoring template of the character, `None` for a space
    pub template_index: Option<usize>,
    /// Font of that template
    pub font: Option<String>,
    /// Aggregate score in `[0, 1]`
    pub score: f64,
}

impl ScoreMatch {
    fn space() -> Self {
        Self {
            character: ' ',
            template_index: None,
            font: None,
            score: 1.0,
        }
    }

    /// Convert into the match record stored on an artifact
    pub fn to_glyph_match(&self) -> GlyphMatch {
        GlyphMatch {
            character: self.character,
            font: self.font.clone(),
            score: self.score,
        }
    }
}

/// Options for matching
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Scores below this trigger sub-block rescoring
    pub threshold: f64,
    /// Characters that may be emitted
    pub allowed: AllowedCharacters,
    /// Enable sub-block rescoring of weak matches
    pub retry_sub_blocks: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCHING_THRESHOLD,
            allowed: AllowedCharacters::All,
            retry_sub_blocks: true,
        }
    }
}

impl MatchOptions {
    /// Set the matching threshold
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the allowed characters
    pub fn with_allowed(mut self, allowed: AllowedCharacters) -> Self {
        self.allowed = allowed;
        self
    }

    /// Enable or disable sub-block rescoring
    pub fn with_retry_sub_blocks(mut self, retry: bool) -> Self {
        self.retry_sub_blocks = retry;
        self
    }

    /// Validate the options
    pub fn validate(&self) -> RecogResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(RecogError::InvalidParameter(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Vertical extent of a text line in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBox {
    pub top: i32,
    pub bottom: i32,
}

impl LineBox {
    /// Estimate the glyph-cell extent of a band
    ///
    /// The baseline is the most common bottom edge of the band's glyphs.
    /// The line runs from the band top to the baseline, extended by the
    /// catalog's cell-to-body ratio so descender room matches the
    /// templates.
    pub fn of_band(band: &Band, metrics: &LineMetrics) -> Self {
        let bounds = band.bounds();
        let fallback = Self {
            top: bounds.y,
            bottom: bounds.bottom(),
        };

        let mut bottoms: Vec<i32> = band
            .artifacts()
            .iter()
            .filter(|a| !a.is_space())
            .map(|a| a.bounds().bottom())
            .collect();
        if bottoms.is_empty() || metrics.body_rows == 0 {
            return fallback;
        }
        bottoms.sort_unstable();

        // Most frequent bottom edge; the lower edge wins a tie
        let mut baseline = bottoms[0];
        let mut best_run = 0;
        let mut run = 0;
        for (i, &b) in bottoms.iter().enumerate() {
            run = if i > 0 && bottoms[i - 1] == b { run + 1 } else { 1 };
            if run >= best_run {
                best_run = run;
                baseline = b;
            }
        }

        let body = (baseline - bounds.y) as i64;
        if body <= 0 {
            return fallback;
        }
        let cell = metrics.cell_rows as i64;
        let rows = metrics.body_rows as i64;
        let height = (2 * body * cell + rows) / (2 * rows);
        Self {
            top: bounds.y,
            bottom: bounds.y + height as i32,
        }
    }
}

/// Shape traits measured on an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasuredTraits {
    pub enclosures: u32,
    pub line_left: bool,
    pub line_right: bool,
}

/// Measure holes and edge strokes of an artifact
///
/// An edge counts as a stroke when its column is at least 80% set.
pub fn measure_traits(artifact: &Artifact) -> RecogResult<MeasuredTraits> {
    let grid = artifact.grid();
    let Some(tight) = grid.tight_bounds() else {
        return Ok(MeasuredTraits {
            enclosures: 0,
            line_left: false,
            line_right: false,
        });
    };
    let trimmed = grid.crop(&tight);
    let counts = trimmed.column_counts();
    let rows = trimmed.rows();
    let full = |count: u32| count * 5 >= rows * 4;

    Ok(MeasuredTraits {
        enclosures: count_enclosures(&trimmed)?,
        line_left: counts.first().is_some_and(|&c| full(c)),
        line_right: counts.last().is_some_and(|&c| full(c)),
    })
}

fn trait_agreement(definition: &CharacterDefinition, measured: &MeasuredTraits) -> u32 {
    let traits = definition.traits();
    u32::from(traits.enclosures == measured.enclosures)
        + u32::from(traits.line_left == measured.line_left)
        + u32::from(traits.line_right == measured.line_right)
}

#[derive(Clone, Copy)]
struct Candidate<'a> {
    definition: &'a CharacterDefinition,
    score: f64,
    template_index: usize,
}

/// Which normalized form of the templates to compare against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Centered,
    InLine,
}

fn template_grid(template: &Template, form: Form) -> Option<&BitGrid> {
    match form {
        Form::Centered => Some(&template.grid),
        Form::InLine => template.line_grid.as_ref(),
    }
}

/// Average score over the templates of a definition, and the best template
///
/// Returns `None` when the definition has no template in the given form.
fn score_definition<F>(
    definition: &CharacterDefinition,
    form: Form,
    mut score: F,
) -> RecogResult<Option<(f64, usize)>>
where
    F: FnMut(&BitGrid) -> RecogResult<f64>,
{
    let mut total = 0.0;
    let mut count = 0;
    let mut best = (f64::MIN, 0);
    for (i, template) in definition.templates().iter().enumerate() {
        let Some(grid) = template_grid(template, form) else {
            continue;
        };
        let s = score(grid)?;
        total += s;
        count += 1;
        if s > best.0 {
            best = (s, i);
        }
    }
    Ok((count > 0).then(|| (total / count as f64, best.1)))
}

/// Score on 2x2 blocks, averaging the best three
fn sub_block_score(shape: &BitGrid, template: &BitGrid) -> RecogResult<f64> {
    let (cols, rows) = (shape.cols() as i32, shape.rows() as i32);
    let (hc, hr) = (cols / 2, rows / 2);
    let blocks = [
        Rect::new_unchecked(0, 0, hc, hr),
        Rect::new_unchecked(hc, 0, cols - hc, hr),
        Rect::new_unchecked(0, hr, hc, rows - hr),
        Rect::new_unchecked(hc, hr, cols - hc, rows - hr),
    ];
    let mut scores = Vec::with_capacity(blocks.len());
    for block in &blocks {
        scores.push(shape.xnor_ratio_in(template, block)?);
    }
    scores.sort_by(|a, b| b.total_cmp(a));
    Ok(scores[..3].iter().sum::<f64>() / 3.0)
}

fn score_all<'a, F>(
    definitions: &[&'a CharacterDefinition],
    form: Form,
    mut score: F,
) -> RecogResult<Vec<Candidate<'a>>>
where
    F: FnMut(&BitGrid) -> RecogResult<f64>,
{
    let mut candidates = Vec::with_capacity(definitions.len());
    for &definition in definitions {
        if let Some((score, template_index)) = score_definition(definition, form, &mut score)? {
            candidates.push(Candidate {
                definition,
                score,
                template_index,
            });
        }
    }
    Ok(candidates)
}

/// Pick the best candidate; the earliest wins an exact tie
fn best_of<'a>(candidates: &[Candidate<'a>]) -> Option<Candidate<'a>> {
    let mut best: Option<Candidate<'a>> = None;
    for &c in candidates {
        if best.is_none_or(|b| c.score > b.score) {
            best = Some(c);
        }
    }
    best
}

/// Rank definitions against one normalized shape
///
/// Near ties are resolved by trait agreement, then by score, so the winner
/// need not hold the highest aggregate score. A weak winner triggers
/// sub-block rescoring of the same definitions.
fn rank<'a>(
    artifact: &Artifact,
    shape: &BitGrid,
    definitions: &[&'a CharacterDefinition],
    form: Form,
    options: &MatchOptions,
) -> RecogResult<Option<Candidate<'a>>> {
    let candidates = score_all(definitions, form, |t| Ok(shape.xnor_ratio(t)?))?;
    let Some(best) = best_of(&candidates) else {
        return Ok(None);
    };

    let mut chosen = best;
    let close: Vec<Candidate> = candidates
        .iter()
        .copied()
        .filter(|c| best.score - c.score <= TIE_TOLERANCE)
        .collect();
    if close.len() > 1 {
        let measured = measure_traits(artifact)?;
        for c in close {
            let ours = trait_agreement(c.definition, &measured);
            let theirs = trait_agreement(chosen.definition, &measured);
            if ours > theirs || (ours == theirs && c.score > chosen.score) {
                chosen = c;
            }
        }
    }

    if chosen.score < options.threshold && options.retry_sub_blocks {
        let rescored = score_all(definitions, form, |t| sub_block_score(shape, t))?;
        if let Some(best) = best_of(&rescored) {
            log::trace!(
                "weak match {:?} ({:.3}) rescored as {:?} ({:.3})",
                chosen.definition.character(),
                chosen.score,
                best.definition.character(),
                best.score
            );
            chosen = best;
        }
    }
    Ok(Some(chosen))
}

/// Find the best character for an artifact
///
/// Every allowed character is first compared in centered form. When the
/// winner is punctuation and the text line is known, the punctuation
/// characters are ranked again in line-relative form.
///
/// # Arguments
///
/// * `artifact` - Artifact to recognize
/// * `line` - Extent of the artifact's text line; `None` skips the
///   line-relative pass
/// * `catalog` - Template catalog
/// * `options` - Matching options
///
/// # Returns
///
/// The best match. A space artifact gives `' '` with score 1. After the
/// trait tie-break and the line-relative punctuation pass, the returned
/// character is not always the one with the highest centered score.
///
/// # Errors
///
/// Returns an error if the options are invalid.
pub fn match_artifact(
    artifact: &Artifact,
    line: Option<&LineBox>,
    catalog: &CharacterDefinitions,
    options: &MatchOptions,
) -> RecogResult<ScoreMatch> {
    options.validate()?;
    if artifact.is_space() {
        return Ok(ScoreMatch::space());
    }

    let mut definitions: Vec<&CharacterDefinition> =
        catalog.iter().filter(|d| options.allowed.allows(d)).collect();
    if definitions.is_empty() {
        definitions = catalog.iter().collect();
    }

    let size = catalog.template_size();
    let shape = artifact.normalize(size.cols, size.rows);
    let Some(mut chosen) = rank(artifact, &shape, &definitions, Form::Centered, options)? else {
        return Err(RecogError::InvalidCatalog("catalog is empty".to_string()));
    };

    if let Some(line) = line
        && chosen.definition.traits().is_punctuation
    {
        let punctuation: Vec<&CharacterDefinition> = definitions
            .iter()
            .copied()
            .filter(|d| d.traits().is_punctuation)
            .collect();
        let line_shape = artifact.normalize_in_line(line.top, line.bottom, size.cols, size.rows);
        if let Some(c) = rank(artifact, &line_shape, &punctuation, Form::InLine, options)? {
            chosen = c;
        }
    }

    Ok(ScoreMatch {
        character: chosen.definition.character(),
        template_index: Some(chosen.template_index),
        font: chosen
            .definition
            .templates()
            .get(chosen.template_index)
            .map(|t| t.font.clone()),
        score: chosen.score,
    })
}

/// Match every unmatched artifact of every band and record the results
///
/// # Returns
///
/// The number of non-space artifacts matched.
pub fn recognize_bands(
    bands: &mut Bands,
    catalog: &CharacterDefinitions,
    options: &MatchOptions,
) -> RecogResult<usize> {
    options.validate()?;
    let metrics = catalog.line_metrics();
    let mut matched = 0;
    for band in bands.iter_mut() {
        let line = LineBox::of_band(band, &metrics);
        for artifact in band.artifacts_mut() {
            if artifact.is_matched() {
                continue;
            }
            let m = match_artifact(artifact, Some(&line), catalog, options)?;
            if !artifact.is_space() {
                log::trace!(
                    "{:?} -> {:?} ({:.3})",
                    artifact.bounds(),
                    m.character,
                    m.score
                );
                matched += 1;
            }
            artifact.assign(m.to_glyph_match())?;
        }
    }
    Ok(matched)
}
