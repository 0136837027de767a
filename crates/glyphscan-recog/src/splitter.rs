//! Character splitter
//!
//! Glyphs printed close together can end up in one artifact. An artifact
//! wider than `width_ratio` times its band height is treated as a chunk of
//! touching glyphs and cut at the valleys of its column histogram.
//!
//! The split is a heuristic: a legitimately wide glyph with a deep valley
//! can be over-split and glyphs fused by a thick stroke stay together.

use glyphscan_core::{Artifact, Bands};

use crate::error::{RecogError, RecogResult};

/// Default width, relative to the band height, that marks a wide chunk
pub const DEFAULT_SPLIT_WIDTH_RATIO: f64 = 1.0;

/// Default limit on how often a piece is split again
pub const DEFAULT_MAX_SPLIT_DEPTH: u32 = 4;

/// Options for character splitting
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Width relative to the band height above which an artifact is split
    pub width_ratio: f64,
    /// Recursion limit for re-splitting pieces
    pub max_depth: u32,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            width_ratio: DEFAULT_SPLIT_WIDTH_RATIO,
            max_depth: DEFAULT_MAX_SPLIT_DEPTH,
        }
    }
}

impl SplitOptions {
    /// Set the width ratio trigger
    pub fn with_width_ratio(mut self, ratio: f64) -> Self {
        self.width_ratio = ratio;
        self
    }

    /// Set the recursion limit
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Validate the options
    pub fn validate(&self) -> RecogResult<()> {
        if !self.width_ratio.is_finite() || self.width_ratio <= 0.0 {
            return Err(RecogError::InvalidParameter(format!(
                "width_ratio must be positive, got {}",
                self.width_ratio
            )));
        }
        Ok(())
    }
}

/// Find the cut level of a column histogram
///
/// A local minimum is an interior bin no greater than either neighbor
/// and smaller than at least one of them.
///
/// # Returns
///
/// The smallest local-minimum value, or -1 if the histogram has fewer
/// than 3 bins or no local minimum.
pub fn calculate_valley_threshold(histogram: &[u32]) -> i32 {
    if histogram.len() < 3 {
        return -1;
    }
    histogram
        .windows(3)
        .filter(|w| w[1] <= w[0] && w[1] <= w[2] && (w[1] < w[0] || w[1] < w[2]))
        .map(|w| w[1] as i32)
        .min()
        .unwrap_or(-1)
}

/// Check if an artifact is wide enough to be split
pub fn is_wide(artifact: &Artifact, band_height: i32, width_ratio: f64) -> bool {
    !artifact.is_space() && artifact.width() as f64 > width_ratio * band_height as f64
}

/// Cut columns: the middle of every interior run at or below `threshold`
fn cut_columns(counts: &[u32], threshold: u32) -> Vec<u32> {
    let mut cuts = Vec::new();
    let mut x = 0;
    while x < counts.len() {
        if counts[x] > threshold {
            x += 1;
            continue;
        }
        let start = x;
        while x < counts.len() && counts[x] <= threshold {
            x += 1;
        }
        if start > 0 && x < counts.len() {
            cuts.push(((start + x) / 2) as u32);
        }
    }
    cuts
}

fn split_into(
    artifact: Artifact,
    band_height: i32,
    options: &SplitOptions,
    depth: u32,
    out: &mut Vec<Artifact>,
) -> RecogResult<()> {
    if depth >= options.max_depth || !is_wide(&artifact, band_height, options.width_ratio) {
        out.push(artifact);
        return Ok(());
    }

    let counts = artifact.grid().column_counts();
    let threshold = calculate_valley_threshold(&counts);
    if threshold < 0 {
        out.push(artifact);
        return Ok(());
    }
    let cuts = cut_columns(&counts, threshold as u32);
    if cuts.is_empty() {
        out.push(artifact);
        return Ok(());
    }
    log::trace!(
        "splitting {:?} at columns {:?} (valley {})",
        artifact.bounds(),
        cuts,
        threshold
    );

    let mut start = 0;
    for end in cuts.into_iter().chain(std::iter::once(artifact.grid().cols())) {
        let mut piece = artifact.column_slice(start, end);
        start = end;
        piece.trim()?;
        if !piece.is_space() {
            split_into(piece, band_height, options, depth + 1, out)?;
        }
    }
    Ok(())
}

/// Split one artifact into glyph-sized pieces
///
/// # Arguments
///
/// * `artifact` - Candidate chunk
/// * `band_height` - Height of the band it belongs to
/// * `options` - Split options
///
/// # Returns
///
/// The trimmed pieces left to right, or the artifact itself when it is not
/// wide or its histogram has no usable valley.
pub fn split_artifact(
    artifact: &Artifact,
    band_height: i32,
    options: &SplitOptions,
) -> RecogResult<Vec<Artifact>> {
    options.validate()?;
    let mut pieces = Vec::new();
    split_into(artifact.clone(), band_height, options, 0, &mut pieces)?;
    Ok(pieces)
}

/// Split every wide artifact of every band in place
///
/// # Returns
///
/// The number of artifacts added by splitting.
pub fn split_wide_artifacts(bands: &mut Bands, options: &SplitOptions) -> RecogResult<usize> {
    options.validate()?;
    let mut added = 0;
    for band in bands.iter_mut() {
        let height = band.bounds().h;
        let artifacts = std::mem::take(band.artifacts_mut());
        let mut split = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            if is_wide(&artifact, height, options.width_ratio) {
                let before = split.len();
                split_into(artifact, height, options, 0, &mut split)?;
                added += split.len() - before - 1;
            } else {
                split.push(artifact);
            }
        }
        *band.artifacts_mut() = split;
        band.recompute_bounds();
    }
    log::debug!("split_wide_artifacts: {} pieces added", added);
    Ok(added)
}
