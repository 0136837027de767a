//! Band assembly
//!
//! Turns the regions found on the dilated page into text lines. Each region
//! is read again from the undilated source, cut into runs of inked rows
//! (candidate lines) and each line into runs of inked columns (candidate
//! glyphs). Afterwards:
//!
//! 1. Thin fragment lines sitting just above or below a line are folded
//!    into the glyphs they overlap (dots of `i` and `j`, broken strokes)
//! 2. Lines that share a visual row are joined into one band
//! 3. Empty bands are dropped and bands are ordered top to bottom
//! 4. Word gaps get a space artifact

use glyphscan_core::{Artifact, Band, Bands, BitGrid, Point, Rect};

use crate::error::{RecogError, RecogResult};

/// Gap, relative to the average glyph width of a band, that starts a word
pub const SPACE_GAP_RATIO: f64 = 0.5;

/// Vertical overlap, relative to the smaller band height, that joins bands
pub const BAND_MERGE_OVERLAP: f64 = 0.5;

/// A band at most this fraction of its neighbor's height is a fragment
pub const FRAGMENT_HEIGHT_RATIO: f64 = 0.5;

/// Options for band assembly
#[derive(Debug, Clone)]
pub struct SegmentOptions {
    /// Cut regions into separate lines at blank rows
    pub allow_inner_split: bool,
    /// See [`SPACE_GAP_RATIO`]
    pub space_gap_ratio: f64,
    /// See [`BAND_MERGE_OVERLAP`]
    pub band_merge_overlap: f64,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            allow_inner_split: true,
            space_gap_ratio: SPACE_GAP_RATIO,
            band_merge_overlap: BAND_MERGE_OVERLAP,
        }
    }
}

impl SegmentOptions {
    /// Set whether regions are cut into lines
    pub fn with_allow_inner_split(mut self, allow: bool) -> Self {
        self.allow_inner_split = allow;
        self
    }

    /// Set the word gap ratio
    pub fn with_space_gap_ratio(mut self, ratio: f64) -> Self {
        self.space_gap_ratio = ratio;
        self
    }

    /// Set the band merge overlap
    pub fn with_band_merge_overlap(mut self, overlap: f64) -> Self {
        self.band_merge_overlap = overlap;
        self
    }

    /// Validate the options
    pub fn validate(&self) -> RecogResult<()> {
        if !self.space_gap_ratio.is_finite() || self.space_gap_ratio <= 0.0 {
            return Err(RecogError::InvalidParameter(format!(
                "space_gap_ratio must be positive, got {}",
                self.space_gap_ratio
            )));
        }
        if !(self.band_merge_overlap > 0.0 && self.band_merge_overlap <= 1.0) {
            return Err(RecogError::InvalidParameter(format!(
                "band_merge_overlap must be in (0, 1], got {}",
                self.band_merge_overlap
            )));
        }
        Ok(())
    }
}

/// Runs `[start, end)` of non-zero counts
///
/// Zero gaps of at most `bridge` entries between two runs are absorbed.
fn inked_runs(counts: &[u32], bridge: usize) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    let mut i = 0;
    while i < counts.len() {
        if counts[i] == 0 {
            i += 1;
            continue;
        }
        let start = i;
        while i < counts.len() && counts[i] != 0 {
            i += 1;
        }
        match runs.last_mut() {
            Some(last) if start - last.1 <= bridge => last.1 = i,
            _ => runs.push((start, i)),
        }
    }
    runs
}

/// Candidate text lines of one region
fn line_rects(source: &BitGrid, region: &Rect, allow_inner_split: bool) -> Vec<Rect> {
    let window = source.crop(region);
    if !allow_inner_split {
        return window
            .tight_bounds()
            .map(|t| vec![t.translate(region.x, region.y)])
            .unwrap_or_default();
    }
    inked_runs(&window.row_counts(), 0)
        .into_iter()
        .map(|(start, end)| {
            Rect::new_unchecked(
                region.x,
                region.y + start as i32,
                region.w,
                (end - start) as i32,
            )
        })
        .collect()
}

/// Column clusters of one line, trimmed
///
/// Blank gaps narrower than a twelfth of the line height are bridged so a
/// glyph with a broken stroke stays in one piece.
fn line_artifacts(source: &BitGrid, line: &Rect) -> RecogResult<Vec<Artifact>> {
    let window = source.crop(line);
    let bridge = (line.h / 12).max(1) as usize;

    let mut artifacts = Vec::new();
    for (start, end) in inked_runs(&window.column_counts(), bridge) {
        let rect = Rect::new_unchecked(line.x + start as i32, line.y, (end - start) as i32, line.h);
        let mut artifact = Artifact::from_region(source, &rect);
        artifact.trim()?;
        if !artifact.is_space() {
            artifacts.push(artifact);
        }
    }
    Ok(artifacts)
}

/// Vertical distance between two rectangles, 0 if they overlap
fn vertical_gap(a: &Rect, b: &Rect) -> i32 {
    (a.y.max(b.y) - a.bottom().min(b.bottom())).max(0)
}

/// Index of the band a fragment band should be folded into
fn fragment_target(bands: &[Band], fragment: usize) -> Option<usize> {
    let fb = bands[fragment].bounds();
    bands
        .iter()
        .enumerate()
        .filter(|&(i, band)| {
            let tb = band.bounds();
            i != fragment
                && !band.is_empty()
                && fb.h as f64 <= FRAGMENT_HEIGHT_RATIO * tb.h as f64
                && fb.horizontal_overlap(&tb) > 0
                && vertical_gap(&fb, &tb) <= tb.h / 2
        })
        .min_by_key(|(_, band)| vertical_gap(&fb, &band.bounds()))
        .map(|(i, _)| i)
}

/// Fold fragment bands into the glyphs they are stacked on
///
/// A fragment artifact joins the target glyph it overlaps most
/// horizontally, provided the overlap covers at least half of the narrower
/// of the two. Fragments with no such glyph stay where they are.
fn merge_stacked_fragments(bands: &mut [Band]) -> RecogResult<()> {
    for fragment in 0..bands.len() {
        let Some(target) = fragment_target(bands, fragment) else {
            continue;
        };

        let pieces = std::mem::take(bands[fragment].artifacts_mut());
        let mut kept = Vec::new();
        for piece in pieces {
            let pb = piece.bounds();
            let host = bands[target]
                .artifacts()
                .iter()
                .enumerate()
                .filter(|(_, a)| !a.is_space())
                .map(|(i, a)| (i, pb.horizontal_overlap(&a.bounds()), a.width().min(pb.w)))
                .filter(|&(_, overlap, narrow)| overlap > 0 && 2 * overlap >= narrow)
                .max_by_key(|&(i, overlap, _)| (overlap, std::cmp::Reverse(i)))
                .map(|(i, _, _)| i);
            match host {
                Some(i) => {
                    log::trace!("folding fragment {:?} into band {}", pb, target);
                    bands[target].artifacts_mut()[i].merge(&piece)?;
                }
                None => kept.push(piece),
            }
        }
        *bands[fragment].artifacts_mut() = kept;
        bands[fragment].recompute_bounds();
        bands[target].recompute_bounds();
    }
    Ok(())
}

/// Check if two bands sit on the same visual row
fn same_row(a: &Rect, b: &Rect, overlap_ratio: f64) -> bool {
    let smaller = a.h.min(b.h);
    smaller > 0 && a.vertical_overlap(b) as f64 >= overlap_ratio * smaller as f64
}

/// Join bands sharing a row until no pair qualifies
fn merge_same_row(mut bands: Vec<Band>, overlap_ratio: f64) -> Vec<Band> {
    loop {
        let before = bands.len();
        let mut merged: Vec<Band> = Vec::with_capacity(before);
        for band in bands {
            if band.is_empty() {
                continue;
            }
            let bounds = band.bounds();
            match merged
                .iter()
                .position(|m| same_row(&m.bounds(), &bounds, overlap_ratio))
            {
                Some(i) => merged[i].absorb(band),
                None => merged.push(band),
            }
        }
        bands = merged;
        if bands.len() == before {
            return bands;
        }
    }
}

/// Sort a band left to right and insert spaces at word gaps
fn insert_spaces(band: &mut Band, gap_ratio: f64) {
    band.sort_left_to_right();
    let widths: Vec<i32> = band
        .artifacts()
        .iter()
        .filter(|a| !a.is_space())
        .map(Artifact::width)
        .collect();
    if widths.len() < 2 {
        return;
    }
    let average = widths.iter().sum::<i32>() as f64 / widths.len() as f64;
    let threshold = average * gap_ratio;
    let top = band.bounds().y;

    let artifacts = std::mem::take(band.artifacts_mut());
    let mut spaced = Vec::with_capacity(artifacts.len());
    let mut previous: Option<Rect> = None;
    for artifact in artifacts {
        if artifact.is_space() {
            continue;
        }
        let bounds = artifact.bounds();
        if let Some(prev) = previous
            && prev.horizontal_gap(&bounds) as f64 > threshold
        {
            spaced.push(Artifact::space(Point::new(prev.right(), top)));
        }
        previous = Some(bounds);
        spaced.push(artifact);
    }
    *band.artifacts_mut() = spaced;
}

/// Assemble the regions of a page into ordered text bands
///
/// # Arguments
///
/// * `source` - Binarized page, before dilation
/// * `regions` - Regions found on the dilated page
/// * `options` - Segmentation options
///
/// # Returns
///
/// Bands sorted by top then left edge, each sorted left to right with
/// space artifacts at word gaps. A page without ink gives no bands.
///
/// # Errors
///
/// Returns an error if the options are invalid.
pub fn get_bands_of_artifacts(
    source: &BitGrid,
    regions: &[Rect],
    options: &SegmentOptions,
) -> RecogResult<Bands> {
    options.validate()?;

    let mut lines = Vec::new();
    for region in regions {
        for line in line_rects(source, region, options.allow_inner_split) {
            let artifacts = line_artifacts(source, &line)?;
            if !artifacts.is_empty() {
                lines.push(Band::from_artifacts(artifacts));
            }
        }
    }
    let line_count = lines.len();

    merge_stacked_fragments(&mut lines)?;
    let mut bands = Bands::from(merge_same_row(lines, options.band_merge_overlap));
    bands.prune_empty();
    for band in bands.iter_mut() {
        insert_spaces(band, options.space_gap_ratio);
    }
    bands.sort_by_position();

    log::debug!(
        "get_bands_of_artifacts: {} regions, {} lines, {} bands, {} glyphs",
        regions.len(),
        line_count,
        bands.len(),
        bands.glyph_count()
    );
    Ok(bands)
}
