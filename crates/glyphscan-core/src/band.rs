//! Band, Bands - lines of text
//!
//! A [`Band`] owns the artifacts of one text line in reading order. Its
//! bounds are the union of its members' bounds (spaces contribute
//! nothing). [`Bands`] is the top-to-bottom sequence for one image.

use crate::artifact::Artifact;
use crate::geom::Rect;

/// One line of text
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Band {
    artifacts: Vec<Artifact>,
    bounds: Rect,
}

impl Band {
    /// Create an empty band
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a band from artifacts in the given order
    pub fn from_artifacts(artifacts: Vec<Artifact>) -> Self {
        let mut band = Self {
            artifacts,
            bounds: Rect::default(),
        };
        band.recompute_bounds();
        band
    }

    /// Union of the members' bounds
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Number of artifacts, spaces included
    #[inline]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Check if the band holds no glyph artifact (only spaces or nothing)
    pub fn is_empty(&self) -> bool {
        self.artifacts.iter().all(Artifact::is_space)
    }

    /// Number of non-space artifacts
    pub fn glyph_count(&self) -> usize {
        self.artifacts.iter().filter(|a| !a.is_space()).count()
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Mutable access to the members
    ///
    /// Call [`Band::recompute_bounds`] after changing their geometry.
    pub fn artifacts_mut(&mut self) -> &mut Vec<Artifact> {
        &mut self.artifacts
    }

    pub fn into_artifacts(self) -> Vec<Artifact> {
        self.artifacts
    }

    /// Append an artifact and grow the bounds
    pub fn push(&mut self, artifact: Artifact) {
        self.bounds = self.bounds.union(&artifact.bounds());
        self.artifacts.push(artifact);
    }

    /// Move every artifact of `other` into this band
    pub fn absorb(&mut self, other: Band) {
        self.bounds = self.bounds.union(&other.bounds);
        self.artifacts.extend(other.artifacts);
    }

    /// Recompute the bounds from the members
    pub fn recompute_bounds(&mut self) {
        self.bounds = self
            .artifacts
            .iter()
            .fold(Rect::default(), |acc, a| acc.union(&a.bounds()));
    }

    /// Stable sort of the members by left edge
    pub fn sort_left_to_right(&mut self) {
        self.artifacts.sort_by_key(|a| a.bounds().x);
    }

    /// Matched characters in order; spaces become `' '`
    ///
    /// Unmatched glyph artifacts are skipped.
    pub fn text(&self) -> String {
        self.artifacts
            .iter()
            .filter_map(|a| {
                if a.is_space() {
                    Some(' ')
                } else {
                    a.matched().map(|m| m.character)
                }
            })
            .collect()
    }
}

/// The lines of one image, top to bottom
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Bands {
    bands: Vec<Band>,
}

impl Bands {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    pub fn push(&mut self, band: Band) {
        self.bands.push(band);
    }

    pub fn get(&self, index: usize) -> Option<&Band> {
        self.bands.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Band> {
        self.bands.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Band> {
        self.bands.iter_mut()
    }

    pub fn as_slice(&self) -> &[Band] {
        &self.bands
    }

    pub fn into_vec(self) -> Vec<Band> {
        self.bands
    }

    /// Drop bands that hold no glyph artifact
    pub fn prune_empty(&mut self) {
        self.bands.retain(|b| !b.is_empty());
    }

    /// Stable sort by top edge, then left edge
    ///
    /// Bands at exactly the same position keep their insertion order.
    pub fn sort_by_position(&mut self) {
        self.bands.sort_by_key(|b| (b.bounds().y, b.bounds().x));
    }

    /// Total number of non-space artifacts
    pub fn glyph_count(&self) -> usize {
        self.bands.iter().map(Band::glyph_count).sum()
    }

    /// Text of every band joined by `'\n'`
    pub fn text(&self) -> String {
        self.bands
            .iter()
            .map(Band::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<Band>> for Bands {
    fn from(bands: Vec<Band>) -> Self {
        Self { bands }
    }
}

impl IntoIterator for Bands {
    type Item = Band;
    type IntoIter = std::vec::IntoIter<Band>;

    fn into_iter(self) -> Self::IntoIter {
        self.bands.into_iter()
    }
}

impl<'a> IntoIterator for &'a Bands {
    type Item = &'a Band;
    type IntoIter = std::slice::Iter<'a, Band>;

    fn into_iter(self) -> Self::IntoIter {
        self.bands.iter()
    }
}
