//! Recognition engine
//!
//! [`Engine`] owns a validated [`Configuration`], the template catalog and
//! the optional dictionary, all loaded once at construction and read-only
//! afterwards. Each call runs the pipeline on its own grids and bands, so
//! one engine can serve several threads at once.
//!
//! A call passes through the states of [`PipelineState`] in order. The
//! time budget is checked when entering each stage; an exhausted budget
//! stops the run and returns the text assembled so far. A stage error ends
//! the call in [`Error::Failed`], which names the stage that was running.

use std::time::{Duration, Instant};

use image::RgbaImage;

use glyphscan_color::binarize_to_grid;
use glyphscan_core::Bands;
use glyphscan_morph::{close, dilate};
use glyphscan_recog::{
    CharacterDefinitions, Dictionary, MatchOptions, SegmentOptions, SplitOptions,
    apply_correction, get_bands_of_artifacts, recognize_bands, split_wide_artifacts,
};
use glyphscan_region::{RegionOptions, find_regions};

use crate::config::{CLOSING_KERNEL_SIZE, Configuration};
use crate::error::{Error, Result};

/// Stage of a recognition call
///
/// A call that fails has no final state; it returns [`Error::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Binarizing,
    RegionFinding,
    BandAssembling,
    Matching,
    Correcting,
    Done,
}

/// Outcome of a recognition call
#[derive(Debug, Clone)]
pub struct Recognition {
    /// Recognized text; lines are separated by `'\n'`
    pub text: String,
    /// Wall time of the call
    pub elapsed: Duration,
    /// Number of non-space artifacts matched
    pub matched_characters: usize,
    /// Segmented lines with their per-artifact matches
    pub bands: Bands,
    /// Last state entered
    pub state: PipelineState,
    /// The time budget ran out before `Done`
    pub timed_out: bool,
}

/// Tracks the state and time budget of one call
struct Run {
    start: Instant,
    budget: Duration,
    state: PipelineState,
}

impl Run {
    fn new(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
            state: PipelineState::Idle,
        }
    }

    /// Enter the next stage, or return `false` if the budget is spent
    fn enter(&mut self, next: PipelineState) -> bool {
        let elapsed = self.start.elapsed();
        if elapsed >= self.budget {
            log::warn!(
                "time budget of {:?} exhausted after {:?} before {:?}",
                self.budget,
                elapsed,
                next
            );
            return false;
        }
        log::debug!("{:?} -> {:?} at {:?}", self.state, next, elapsed);
        self.state = next;
        true
    }

    fn complete(&mut self) {
        log::debug!("{:?} -> Done at {:?}", self.state, self.start.elapsed());
        self.state = PipelineState::Done;
    }

    fn finish(
        &self,
        text: String,
        bands: Bands,
        matched_characters: usize,
        timed_out: bool,
    ) -> Recognition {
        Recognition {
            text,
            elapsed: self.start.elapsed(),
            matched_characters,
            bands,
            state: self.state,
            timed_out,
        }
    }
}

fn asset_error(path: &str, error: impl std::fmt::Display) -> Error {
    Error::AssetLoad {
        path: path.to_string(),
        message: error.to_string(),
    }
}

const BUNDLED: &str = "<bundled>";

/// Template-matching text recognizer
///
/// # Example
///
/// ```
/// use glyphscan::{Configuration, Engine};
/// use image::RgbaImage;
///
/// let engine = Engine::new(Configuration::default()).unwrap();
/// let blank = RgbaImage::from_pixel(64, 32, image::Rgba([255, 255, 255, 255]));
/// assert_eq!(engine.get_text_from_image(&blank).unwrap(), "");
/// ```
#[derive(Debug)]
pub struct Engine {
    config: Configuration,
    catalog: CharacterDefinitions,
    dictionary: Option<Dictionary>,
}

impl Engine {
    /// Create an engine, loading its catalog and dictionary
    ///
    /// The dictionary is loaded only when dictionary correction is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a setting is out of range and
    /// [`Error::AssetLoad`] if the catalog or dictionary cannot be read or
    /// parsed.
    pub fn new(config: Configuration) -> Result<Self> {
        config.validate()?;
        let catalog = match config.catalog_path() {
            Some(path) => CharacterDefinitions::load(path).map_err(|e| asset_error(path, e))?,
            None => CharacterDefinitions::bundled().map_err(|e| asset_error(BUNDLED, e))?,
        };
        Self::with_catalog(config, catalog)
    }

    /// Create an engine around an already loaded catalog
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a setting is out of range and
    /// [`Error::AssetLoad`] if the dictionary cannot be read.
    pub fn with_catalog(config: Configuration, catalog: CharacterDefinitions) -> Result<Self> {
        config.validate()?;
        let dictionary = if config.apply_dictionary_correction() {
            Some(match config.dictionary_path() {
                Some(path) => Dictionary::load(path).map_err(|e| asset_error(path, e))?,
                None => Dictionary::bundled(),
            })
        } else {
            None
        };
        log::debug!(
            "engine ready: {} characters, dictionary {}",
            catalog.len(),
            dictionary.as_ref().map_or(0, Dictionary::len)
        );
        Ok(Self {
            config,
            catalog,
            dictionary,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn catalog(&self) -> &CharacterDefinitions {
        &self.catalog
    }

    /// Recognize the text of an image
    pub fn get_text_from_image(&self, image: &RgbaImage) -> Result<String> {
        Ok(self.recognize(image)?.text)
    }

    /// Recognize a raw RGBA8 buffer of `width` x `height` pixels
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidImage`] if `bytes` is not exactly
    /// `width * height * 4` long.
    pub fn recognize_rgba(&self, width: u32, height: u32, bytes: &[u8]) -> Result<Recognition> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(Error::InvalidImage(format!(
                "{}x{} RGBA needs {} bytes, got {}",
                width,
                height,
                expected,
                bytes.len()
            )));
        }
        let image = RgbaImage::from_raw(width, height, bytes.to_vec()).ok_or_else(|| {
            Error::InvalidImage(format!("cannot wrap {}x{} buffer", width, height))
        })?;
        self.recognize(&image)
    }

    /// Recognize an image and report how the call went
    ///
    /// # Errors
    ///
    /// Returns [`Error::Failed`] if a stage fails. A blank page, weak
    /// matches or an exhausted time budget still produce a [`Recognition`].
    pub fn recognize(&self, image: &RgbaImage) -> Result<Recognition> {
        let budget = Duration::from_millis(self.config.max_processing_time_ms());
        self.run(image, budget)
    }

    pub(crate) fn run(&self, image: &RgbaImage, budget: Duration) -> Result<Recognition> {
        let mut run = Run::new(budget);
        self.run_stages(image, &mut run).map_err(|e| {
            log::warn!("{:?} failed after {:?}: {}", run.state, run.start.elapsed(), e);
            Error::Failed {
                stage: run.state,
                source: Box::new(e),
            }
        })
    }

    fn run_stages(&self, image: &RgbaImage, run: &mut Run) -> Result<Recognition> {
        let config = &self.config;

        if !run.enter(PipelineState::Binarizing) {
            return Ok(run.finish(String::new(), Bands::new(), 0, true));
        }
        let mut page = binarize_to_grid(image, config.contrast())?;
        if config.close_broken_strokes() {
            page = close(&page, CLOSING_KERNEL_SIZE)?;
        }
        log::debug!("binarized {}x{}: {} ink pixels", page.cols(), page.rows(), page.count_ones());

        if !run.enter(PipelineState::RegionFinding) {
            return Ok(run.finish(String::new(), Bands::new(), 0, true));
        }
        let kernel = config.dilation().kernel_size(image.width());
        let dilated = dilate(&page, kernel)?;
        let region_options = RegionOptions::default()
            .with_exclude_long_lines(config.exclude_long_lines())
            .with_kernel_size(kernel);
        let regions = find_regions(&dilated, &region_options)?;
        log::debug!("kernel {}: {} regions", kernel, regions.len());

        if !run.enter(PipelineState::BandAssembling) {
            return Ok(run.finish(String::new(), Bands::new(), 0, true));
        }
        let mut bands = get_bands_of_artifacts(&page, &regions, &SegmentOptions::default())?;
        if config.attempt_character_splitting() {
            let split = SplitOptions::default().with_width_ratio(config.split_width_ratio());
            split_wide_artifacts(&mut bands, &split)?;
        }
        log::debug!("{} bands, {} glyphs", bands.len(), bands.glyph_count());

        if !run.enter(PipelineState::Matching) {
            return Ok(run.finish(String::new(), bands, 0, true));
        }
        let match_options = MatchOptions::default()
            .with_threshold(config.matching_threshold())
            .with_allowed(config.allowed_characters().clone());
        let matched = recognize_bands(&mut bands, &self.catalog, &match_options)?;
        let raw = bands.text();
        log::debug!("matched {} characters: {:?}", matched, raw);

        if !run.enter(PipelineState::Correcting) {
            return Ok(run.finish(raw, bands, matched, true));
        }
        let text = apply_correction(&raw, self.dictionary.as_ref());

        run.complete();
        Ok(run.finish(text, bands, matched, false))
    }
}
