//! Recognition configuration
//!
//! [`Configuration`] is an immutable value built once through
//! [`ConfigurationBuilder`] (or parsed with [`Configuration::from_json_str`])
//! and validated on construction. Named [`Preset`]s bundle fixed
//! combinations of the settings.
//!
//! # Example
//!
//! ```
//! use glyphscan::{Configuration, Dilation, Preset};
//!
//! let config = Configuration::builder()
//!     .with_dilation(Dilation::Fixed(16))
//!     .with_apply_dictionary_correction(true)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.dilation(), Dilation::Fixed(16));
//!
//! let fast = Configuration::preset(Preset::Fast);
//! assert!(!fast.attempt_character_splitting());
//! ```

use serde::{Deserialize, Serialize};

use glyphscan_color::MAX_CONTRAST;
use glyphscan_morph::default_kernel_size;
use glyphscan_recog::AllowedCharacters;
use glyphscan_recog::matcher::DEFAULT_MATCHING_THRESHOLD;
use glyphscan_recog::splitter::DEFAULT_SPLIT_WIDTH_RATIO;

use crate::error::ConfigError;

/// Default dilation kernel size in pixels
pub const DEFAULT_DILATION_SIZE: u32 = 22;

/// Default time budget of one recognition call
pub const DEFAULT_MAX_PROCESSING_TIME_MS: u64 = 30_000;

/// Kernel of the closing applied by [`Configuration::close_broken_strokes`]
pub const CLOSING_KERNEL_SIZE: u32 = 2;

/// Dilation kernel used for region discovery
///
/// Serialized as a number for [`Dilation::Fixed`] and the string `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DilationRepr", into = "DilationRepr")]
pub enum Dilation {
    /// Fixed kernel size in pixels
    Fixed(u32),
    /// 2% of the image width, clamped to `[1, width]`
    Auto,
}

impl Dilation {
    /// Kernel size for an image of the given width
    pub fn kernel_size(self, width: u32) -> u32 {
        match self {
            Dilation::Fixed(size) => size,
            Dilation::Auto => default_kernel_size(width),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DilationRepr {
    Size(u32),
    Named(String),
}

impl TryFrom<DilationRepr> for Dilation {
    type Error = String;

    fn try_from(repr: DilationRepr) -> Result<Self, Self::Error> {
        match repr {
            DilationRepr::Size(size) => Ok(Dilation::Fixed(size)),
            DilationRepr::Named(name) if name == "auto" => Ok(Dilation::Auto),
            DilationRepr::Named(name) => Err(format!("unknown dilation {:?}", name)),
        }
    }
}

impl From<Dilation> for DilationRepr {
    fn from(dilation: Dilation) -> Self {
        match dilation {
            Dilation::Fixed(size) => DilationRepr::Size(size),
            Dilation::Auto => DilationRepr::Named("auto".to_string()),
        }
    }
}

/// Named bundles of settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    /// No splitting or dictionary, short budget
    Fast,
    /// Splitting and dictionary, strict threshold
    Accurate,
    /// Width-relative dilation and stroke closing for uneven input
    Robust,
    /// The defaults
    Balanced,
}

/// Recognition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    #[serde(rename = "dilationSize")]
    dilation: Dilation,
    exclude_long_lines: bool,
    attempt_character_splitting: bool,
    apply_dictionary_correction: bool,
    matching_threshold: f64,
    max_processing_time_ms: u64,
    split_width_ratio: f64,
    contrast: i32,
    close_broken_strokes: bool,
    allowed_characters: AllowedCharacters,
    catalog_path: Option<String>,
    dictionary_path: Option<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            dilation: Dilation::Fixed(DEFAULT_DILATION_SIZE),
            exclude_long_lines: true,
            attempt_character_splitting: true,
            apply_dictionary_correction: false,
            matching_threshold: DEFAULT_MATCHING_THRESHOLD,
            max_processing_time_ms: DEFAULT_MAX_PROCESSING_TIME_MS,
            split_width_ratio: DEFAULT_SPLIT_WIDTH_RATIO,
            contrast: 0,
            close_broken_strokes: false,
            allowed_characters: AllowedCharacters::All,
            catalog_path: None,
            dictionary_path: None,
        }
    }
}

fn invalid(field: &'static str, message: String) -> ConfigError {
    ConfigError::InvalidValue { field, message }
}

impl Configuration {
    /// Start building a configuration from the defaults
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// The settings of a preset
    pub fn preset(preset: Preset) -> Self {
        let defaults = Self::default();
        match preset {
            Preset::Fast => Self {
                attempt_character_splitting: false,
                matching_threshold: 0.3,
                max_processing_time_ms: 5_000,
                ..defaults
            },
            Preset::Accurate => Self {
                apply_dictionary_correction: true,
                matching_threshold: 0.5,
                max_processing_time_ms: 60_000,
                ..defaults
            },
            Preset::Robust => Self {
                dilation: Dilation::Auto,
                apply_dictionary_correction: true,
                close_broken_strokes: true,
                matching_threshold: 0.35,
                max_processing_time_ms: 60_000,
                ..defaults
            },
            Preset::Balanced => defaults,
        }
    }

    /// Parse a JSON document and validate it
    ///
    /// Keys are camelCase; missing keys take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidValue`] for out-of-range settings.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a JSON document
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every setting against its valid range
    ///
    /// [`ConfigurationBuilder::build`], [`Configuration::from_json_str`] and
    /// the [`Engine`](crate::Engine) constructors all call this; a value
    /// deserialized directly with serde is checked when an engine is built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dilation == Dilation::Fixed(0) {
            return Err(invalid(
                "dilationSize",
                "must be positive, got 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.matching_threshold) {
            return Err(invalid(
                "matchingThreshold",
                format!("must be in [0, 1], got {}", self.matching_threshold),
            ));
        }
        if self.max_processing_time_ms == 0 {
            return Err(invalid(
                "maxProcessingTimeMs",
                "must be positive, got 0".to_string(),
            ));
        }
        if !self.split_width_ratio.is_finite() || self.split_width_ratio <= 0.0 {
            return Err(invalid(
                "splitWidthRatio",
                format!("must be positive, got {}", self.split_width_ratio),
            ));
        }
        if !(-MAX_CONTRAST..=MAX_CONTRAST).contains(&self.contrast) {
            return Err(invalid(
                "contrast",
                format!(
                    "must be in [{}, {}], got {}",
                    -MAX_CONTRAST, MAX_CONTRAST, self.contrast
                ),
            ));
        }
        Ok(())
    }

    pub fn dilation(&self) -> Dilation {
        self.dilation
    }

    pub fn exclude_long_lines(&self) -> bool {
        self.exclude_long_lines
    }

    pub fn attempt_character_splitting(&self) -> bool {
        self.attempt_character_splitting
    }

    pub fn apply_dictionary_correction(&self) -> bool {
        self.apply_dictionary_correction
    }

    pub fn matching_threshold(&self) -> f64 {
        self.matching_threshold
    }

    pub fn max_processing_time_ms(&self) -> u64 {
        self.max_processing_time_ms
    }

    /// Width relative to the band height above which an artifact is split
    pub fn split_width_ratio(&self) -> f64 {
        self.split_width_ratio
    }

    pub fn contrast(&self) -> i32 {
        self.contrast
    }

    /// Close the binary page with a small kernel before segmentation
    pub fn close_broken_strokes(&self) -> bool {
        self.close_broken_strokes
    }

    pub fn allowed_characters(&self) -> &AllowedCharacters {
        &self.allowed_characters
    }

    /// Template catalog file; `None` selects the bundled catalog
    pub fn catalog_path(&self) -> Option<&str> {
        self.catalog_path.as_deref()
    }

    /// Dictionary file; `None` selects the bundled word list
    pub fn dictionary_path(&self) -> Option<&str> {
        self.dictionary_path.as_deref()
    }
}

/// Builder for [`Configuration`]
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl ConfigurationBuilder {
    /// Start from the settings of a preset
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            config: Configuration::preset(preset),
        }
    }

    pub fn with_dilation(mut self, dilation: Dilation) -> Self {
        self.config.dilation = dilation;
        self
    }

    pub fn with_exclude_long_lines(mut self, exclude: bool) -> Self {
        self.config.exclude_long_lines = exclude;
        self
    }

    pub fn with_attempt_character_splitting(mut self, attempt: bool) -> Self {
        self.config.attempt_character_splitting = attempt;
        self
    }

    pub fn with_apply_dictionary_correction(mut self, apply: bool) -> Self {
        self.config.apply_dictionary_correction = apply;
        self
    }

    pub fn with_matching_threshold(mut self, threshold: f64) -> Self {
        self.config.matching_threshold = threshold;
        self
    }

    pub fn with_max_processing_time_ms(mut self, ms: u64) -> Self {
        self.config.max_processing_time_ms = ms;
        self
    }

    pub fn with_split_width_ratio(mut self, ratio: f64) -> Self {
        self.config.split_width_ratio = ratio;
        self
    }

    pub fn with_contrast(mut self, contrast: i32) -> Self {
        self.config.contrast = contrast;
        self
    }

    pub fn with_close_broken_strokes(mut self, close: bool) -> Self {
        self.config.close_broken_strokes = close;
        self
    }

    pub fn with_allowed_characters(mut self, allowed: AllowedCharacters) -> Self {
        self.config.allowed_characters = allowed;
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<String>) -> Self {
        self.config.catalog_path = Some(path.into());
        self
    }

    pub fn with_dictionary_path(mut self, path: impl Into<String>) -> Self {
        self.config.dictionary_path = Some(path.into());
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first invalid field.
    pub fn build(self) -> Result<Configuration, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
