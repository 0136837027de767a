//! Error types for glyphscan

use thiserror::Error;

use crate::engine::PipelineState;

/// A configuration value failed validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A field is out of its valid range
    #[error("invalid {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    /// A configuration document could not be parsed
    #[error("cannot parse configuration: {0}")]
    Parse(String),
}

/// Errors returned by the recognition engine
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Missing or corrupt template catalog or dictionary
    #[error("cannot load asset {path}: {message}")]
    AssetLoad { path: String, message: String },

    /// Image buffer does not match its declared dimensions
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A stage of a recognition call failed; `stage` is the stage that was running
    #[error("recognition failed while {stage:?}: {source}")]
    Failed {
        stage: PipelineState,
        #[source]
        source: Box<Error>,
    },

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphscan_core::Error),

    /// Preprocessing error
    #[error("color error: {0}")]
    Color(#[from] glyphscan_color::ColorError),

    /// Morphology error
    #[error("morph error: {0}")]
    Morph(#[from] glyphscan_morph::MorphError),

    /// Region finding error
    #[error("region error: {0}")]
    Region(#[from] glyphscan_region::RegionError),

    /// Recognition error
    #[error("recog error: {0}")]
    Recog(#[from] glyphscan_recog::RecogError),
}

/// Result type for glyphscan
pub type Result<T> = std::result::Result<T, Error>;
