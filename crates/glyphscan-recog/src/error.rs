//! Error types for glyphscan-recog

use thiserror::Error;

/// Errors that can occur during recognition operations
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphscan_core::Error),

    /// Region library error
    #[error("region error: {0}")]
    Region(#[from] glyphscan_region::RegionError),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Template catalog is malformed
    #[error("invalid template catalog: {0}")]
    InvalidCatalog(String),

    /// An asset file could not be read
    #[error("failed to read '{path}': {message}")]
    AssetRead { path: String, message: String },
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
