//! Error types for glyphscan-region

use thiserror::Error;

/// Errors that can occur during region processing operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphscan_core::Error),

    /// The visited mask does not match the grid being filled
    #[error("visited mask is {}x{}, grid is {}x{}", .visited.0, .visited.1, .grid.0, .grid.1)]
    MaskMismatch {
        visited: (u32, u32),
        grid: (u32, u32),
    },

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
