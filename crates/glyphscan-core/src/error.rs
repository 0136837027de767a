//! Error types for glyphscan-core
//!
//! Provides a unified error type for all operations in the core crate.

use thiserror::Error;

/// glyphscan-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid grid dimensions
    #[error("invalid grid dimensions: {cols}x{rows}")]
    InvalidDimension { cols: u32, rows: u32 },

    /// Grid dimension mismatch
    #[error(
        "dimension mismatch: expected {}x{}, got {}x{}",
        .expected.0,
        .expected.1,
        .actual.0,
        .actual.1
    )]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Cell coordinates outside the grid
    #[error("cell ({x}, {y}) out of bounds for {cols}x{rows} grid")]
    OutOfBounds { x: u32, y: u32, cols: u32, rows: u32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Mutation attempted on an artifact that already carries a match
    #[error("artifact already matched as {0:?}")]
    ArtifactMatched(char),
}

/// Result type alias for glyphscan-core operations
pub type Result<T> = std::result::Result<T, Error>;
