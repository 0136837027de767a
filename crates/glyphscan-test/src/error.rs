//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while preparing regression fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Failed to load a fixture asset
    #[error("failed to load asset '{path}': {message}")]
    AssetLoad { path: String, message: String },

    /// The fixture font has no glyph for a character
    #[error("font '{font}' has no glyph for {character:?}")]
    MissingGlyph { font: String, character: char },

    /// A glyph matrix is malformed
    #[error("malformed glyph {character:?}: {message}")]
    MalformedGlyph { character: char, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
