//! Error types for the Palette Tin color core.

use thiserror::Error;

/// Errors produced by color, palette, and mixer operations.
///
/// The conversion and gamut functions themselves are total and never return
/// these; they show up at the edges (parsing, palette storage, mixer lookup).
#[derive(Debug, Error)]
pub enum ColorError {
    /// A component value was outside its documented domain (e.g. a NaN rate).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A mixer name was not present in the registry.
    #[error("unknown mixing strategy: {0}")]
    UnknownStrategy(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette grid or palette document was malformed.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// Reading or writing a palette or settings file failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// A JSON document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for ColorError {
    fn from(e: std::io::Error) -> Self {
        ColorError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ColorError {
    fn from(e: serde_json::Error) -> Self {
        ColorError::Serialization(e.to_string())
    }
}
