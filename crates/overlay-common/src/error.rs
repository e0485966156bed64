//! Error types for the overlay renderer.

use thiserror::Error;

/// Result type alias using OverlayError.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Primary error type for overlay rendering operations.
///
/// Structural errors (extent, geometry, palette cardinality) abort the
/// whole render with no partial output. Per-feature color gaps are not
/// errors; they degrade to unpainted fills.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("Invalid extent: {0}")]
    InvalidExtent(String),

    #[error("Missing or unusable geometry: {0}")]
    MissingGeometry(String),

    #[error("Palette of {colors} colors does not evenly divide {features} features")]
    PaletteCardinality { colors: usize, features: usize },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid palette specification: {0}")]
    InvalidPalette(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}
