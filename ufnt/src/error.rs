//! Errors that occur while building an asset

use crate::{raster::GlyphBox, validate::ValidationReport};

/// An error that aborts the build.
///
/// There is no per-glyph recovery: an asset with missing glyphs would break
/// the index, so every variant is fatal.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid ranges: {0}")]
    InvalidRanges(#[from] ValidationReport),
    #[error("failed to load font: {0}")]
    FontLoad(String),
    #[error("invalid size {0}, expected a positive number of pixels per em")]
    InvalidSize(f32),
    #[error("{metric} of {value} pixels does not fit in the header")]
    MetricsOverflow { metric: &'static str, value: f64 },
    #[error("failed to draw U+{codepoint:04X}: {message}")]
    Draw { codepoint: u32, message: String },
    #[error("glyph U+{codepoint:04X} does not fit in a glyph record: {glyph_box}")]
    GlyphTooLarge { codepoint: u32, glyph_box: GlyphBox },
    #[error("bitmap for U+{codepoint:04X} has {actual} bytes, expected {expected}")]
    BitmapSize {
        codepoint: u32,
        expected: usize,
        actual: usize,
    },
    #[error("glyph data does not fit in 32-bit offsets")]
    OffsetOverflow,
}
