//! Compiling outline fonts into compact 1bpp bitmap font assets.
//!
//! An asset holds a small header with line metrics, an index of codepoint
//! groups with absolute glyph offsets, and one record per glyph with its
//! pixel box and packed bitmap. See the [format] module for the layout.
//!
//! Building an asset takes a [`Rasterizer`], which renders glyphs at a fixed
//! size. With the default `skrifa` feature, [`ScaledFont`] renders TrueType
//! and OpenType outlines:
//!
//! ```no_run
//! # fn main() -> Result<(), ufnt::Error> {
//! use ufnt::{CodepointRange, FontContext, RangePolicy, ScaledFont};
//!
//! let data = std::fs::read("font.ttf").unwrap();
//! let font = ScaledFont::new(&data, 16.0)?;
//! let context = FontContext::from_rasterizer(&font)?;
//! let ranges = [CodepointRange::new(0x20, 0x7e)];
//! let bytes = ufnt::encode(&ranges, &context, &font, RangePolicy::default())?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod error;
pub mod format;
pub mod glyph;
pub mod layout;
#[cfg(feature = "skrifa")]
mod pen;
pub mod range;
pub mod raster;
pub mod read;
#[cfg(feature = "skrifa")]
mod scaler;
pub mod validate;
pub mod write;

pub use error::Error;
pub use format::{Header, HeaderFlags};
pub use glyph::{GlyphBuilder, GlyphRecord};
pub use layout::{encode, layout, FontAsset, FontContext, IndexGroup};
#[cfg(feature = "skrifa")]
pub use pen::BezPathPen;
pub use range::{parse_codepoint, CodepointRange, RangePolicy, RangeSet};
pub use raster::{is_monospace, FontMetrics, GlyphBox, MonoBitmap, Rasterizer};
#[cfg(feature = "skrifa")]
pub use scaler::ScaledFont;
