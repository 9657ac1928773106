//! The interface between the encoder and a glyph rendering backend.

use std::fmt;

use crate::error::Error;

/// Line metrics in whole pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontMetrics {
    /// Distance from the top of the line to the baseline.
    pub ascent: i16,
    /// Distance from the baseline to the bottom of the line.
    ///
    /// This is positive, so the line height is `ascent + descent`.
    pub descent: i16,
}

/// The pixel box of a rendered glyph.
///
/// Offsets are relative to the top left of the line at the pen position:
/// `y_offset` grows downwards from the top of the line, not from the baseline.
/// A runtime advances the pen by `width + x_offset`.
///
/// The values are unbounded here; a [`GlyphRecord`](crate::glyph::GlyphRecord)
/// checks that they fit the format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphBox {
    pub width: i32,
    pub height: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

impl GlyphBox {
    /// A box with no pixels that still advances the pen.
    pub fn empty(advance: i32) -> Self {
        GlyphBox {
            width: advance,
            ..Default::default()
        }
    }
}

impl fmt::Display for GlyphBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x_offset, self.y_offset
        )
    }
}

/// A one bit per pixel image.
///
/// Rows are stored top to bottom, each padded to a whole byte, with the
/// leftmost pixel in the most significant bit.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MonoBitmap {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl MonoBitmap {
    /// A blank bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        let stride = width.div_ceil(8);
        MonoBitmap {
            width,
            height,
            stride,
            data: vec![0; stride * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The number of bytes in each row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Turn on the pixel at `(x, y)`.
    ///
    /// Pixels outside the bitmap are ignored.
    pub fn set(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.data[y * self.stride + x / 8] |= 0x80 >> (x % 8);
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width
            && y < self.height
            && self.data[y * self.stride + x / 8] & (0x80 >> (x % 8)) != 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Debug for MonoBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MonoBitmap {}x{}", self.width, self.height)?;
        for y in 0..self.height {
            for x in 0..self.width {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A source of rendered glyphs at a fixed size.
///
/// The encoder only talks to the font through this trait, so any backend
/// that can produce boxes and 1bpp bitmaps can be used.
pub trait Rasterizer {
    /// Line metrics for the font at this size.
    fn metrics(&self) -> FontMetrics;

    /// The pixel box of the glyph for `codepoint`.
    fn glyph_box(&self, codepoint: u32) -> Result<GlyphBox, Error>;

    /// Render the glyph for `codepoint` into a bitmap the size of `glyph_box`.
    ///
    /// The box origin is the top left pixel of the bitmap.
    fn rasterize(&self, codepoint: u32, glyph_box: &GlyphBox) -> Result<MonoBitmap, Error>;

    /// The advance width of the glyph for `codepoint`, in pixels.
    fn advance_width(&self, codepoint: u32) -> Result<i32, Error>;
}

impl<T: Rasterizer + ?Sized> Rasterizer for &T {
    fn metrics(&self) -> FontMetrics {
        (**self).metrics()
    }

    fn glyph_box(&self, codepoint: u32) -> Result<GlyphBox, Error> {
        (**self).glyph_box(codepoint)
    }

    fn rasterize(&self, codepoint: u32, glyph_box: &GlyphBox) -> Result<MonoBitmap, Error> {
        (**self).rasterize(codepoint, glyph_box)
    }

    fn advance_width(&self, codepoint: u32) -> Result<i32, Error> {
        (**self).advance_width(codepoint)
    }
}

/// Narrow glyph compared against [`WIDE_REFERENCE`] to detect monospace.
pub const NARROW_REFERENCE: char = 'I';
/// Wide glyph compared against [`NARROW_REFERENCE`] to detect monospace.
pub const WIDE_REFERENCE: char = 'W';

/// Returns `true` if a narrow and a wide glyph advance by the same amount.
pub fn is_monospace(rasterizer: &(impl Rasterizer + ?Sized)) -> Result<bool, Error> {
    let narrow = rasterizer.advance_width(NARROW_REFERENCE as u32)?;
    let wide = rasterizer.advance_width(WIDE_REFERENCE as u32)?;
    log::debug!("reference advances: narrow {narrow}, wide {wide}");
    Ok(narrow == wide)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Advances(i32, i32);

    impl Rasterizer for Advances {
        fn metrics(&self) -> FontMetrics {
            FontMetrics::default()
        }

        fn glyph_box(&self, _: u32) -> Result<GlyphBox, Error> {
            Ok(GlyphBox::default())
        }

        fn rasterize(&self, _: u32, glyph_box: &GlyphBox) -> Result<MonoBitmap, Error> {
            Ok(MonoBitmap::new(
                glyph_box.width as usize,
                glyph_box.height as usize,
            ))
        }

        fn advance_width(&self, codepoint: u32) -> Result<i32, Error> {
            match char::from_u32(codepoint) {
                Some('I') => Ok(self.0),
                Some('W') => Ok(self.1),
                _ => Err(Error::Draw {
                    codepoint,
                    message: "unexpected reference glyph".into(),
                }),
            }
        }
    }

    #[test]
    fn monospace_detection() {
        assert!(is_monospace(&Advances(9, 9)).unwrap());
        assert!(!is_monospace(&Advances(4, 12)).unwrap());
        // through a reference, as the builder uses it
        let by_ref = &Advances(7, 7);
        assert!(is_monospace(&by_ref).unwrap());
    }

    #[test]
    fn bitmap_packing() {
        let mut bitmap = MonoBitmap::new(10, 2);
        assert_eq!(bitmap.stride(), 2);
        bitmap.set(0, 0);
        bitmap.set(9, 0);
        bitmap.set(7, 1);
        bitmap.set(8, 1);
        // out of bounds writes are dropped
        bitmap.set(10, 0);
        bitmap.set(0, 2);
        assert_eq!(bitmap.as_bytes(), [0x80, 0x40, 0x01, 0x80]);
        assert!(bitmap.get(9, 0));
        assert!(!bitmap.get(1, 0));
        assert!(!bitmap.get(10, 0));
        assert_eq!(format!("{bitmap:?}"), "MonoBitmap 10x2\n#........#\n.......##.\n");
    }

    #[test]
    fn zero_sized_bitmap() {
        let bitmap = MonoBitmap::new(0, 5);
        assert_eq!(bitmap.stride(), 0);
        assert!(bitmap.into_bytes().is_empty());
    }

    #[test]
    fn empty_box() {
        let glyph_box = GlyphBox::empty(4);
        assert_eq!(glyph_box.width, 4);
        assert_eq!(glyph_box.height, 0);
        assert_eq!(glyph_box.to_string(), "4x0 at (0, 0)");
    }
}
