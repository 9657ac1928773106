//! Building the glyph record for a single codepoint.

use crate::{
    error::Error,
    format::{bitmap_len, GLYPH_HEADER_LEN},
    raster::{GlyphBox, Rasterizer},
    write::{AssetWrite, AssetWriter},
};

/// The metrics and pixels of one glyph, as stored in an asset.
///
/// The wire format has 16-bit fields but the values are restricted to
/// 8-bit ranges; the narrower types here make out of range records
/// unrepresentable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphRecord {
    pub x_offset: i8,
    pub y_offset: i8,
    pub width: u8,
    pub height: u8,
    /// Packed 1bpp rows, empty when `height` is zero.
    pub bitmap: Vec<u8>,
}

impl GlyphRecord {
    /// Create a record from a glyph box and its packed bitmap.
    ///
    /// Fails if the box does not fit the format, or if the bitmap is not
    /// exactly `ceil(width / 8) * height` bytes.
    pub fn new(codepoint: u32, glyph_box: &GlyphBox, bitmap: Vec<u8>) -> Result<Self, Error> {
        let (x_offset, y_offset, width, height) = check_bounds(codepoint, glyph_box)?;
        let expected = bitmap_len(width as usize, height as usize);
        if bitmap.len() != expected {
            return Err(Error::BitmapSize {
                codepoint,
                expected,
                actual: bitmap.len(),
            });
        }
        Ok(GlyphRecord {
            x_offset,
            y_offset,
            width,
            height,
            bitmap,
        })
    }

    /// The number of bytes this record occupies in the asset.
    pub fn encoded_len(&self) -> usize {
        GLYPH_HEADER_LEN + self.bitmap.len()
    }
}

fn check_bounds(codepoint: u32, glyph_box: &GlyphBox) -> Result<(i8, i8, u8, u8), Error> {
    let fits = || -> Option<(i8, i8, u8, u8)> {
        Some((
            i8::try_from(glyph_box.x_offset).ok()?,
            i8::try_from(glyph_box.y_offset).ok()?,
            u8::try_from(glyph_box.width).ok()?,
            u8::try_from(glyph_box.height).ok()?,
        ))
    };
    fits().ok_or(Error::GlyphTooLarge {
        codepoint,
        glyph_box: *glyph_box,
    })
}

impl AssetWrite for GlyphRecord {
    fn write_into(&self, writer: &mut AssetWriter) {
        (self.x_offset as i16).write_into(writer);
        (self.y_offset as i16).write_into(writer);
        (self.width as u16).write_into(writer);
        (self.height as u16).write_into(writer);
        writer.write_slice(&self.bitmap);
    }
}

/// Produces [`GlyphRecord`]s from a rasterizer.
pub struct GlyphBuilder<'a, R: ?Sized> {
    rasterizer: &'a R,
}

impl<'a, R: Rasterizer + ?Sized> GlyphBuilder<'a, R> {
    pub fn new(rasterizer: &'a R) -> Self {
        GlyphBuilder { rasterizer }
    }

    /// Measure, check and render the glyph for `codepoint`.
    ///
    /// The bounds are checked before anything is drawn, and glyphs with no
    /// height are never drawn at all.
    pub fn build(&self, codepoint: u32) -> Result<GlyphRecord, Error> {
        let glyph_box = self.rasterizer.glyph_box(codepoint)?;
        check_bounds(codepoint, &glyph_box)?;
        if glyph_box.height == 0 {
            return GlyphRecord::new(codepoint, &glyph_box, Vec::new());
        }
        let bitmap = self.rasterizer.rasterize(codepoint, &glyph_box)?;
        if bitmap.width() != glyph_box.width as usize || bitmap.height() != glyph_box.height as usize
        {
            return Err(Error::BitmapSize {
                codepoint,
                expected: bitmap_len(glyph_box.width as usize, glyph_box.height as usize),
                actual: bitmap.as_bytes().len(),
            });
        }
        GlyphRecord::new(codepoint, &glyph_box, bitmap.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::raster::{FontMetrics, MonoBitmap};
    use crate::write::dump;
    use pretty_assertions::assert_eq;

    /// Every glyph is a filled box; counts draw calls.
    struct Boxes {
        glyph_box: GlyphBox,
        draws: Cell<usize>,
    }

    impl Boxes {
        fn new(width: i32, height: i32, x_offset: i32, y_offset: i32) -> Self {
            Boxes {
                glyph_box: GlyphBox {
                    width,
                    height,
                    x_offset,
                    y_offset,
                },
                draws: Cell::new(0),
            }
        }
    }

    impl Rasterizer for Boxes {
        fn metrics(&self) -> FontMetrics {
            FontMetrics {
                ascent: 12,
                descent: 4,
            }
        }

        fn glyph_box(&self, _: u32) -> Result<GlyphBox, Error> {
            Ok(self.glyph_box)
        }

        fn rasterize(&self, _: u32, glyph_box: &GlyphBox) -> Result<MonoBitmap, Error> {
            self.draws.set(self.draws.get() + 1);
            let (w, h) = (glyph_box.width as usize, glyph_box.height as usize);
            let mut bitmap = MonoBitmap::new(w, h);
            for y in 0..h {
                for x in 0..w {
                    bitmap.set(x, y);
                }
            }
            Ok(bitmap)
        }

        fn advance_width(&self, _: u32) -> Result<i32, Error> {
            Ok(self.glyph_box.width)
        }
    }

    #[test]
    fn filled_glyph() {
        let boxes = Boxes::new(10, 2, -1, 3);
        let record = GlyphBuilder::new(&boxes).build(0x41).unwrap();
        assert_eq!(
            record,
            GlyphRecord {
                x_offset: -1,
                y_offset: 3,
                width: 10,
                height: 2,
                bitmap: vec![0xff, 0xc0, 0xff, 0xc0],
            }
        );
        assert_eq!(record.encoded_len(), 12);
        assert_eq!(
            dump(&record),
            [0xff, 0xff, 3, 0, 10, 0, 2, 0, 0xff, 0xc0, 0xff, 0xc0]
        );
    }

    #[test]
    fn zero_height_is_not_drawn() {
        let boxes = Boxes::new(4, 0, 0, 0);
        let record = GlyphBuilder::new(&boxes).build(0x20).unwrap();
        assert_eq!(boxes.draws.get(), 0);
        assert!(record.bitmap.is_empty());
        assert_eq!(record.encoded_len(), GLYPH_HEADER_LEN);
        assert_eq!(dump(&record), [0, 0, 0, 0, 4, 0, 0, 0]);
    }

    #[test]
    fn bounds_are_checked_before_drawing() {
        for (w, h, x, y) in [
            (256, 1, 0, 0),
            (1, 256, 0, 0),
            (1, 1, -129, 0),
            (1, 1, 128, 0),
            (1, 1, 0, -129),
            (1, 1, 0, 128),
            (-1, 1, 0, 0),
        ] {
            let boxes = Boxes::new(w, h, x, y);
            let err = GlyphBuilder::new(&boxes).build(0x42).unwrap_err();
            assert!(
                matches!(err, Error::GlyphTooLarge { codepoint: 0x42, .. }),
                "{err}"
            );
            assert_eq!(boxes.draws.get(), 0);
        }
    }

    #[test]
    fn extremes_fit() {
        let boxes = Boxes::new(255, 1, -128, 127);
        let record = GlyphBuilder::new(&boxes).build(0x43).unwrap();
        assert_eq!(record.bitmap.len(), 32);
        assert_eq!((record.x_offset, record.y_offset), (-128, 127));
    }

    #[test]
    fn bitmap_length_is_checked() {
        let glyph_box = GlyphBox {
            width: 9,
            height: 2,
            x_offset: 0,
            y_offset: 0,
        };
        let err = GlyphRecord::new(0x44, &glyph_box, vec![0; 3]).unwrap_err();
        assert!(matches!(
            err,
            Error::BitmapSize {
                expected: 4,
                actual: 3,
                ..
            }
        ));
    }
}
