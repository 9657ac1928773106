//! A [`Rasterizer`] backed by skrifa outlines.

use kurbo::{BezPath, Point, Rect, Shape};
use skrifa::{
    charmap::Charmap,
    metrics::GlyphMetrics,
    outline::DrawSettings,
    prelude::{LocationRef, Size},
    raw::{FontRef, TableProvider},
    GlyphId, MetadataProvider, OutlineGlyphCollection,
};

use crate::{
    error::Error,
    pen::BezPathPen,
    raster::{FontMetrics, GlyphBox, MonoBitmap, Rasterizer},
};

/// An outline font scaled to a fixed number of pixels per em.
///
/// Glyphs are drawn unhinted at the default location of a variable font.
/// A pixel is set when its center is inside the outline, using the
/// non-zero winding rule.
pub struct ScaledFont<'a> {
    size: Size,
    charmap: Charmap<'a>,
    glyph_metrics: GlyphMetrics<'a>,
    outlines: OutlineGlyphCollection<'a>,
    metrics: FontMetrics,
}

// Outline coordinates are rounded to this grid before computing pixel
// bounds, so that float noise does not add a row or column.
const SNAP: f64 = 64.0;

fn snap(value: f64) -> f64 {
    (value * SNAP).round() / SNAP
}

fn to_i16(value: f64, metric: &'static str) -> Result<i16, Error> {
    if value.is_finite() && value >= i16::MIN as f64 && value <= i16::MAX as f64 {
        Ok(value as i16)
    } else {
        Err(Error::MetricsOverflow { metric, value })
    }
}

/// The pixel box covering `bounds`, widened to `advance`.
///
/// Returns the saturated box as an error if any edge is out of `i32` range.
fn pixel_box(bounds: Rect, advance: i32, ascent: i32) -> Result<GlyphBox, GlyphBox> {
    let x_min = bounds.x0.floor() as i32;
    let y_min = bounds.y0.floor() as i32;
    let right = (bounds.x1.ceil() as i32).max(advance);
    let y_max = bounds.y1.ceil() as i32;
    let exact = (
        right.checked_sub(x_min),
        y_max.checked_sub(y_min),
        ascent.checked_sub(y_max),
    );
    match exact {
        (Some(width), Some(height), Some(y_offset)) => Ok(GlyphBox {
            width,
            height,
            x_offset: x_min,
            y_offset,
        }),
        _ => Err(GlyphBox {
            width: right.saturating_sub(x_min),
            height: y_max.saturating_sub(y_min),
            x_offset: x_min,
            y_offset: ascent.saturating_sub(y_max),
        }),
    }
}

impl<'a> ScaledFont<'a> {
    /// Load the first font in `data` at `ppem` pixels per em.
    pub fn new(data: &'a [u8], ppem: f32) -> Result<Self, Error> {
        Self::from_index(data, 0, ppem)
    }

    /// Load the font at `index` in a collection at `ppem` pixels per em.
    pub fn from_index(data: &'a [u8], index: u32, ppem: f32) -> Result<Self, Error> {
        if !(ppem.is_finite() && ppem > 0.0) {
            return Err(Error::InvalidSize(ppem));
        }
        let font = FontRef::from_index(data, index).map_err(|e| Error::FontLoad(e.to_string()))?;
        // glyph metrics silently fall back to zero without these
        font.head().map_err(|e| Error::FontLoad(format!("head: {e}")))?;
        font.hhea().map_err(|e| Error::FontLoad(format!("hhea: {e}")))?;
        font.hmtx().map_err(|e| Error::FontLoad(format!("hmtx: {e}")))?;

        let charmap = font.charmap();
        if !charmap.has_map() {
            return Err(Error::FontLoad("no usable character map".into()));
        }
        let outlines = font.outline_glyphs();
        if outlines.format().is_none() {
            return Err(Error::FontLoad("no glyph outlines".into()));
        }

        let size = Size::new(ppem);
        let line = font.metrics(size, LocationRef::default());
        let ascent = to_i16(snap(line.ascent as f64).ceil(), "ascent")?;
        let descent = to_i16(snap(-line.descent as f64).ceil(), "descent")?;
        log::debug!(
            "scaled font at {ppem} ppem: ascent {ascent}, descent {descent}, {} glyphs",
            font.maxp().map(|maxp| maxp.num_glyphs()).unwrap_or_default()
        );

        Ok(ScaledFont {
            size,
            charmap,
            glyph_metrics: font.glyph_metrics(size, LocationRef::default()),
            outlines,
            metrics: FontMetrics { ascent, descent },
        })
    }

    /// The glyph for `codepoint`, or `.notdef` if the font does not map it.
    pub fn glyph_id(&self, codepoint: u32) -> GlyphId {
        self.charmap.map(codepoint).unwrap_or_else(|| {
            log::warn!("U+{codepoint:04X} is not mapped, using .notdef");
            GlyphId::NOTDEF
        })
    }

    /// The scaled outline of the glyph for `codepoint`.
    ///
    /// The y axis points up, with the baseline at zero.
    pub fn outline(&self, codepoint: u32) -> Result<BezPath, Error> {
        let gid = self.glyph_id(codepoint);
        let glyph = self.outlines.get(gid).ok_or_else(|| Error::Draw {
            codepoint,
            message: format!("no outline for glyph {}", gid.to_u32()),
        })?;
        let mut pen = BezPathPen::new();
        glyph
            .draw(
                DrawSettings::unhinted(self.size, LocationRef::default()),
                &mut pen,
            )
            .map_err(|e| Error::Draw {
                codepoint,
                message: e.to_string(),
            })?;
        Ok(pen.into_inner())
    }

    fn advance(&self, codepoint: u32) -> Result<f64, Error> {
        let gid = self.glyph_id(codepoint);
        self.glyph_metrics
            .advance_width(gid)
            .map(|advance| snap(advance as f64))
            .ok_or_else(|| Error::Draw {
                codepoint,
                message: format!("no advance width for glyph {}", gid.to_u32()),
            })
    }

    fn ink_bounds(path: &BezPath) -> Option<Rect> {
        if path.elements().is_empty() {
            return None;
        }
        let bounds = path.bounding_box();
        let snapped = Rect::new(
            snap(bounds.x0),
            snap(bounds.y0),
            snap(bounds.x1),
            snap(bounds.y1),
        );
        (snapped.width() > 0.0 && snapped.height() > 0.0).then_some(snapped)
    }
}

impl Rasterizer for ScaledFont<'_> {
    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn glyph_box(&self, codepoint: u32) -> Result<GlyphBox, Error> {
        let advance = self.advance(codepoint)?.round() as i32;
        let path = self.outline(codepoint)?;
        let Some(bounds) = Self::ink_bounds(&path) else {
            return Ok(GlyphBox::empty(advance));
        };
        pixel_box(bounds, advance, self.metrics.ascent as i32).map_err(|glyph_box| {
            Error::GlyphTooLarge {
                codepoint,
                glyph_box,
            }
        })
    }

    fn rasterize(&self, codepoint: u32, glyph_box: &GlyphBox) -> Result<MonoBitmap, Error> {
        let too_large = || Error::GlyphTooLarge {
            codepoint,
            glyph_box: *glyph_box,
        };
        let width = usize::try_from(glyph_box.width).map_err(|_| too_large())?;
        let height = usize::try_from(glyph_box.height).map_err(|_| too_large())?;
        let path = self.outline(codepoint)?;
        let mut bitmap = MonoBitmap::new(width, height);
        // top edge of the bitmap, measured up from the baseline
        let top = (self.metrics.ascent as i32 - glyph_box.y_offset) as f64;
        let left = glyph_box.x_offset as f64;
        for y in 0..height {
            let py = top - y as f64 - 0.5;
            for x in 0..width {
                let px = left + x as f64 + 0.5;
                if path.contains(Point::new(px, py)) {
                    bitmap.set(x, y);
                }
            }
        }
        Ok(bitmap)
    }

    fn advance_width(&self, codepoint: u32) -> Result<i32, Error> {
        Ok(self.advance(codepoint)?.round() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::is_monospace;
    use pretty_assertions::assert_eq;

    fn glyph_box(font: &ScaledFont, ch: char) -> GlyphBox {
        font.glyph_box(ch as u32).unwrap()
    }

    #[test]
    fn line_metrics() {
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        assert_eq!(
            font.metrics(),
            FontMetrics {
                ascent: 16,
                descent: 4
            }
        );
    }

    #[test]
    fn ink_boxes() {
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        let expected = [
            ('A', (11, 14, 0, 2)),
            ('B', (12, 14, 2, 2)),
            ('I', (5, 14, 2, 2)),
            ('W', (17, 14, 0, 2)),
            ('g', (8, 13, 1, 7)),
        ];
        for (ch, (width, height, x_offset, y_offset)) in expected {
            assert_eq!(
                glyph_box(&font, ch),
                GlyphBox {
                    width,
                    height,
                    x_offset,
                    y_offset
                },
                "{ch}"
            );
        }
    }

    #[test]
    fn space_has_no_ink() {
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        assert_eq!(glyph_box(&font, ' '), GlyphBox::empty(4));
    }

    #[test]
    fn unmapped_uses_notdef() {
        let _ = env_logger::builder().is_test(true).try_init();
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        assert_eq!(font.glyph_id('Z' as u32), GlyphId::NOTDEF);
        // .notdef is empty with an advance of half an em
        assert_eq!(glyph_box(&font, 'Z'), GlyphBox::empty(8));
    }

    #[test]
    fn rect_bitmap() {
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        let b = glyph_box(&font, 'B');
        let bitmap = font.rasterize('B' as u32, &b).unwrap();
        assert_eq!(bitmap.as_bytes(), [0xff, 0xc0].repeat(14));
        let i = glyph_box(&font, 'I');
        let bitmap = font.rasterize('I' as u32, &i).unwrap();
        assert_eq!(bitmap.as_bytes(), [0xe0; 14]);
    }

    #[test]
    fn triangle_bitmap_is_symmetric() {
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        let a = glyph_box(&font, 'A');
        let bitmap = font.rasterize('A' as u32, &a).unwrap();
        // the apex row is narrow, the base row is wide
        let row_ink = |y: usize| (0..11).filter(|x| bitmap.get(*x, y)).count();
        assert!(row_ink(0) < row_ink(13));
        assert_eq!(row_ink(13), 10);
        // nothing past the ink in the advance padding
        assert!((0..14).all(|y| !bitmap.get(10, y)));
        for y in 0..14 {
            for x in 0..5 {
                assert_eq!(bitmap.get(x, y), bitmap.get(9 - x, y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn descender_bitmap() {
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        let g = glyph_box(&font, 'g');
        let bitmap = font.rasterize('g' as u32, &g).unwrap();
        // ink spans 7 of the 8 columns on every row
        assert_eq!(bitmap.as_bytes(), [0xfe; 13]);
    }

    #[test]
    fn monospace() {
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        assert!(!is_monospace(&font).unwrap());
        let data = ufnt_test_data::monospace();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        assert!(is_monospace(&font).unwrap());
    }

    #[test]
    fn encode_a_and_b() {
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 16.0).unwrap();
        let context = crate::FontContext::from_rasterizer(&font).unwrap();
        let ranges = [crate::CodepointRange::new(0x41, 0x42)];
        let bytes =
            crate::encode(&ranges, &context, &font, crate::RangePolicy::default()).unwrap();

        let asset = crate::read::AssetRef::new(&bytes).unwrap();
        let header = asset.header();
        assert_eq!((header.ascent, header.descent), (16, 4));
        assert!(!header.flags.contains(crate::HeaderFlags::MONOSPACE));
        let groups: Vec<_> = asset.groups().collect::<Result<_, _>>().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!((groups[0].first(), groups[0].last()), (0x41, 0x42));
        let offsets: Vec<_> = groups[0].offsets().collect();
        // header, one two-entry group, sentinel
        assert_eq!(offsets[0], 10 + 16 + 8);
        let a = asset.glyph(offsets[0]).unwrap();
        let b = asset.glyph(offsets[1]).unwrap();
        assert_eq!((a.width(), a.height()), (11, 14));
        assert_eq!((b.width(), b.height()), (12, 14));
        assert_eq!((b.x_offset(), b.y_offset()), (2, 2));
        assert_eq!(offsets[1] as usize, offsets[0] as usize + 8 + 2 * 14);
        assert_eq!(bytes.len(), offsets[1] as usize + 8 + 2 * 14);
    }

    #[test]
    fn too_large_for_the_format() {
        let data = ufnt_test_data::proportional();
        let font = ScaledFont::new(&data, 400.0).unwrap();
        let context = crate::FontContext::from_rasterizer(&font).unwrap();
        let ranges = [crate::CodepointRange::new(0x42, 0x42)];
        let err = crate::layout(&ranges, &context, &font, crate::RangePolicy::default())
            .unwrap_err();
        assert!(
            matches!(err, Error::GlyphTooLarge { codepoint: 0x42, glyph_box } if glyph_box.height == 350),
            "{err}"
        );
    }

    #[test]
    fn pixel_box_rounds_outwards() {
        let bounds = Rect::new(0.25, -0.5, 3.5, 10.0);
        assert_eq!(
            pixel_box(bounds, 6, 16),
            Ok(GlyphBox {
                width: 6,
                height: 11,
                x_offset: 0,
                y_offset: 6
            })
        );
    }

    #[test]
    fn pixel_box_overflow() {
        let wide = Rect::new(-1e12, 0.0, 1e12, 10.0);
        let err = pixel_box(wide, 0, 16).unwrap_err();
        assert_eq!(err.width, i32::MAX);
        let tall = Rect::new(0.0, -1e12, 1.0, 1e12);
        let err = pixel_box(tall, 0, 16).unwrap_err();
        assert_eq!(err.height, i32::MAX);
        assert_eq!(err.y_offset, 16 - i32::MAX);
    }

    #[test]
    fn line_metrics_overflow() {
        let data = ufnt_test_data::proportional();
        // the ascender is one em, so 40000 px does not fit in an i16
        assert!(matches!(
            ScaledFont::new(&data, 40000.0),
            Err(Error::MetricsOverflow {
                metric: "ascent",
                ..
            })
        ));
    }

    #[test]
    fn bad_inputs() {
        let data = ufnt_test_data::proportional();
        assert!(matches!(
            ScaledFont::new(&data, 0.0),
            Err(Error::InvalidSize(_))
        ));
        assert!(matches!(
            ScaledFont::new(&data, f32::NAN),
            Err(Error::InvalidSize(_))
        ));
        assert!(matches!(
            ScaledFont::new(b"not a font", 16.0),
            Err(Error::FontLoad(_))
        ));
    }
}
