//! Small TrueType fonts with known geometry, for testing the ufnt crates.
//!
//! Every font has 1024 units per em, an ascender of 1024 and a descender
//! of -256, so at 16 pixels per em one unit is exactly 1/64 of a pixel and
//! the line is 16 + 4 pixels tall.
//!
//! | glyph     | outline                          | advance |
//! |-----------|----------------------------------|---------|
//! | `.notdef` | empty                            | 512     |
//! | space     | empty                            | 256     |
//! | `A`       | triangle (0,0) (320,896) (640,0) | 704     |
//! | `B`       | rect (128,0)-(768,896)           | 896     |
//! | `I`       | rect (128,0)-(320,896)           | 448     |
//! | `W`       | rect (0,0)-(1024,896)            | 1088    |
//! | `g`       | rect (64,-256)-(512,576)         | 576     |
//!
//! In the [monospace] font every advance is 1088.

use kurbo::{BezPath, Rect, Shape};
use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{GlyfLocaBuilder, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        maxp::Maxp,
    },
    types::{FWord, GlyphId, UfWord},
    FontBuilder,
};

pub const UNITS_PER_EM: u16 = 1024;
pub const ASCENDER: i16 = 1024;
pub const DESCENDER: i16 = -256;

struct TestGlyph {
    ch: Option<char>,
    path: BezPath,
    advance: u16,
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    Rect::new(x0, y0, x1, y1).to_path(0.1)
}

fn triangle() -> BezPath {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((320.0, 896.0));
    path.line_to((640.0, 0.0));
    path.close_path();
    path
}

fn glyphs() -> Vec<TestGlyph> {
    let glyph = |ch, path, advance| TestGlyph { ch, path, advance };
    vec![
        glyph(None, BezPath::new(), 512),
        glyph(Some(' '), BezPath::new(), 256),
        glyph(Some('A'), triangle(), 704),
        glyph(Some('B'), rect(128.0, 0.0, 768.0, 896.0), 896),
        glyph(Some('I'), rect(128.0, 0.0, 320.0, 896.0), 448),
        glyph(Some('W'), rect(0.0, 0.0, 1024.0, 896.0), 1088),
        glyph(Some('g'), rect(64.0, -256.0, 512.0, 576.0), 576),
    ]
}

fn build(glyphs: &[TestGlyph]) -> Vec<u8> {
    let mut builder = GlyfLocaBuilder::new();
    let mut h_metrics = Vec::with_capacity(glyphs.len());
    let mut bounds: Option<Rect> = None;
    for glyph in glyphs {
        let simple = if glyph.path.elements().is_empty() {
            SimpleGlyph::default()
        } else {
            SimpleGlyph::from_bezpath(&glyph.path).unwrap()
        };
        builder.add_glyph(&simple).unwrap();
        let side_bearing = if glyph.path.elements().is_empty() {
            0
        } else {
            let bbox = glyph.path.bounding_box();
            bounds = Some(bounds.map_or(bbox, |b| b.union(bbox)));
            bbox.x0 as i16
        };
        h_metrics.push(LongMetric {
            advance: glyph.advance,
            side_bearing,
        });
    }
    let (glyf, loca, loca_format) = builder.build();
    let bounds = bounds.unwrap_or_default();

    let mappings = glyphs
        .iter()
        .enumerate()
        .filter_map(|(gid, glyph)| Some((glyph.ch?, GlyphId::new(gid as u32))));
    let cmap = Cmap::from_mappings(mappings).unwrap();

    let head = Head {
        units_per_em: UNITS_PER_EM,
        x_min: bounds.x0 as i16,
        y_min: bounds.y0 as i16,
        x_max: bounds.x1 as i16,
        y_max: bounds.y1 as i16,
        index_to_loc_format: loca_format as i16,
        ..Default::default()
    };
    let hhea = Hhea {
        ascender: FWord::new(ASCENDER),
        descender: FWord::new(DESCENDER),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(glyphs.iter().map(|g| g.advance).max().unwrap_or(0)),
        min_left_side_bearing: FWord::new(0),
        min_right_side_bearing: FWord::new(0),
        x_max_extent: FWord::new(bounds.x1 as i16),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: glyphs.len() as u16,
    };
    let hmtx = Hmtx {
        h_metrics,
        left_side_bearings: Vec::new(),
    };
    let maxp = Maxp {
        num_glyphs: glyphs.len() as u16,
        ..Default::default()
    };

    let mut font_builder = FontBuilder::new();
    font_builder.add_table(&head).unwrap();
    font_builder.add_table(&hhea).unwrap();
    font_builder.add_table(&maxp).unwrap();
    font_builder.add_table(&hmtx).unwrap();
    font_builder.add_table(&cmap).unwrap();
    font_builder.add_table(&loca).unwrap();
    font_builder.add_table(&glyf).unwrap();
    font_builder.build()
}

/// A font with a distinct advance for every glyph.
pub fn proportional() -> Vec<u8> {
    build(&glyphs())
}

/// The same outlines as [proportional], all advancing by 1088 units.
pub fn monospace() -> Vec<u8> {
    let mut glyphs = glyphs();
    for glyph in &mut glyphs {
        glyph.advance = 1088;
    }
    build(&glyphs)
}
