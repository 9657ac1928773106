//! Laying out a complete asset: header, index groups and glyph records.

use crate::{
    error::Error,
    format::{
        group_len, GroupHeader, Header, HeaderFlags, GROUP_ENTRY_LEN, GROUP_HEADER_LEN, HEADER_LEN,
    },
    glyph::{GlyphBuilder, GlyphRecord},
    range::{CodepointRange, RangePolicy, RangeSet},
    raster::{is_monospace, FontMetrics, Rasterizer},
    validate::Validate,
    write::{dump, AssetWrite, AssetWriter},
};

/// Properties of the font that are fixed for the whole build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontContext {
    pub metrics: FontMetrics,
    pub flags: HeaderFlags,
}

impl FontContext {
    /// Query line metrics and monospace-ness once, up front.
    pub fn from_rasterizer(rasterizer: &(impl Rasterizer + ?Sized)) -> Result<Self, Error> {
        let mut flags = HeaderFlags::empty();
        flags.set(HeaderFlags::MONOSPACE, is_monospace(rasterizer)?);
        Ok(FontContext {
            metrics: rasterizer.metrics(),
            flags,
        })
    }

    pub fn header(&self) -> Header {
        Header {
            flags: self.flags,
            ascent: self.metrics.ascent,
            descent: self.metrics.descent,
        }
    }
}

/// One contiguous range of the index with resolved glyph offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexGroup {
    pub first: u32,
    pub last: u32,
    /// Absolute offset of the record for `first + i`.
    pub offsets: Vec<u32>,
}

impl AssetWrite for IndexGroup {
    fn write_into(&self, writer: &mut AssetWriter) {
        GroupHeader {
            first: self.first,
            last: self.last,
        }
        .write_into(writer);
        self.offsets.write_into(writer);
    }
}

/// A fully laid out asset, ready to be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontAsset {
    pub header: Header,
    pub groups: Vec<IndexGroup>,
    /// Records in the order they are stored, one per codepoint occurrence.
    pub glyphs: Vec<GlyphRecord>,
}

impl FontAsset {
    /// The total encoded size.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + self
                .groups
                .iter()
                .map(|g| GROUP_HEADER_LEN + GROUP_ENTRY_LEN * g.offsets.len())
                .sum::<usize>()
            + GROUP_HEADER_LEN
            + self.glyphs.iter().map(GlyphRecord::encoded_len).sum::<usize>()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = AssetWriter::with_capacity(self.encoded_len());
        self.write_into(&mut writer);
        writer.into_data()
    }
}

impl AssetWrite for FontAsset {
    fn write_into(&self, writer: &mut AssetWriter) {
        self.header.write_into(writer);
        self.groups.write_into(writer);
        GroupHeader::SENTINEL.write_into(writer);
        self.glyphs.write_into(writer);
    }
}

/// Build every glyph in `ranges` and resolve the index.
///
/// Groups are emitted in the order given. Codepoints that appear in more
/// than one range are rendered and stored once per occurrence; use
/// [`RangePolicy::Strict`] to reject such input instead.
pub fn layout<R: Rasterizer + ?Sized>(
    ranges: &[CodepointRange],
    context: &FontContext,
    rasterizer: &R,
    policy: RangePolicy,
) -> Result<FontAsset, Error> {
    RangeSet::new(ranges, policy).validate()?;

    // the index must be sized before the first glyph offset is known
    let index_len: u64 = ranges
        .iter()
        .map(|range| group_len(range.start, range.stop))
        .sum::<u64>()
        + GroupHeader::SENTINEL.encoded_len();
    let glyph_base = HEADER_LEN as u64 + index_len;
    if glyph_base > u32::MAX as u64 {
        return Err(Error::OffsetOverflow);
    }

    let builder = GlyphBuilder::new(rasterizer);
    let mut groups = Vec::with_capacity(ranges.len());
    let mut glyphs = Vec::new();
    let mut glyph_data_len = 0u64;
    for range in ranges {
        let mut offsets = Vec::with_capacity(range.len() as usize);
        for codepoint in range.iter() {
            let record = builder.build(codepoint)?;
            let offset =
                u32::try_from(glyph_base + glyph_data_len).map_err(|_| Error::OffsetOverflow)?;
            offsets.push(offset);
            glyph_data_len += record.encoded_len() as u64;
            glyphs.push(record);
        }
        log::debug!("group {range}: {} glyphs", offsets.len());
        groups.push(IndexGroup {
            first: range.start,
            last: range.stop,
            offsets,
        });
    }

    log::info!(
        "laid out {} groups, {} glyphs, {} bytes",
        groups.len(),
        glyphs.len(),
        glyph_base + glyph_data_len
    );
    Ok(FontAsset {
        header: context.header(),
        groups,
        glyphs,
    })
}

/// Build and serialize an asset in one step.
pub fn encode<R: Rasterizer + ?Sized>(
    ranges: &[CodepointRange],
    context: &FontContext,
    rasterizer: &R,
    policy: RangePolicy,
) -> Result<Vec<u8>, Error> {
    let asset = layout(ranges, context, rasterizer, policy)?;
    Ok(dump(&asset))
}
