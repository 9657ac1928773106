//! Reading an encoded asset back.
//!
//! This is a conforming reader for checking what was written; it does not
//! look up codepoints or render text.

use crate::format::{
    bitmap_len, Header, HeaderFlags, GLYPH_HEADER_LEN, GROUP_ENTRY_LEN, GROUP_HEADER_LEN,
    HEADER_LEN, MAGIC, VERSION,
};

/// An error encountered while reading an asset.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    #[error("read of {len} bytes at offset {offset} is out of bounds")]
    OutOfBounds { offset: usize, len: usize },
    #[error("bad magic {0:#010x}")]
    BadMagic(u32),
    #[error("unsupported version {0}")]
    UnsupportedVersion(u8),
    #[error("index ends without a sentinel group")]
    MissingSentinel,
}

fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8], ReadError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(ReadError::OutOfBounds { offset, len })
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32, ReadError> {
    let bytes = slice(data, offset, 4)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_u16(data: &[u8], offset: usize) -> Result<u16, ReadError> {
    let bytes = slice(data, offset, 2)?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// A borrowed, encoded asset.
#[derive(Clone, Copy, Debug)]
pub struct AssetRef<'a> {
    data: &'a [u8],
    header: Header,
}

impl<'a> AssetRef<'a> {
    /// Check the magic and version and parse the header.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        slice(data, 0, HEADER_LEN)?;
        let magic = read_u32(data, 0)?;
        if magic != MAGIC {
            return Err(ReadError::BadMagic(magic));
        }
        if data[4] != VERSION {
            return Err(ReadError::UnsupportedVersion(data[4]));
        }
        let header = Header {
            flags: HeaderFlags::from_bits_truncate(data[5]),
            ascent: read_u16(data, 6)? as i16,
            descent: read_u16(data, 8)? as i16,
        };
        Ok(AssetRef { data, header })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// The index groups, in stored order, excluding the sentinel.
    pub fn groups(&self) -> Groups<'a> {
        Groups {
            data: self.data,
            pos: HEADER_LEN,
            done: false,
        }
    }

    /// The glyph record at an absolute offset.
    pub fn glyph(&self, offset: u32) -> Result<GlyphRef<'a>, ReadError> {
        let offset = offset as usize;
        let head = slice(self.data, offset, GLYPH_HEADER_LEN)?;
        let x_offset = i16::from_le_bytes([head[0], head[1]]);
        let y_offset = i16::from_le_bytes([head[2], head[3]]);
        let width = u16::from_le_bytes([head[4], head[5]]);
        let height = u16::from_le_bytes([head[6], head[7]]);
        let bitmap = slice(
            self.data,
            offset + GLYPH_HEADER_LEN,
            bitmap_len(width as usize, height as usize),
        )?;
        Ok(GlyphRef {
            x_offset,
            y_offset,
            width,
            height,
            bitmap,
        })
    }

    /// Walk the whole index and read every glyph it references.
    ///
    /// Returns the number of glyph records referenced.
    pub fn verify(&self) -> Result<usize, ReadError> {
        let mut count = 0;
        for group in self.groups() {
            for offset in group?.offsets() {
                self.glyph(offset)?;
                count += 1;
            }
        }
        Ok(count)
    }
}

/// Iterator over the index groups of an asset.
#[derive(Clone, Debug)]
pub struct Groups<'a> {
    data: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Groups<'a> {
    fn next_group(&mut self) -> Result<Option<GroupRef<'a>>, ReadError> {
        if slice(self.data, self.pos, GROUP_HEADER_LEN).is_err() {
            return Err(ReadError::MissingSentinel);
        }
        let first = read_u32(self.data, self.pos)?;
        let last = read_u32(self.data, self.pos + 4)?;
        if last < first {
            return Ok(None);
        }
        let count = (last - first) as usize + 1;
        let entries_len = count
            .checked_mul(GROUP_ENTRY_LEN)
            .ok_or(ReadError::OutOfBounds {
                offset: self.pos,
                len: usize::MAX,
            })?;
        let offsets = slice(self.data, self.pos + GROUP_HEADER_LEN, entries_len)?;
        self.pos += GROUP_HEADER_LEN + entries_len;
        Ok(Some(GroupRef {
            first,
            last,
            offsets,
        }))
    }
}

impl<'a> Iterator for Groups<'a> {
    type Item = Result<GroupRef<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.next_group();
        match result {
            Ok(Some(group)) => Some(Ok(group)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// One index group.
#[derive(Clone, Copy, Debug)]
pub struct GroupRef<'a> {
    first: u32,
    last: u32,
    offsets: &'a [u8],
}

impl<'a> GroupRef<'a> {
    pub fn first(&self) -> u32 {
        self.first
    }

    pub fn last(&self) -> u32 {
        self.last
    }

    /// The absolute glyph offsets for `first..=last`.
    pub fn offsets(&self) -> impl Iterator<Item = u32> + 'a {
        self.offsets
            .chunks_exact(GROUP_ENTRY_LEN)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    }
}

/// One glyph record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphRef<'a> {
    x_offset: i16,
    y_offset: i16,
    width: u16,
    height: u16,
    bitmap: &'a [u8],
}

impl<'a> GlyphRef<'a> {
    pub fn x_offset(&self) -> i16 {
        self.x_offset
    }

    pub fn y_offset(&self) -> i16 {
        self.y_offset
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bitmap(&self) -> &'a [u8] {
        self.bitmap
    }
}
