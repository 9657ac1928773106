//! Constants and fixed-size records of the bitmap font format.
//!
//! An asset is a single little-endian byte buffer:
//!
//! ```text
//! header (10 bytes)
//!   u32 magic       0x746e4675
//!   u8  version     1
//!   u8  flags       bit 0: monospace
//!   u16 ascent
//!   u16 descent
//! group, repeated
//!   u32 first_codepoint
//!   u32 last_codepoint
//!   u32 glyph_offset[last - first + 1]
//! sentinel group
//!   u32 first = 1
//!   u32 last  = 0
//! glyph record, repeated
//!   i16 x_offset
//!   i16 y_offset
//!   u16 width
//!   u16 height
//!   u8  bitmap[ceil(width / 8) * height]   (only when height > 0)
//! ```
//!
//! Every glyph offset is absolute, measured from the start of the buffer.

use std::fmt;

use crate::write::{AssetWrite, AssetWriter};

/// Identifies a bitmap font asset (`b"uFnt"` read as a little-endian u32).
pub const MAGIC: u32 = 0x746e_4675;

/// The format revision produced by this crate.
pub const VERSION: u8 = 1;

/// The size of the encoded [`Header`].
pub const HEADER_LEN: usize = 10;

/// The size of the `{first, last}` pair that starts every group.
pub const GROUP_HEADER_LEN: usize = 8;

/// The size of a single glyph offset in a group.
pub const GROUP_ENTRY_LEN: usize = 4;

/// The size of a glyph record without its bitmap.
pub const GLYPH_HEADER_LEN: usize = 8;

/// Flags stored in the asset header.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HeaderFlags(u8);

impl HeaderFlags {
    /// All glyphs share the same advance width.
    pub const MONOSPACE: Self = Self(0x01);

    const ALL: u8 = Self::MONOSPACE.0;

    /// No flags set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The raw value as stored in the header.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Create flags from a raw value, dropping any unknown bits.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    /// Returns `true` if all of the flags in `other` are contained within `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Adds the set of flags.
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Adds or removes the set of flags depending on `value`.
    pub fn set(&mut self, other: Self, value: bool) {
        if value {
            self.0 |= other.0;
        } else {
            self.0 &= !other.0;
        }
    }
}

impl std::ops::BitOr for HeaderFlags {
    type Output = Self;

    /// Returns the union of the two sets of flags.
    #[inline]
    fn bitor(self, other: HeaderFlags) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOrAssign for HeaderFlags {
    #[inline]
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl fmt::Debug for HeaderFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(Self::MONOSPACE) {
            write!(f, "HeaderFlags(MONOSPACE)")
        } else {
            write!(f, "HeaderFlags(empty)")
        }
    }
}

/// The variable part of the asset header.
///
/// Magic and version are constants and are only checked when reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub flags: HeaderFlags,
    /// Distance in pixels from the top of the line to the baseline.
    pub ascent: i16,
    /// Distance in pixels from the baseline to the bottom of the line.
    pub descent: i16,
}

impl AssetWrite for Header {
    fn write_into(&self, writer: &mut AssetWriter) {
        MAGIC.write_into(writer);
        VERSION.write_into(writer);
        self.flags.bits().write_into(writer);
        // the format declares these as u16; the bit pattern is kept as is
        (self.ascent as u16).write_into(writer);
        (self.descent as u16).write_into(writer);
    }
}

/// The codepoint bounds that start every index group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupHeader {
    pub first: u32,
    pub last: u32,
}

impl GroupHeader {
    /// The group that terminates the index.
    ///
    /// `last < first` cannot occur in a real group.
    pub const SENTINEL: Self = Self { first: 1, last: 0 };

    /// Returns `true` if this header marks the end of the index.
    pub fn is_sentinel(&self) -> bool {
        self.last < self.first
    }

    /// The number of glyph offsets that follow this header.
    pub fn entry_count(&self) -> u64 {
        if self.is_sentinel() {
            0
        } else {
            (self.last - self.first) as u64 + 1
        }
    }

    /// The encoded size of the group, offsets included.
    pub fn encoded_len(&self) -> u64 {
        if self.is_sentinel() {
            GROUP_HEADER_LEN as u64
        } else {
            group_len(self.first, self.last)
        }
    }
}

impl AssetWrite for GroupHeader {
    fn write_into(&self, writer: &mut AssetWriter) {
        self.first.write_into(writer);
        self.last.write_into(writer);
    }
}

/// The encoded size of a group covering `first..=last`.
///
/// `last` must not be less than `first`.
pub fn group_len(first: u32, last: u32) -> u64 {
    let count = (last - first) as u64 + 1;
    GROUP_HEADER_LEN as u64 + GROUP_ENTRY_LEN as u64 * count
}

/// The number of bitmap bytes for a glyph of the given dimensions.
///
/// Rows are padded to a whole byte.
pub fn bitmap_len(width: usize, height: usize) -> usize {
    width.div_ceil(8) * height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::dump;

    #[test]
    fn header_layout() {
        let header = Header {
            flags: HeaderFlags::MONOSPACE,
            ascent: 13,
            descent: 3,
        };
        let bytes = dump(&header);
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(
            bytes,
            [0x75, 0x46, 0x6e, 0x74, 0x01, 0x01, 0x0d, 0x00, 0x03, 0x00]
        );
    }

    #[test]
    fn sentinel() {
        assert!(GroupHeader::SENTINEL.is_sentinel());
        assert_eq!(GroupHeader::SENTINEL.entry_count(), 0);
        assert_eq!(dump(&GroupHeader::SENTINEL), [1, 0, 0, 0, 0, 0, 0, 0]);
        // a single codepoint group is not a sentinel
        let single = GroupHeader { first: 5, last: 5 };
        assert!(!single.is_sentinel());
        assert_eq!(single.encoded_len(), 12);
        assert_eq!(GroupHeader::SENTINEL.encoded_len(), 8);
        assert_eq!(group_len(0x20, 0x7e), 8 + 4 * 95);
    }

    #[test]
    fn full_codepoint_space_does_not_overflow() {
        let everything = GroupHeader {
            first: 0,
            last: u32::MAX,
        };
        assert_eq!(everything.entry_count(), 1 << 32);
    }

    #[test]
    fn flags() {
        let mut flags = HeaderFlags::empty();
        assert!(!flags.contains(HeaderFlags::MONOSPACE));
        flags.insert(HeaderFlags::MONOSPACE);
        assert_eq!(flags.bits(), 1);
        flags.set(HeaderFlags::MONOSPACE, false);
        assert_eq!(flags, HeaderFlags::empty());
        assert_eq!(HeaderFlags::from_bits_truncate(0xff), HeaderFlags::MONOSPACE);
        assert_eq!(
            HeaderFlags::empty() | HeaderFlags::MONOSPACE,
            HeaderFlags::MONOSPACE
        );
    }

    #[test]
    fn padded_rows() {
        assert_eq!(bitmap_len(0, 10), 0);
        assert_eq!(bitmap_len(1, 3), 3);
        assert_eq!(bitmap_len(8, 3), 3);
        assert_eq!(bitmap_len(9, 3), 6);
        assert_eq!(bitmap_len(255, 255), 32 * 255);
    }
}
