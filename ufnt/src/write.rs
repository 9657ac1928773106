//! Serializing asset records into bytes.

/// A type that can be written out as part of a bitmap font asset.
///
/// Unlike OpenType, every value in the asset is little-endian and there are
/// no relative offsets: glyph offsets are absolute and are resolved by the
/// [layout](crate::layout) pass before anything is written.
pub trait AssetWrite {
    /// Write our data into this [AssetWriter].
    fn write_into(&self, writer: &mut AssetWriter);
}

/// A growable buffer that accumulates serialized records.
#[derive(Debug, Default)]
pub struct AssetWriter {
    data: Vec<u8>,
}

/// Serialize an object into a new byte vector.
pub fn dump(obj: &impl AssetWrite) -> Vec<u8> {
    let mut writer = AssetWriter::default();
    obj.write_into(&mut writer);
    writer.into_data()
}

impl AssetWriter {
    /// Create a writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        AssetWriter {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Write raw bytes.
    ///
    /// The caller is responsible for ensuring multi-byte values are in
    /// little-endian order.
    #[inline]
    pub fn write_slice(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes)
    }

    /// Consume the writer, returning the serialized bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

macro_rules! write_le_bytes {
    ($ty:ty) => {
        impl AssetWrite for $ty {
            #[inline]
            fn write_into(&self, writer: &mut AssetWriter) {
                writer.write_slice(&self.to_le_bytes())
            }
        }
    };
}

write_le_bytes!(u8);
write_le_bytes!(i8);
write_le_bytes!(u16);
write_le_bytes!(i16);
write_le_bytes!(u32);
write_le_bytes!(i32);

impl<T: AssetWrite> AssetWrite for [T] {
    fn write_into(&self, writer: &mut AssetWriter) {
        self.iter().for_each(|item| item.write_into(writer))
    }
}

impl<T: AssetWrite> AssetWrite for Vec<T> {
    fn write_into(&self, writer: &mut AssetWriter) {
        self.as_slice().write_into(writer)
    }
}
