#![doc = r#"
The generic chunk prefix

MIDI files are organized into chunks, each identified by a 4-character ASCII type identifier
followed by a 32-bit big-endian length field and then `length` bytes of chunk data.

```text
[Header Chunk: "MThd" 00 00 00 06 <format> <tracks> <division>]
[Track Chunk 1: "MTrk" <length> <events...>]
...
[Track Chunk N: "MTrk" <length> <events...>]
```

The header chunk and every track chunk share the same 8-byte prefix, read and written
by [`ChunkHeader`].
"#]

use crate::{CorruptKind, Result, reader::Reader};
use std::io::{Read, Write};

/// The 8-byte prefix of every chunk: a 4-byte tag and a big-endian length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    id: [u8; 4],
    length: u32,
}

impl ChunkHeader {
    /// Tag of the header chunk
    pub const MTHD: [u8; 4] = *b"MThd";
    /// Tag of a track chunk
    pub const MTRK: [u8; 4] = *b"MTrk";

    /// Create a chunk prefix.
    pub const fn new(id: [u8; 4], length: u32) -> Self {
        Self { id, length }
    }

    /// The 4-byte type identifier
    pub const fn id(&self) -> [u8; 4] {
        self.id
    }

    /// Number of data bytes following the prefix
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Read a chunk prefix of any type.
    pub fn read<R: Read>(reader: &mut Reader<R>) -> Result<Self> {
        let id = reader.read_exact_size()?;
        let length = reader.read_u32()?;
        Ok(Self { id, length })
    }

    /// Read a chunk prefix, failing unless its tag is `expected`.
    pub fn read_expecting<R: Read>(reader: &mut Reader<R>, expected: [u8; 4]) -> Result<Self> {
        let start = reader.buffer_position();
        let header = Self::read(reader)?;
        if header.id != expected {
            return Err(crate::Error::corrupt(
                start,
                CorruptKind::ChunkTag {
                    expected,
                    found: header.id,
                },
            ));
        }
        Ok(header)
    }

    /// The 8 bytes of the prefix
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&self.id);
        out[4..].copy_from_slice(&self.length.to_be_bytes());
        out
    }

    /// Write the prefix to `out`.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(&self.to_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefix_layout() {
        let header = ChunkHeader::new(ChunkHeader::MTRK, 0x0102_0304);
        assert_eq!(
            header.to_bytes(),
            [b'M', b'T', b'r', b'k', 0x01, 0x02, 0x03, 0x04]
        );
        let bytes = header.to_bytes();
        let mut reader = Reader::new(&bytes[..]);
        assert_eq!(ChunkHeader::read(&mut reader).unwrap(), header);
    }

    #[test]
    fn wrong_tag() {
        let bytes = ChunkHeader::new(*b"XFIH", 6).to_bytes();
        let mut reader = Reader::with_offset(&bytes[..], 14);
        let err = ChunkHeader::read_expecting(&mut reader, ChunkHeader::MTRK).unwrap_err();
        assert_eq!(
            err.corrupt_kind(),
            Some(&CorruptKind::ChunkTag {
                expected: *b"MTrk",
                found: *b"XFIH"
            })
        );
        assert_eq!(err.position(), Some(14));
    }
}
