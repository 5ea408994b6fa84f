use super::{ChunkHeader, Division, Format};
use crate::{CorruptKind, Error, Result, ValueError, reader::Reader};
use std::io::{Read, Write};
use tracing::trace;

#[doc = r#"
The contents of the `MThd` chunk: format, track count and time division.

The chunk always holds exactly six bytes, two big-endian bytes per field.
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderChunk {
    format: Format,
    num_tracks: u16,
    division: Division,
}

impl HeaderChunk {
    /// Size of the chunk body
    pub const LENGTH: u32 = 6;

    /// Create a header, checking that at least one track is declared.
    pub fn new(format: Format, num_tracks: usize, division: Division) -> Result<Self> {
        let num_tracks = u16::try_from(num_tracks)
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ValueError::TrackCount(num_tracks))?;
        Ok(Self {
            format,
            num_tracks,
            division,
        })
    }

    /// The format of the file
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Number of track chunks that follow the header
    pub const fn num_tracks(&self) -> u16 {
        self.num_tracks
    }

    /// The meaning of delta times in the file
    pub const fn division(&self) -> Division {
        self.division
    }

    /// Read and validate the header chunk.
    pub fn read<R: Read>(reader: &mut Reader<R>) -> Result<Self> {
        let chunk = ChunkHeader::read_expecting(reader, ChunkHeader::MTHD)?;
        if chunk.length() != Self::LENGTH {
            return Err(Error::corrupt(
                reader.buffer_position() - 4,
                CorruptKind::HeaderLength(chunk.length()),
            ));
        }

        let field_start = reader.buffer_position();
        let format = reader.read_u16()?;
        let num_tracks = reader.read_u16()?;
        let division = reader.read_u16()?;
        trace!(format, num_tracks, division, "read MThd chunk");

        let invalid = |offset: u64, e: ValueError| Error::corrupt(field_start + offset, e.into());
        let format = Format::new(format).map_err(|e| invalid(0, e))?;
        if num_tracks == 0 {
            return Err(invalid(2, ValueError::TrackCount(0)));
        }
        let division = Division::from_raw(division).map_err(|e| invalid(4, e))?;

        Ok(Self {
            format,
            num_tracks,
            division,
        })
    }

    /// Write the header chunk.
    pub fn write<W: Write>(&self, out: &mut W) -> Result<()> {
        ChunkHeader::new(ChunkHeader::MTHD, Self::LENGTH).write(out)?;
        let mut body = [0u8; 6];
        body[..2].copy_from_slice(&self.format.raw().to_be_bytes());
        body[2..4].copy_from_slice(&self.num_tracks.to_be_bytes());
        body[4..].copy_from_slice(&self.division.raw().to_be_bytes());
        out.write_all(&body)?;
        Ok(())
    }
}
