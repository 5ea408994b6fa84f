#![doc = r#"
Rusty representation of a Standard MIDI File as a [`Sequence`]

A file is a header chunk followed by track chunks:

```text
MThd <length = 6> <format> <track count> <division>
MTrk <length> <events>
MTrk <length> <events>
...
```
"#]

mod chunk;
pub use chunk::*;

mod format;
pub use format::*;

mod header;
pub use header::*;

pub(crate) mod meta;
pub use meta::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::{CorruptKind, Error, Event, Result, reader::Reader};
use core::fmt;
use std::borrow::Cow;
use std::io::{Read, Write};
use tracing::{debug, warn};

#[doc = r#"
A MIDI sequence: a format, a time division and an ordered list of [`Track`]s.

Sequences are plain values. [`Clone`] copies every track and every event payload, so a
clone can be edited without affecting the original.

# Example
```rust
# use midiseq::prelude::*;
let mut sequence = Sequence::new(Format::SingleMultiChannel, Division::default());
let mut track = Track::new();
track.extend(ChannelVoiceMessage::complete_note(0, Channel::One, "C5", 100, 480).unwrap());
track.push(TrackEvent::end_of_track(DeltaTime::ZERO));
sequence.add_track(track);

let bytes = sequence.to_bytes().unwrap();
let read = Sequence::open(&bytes[..]).unwrap();
assert_eq!(read, sequence);
```
"#]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    format: Format,
    division: Division,
    tracks: Vec<Track>,
}

impl Sequence {
    /// An empty sequence
    pub const fn new(format: Format, division: Division) -> Self {
        Self {
            format,
            division,
            tracks: Vec::new(),
        }
    }

    /// An empty sequence from the raw header fields.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `format` is not 0, 1 or 2, or `division` is not a
    /// valid time division.
    pub fn from_raw(format: u16, division: u16) -> Result<Self> {
        Ok(Self::new(Format::new(format)?, Division::from_raw(division)?))
    }

    /// The format of the sequence
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Change the format of the sequence
    pub fn set_format(&mut self, format: Format) {
        self.format = format;
    }

    /// The meaning of delta times in the sequence
    pub const fn division(&self) -> Division {
        self.division
    }

    /// Change the time division
    pub fn set_division(&mut self, division: Division) {
        self.division = division;
    }

    /// Which interpretation the time division uses
    pub const fn division_type(&self) -> DivisionType {
        self.division.division_type()
    }

    /// The tracks, in file order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Mutable access to the track list
    pub fn tracks_mut(&mut self) -> &mut Vec<Track> {
        &mut self.tracks
    }

    /// Append a track
    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Take the tracks out of the sequence
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
    }

    /// The header chunk describing this sequence.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the sequence has no tracks, or more than 65535.
    pub fn header(&self) -> Result<HeaderChunk> {
        HeaderChunk::new(self.format, self.tracks.len(), self.division)
    }

    /// Read a sequence from a Standard MIDI File.
    ///
    /// Exactly as many tracks as the header declares are read. Bytes after the last
    /// track are ignored.
    ///
    /// # Errors
    /// [`Error::CorruptData`] if the stream is malformed, truncated, or holds fewer
    /// tracks than declared. [`Error::Io`] if reading fails.
    pub fn open<R: Read>(source: R) -> Result<Self> {
        let mut reader = Reader::new(source);
        let header = HeaderChunk::read(&mut reader)?;
        debug!(
            format = header.format().raw(),
            tracks = header.num_tracks(),
            division = header.division().raw(),
            "read MThd chunk"
        );
        if header.format() == Format::SingleMultiChannel && header.num_tracks() > 1 {
            warn!(
                tracks = header.num_tracks(),
                "format 0 file declares more than one track"
            );
        }

        let mut sequence = Self::new(header.format(), header.division());
        for found in 0..header.num_tracks() {
            if reader.is_at_end()? {
                return Err(reader.corrupt(CorruptKind::MissingTracks {
                    declared: header.num_tracks(),
                    found,
                }));
            }
            sequence.tracks.push(Track::read(&mut reader)?);
        }

        if !reader.is_at_end()? {
            warn!(
                position = reader.buffer_position(),
                "ignoring bytes after the last track"
            );
        }
        Ok(sequence)
    }

    /// Write the sequence as a Standard MIDI File.
    ///
    /// The header declares as many tracks as the sequence holds.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if there are no tracks, or a track breaks the end of
    /// track rules (see [`Track`]). [`Error::Io`] if writing fails.
    pub fn save<W: Write>(&self, mut out: W) -> Result<()> {
        let bytes = self.to_bytes()?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    /// Encode the sequence into the bytes of a Standard MIDI File.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let header = self.header()?;
        let mut out = Vec::new();
        header.write(&mut out)?;
        for track in &self.tracks {
            track.write(&mut out)?;
        }
        debug!(
            tracks = self.tracks.len(),
            length = out.len(),
            "encoded sequence"
        );
        Ok(out)
    }

    /// Shift every note of every track by `steps` half steps.
    ///
    /// Note on, note off and aftertouch events are moved; everything else is left as is.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if any note would leave `0..=127`. The sequence is
    /// unchanged in that case.
    pub fn transpose(&mut self, steps: i32) -> Result<()> {
        for track in &self.tracks {
            track.check_transpose(steps)?;
        }
        for track in &mut self.tracks {
            track.transpose(steps)?;
        }
        Ok(())
    }

    /// One single track sequence per track, each with the division of this sequence.
    pub fn split_tracks(&self) -> Vec<Sequence> {
        self.tracks
            .iter()
            .map(|track| Self {
                format: Format::SingleMultiChannel,
                division: self.division,
                tracks: vec![track.clone()],
            })
            .collect()
    }

    /// The text of every lyric event, track by track. Lyrics that are not UTF-8 are
    /// decoded lossily; the events themselves keep their bytes.
    pub fn lyrics(&self) -> impl Iterator<Item = Cow<'_, str>> + '_ {
        self.tracks
            .iter()
            .flat_map(Track::iter)
            .filter_map(|e| match e.event() {
                Event::Meta(
                    meta @ MetaEvent::Text {
                        kind: TextKind::Lyric,
                        ..
                    },
                ) => meta.as_text(),
                _ => None,
            })
    }
}

impl TryFrom<&[u8]> for Sequence {
    type Error = Error;
    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::open(bytes)
    }
}

impl fmt::Display for Sequence {
    /// Dumps the header fields, then every track, one event per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Format\t{}", self.format)?;
        writeln!(f, "Division\t{}", self.division)?;
        writeln!(f, "Tracks\t{}", self.tracks.len())?;
        for (i, track) in self.tracks.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Track {i}")?;
            write!(f, "{track}")?;
        }
        Ok(())
    }
}

