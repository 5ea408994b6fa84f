#![doc = r#"
Errors produced while building, reading or writing a [`Sequence`](crate::Sequence)

There are two families of failure:

- [`ValueError`]: a value handed to a constructor or setter is outside of the range
  the field accepts. These surface as [`Error::InvalidArgument`].
- [`CorruptKind`]: the byte stream being read (or produced) does not follow the
  Standard MIDI File layout. These surface as [`Error::CorruptData`] together with
  the byte offset at which the problem was found.
"#]

use crate::file::meta::SmpteError;
use std::io;
use thiserror::Error;

/// A value was outside the range accepted by the field it was meant for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Delta times must fit in a 28-bit variable length quantity.
    #[error("delta time {0} is outside of 0..=268435455")]
    DeltaTime(i64),
    /// Data bytes must have their top bit clear.
    #[error("data byte {0} is outside of 0..=127")]
    DataByte(i64),
    /// Channels are numbered 0 through 15.
    #[error("channel {0} is outside of 0..=15")]
    Channel(i64),
    /// Tempo is a 24-bit quantity.
    #[error("tempo {0} does not fit in 24 bits")]
    Tempo(u32),
    /// Pitch wheel positions are signed 14-bit values.
    #[error("pitch wheel position {0} is outside of -8192..=8191")]
    PitchWheel(i32),
    /// Only formats 0, 1 and 2 exist.
    #[error("format {0} is not one of 0, 1 or 2")]
    Format(u16),
    /// Zero ticks per quarter note, or a SMPTE division with zero ticks per frame.
    #[error("division {0:#06X} is not a valid time division")]
    Division(u16),
    /// The header must declare between 1 and 65535 tracks.
    #[error("track count {0} is outside of 1..=65535")]
    TrackCount(usize),
    /// Key signatures range from seven flats to seven sharps.
    #[error("key signature {0} is outside of -7..=7")]
    KeySignature(i8),
    /// Tonality is either 0 (major) or 1 (minor).
    #[error("tonality {0} is neither major (0) nor minor (1)")]
    Tonality(u8),
    /// Invalid SMPTE offset fields.
    #[error(transparent)]
    Smpte(#[from] SmpteError),
    /// The meta type is reserved for a known meta event.
    #[error("meta type {0:#04X} belongs to a known meta event")]
    ReservedMetaType(u8),
    /// A note name such as `C4` or `F#-1` could not be parsed.
    #[error("could not parse note name {0:?}")]
    NoteName(String),
    /// Transposition would push a note outside of 0..=127.
    #[error("transposing note {note} by {steps} leaves the 0..=127 range")]
    Transpose {
        /// The note before transposition
        note: u8,
        /// The requested number of half steps
        steps: i32,
    },
    /// An end of track event appears before the last event of a track.
    #[error("end of track event at index {0} is not the last event of the track")]
    MisplacedEndOfTrack(usize),
    /// The track does not finish with an end of track event.
    #[error("track does not finish with an end of track event")]
    MissingEndOfTrack,
    /// The encoded track does not fit in a chunk.
    #[error("track body of {0} bytes does not fit in a chunk")]
    ChunkLength(usize),
}

/// The ways a byte stream can fail to be a Standard MIDI File.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptKind {
    /// The stream ended in the middle of a value.
    #[error("unexpected end of stream")]
    UnexpectedEof,
    /// A chunk did not carry the expected four byte identifier.
    #[error("expected a {} chunk, found {:?}", String::from_utf8_lossy(.expected), String::from_utf8_lossy(.found))]
    ChunkTag {
        /// The tag that was required
        expected: [u8; 4],
        /// The tag that was read
        found: [u8; 4],
    },
    /// The header chunk always holds exactly six bytes.
    #[error("header chunk declares {0} bytes instead of 6")]
    HeaderLength(u32),
    /// A variable length quantity did not terminate within four bytes.
    #[error("variable length quantity is longer than 4 bytes")]
    VarLenTooLong,
    /// A value does not fit in a 28-bit variable length quantity.
    #[error("{0} does not fit in a variable length quantity")]
    VarLenOverflow(u64),
    /// A data byte was found where a status byte was required.
    #[error("data byte {0:#04X} found with no running status active")]
    MissingRunningStatus(u8),
    /// System common and real-time status bytes cannot appear in a file.
    #[error("status byte {0:#04X} is not allowed in a track")]
    UnsupportedStatus(u8),
    /// A known meta event declared a payload of the wrong size.
    #[error("meta event {meta_type:#04X} expects {expected} bytes, found {found}")]
    MetaLength {
        /// The meta type byte
        meta_type: u8,
        /// The payload size the meta event requires
        expected: usize,
        /// The payload size declared in the stream
        found: usize,
    },
    /// A field was decoded but its value is out of range.
    #[error("invalid field: {0}")]
    InvalidField(#[from] ValueError),
    /// The track chunk ended without an end of track event.
    #[error("track chunk has no end of track event")]
    MissingEndOfTrack,
    /// The header declared more tracks than the stream holds.
    #[error("header declares {declared} tracks but only {found} were found")]
    MissingTracks {
        /// Number of tracks declared in the header
        declared: u16,
        /// Number of track chunks read
        found: u16,
    },
}

#[doc = r#"
The error type returned by every fallible operation of this crate.
"#]
#[derive(Debug, Error)]
pub enum Error {
    /// A constructor, setter or structural edit was given an out of range value.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ValueError),
    /// The byte stream is malformed or truncated.
    #[error("corrupt data at byte {position}: {kind}")]
    CorruptData {
        /// Offset from the start of the stream
        position: u64,
        /// What went wrong
        kind: CorruptKind,
    },
    /// The underlying stream failed for a reason other than running out of data.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a corrupt data error at the given stream offset.
    pub const fn corrupt(position: u64, kind: CorruptKind) -> Self {
        Self::CorruptData { position, kind }
    }

    /// True for [`Error::InvalidArgument`]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// True for [`Error::CorruptData`]
    pub const fn is_corrupt_data(&self) -> bool {
        matches!(self, Self::CorruptData { .. })
    }

    /// Returns the corruption kind, if this is a corrupt data error.
    pub fn corrupt_kind(&self) -> Option<&CorruptKind> {
        match self {
            Self::CorruptData { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Returns the stream offset of a corrupt data error.
    pub fn position(&self) -> Option<u64> {
        match self {
            Self::CorruptData { position, .. } => Some(*position),
            _ => None,
        }
    }

    /// Shift the position of a corrupt data error by `base` bytes.
    ///
    /// Events are encoded into a scratch buffer before the chunk is written, so
    /// their positions are relative to the chunk body until this is applied.
    pub(crate) fn offset_by(self, base: u64) -> Self {
        match self {
            Self::CorruptData { position, kind } => Self::CorruptData {
                position: position + base,
                kind,
            },
            other => other,
        }
    }
}

/// The result type used throughout this crate (see [`Error`])
pub type Result<T> = core::result::Result<T, Error>;
