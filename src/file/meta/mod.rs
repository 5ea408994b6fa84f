#![doc = r#"
Meta events

Meta events carry information that is not sent to a synthesizer: names, lyrics, tempo,
time and key signatures, and the end of track marker. On the wire they are

```text
FF <type> <varlen length> <length bytes>
```

Meta types this crate does not recognise are kept as [`UnknownMeta`] with their payload
untouched, so that reading and writing a file never loses them.
"#]

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

mod signature;
pub use signature::*;

mod text;
pub use text::*;

use crate::{CorruptKind, Error, Result, ValueError, reader::Reader, varlen};
use core::fmt;
use std::borrow::Cow;
use std::io::Read;

/// A meta event
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MetaEvent {
    /// The number of a sequence in a format 2 file, or of the file's only sequence.
    /// `None` is the empty form, which stands for the track's position in the file.
    SequenceNumber(Option<u16>),
    /// One of the text events
    Text {
        /// Which text event this is
        kind: TextKind,
        /// The text exactly as stored. Files in the wild use Latin-1 and other code
        /// pages as often as UTF-8.
        bytes: Vec<u8>,
    },
    /// The channel that the following meta and sysex events relate to
    ChannelPrefix(u8),
    /// The output port that the track is played on
    MidiPort(u8),
    /// The mandatory last event of every track
    EndOfTrack,
    /// Microseconds per quarter note
    Tempo(Tempo),
    /// Where the track starts, in SMPTE time code
    SmpteOffset(SmpteOffset),
    /// Time signature
    TimeSignature(TimeSignature),
    /// Key signature
    KeySignature(KeySignature),
    /// Sequencer specific data (meta type `0x7F`)
    Proprietary(Vec<u8>),
    /// A meta type without a dedicated variant
    Unknown(UnknownMeta),
}

impl MetaEvent {
    /// Meta type of [`MetaEvent::SequenceNumber`]
    pub const SEQUENCE_NUMBER: u8 = 0x00;
    /// Meta type of [`MetaEvent::ChannelPrefix`]
    pub const CHANNEL_PREFIX: u8 = 0x20;
    /// Meta type of [`MetaEvent::MidiPort`]
    pub const MIDI_PORT: u8 = 0x21;
    /// Meta type of [`MetaEvent::EndOfTrack`]
    pub const END_OF_TRACK: u8 = 0x2F;
    /// Meta type of [`MetaEvent::Tempo`]
    pub const TEMPO: u8 = 0x51;
    /// Meta type of [`MetaEvent::SmpteOffset`]
    pub const SMPTE_OFFSET: u8 = 0x54;
    /// Meta type of [`MetaEvent::TimeSignature`]
    pub const TIME_SIGNATURE: u8 = 0x58;
    /// Meta type of [`MetaEvent::KeySignature`]
    pub const KEY_SIGNATURE: u8 = 0x59;
    /// Meta type of [`MetaEvent::Proprietary`]
    pub const PROPRIETARY: u8 = 0x7F;

    /// Create a text event of the given kind, stored as UTF-8.
    pub fn text(kind: TextKind, text: impl Into<String>) -> Self {
        Self::Text {
            kind,
            bytes: text.into().into_bytes(),
        }
    }

    /// Create a text event from bytes in any encoding.
    pub fn text_bytes(kind: TextKind, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Text {
            kind,
            bytes: bytes.into(),
        }
    }

    /// The text of a text event, with bytes that are not UTF-8 replaced by `U+FFFD`.
    ///
    /// ```
    /// use midiseq::prelude::*;
    ///
    /// let lyric = MetaEvent::text_bytes(TextKind::Lyric, [b'l', 0xE9]);
    /// assert_eq!(lyric.as_text().as_deref(), Some("l\u{FFFD}"));
    /// assert_eq!(lyric.payload().as_ref(), &[b'l', 0xE9]);
    /// assert_eq!(MetaEvent::EndOfTrack.as_text(), None);
    /// ```
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text { bytes, .. } => Some(String::from_utf8_lossy(bytes)),
            _ => None,
        }
    }

    /// True if `meta_type` has a dedicated variant.
    pub fn is_known_type(meta_type: u8) -> bool {
        TextKind::try_from(meta_type).is_ok()
            || matches!(
                meta_type,
                Self::SEQUENCE_NUMBER
                    | Self::CHANNEL_PREFIX
                    | Self::MIDI_PORT
                    | Self::END_OF_TRACK
                    | Self::TEMPO
                    | Self::SMPTE_OFFSET
                    | Self::TIME_SIGNATURE
                    | Self::KEY_SIGNATURE
                    | Self::PROPRIETARY
            )
    }

    /// The meta type byte written after `0xFF`
    pub fn meta_type(&self) -> u8 {
        match self {
            Self::SequenceNumber(_) => Self::SEQUENCE_NUMBER,
            Self::Text { kind, .. } => kind.meta_type(),
            Self::ChannelPrefix(_) => Self::CHANNEL_PREFIX,
            Self::MidiPort(_) => Self::MIDI_PORT,
            Self::EndOfTrack => Self::END_OF_TRACK,
            Self::Tempo(_) => Self::TEMPO,
            Self::SmpteOffset(_) => Self::SMPTE_OFFSET,
            Self::TimeSignature(_) => Self::TIME_SIGNATURE,
            Self::KeySignature(_) => Self::KEY_SIGNATURE,
            Self::Proprietary(_) => Self::PROPRIETARY,
            Self::Unknown(unknown) => unknown.meta_type,
        }
    }

    /// A stable name for the variant, used when rendering events
    pub fn name(&self) -> &'static str {
        match self {
            Self::SequenceNumber(_) => "SequenceNumber",
            Self::Text { kind, .. } => match kind {
                TextKind::Text => "Text",
                TextKind::Copyright => "Copyright",
                TextKind::SequenceTrackName => "SequenceTrackName",
                TextKind::Instrument => "Instrument",
                TextKind::Lyric => "Lyric",
                TextKind::Marker => "Marker",
                TextKind::CuePoint => "CuePoint",
                TextKind::ProgramName => "ProgramName",
                TextKind::DeviceName => "DeviceName",
            },
            Self::ChannelPrefix(_) => "ChannelPrefix",
            Self::MidiPort(_) => "MidiPort",
            Self::EndOfTrack => "EndOfTrack",
            Self::Tempo(_) => "Tempo",
            Self::SmpteOffset(_) => "SmpteOffset",
            Self::TimeSignature(_) => "TimeSignature",
            Self::KeySignature(_) => "KeySignature",
            Self::Proprietary(_) => "Proprietary",
            Self::Unknown(_) => "UnknownMeta",
        }
    }

    /// The bytes following the length prefix
    pub fn payload(&self) -> Cow<'_, [u8]> {
        match self {
            Self::SequenceNumber(Some(n)) => Cow::Owned(n.to_be_bytes().to_vec()),
            Self::SequenceNumber(None) => Cow::Borrowed(&[]),
            Self::Text { bytes, .. } => Cow::Borrowed(bytes),
            Self::ChannelPrefix(b) | Self::MidiPort(b) => Cow::Owned(vec![*b]),
            Self::EndOfTrack => Cow::Borrowed(&[]),
            Self::Tempo(t) => Cow::Owned(t.to_bytes().to_vec()),
            Self::SmpteOffset(o) => Cow::Owned(o.to_bytes().to_vec()),
            Self::TimeSignature(t) => Cow::Owned(t.to_bytes().to_vec()),
            Self::KeySignature(k) => Cow::Owned(k.to_bytes().to_vec()),
            Self::Proprietary(data) => Cow::Borrowed(data),
            Self::Unknown(unknown) => Cow::Borrowed(&unknown.data),
        }
    }

    /// Read a meta event. The `0xFF` prefix has already been consumed.
    pub(crate) fn read<R: Read>(reader: &mut Reader<R>) -> Result<Self> {
        let meta_type = reader.read_u8()?;
        let start = reader.buffer_position();
        let data = reader.read_varlen_bytes()?;
        Self::parse(meta_type, data).map_err(|kind| Error::corrupt(start, kind))
    }

    fn parse(meta_type: u8, data: Vec<u8>) -> core::result::Result<Self, CorruptKind> {
        if let Ok(kind) = TextKind::try_from(meta_type) {
            return Ok(Self::Text { kind, bytes: data });
        }
        let event = match meta_type {
            Self::SEQUENCE_NUMBER if data.is_empty() => Self::SequenceNumber(None),
            Self::SEQUENCE_NUMBER => {
                Self::SequenceNumber(Some(u16::from_be_bytes(fixed(meta_type, &data)?)))
            }
            Self::CHANNEL_PREFIX => Self::ChannelPrefix(fixed::<1>(meta_type, &data)?[0]),
            Self::MIDI_PORT => Self::MidiPort(fixed::<1>(meta_type, &data)?[0]),
            Self::END_OF_TRACK => {
                fixed::<0>(meta_type, &data)?;
                Self::EndOfTrack
            }
            Self::TEMPO => Self::Tempo(Tempo::from_bytes(fixed(meta_type, &data)?)),
            Self::SMPTE_OFFSET => Self::SmpteOffset(
                SmpteOffset::parse(&data).map_err(|e| CorruptKind::InvalidField(e.into()))?,
            ),
            Self::TIME_SIGNATURE => {
                Self::TimeSignature(TimeSignature::from_bytes(fixed(meta_type, &data)?))
            }
            Self::KEY_SIGNATURE => {
                Self::KeySignature(KeySignature::from_bytes(fixed(meta_type, &data)?)?)
            }
            Self::PROPRIETARY => Self::Proprietary(data),
            _ => Self::Unknown(UnknownMeta { meta_type, data }),
        };
        Ok(event)
    }

    /// Append the full event, from the `0xFF` prefix on.
    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        let payload = self.payload();
        out.push(0xFF);
        out.push(self.meta_type());
        varlen::write(payload.len() as u64, out)?;
        out.extend_from_slice(&payload);
        Ok(())
    }
}

impl fmt::Display for MetaEvent {
    /// Renders the fields, tab separated, without the variant name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SequenceNumber(Some(n)) => write!(f, "{n}"),
            Self::SequenceNumber(None) => Ok(()),
            Self::Text { bytes, .. } => f.write_str(&String::from_utf8_lossy(bytes)),
            Self::ChannelPrefix(b) | Self::MidiPort(b) => write!(f, "{b}"),
            Self::EndOfTrack => Ok(()),
            Self::Tempo(t) => write!(f, "{t}"),
            Self::SmpteOffset(o) => write!(f, "{o}"),
            Self::TimeSignature(t) => write!(f, "{t}"),
            Self::KeySignature(k) => write!(f, "{k}"),
            Self::Proprietary(data) => write_hex(f, data),
            Self::Unknown(unknown) => {
                write!(f, "{:#04X}\t", unknown.meta_type)?;
                write_hex(f, &unknown.data)
            }
        }
    }
}

/// Write bytes as space separated upper case hex pairs.
pub(crate) fn write_hex(f: &mut fmt::Formatter<'_>, data: &[u8]) -> fmt::Result {
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{byte:02X}")?;
    }
    Ok(())
}

/// Check that a payload has exactly `N` bytes.
fn fixed<const N: usize>(
    meta_type: u8,
    data: &[u8],
) -> core::result::Result<[u8; N], CorruptKind> {
    data.try_into().map_err(|_| CorruptKind::MetaLength {
        meta_type,
        expected: N,
        found: data.len(),
    })
}

/// A meta event whose type has no dedicated variant.
///
/// The payload is preserved byte for byte.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnknownMeta {
    meta_type: u8,
    data: Vec<u8>,
}

impl UnknownMeta {
    /// Create an unknown meta event.
    ///
    /// Fails if `meta_type` belongs to a known meta event, since such an event would
    /// read back as a different variant.
    pub fn new(meta_type: u8, data: Vec<u8>) -> core::result::Result<Self, ValueError> {
        if MetaEvent::is_known_type(meta_type) {
            return Err(ValueError::ReservedMetaType(meta_type));
        }
        Ok(Self { meta_type, data })
    }

    /// The meta type byte
    pub const fn meta_type(&self) -> u8 {
        self.meta_type
    }

    /// The raw payload
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the raw payload
    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }
}
