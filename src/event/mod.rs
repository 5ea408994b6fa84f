#![doc = r#"
Events as they appear inside a track chunk

Every event in a track is preceded by a [`DeltaTime`]:

```text
<varlen delta> <event>
```

An event is one of three families, told apart by the first byte:

| First byte | Event |
|---|---|
| `0x80..=0xEF` | [`ChannelVoiceMessage`] |
| `0x00..=0x7F` | a voice message reusing the previous status (running status) |
| `0xF0`, `0xF7` | [`SysExEvent`] |
| `0xFF` | [`MetaEvent`] |

System common (`0xF1..=0xF6`) and real-time (`0xF8..=0xFE`) messages never appear in
a file.
"#]

mod sysex;
pub use sysex::*;

use crate::{
    ChannelVoiceMessage, CorruptKind, DeltaTime, Error, Result, ValueError, file::meta::MetaEvent,
    reader::Reader, varlen,
};
use core::fmt;
use std::io::Read;

/// The payload of a [`TrackEvent`]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// A meta event (`0xFF`)
    Meta(MetaEvent),
    /// A system exclusive packet (`0xF0` or `0xF7`)
    SysEx(SysExEvent),
    /// A channel voice message
    Voice(ChannelVoiceMessage),
}

impl Event {
    /// True for the end of track meta event
    pub fn is_end_of_track(&self) -> bool {
        matches!(self, Self::Meta(MetaEvent::EndOfTrack))
    }

    /// The voice message, if this is one
    pub fn as_voice(&self) -> Option<&ChannelVoiceMessage> {
        match self {
            Self::Voice(voice) => Some(voice),
            _ => None,
        }
    }

    /// The meta event, if this is one
    pub fn as_meta(&self) -> Option<&MetaEvent> {
        match self {
            Self::Meta(meta) => Some(meta),
            _ => None,
        }
    }

    /// A stable name for the event, used when rendering
    pub fn name(&self) -> &'static str {
        match self {
            Self::Meta(meta) => meta.name(),
            Self::SysEx(sysex) => match sysex.kind() {
                SysExKind::Normal => "SysEx",
                SysExKind::Escape => "SysExEscape",
            },
            Self::Voice(voice) => voice.event().name(),
        }
    }

    /// Read one event, consulting and updating the running status.
    pub(crate) fn read<R: Read>(
        reader: &mut Reader<R>,
        running_status: &mut Option<u8>,
    ) -> Result<Self> {
        let position = reader.buffer_position();
        let first = reader
            .peek_u8()?
            .ok_or_else(|| reader.corrupt(CorruptKind::UnexpectedEof))?;

        let status = if first < 0x80 {
            running_status.ok_or_else(|| reader.corrupt(CorruptKind::MissingRunningStatus(first)))?
        } else {
            reader.read_u8()?;
            first
        };

        let event = match status {
            0x80..=0xEF => {
                *running_status = Some(status);
                Self::Voice(ChannelVoiceMessage::read(status, reader)?)
            }
            0xFF => {
                *running_status = None;
                Self::Meta(MetaEvent::read(reader)?)
            }
            0xF0 => {
                *running_status = None;
                Self::SysEx(SysExEvent::read(SysExKind::Normal, reader)?)
            }
            0xF7 => {
                *running_status = None;
                Self::SysEx(SysExEvent::read(SysExKind::Escape, reader)?)
            }
            _ => {
                return Err(Error::corrupt(
                    position,
                    CorruptKind::UnsupportedStatus(status),
                ));
            }
        };
        Ok(event)
    }

    /// Append the event, sharing `running_status` with the events around it.
    ///
    /// Voice messages use and update the running status; meta and sysex events clear it.
    pub(crate) fn write(&self, out: &mut Vec<u8>, running_status: &mut Option<u8>) -> Result<()> {
        match self {
            Self::Voice(voice) => voice.write(out, running_status),
            Self::Meta(meta) => {
                *running_status = None;
                meta.write(out)?;
            }
            Self::SysEx(sysex) => {
                *running_status = None;
                sysex.write(out)?;
            }
        }
        Ok(())
    }
}

impl From<MetaEvent> for Event {
    fn from(value: MetaEvent) -> Self {
        Self::Meta(value)
    }
}

impl From<SysExEvent> for Event {
    fn from(value: SysExEvent) -> Self {
        Self::SysEx(value)
    }
}

impl From<ChannelVoiceMessage> for Event {
    fn from(value: ChannelVoiceMessage) -> Self {
        Self::Voice(value)
    }
}

impl fmt::Display for Event {
    /// Renders the fields, tab separated, without the event name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meta(meta) => fmt::Display::fmt(meta, f),
            Self::SysEx(sysex) => fmt::Display::fmt(sysex, f),
            Self::Voice(voice) => fmt::Display::fmt(voice, f),
        }
    }
}

#[doc = r#"
An [`Event`] together with the number of ticks since the previous event of its track.

# Example
```rust
# use midiseq::prelude::*;
let tempo = TrackEvent::new(0, MetaEvent::Tempo(Tempo::new(600_000).unwrap())).unwrap();
assert_eq!(tempo.to_string(), "Tempo\t0\t600000");

assert!(TrackEvent::new(-5, MetaEvent::EndOfTrack).is_err());
```
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackEvent {
    delta_time: DeltaTime,
    event: Event,
}

impl TrackEvent {
    /// Create an event, checking the delta time.
    pub fn new<D, E>(delta_time: D, event: E) -> core::result::Result<Self, ValueError>
    where
        D: TryInto<DeltaTime, Error = ValueError>,
        E: Into<Event>,
    {
        Ok(Self {
            delta_time: delta_time.try_into()?,
            event: event.into(),
        })
    }

    /// An end of track event at the given delta time.
    pub fn end_of_track(delta_time: DeltaTime) -> Self {
        Self {
            delta_time,
            event: Event::Meta(MetaEvent::EndOfTrack),
        }
    }

    /// Ticks since the previous event
    pub fn delta_time(&self) -> u32 {
        self.delta_time.ticks()
    }

    /// Change the delta time, checking that it is non-negative and fits in 28 bits.
    pub fn set_delta_time<D>(&mut self, delta_time: D) -> core::result::Result<(), ValueError>
    where
        D: TryInto<DeltaTime, Error = ValueError>,
    {
        self.delta_time = delta_time.try_into()?;
        Ok(())
    }

    /// The event
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Mutable access to the event
    pub fn event_mut(&mut self) -> &mut Event {
        &mut self.event
    }

    /// Split into the delta time and the event.
    pub fn into_parts(self) -> (DeltaTime, Event) {
        (self.delta_time, self.event)
    }

    /// True for the end of track meta event
    pub fn is_end_of_track(&self) -> bool {
        self.event.is_end_of_track()
    }

    pub(crate) fn read<R: Read>(
        reader: &mut Reader<R>,
        running_status: &mut Option<u8>,
    ) -> Result<Self> {
        let delta_time = DeltaTime(reader.read_varlen()?);
        let event = Event::read(reader, running_status)?;
        Ok(Self { delta_time, event })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>, running_status: &mut Option<u8>) -> Result<()> {
        varlen::write(self.delta_time.ticks() as u64, out)?;
        self.event.write(out, running_status)
    }
}

impl fmt::Display for TrackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.event.name(), self.delta_time)?;
        let fields = self.event.to_string();
        if !fields.is_empty() {
            write!(f, "\t{fields}")?;
        }
        Ok(())
    }
}
