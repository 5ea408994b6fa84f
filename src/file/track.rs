use super::ChunkHeader;
use crate::{
    CorruptKind, DeltaTime, Error, Event, Note, Result, TrackEvent, ValueError,
    file::meta::{MetaEvent, TextKind},
    reader::Reader,
};
use core::fmt;
use std::borrow::Cow;
use std::io::Read;
use tracing::{debug, warn};

#[doc = r#"
An event paired with the number of ticks since the start of its track.

Produced by [`Track::to_absolute_ticks`] and consumed by [`Track::from_absolute_ticks`].
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ticked<T> {
    accumulated_ticks: u64,
    event: T,
}

impl<T> Ticked<T> {
    /// Pair an event with an absolute tick
    pub const fn new(accumulated_ticks: u64, event: T) -> Self {
        Self {
            accumulated_ticks,
            event,
        }
    }

    /// Ticks since the start of the track
    pub const fn accumulated_ticks(&self) -> u64 {
        self.accumulated_ticks
    }

    /// The event
    pub const fn event(&self) -> &T {
        &self.event
    }

    /// Take the event
    pub fn into_event(self) -> T {
        self.event
    }
}

#[doc = r#"
An ordered list of [`TrackEvent`]s, stored in an `MTrk` chunk.

A track written to a file must finish with exactly one
[`MetaEvent::EndOfTrack`]. When [`Track::require_end_of_track`] is turned off, a
missing end of track event is added to the output (the track itself is left alone).

# Example
```rust
# use midiseq::prelude::*;
let mut track = Track::new();
track.push(TrackEvent::new(0, MetaEvent::text(TextKind::SequenceTrackName, "Lead")).unwrap());
track.extend(ChannelVoiceMessage::complete_note(0, Channel::One, "A4", 90, 240).unwrap());
track.push(TrackEvent::end_of_track(DeltaTime::ZERO));

assert_eq!(track.name().as_deref(), Some("Lead"));
assert_eq!(track.to_absolute_ticks().last().unwrap().accumulated_ticks(), 240);
```
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    events: Vec<TrackEvent>,
    require_end_of_track: bool,
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}

impl Track {
    /// An empty track that requires an end of track event when written
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            require_end_of_track: true,
        }
    }

    /// A track holding `events`. Nothing is checked until the track is written.
    pub fn from_events(events: impl IntoIterator<Item = TrackEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            require_end_of_track: true,
        }
    }

    /// The events of the track, in order
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Mutable access to the event list
    pub fn events_mut(&mut self) -> &mut Vec<TrackEvent> {
        &mut self.events
    }

    /// Append an event
    pub fn push(&mut self, event: TrackEvent) {
        self.events.push(event);
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the track holds no events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterate over the events
    pub fn iter(&self) -> std::slice::Iter<'_, TrackEvent> {
        self.events.iter()
    }

    /// Whether writing fails when the last event is not an end of track event.
    pub const fn require_end_of_track(&self) -> bool {
        self.require_end_of_track
    }

    /// See [`Track::require_end_of_track`].
    pub fn set_require_end_of_track(&mut self, require: bool) {
        self.require_end_of_track = require;
    }

    /// The text of the first track name event, decoded lossily
    pub fn name(&self) -> Option<Cow<'_, str>> {
        self.events.iter().find_map(|e| match e.event() {
            Event::Meta(
                meta @ MetaEvent::Text {
                    kind: TextKind::SequenceTrackName,
                    ..
                },
            ) => meta.as_text(),
            _ => None,
        })
    }

    /// Every note of the note on, note off and aftertouch events
    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.events.iter().filter_map(|e| match e.event() {
            Event::Voice(voice) => voice.event().note(),
            _ => None,
        })
    }

    /// Mutable access to every note of the note on, note off and aftertouch events
    pub fn notes_mut(&mut self) -> impl Iterator<Item = &mut Note> + '_ {
        self.events.iter_mut().filter_map(|e| match e.event_mut() {
            Event::Voice(voice) => voice.event_mut().note_mut(),
            _ => None,
        })
    }

    /// Fail if any note of the track would leave `0..=127` when shifted by `steps`.
    pub(crate) fn check_transpose(&self, steps: i32) -> core::result::Result<(), ValueError> {
        self.notes().try_for_each(|note| note.transpose(steps).map(|_| ()))
    }

    /// Shift every note by `steps` half steps.
    ///
    /// Either every note is moved or, if one of them would leave `0..=127`, none is.
    pub fn transpose(&mut self, steps: i32) -> core::result::Result<(), ValueError> {
        self.check_transpose(steps)?;
        for note in self.notes_mut() {
            *note = note.transpose(steps)?;
        }
        Ok(())
    }

    /// Pair each event with its tick offset from the start of the track.
    pub fn to_absolute_ticks(&self) -> Vec<Ticked<&Event>> {
        let mut accumulated_ticks = 0u64;
        self.events
            .iter()
            .map(|e| {
                accumulated_ticks += e.delta_time() as u64;
                Ticked::new(accumulated_ticks, e.event())
            })
            .collect()
    }

    /// Build a track from events placed at absolute ticks.
    ///
    /// Events are ordered by tick, keeping the given order for events on the same tick.
    /// Fails if two consecutive events are further apart than a delta time can express.
    pub fn from_absolute_ticks(
        events: impl IntoIterator<Item = Ticked<Event>>,
    ) -> core::result::Result<Self, ValueError> {
        let mut events: Vec<_> = events.into_iter().collect();
        events.sort_by_key(Ticked::accumulated_ticks);

        let mut previous = 0u64;
        let mut track = Self::new();
        for ticked in events {
            let delta = ticked.accumulated_ticks - previous;
            previous = ticked.accumulated_ticks;
            track.push(TrackEvent::new(delta, ticked.event)?);
        }
        Ok(track)
    }

    /// Check the end of track rules.
    ///
    /// Returns `true` if an end of track event must be added to the output.
    fn needs_end_of_track(&self) -> core::result::Result<bool, ValueError> {
        let last = self.events.len().checked_sub(1);
        if let Some(index) = self
            .events
            .iter()
            .position(TrackEvent::is_end_of_track)
            .filter(|i| Some(*i) != last)
        {
            return Err(ValueError::MisplacedEndOfTrack(index));
        }
        let ends = self.events.last().is_some_and(TrackEvent::is_end_of_track);
        match (ends, self.require_end_of_track) {
            (true, _) => Ok(false),
            (false, true) => Err(ValueError::MissingEndOfTrack),
            (false, false) => Ok(true),
        }
    }

    /// Encode the events of the track, without the chunk prefix.
    pub fn encode_events(&self) -> Result<Vec<u8>> {
        let append_end = self.needs_end_of_track()?;
        let mut out = Vec::new();
        let mut running_status = None;
        for event in &self.events {
            event.write(&mut out, &mut running_status)?;
        }
        if append_end {
            TrackEvent::end_of_track(DeltaTime::ZERO).write(&mut out, &mut running_status)?;
        }
        Ok(out)
    }

    /// Append the full `MTrk` chunk to `out`.
    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        let base = out.len() as u64 + 8;
        let body = self.encode_events().map_err(|e| e.offset_by(base))?;
        let length = u32::try_from(body.len()).map_err(|_| ValueError::ChunkLength(body.len()))?;
        ChunkHeader::new(ChunkHeader::MTRK, length).write(out)?;
        out.extend_from_slice(&body);
        debug!(events = self.events.len(), length, "wrote MTrk chunk");
        Ok(())
    }

    /// Read an `MTrk` chunk.
    ///
    /// Events are read until an end of track event or the end of the chunk. Bytes after
    /// the end of track event are skipped. Unless the `strict` feature is enabled, two
    /// irregularities are tolerated: a stream that ends early after the end of track
    /// event, and a complete chunk with no end of track event. A track read without an
    /// end of track event has [`Track::require_end_of_track`] turned off, so that writing
    /// it adds one. A stream that ends early with no end of track event is always
    /// [`CorruptKind::UnexpectedEof`].
    pub(crate) fn read<R: Read>(reader: &mut Reader<R>) -> Result<Self> {
        let chunk = ChunkHeader::read_expecting(reader, ChunkHeader::MTRK)?;
        let start = reader.buffer_position();
        let declared = chunk.length() as usize;
        let body = reader.read_up_to(declared)?;
        let truncated = body.len() < declared;
        if truncated && cfg!(feature = "strict") {
            return Err(reader.corrupt(CorruptKind::UnexpectedEof));
        }

        let mut events_reader = Reader::with_offset(&body[..], start);
        let mut running_status = None;
        let mut track = Self::new();
        let mut ended = false;
        while !events_reader.is_at_end()? {
            let event = TrackEvent::read(&mut events_reader, &mut running_status)?;
            ended = event.is_end_of_track();
            track.push(event);
            if ended {
                break;
            }
        }

        let position = events_reader.buffer_position();
        if ended {
            let skipped = start + body.len() as u64 - position;
            if skipped > 0 {
                warn!(skipped, "ignoring bytes after the end of track event");
            }
        } else if truncated {
            return Err(Error::corrupt(position, CorruptKind::UnexpectedEof));
        } else {
            if cfg!(feature = "strict") {
                return Err(Error::corrupt(position, CorruptKind::MissingEndOfTrack));
            }
            warn!(position, "track chunk has no end of track event");
            track.require_end_of_track = false;
        }
        if truncated {
            warn!(
                declared,
                found = body.len(),
                "track chunk is shorter than its declared length"
            );
        }

        debug!(events = track.len(), length = declared, "read MTrk chunk");
        Ok(track)
    }
}

impl Extend<TrackEvent> for Track {
    fn extend<I: IntoIterator<Item = TrackEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

impl FromIterator<TrackEvent> for Track {
    fn from_iter<I: IntoIterator<Item = TrackEvent>>(iter: I) -> Self {
        Self::from_events(iter)
    }
}

impl<'a> IntoIterator for &'a Track {
    type Item = &'a TrackEvent;
    type IntoIter = std::slice::Iter<'a, TrackEvent>;
    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for Track {
    /// One event per line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Channel, ChannelVoiceMessage};
    use pretty_assertions::assert_eq;

    fn scale() -> Track {
        let mut track = Track::new();
        for name in ["C4", "D4", "E4"] {
            track.extend(
                ChannelVoiceMessage::complete_note(0, Channel::One, name, 100, 120).unwrap(),
            );
        }
        track.push(TrackEvent::end_of_track(DeltaTime::ZERO));
        track
    }

    fn chunk(track: &Track) -> Vec<u8> {
        let mut out = Vec::new();
        track.write(&mut out).unwrap();
        out
    }

    #[test]
    fn writes_with_running_status() {
        let body = scale().encode_events().unwrap();
        assert_eq!(
            body,
            vec![
                0x00, 0x90, 60, 100, 0x78, 0x80, 60, 0, 0x00, 0x90, 62, 100, 0x78, 0x80, 62, 0,
                0x00, 0x90, 64, 100, 0x78, 0x80, 64, 0, 0x00, 0xFF, 0x2F, 0x00
            ]
        );
        let chunk = chunk(&scale());
        assert_eq!(&chunk[..8], b"MTrk\x00\x00\x00\x1C");
        let read = Track::read(&mut Reader::new(&chunk[..])).unwrap();
        assert_eq!(read, scale());
    }

    #[test]
    fn end_of_track_rules() {
        let mut track = scale();
        track.events_mut().insert(0, TrackEvent::end_of_track(DeltaTime::ZERO));
        let err = track.encode_events().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArgument(ValueError::MisplacedEndOfTrack(0))
        ));

        let mut track = scale();
        track.events_mut().pop();
        assert!(matches!(
            track.encode_events().unwrap_err(),
            Error::InvalidArgument(ValueError::MissingEndOfTrack)
        ));

        track.set_require_end_of_track(false);
        assert_eq!(track.encode_events().unwrap(), scale().encode_events().unwrap());
        assert_eq!(track.len(), 6);

        let empty = Track::new();
        assert!(empty.encode_events().is_err());
    }

    #[test]
    fn bytes_after_end_of_track_are_skipped() {
        let bytes = b"MTrk\x00\x00\x00\x06\x00\xFF\x2F\x00\xAB\xCD";
        let mut reader = Reader::new(&bytes[..]);
        let track = Track::read(&mut reader).unwrap();
        assert_eq!(track.len(), 1);
        assert_eq!(reader.buffer_position(), 14);
    }

    #[cfg(not(feature = "strict"))]
    #[test]
    fn missing_end_of_track_is_tolerated() {
        let bytes = b"MTrk\x00\x00\x00\x04\x00\x90\x3C\x40";
        let track = Track::read(&mut Reader::new(&bytes[..])).unwrap();
        assert_eq!(track.len(), 1);
        assert!(!track.require_end_of_track());
        assert_eq!(
            track.encode_events().unwrap(),
            vec![0x00, 0x90, 0x3C, 0x40, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn truncated_chunk_without_end_of_track_is_rejected() {
        let bytes = b"MTrk\x00\x00\x00\x64\x00\x90\x3C\x40";
        let err = Track::read(&mut Reader::new(&bytes[..])).unwrap_err();
        assert_eq!(err.corrupt_kind(), Some(&CorruptKind::UnexpectedEof));
        assert_eq!(err.position(), Some(12));
    }

    #[cfg(feature = "strict")]
    #[test]
    fn missing_end_of_track_is_rejected() {
        let bytes = b"MTrk\x00\x00\x00\x04\x00\x90\x3C\x40";
        let err = Track::read(&mut Reader::new(&bytes[..])).unwrap_err();
        assert_eq!(err.corrupt_kind(), Some(&CorruptKind::MissingEndOfTrack));
        assert_eq!(err.position(), Some(12));
    }

    #[test]
    fn errors_point_into_the_stream() {
        let bytes = b"MTrk\x00\x00\x00\x04\x00\xF3\x00\x00";
        let err = Track::read(&mut Reader::new(&bytes[..])).unwrap_err();
        assert_eq!(err.corrupt_kind(), Some(&CorruptKind::UnsupportedStatus(0xF3)));
        assert_eq!(err.position(), Some(9));
    }

    #[test]
    fn absolute_ticks() {
        let track = scale();
        let ticks: Vec<u64> = track
            .to_absolute_ticks()
            .iter()
            .map(Ticked::accumulated_ticks)
            .collect();
        assert_eq!(ticks, vec![0, 120, 120, 240, 240, 360, 360]);

        let rebuilt = Track::from_absolute_ticks(
            track
                .to_absolute_ticks()
                .into_iter()
                .rev()
                .map(|t| Ticked::new(t.accumulated_ticks(), t.into_event().clone())),
        )
        .unwrap();
        let rebuilt_ticks: Vec<u64> = rebuilt
            .to_absolute_ticks()
            .iter()
            .map(Ticked::accumulated_ticks)
            .collect();
        assert_eq!(rebuilt_ticks, ticks);

        let too_far = [
            Ticked::new(0, Event::Meta(MetaEvent::EndOfTrack)),
            Ticked::new(0x1000_0000, Event::Meta(MetaEvent::EndOfTrack)),
        ];
        assert_eq!(
            Track::from_absolute_ticks(too_far),
            Err(ValueError::DeltaTime(0x1000_0000))
        );
    }

    #[test]
    fn transpose_is_all_or_nothing() {
        let mut track = scale();
        track.transpose(2).unwrap();
        let notes: Vec<u8> = track.notes().map(|n| n.byte()).collect();
        assert_eq!(notes, vec![62, 62, 64, 64, 66, 66]);

        let before = track.clone();
        assert_eq!(
            track.transpose(62),
            Err(ValueError::Transpose { note: 66, steps: 62 })
        );
        assert_eq!(track, before);
    }
}
