#![doc = r#"
Channel voice messages

A voice message is a status byte followed by one or two data bytes:

```text
|-----------------|-----------|-----------|
| status (sssscccc) | data 1  | data 2    |
|-----------------|-----------|-----------|
```

The high nibble `ssss` names the message and the low nibble `cccc` its [`Channel`].
Within a track, a status byte may be left out when it matches the previous voice
message's status (running status).
"#]

mod voice;
pub use voice::*;

use crate::{
    Channel, DataByte, Error, Note, Result, TrackEvent, ValueError, reader::Reader,
};
use core::fmt;
use std::io::Read;

#[doc = r#"
A voice event together with the channel it is sent on.
"#]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelVoiceMessage {
    channel: Channel,
    event: VoiceEvent,
}

impl ChannelVoiceMessage {
    /// Create a voice message.
    pub const fn new(channel: Channel, event: VoiceEvent) -> Self {
        Self { channel, event }
    }

    /// Note on helper.
    pub fn note_on<V>(channel: Channel, note: Note, velocity: V) -> core::result::Result<Self, ValueError>
    where
        V: TryInto<DataByte, Error = ValueError>,
    {
        Ok(Self::new(
            channel,
            VoiceEvent::NoteOn {
                note,
                velocity: velocity.try_into()?,
            },
        ))
    }

    /// Note off helper.
    pub fn note_off<V>(channel: Channel, note: Note, velocity: V) -> core::result::Result<Self, ValueError>
    where
        V: TryInto<DataByte, Error = ValueError>,
    {
        Ok(Self::new(
            channel,
            VoiceEvent::NoteOff {
                note,
                velocity: velocity.try_into()?,
            },
        ))
    }

    /// Build a complete note: a note on followed by a note off `duration` ticks later.
    ///
    /// `note` is a name such as `"C5"` (see [`Note`]). The note off has a release
    /// velocity of 0.
    ///
    /// # Example
    /// ```rust
    /// # use midiseq::prelude::*;
    /// let [on, off] = ChannelVoiceMessage::complete_note(0, Channel::One, "C4", 100, 96).unwrap();
    /// assert_eq!(on.to_string(), "NoteOn\t0\t0\tC4\t100");
    /// assert_eq!(off.to_string(), "NoteOff\t96\t0\tC4\t0");
    /// ```
    pub fn complete_note<D, T, V>(
        delta_time: D,
        channel: Channel,
        note: &str,
        velocity: V,
        duration: T,
    ) -> core::result::Result<[TrackEvent; 2], ValueError>
    where
        D: TryInto<crate::DeltaTime, Error = ValueError>,
        T: TryInto<crate::DeltaTime, Error = ValueError>,
        V: TryInto<DataByte, Error = ValueError>,
    {
        let note: Note = note.parse()?;
        let on = TrackEvent::new(delta_time, Self::note_on(channel, note, velocity)?)?;
        let off = TrackEvent::new(duration, Self::note_off(channel, note, 0)?)?;
        Ok([on, off])
    }

    /// The channel of the message
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Change the channel of the message
    pub fn set_channel(&mut self, channel: Channel) {
        self.channel = channel;
    }

    /// The voice event
    pub const fn event(&self) -> &VoiceEvent {
        &self.event
    }

    /// Mutable access to the voice event
    pub fn event_mut(&mut self) -> &mut VoiceEvent {
        &mut self.event
    }

    /// The full status byte (`sssscccc`)
    pub fn status(&self) -> u8 {
        (self.event.status_nibble() << 4) | self.channel.number()
    }

    /// Read the data bytes of a voice message whose status is already known.
    pub(crate) fn read<R: Read>(status: u8, reader: &mut Reader<R>) -> Result<Self> {
        let nibble = status >> 4;
        let mut data = [DataByte::default(); 2];
        for slot in data.iter_mut().take(VoiceEvent::data_len(nibble)) {
            let position = reader.buffer_position();
            let byte = reader.read_u8()?;
            *slot = DataByte::new(byte).map_err(|e| Error::corrupt(position, e.into()))?;
        }
        Ok(Self {
            channel: Channel::from_status(status),
            event: VoiceEvent::from_data(nibble, data),
        })
    }

    /// Append the message, leaving out the status byte when it matches `running_status`.
    pub(crate) fn write(&self, out: &mut Vec<u8>, running_status: &mut Option<u8>) {
        let status = self.status();
        if Some(status) != *running_status {
            out.push(status);
            *running_status = Some(status);
        }
        let (data, len) = self.event.data();
        out.extend_from_slice(&data[..len]);
    }
}

impl fmt::Display for ChannelVoiceMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.channel, self.event)
    }
}
