use core::fmt;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The flavors of text meta event, by meta type byte.
///
/// All of them carry a single free-form text payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TextKind {
    /// Any amount of text describing anything (`0x01`)
    Text = 0x01,
    /// A copyright notice (`0x02`)
    Copyright = 0x02,
    /// The name of the sequence or track (`0x03`)
    SequenceTrackName = 0x03,
    /// The instrumentation used in the track (`0x04`)
    Instrument = 0x04,
    /// A lyric to be sung, usually one syllable per event (`0x05`)
    Lyric = 0x05,
    /// A rehearsal letter or section name (`0x06`)
    Marker = 0x06,
    /// A description of something happening on a film or stage (`0x07`)
    CuePoint = 0x07,
    /// The name of the program (patch) used to play the track (`0x08`)
    ProgramName = 0x08,
    /// The name of the device the track is intended for (`0x09`)
    DeviceName = 0x09,
}

impl TextKind {
    /// Every text kind, in meta type order
    pub const ALL: [TextKind; 9] = [
        TextKind::Text,
        TextKind::Copyright,
        TextKind::SequenceTrackName,
        TextKind::Instrument,
        TextKind::Lyric,
        TextKind::Marker,
        TextKind::CuePoint,
        TextKind::ProgramName,
        TextKind::DeviceName,
    ];

    /// The meta type byte
    pub fn meta_type(self) -> u8 {
        self.into()
    }
}

impl fmt::Display for TextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
