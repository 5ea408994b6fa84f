use crate::{DataByte, Note, ValueError};
use core::fmt;

/// A signed 14-bit pitch wheel position. `0` is the center.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i16", into = "i16"))]
pub struct PitchBend(i16);

impl PitchBend {
    /// Lowest position
    pub const MIN: i16 = -0x2000;
    /// Highest position
    pub const MAX: i16 = 0x1FFF;
    /// No bend
    pub const CENTER: PitchBend = PitchBend(0);

    /// Create a pitch bend, checking the 14-bit range.
    pub fn new(value: i16) -> Result<Self, ValueError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValueError::PitchWheel(value as i32));
        }
        Ok(Self(value))
    }

    /// The signed position
    pub const fn value(&self) -> i16 {
        self.0
    }

    /// Decode from the two 7-bit data bytes (LSB first).
    pub(crate) const fn from_data(lsb: DataByte, msb: DataByte) -> Self {
        let raw = ((msb.value() as i16) << 7) | lsb.value() as i16;
        Self(raw - 0x2000)
    }

    /// Encode as the two 7-bit data bytes (LSB first).
    pub(crate) const fn to_data(self) -> [u8; 2] {
        let raw = (self.0 + 0x2000) as u16;
        [(raw & 0x7F) as u8, (raw >> 7) as u8]
    }
}

impl TryFrom<i16> for PitchBend {
    type Error = ValueError;
    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PitchBend> for i16 {
    fn from(value: PitchBend) -> Self {
        value.0
    }
}

#[doc = r#"
The body of a channel voice message.

The status nibble written for each variant is given in brackets.
"#]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoiceEvent {
    /// Stop playing a note (`0x8`)
    NoteOff {
        /// The note to release
        note: Note,
        /// Release velocity
        velocity: DataByte,
    },
    /// Start playing a note (`0x9`)
    NoteOn {
        /// The note to play
        note: Note,
        /// How hard the note is struck
        velocity: DataByte,
    },
    /// Change the pressure on a held note, also called polyphonic key pressure (`0xA`)
    Aftertouch {
        /// The held note
        note: Note,
        /// The new pressure
        pressure: DataByte,
    },
    /// Set a controller value (`0xB`)
    ControlChange {
        /// Controller number
        controller: DataByte,
        /// New controller value
        value: DataByte,
    },
    /// Select the patch for the channel (`0xC`)
    ProgramChange {
        /// Program number
        program: DataByte,
    },
    /// Change the pressure on every held note of the channel (`0xD`)
    ChannelPressure {
        /// The new pressure
        pressure: DataByte,
    },
    /// Move the pitch wheel (`0xE`)
    PitchWheel(PitchBend),
}

impl VoiceEvent {
    /// The high nibble of the status byte
    pub const fn status_nibble(&self) -> u8 {
        match self {
            Self::NoteOff { .. } => 0x8,
            Self::NoteOn { .. } => 0x9,
            Self::Aftertouch { .. } => 0xA,
            Self::ControlChange { .. } => 0xB,
            Self::ProgramChange { .. } => 0xC,
            Self::ChannelPressure { .. } => 0xD,
            Self::PitchWheel(_) => 0xE,
        }
    }

    /// Number of data bytes following the status byte for a status nibble
    pub(crate) const fn data_len(status_nibble: u8) -> usize {
        match status_nibble {
            0xC | 0xD => 1,
            _ => 2,
        }
    }

    /// Build the event from its status nibble and data bytes.
    pub(crate) fn from_data(status_nibble: u8, data: [DataByte; 2]) -> Self {
        let [a, b] = data;
        match status_nibble {
            0x8 => Self::NoteOff {
                note: Note::from(a),
                velocity: b,
            },
            0x9 => Self::NoteOn {
                note: Note::from(a),
                velocity: b,
            },
            0xA => Self::Aftertouch {
                note: Note::from(a),
                pressure: b,
            },
            0xB => Self::ControlChange {
                controller: a,
                value: b,
            },
            0xC => Self::ProgramChange { program: a },
            0xD => Self::ChannelPressure { pressure: a },
            _ => Self::PitchWheel(PitchBend::from_data(a, b)),
        }
    }

    /// The data bytes following the status byte
    pub(crate) fn data(&self) -> ([u8; 2], usize) {
        match *self {
            Self::NoteOff { note, velocity } | Self::NoteOn { note, velocity } => {
                ([note.byte(), velocity.value()], 2)
            }
            Self::Aftertouch { note, pressure } => ([note.byte(), pressure.value()], 2),
            Self::ControlChange { controller, value } => ([controller.value(), value.value()], 2),
            Self::ProgramChange { program } => ([program.value(), 0], 1),
            Self::ChannelPressure { pressure } => ([pressure.value(), 0], 1),
            Self::PitchWheel(bend) => (bend.to_data(), 2),
        }
    }

    /// The note addressed by a note on, note off or aftertouch event
    pub fn note(&self) -> Option<Note> {
        match *self {
            Self::NoteOff { note, .. } | Self::NoteOn { note, .. } | Self::Aftertouch { note, .. } => {
                Some(note)
            }
            _ => None,
        }
    }

    /// Mutable access to the note of a note on, note off or aftertouch event
    pub fn note_mut(&mut self) -> Option<&mut Note> {
        match self {
            Self::NoteOff { note, .. } | Self::NoteOn { note, .. } | Self::Aftertouch { note, .. } => {
                Some(note)
            }
            _ => None,
        }
    }

    /// A stable name for the variant, used when rendering events
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NoteOff { .. } => "NoteOff",
            Self::NoteOn { .. } => "NoteOn",
            Self::Aftertouch { .. } => "Aftertouch",
            Self::ControlChange { .. } => "ControlChange",
            Self::ProgramChange { .. } => "ProgramChange",
            Self::ChannelPressure { .. } => "ChannelPressure",
            Self::PitchWheel(_) => "PitchWheel",
        }
    }
}

impl fmt::Display for VoiceEvent {
    /// Renders the fields, tab separated, without the variant name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoteOff { note, velocity } | Self::NoteOn { note, velocity } => {
                write!(f, "{}\t{}", note, velocity)
            }
            Self::Aftertouch { note, pressure } => write!(f, "{}\t{}", note, pressure),
            Self::ControlChange { controller, value } => write!(f, "{}\t{}", controller, value),
            Self::ProgramChange { program } => write!(f, "{}", program),
            Self::ChannelPressure { pressure } => write!(f, "{}", pressure),
            Self::PitchWheel(bend) => write!(f, "{}", bend.value()),
        }
    }
}

#[test]
fn pitch_bend_data_bytes() {
    use pretty_assertions::assert_eq;
    assert_eq!(PitchBend::CENTER.to_data(), [0x00, 0x40]);
    assert_eq!(PitchBend::new(PitchBend::MIN).unwrap().to_data(), [0x00, 0x00]);
    assert_eq!(PitchBend::new(PitchBend::MAX).unwrap().to_data(), [0x7F, 0x7F]);
    assert_eq!(
        PitchBend::from_data(DataByte::new_lossy(0x7F), DataByte::new_lossy(0x7F)).value(),
        8191
    );
    assert_eq!(PitchBend::new(8192), Err(ValueError::PitchWheel(8192)));
}
