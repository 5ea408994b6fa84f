#![doc = r#"
SMPTE (Society of Motion Picture and Television Engineers) frame rates

MIDI supports two timing methods:

1. **Musical Time** - Based on beats and tempo (ticks per quarter note)
2. **Absolute Time** - Based on SMPTE time code (frames per second)

The header division and the SMPTE offset meta event both name one of the four frame
rates below, though they encode it differently.
"#]

/// The possible FPS (Frames Per Second) for MIDI tracks and files
///
/// The MIDI specification defines only four possible frame types:
/// - 24 fps: Standard film rate
/// - 25 fps: PAL/SECAM television standard
/// - 29.97 fps: NTSC color television (drop-frame timecode)
/// - 30 fps: NTSC black & white, some digital video formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 frames per second - Standard film rate
    TwentyFour,
    /// 25 frames per second - PAL/SECAM television standard
    TwentyFive,
    /// 29.97 frames per second (30000/1001) - NTSC color television drop-frame rate
    TwentyNine,
    /// 30 frames per second - NTSC black & white, some digital formats
    Thirty,
}

impl SmpteFps {
    /// Get the nominal frame rate as an integer division value.
    ///
    /// Drop-frame 29.97 fps is written as 29 in the header division.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine => 29,
            Self::Thirty => 30,
        }
    }

    /// Get the actual frame rate as a floating-point value.
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }

    /// Decode the high byte of a SMPTE header division (-24, -25, -29 or -30).
    pub(crate) const fn from_division_byte(byte: i8) -> Option<Self> {
        match byte {
            -24 => Some(Self::TwentyFour),
            -25 => Some(Self::TwentyFive),
            -29 => Some(Self::TwentyNine),
            -30 => Some(Self::Thirty),
            _ => None,
        }
    }

    /// Decode the two rate bits of a SMPTE offset hour byte (`0rrhhhhh`).
    pub(crate) const fn from_offset_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::TwentyFour),
            1 => Some(Self::TwentyFive),
            2 => Some(Self::TwentyNine),
            3 => Some(Self::Thirty),
            _ => None,
        }
    }

    /// The two rate bits used by the SMPTE offset meta event
    pub(crate) const fn offset_bits(&self) -> u8 {
        match self {
            Self::TwentyFour => 0,
            Self::TwentyFive => 1,
            Self::TwentyNine => 2,
            Self::Thirty => 3,
        }
    }
}

/// The precise value for NTSC drop-frame rate: 29.97002997... fps
const DROP_FRAME: f64 = 30_000. / 1001.;
