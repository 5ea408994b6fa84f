mod smpte;
pub use smpte::*;

use crate::ValueError;
use core::fmt;
use core::num::NonZeroU16;

/// Which interpretation a [`Division`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DivisionType {
    /// Delta times count subdivisions of a quarter note
    TicksPerQuarterNote,
    /// Delta times count subdivisions of a SMPTE frame
    Smpte,
}

/// The header time division.
///
/// This is either the number of ticks per quarter note or the alternative SMPTE
/// format. On the wire it is a single 16-bit field: when the top bit is clear the
/// remaining 15 bits are ticks per quarter note; when it is set, the high byte is the
/// negated frame rate and the low byte the ticks per frame. Words with the top bit set
/// that name no known frame rate, or zero ticks per frame, are kept as
/// [`Division::Other`] so that they are written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Division {
    /// The file's delta times are defined using a tick rate per quarter note (1-32767)
    TicksPerQuarterNote(u16),

    /// The file's delta times are defined using SMPTE and MIDI Time Code
    Smpte(SmpteHeader),

    /// A SMPTE style word this crate cannot interpret
    Other(NonZeroU16),
}

impl Division {
    /// The tickrate per quarter note defines what a "quarter note" means.
    ///
    /// Must be between 1 and 32767.
    pub fn ticks_per_quarter_note(tpqn: u16) -> Result<Self, ValueError> {
        if tpqn == 0 || tpqn > 0x7FFF {
            return Err(ValueError::Division(tpqn));
        }
        Ok(Self::TicksPerQuarterNote(tpqn))
    }

    /// Define the timing in terms of fps and ticks per frame
    pub fn smpte(fps: SmpteFps, ticks_per_frame: u8) -> Result<Self, ValueError> {
        let header = SmpteHeader {
            fps,
            ticks_per_frame,
        };
        if ticks_per_frame == 0 {
            return Err(ValueError::Division(header.raw()));
        }
        Ok(Self::Smpte(header))
    }

    /// Decode the raw 16-bit header field.
    ///
    /// Only zero is rejected.
    ///
    /// ```
    /// use midiseq::prelude::*;
    ///
    /// // -26 is not a SMPTE frame rate
    /// let division = Division::from_raw(0xE650).unwrap();
    /// assert_eq!(division.division_type(), DivisionType::Smpte);
    /// assert_eq!(division.raw(), 0xE650);
    /// ```
    pub fn from_raw(raw: u16) -> Result<Self, ValueError> {
        let [high, low] = raw.to_be_bytes();
        if high & 0x80 == 0 {
            return Self::ticks_per_quarter_note(raw);
        }
        match SmpteFps::from_division_byte(high as i8) {
            Some(fps) if low != 0 => Self::smpte(fps, low),
            _ => NonZeroU16::new(raw)
                .map(Self::Other)
                .ok_or(ValueError::Division(raw)),
        }
    }

    /// Encode the raw 16-bit header field.
    pub const fn raw(&self) -> u16 {
        match self {
            Self::TicksPerQuarterNote(tpqn) => *tpqn,
            Self::Smpte(header) => header.raw(),
            Self::Other(raw) => raw.get(),
        }
    }

    /// Which interpretation this division uses
    pub const fn division_type(&self) -> DivisionType {
        match self {
            Self::TicksPerQuarterNote(_) => DivisionType::TicksPerQuarterNote,
            Self::Smpte(_) | Self::Other(_) => DivisionType::Smpte,
        }
    }

    /// Returns Some if the division is defined as ticks per quarter note
    pub const fn ticks_per_quarter(&self) -> Option<u16> {
        match self {
            Self::TicksPerQuarterNote(t) => Some(*t),
            _ => None,
        }
    }
}

impl Default for Division {
    fn default() -> Self {
        Self::TicksPerQuarterNote(480)
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TicksPerQuarterNote(t) => write!(f, "{t} ticks per quarter note"),
            Self::Smpte(h) => write!(
                f,
                "{} fps, {} ticks per frame",
                h.fps.as_division(),
                h.ticks_per_frame
            ),
            Self::Other(raw) => write!(f, "SMPTE division {:#06X}", raw.get()),
        }
    }
}

/// A representation of the `smpte` timing for a MIDI file
#[derive(Debug, Clone, PartialEq, Eq, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteHeader {
    fps: SmpteFps,
    ticks_per_frame: u8,
}

impl SmpteHeader {
    /// Returns the frames per second
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// Returns the ticks per frame
    pub const fn ticks_per_frame(&self) -> u8 {
        self.ticks_per_frame
    }

    const fn raw(&self) -> u16 {
        let high = (-(self.fps.as_division() as i8)) as u8;
        u16::from_be_bytes([high, self.ticks_per_frame])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ticks_per_quarter_note() {
        let division = Division::from_raw(480).unwrap();
        assert_eq!(division, Division::TicksPerQuarterNote(480));
        assert_eq!(division.division_type(), DivisionType::TicksPerQuarterNote);
        assert_eq!(division.raw(), 480);
        assert_eq!(Division::from_raw(0), Err(ValueError::Division(0)));
        assert!(Division::ticks_per_quarter_note(0x8000).is_err());
    }

    #[test]
    fn smpte_division_keeps_wire_form() {
        // -25 fps, 40 ticks per frame
        let raw = 0xE728;
        let division = Division::from_raw(raw).unwrap();
        let Division::Smpte(header) = division else {
            panic!("expected smpte timing");
        };
        assert_eq!(header.fps(), SmpteFps::TwentyFive);
        assert_eq!(header.ticks_per_frame(), 40);
        assert_eq!(division.division_type(), DivisionType::Smpte);
        assert_eq!(division.raw(), raw);

        for fps in [
            SmpteFps::TwentyFour,
            SmpteFps::TwentyFive,
            SmpteFps::TwentyNine,
            SmpteFps::Thirty,
        ] {
            let division = Division::smpte(fps, 80).unwrap();
            assert_eq!(Division::from_raw(division.raw()).unwrap(), division);
        }
    }

    #[test]
    fn uninterpreted_smpte_words_are_kept() {
        // -26 is not a SMPTE rate, -30 is one but with zero ticks per frame
        for raw in [0xE650, 0xE928, 0xE200, 0x8000, 0xFFFF] {
            let division = Division::from_raw(raw).unwrap();
            assert_eq!(division, Division::Other(NonZeroU16::new(raw).unwrap()));
            assert_eq!(division.division_type(), DivisionType::Smpte);
            assert_eq!(division.ticks_per_quarter(), None);
            assert_eq!(division.raw(), raw);
        }
        assert_eq!(
            Division::from_raw(0xE650).unwrap().to_string(),
            "SMPTE division 0xE650"
        );
        assert!(Division::smpte(SmpteFps::Thirty, 0).is_err());
    }
}
