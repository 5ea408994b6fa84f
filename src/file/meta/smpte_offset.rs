#![doc = r#"
SMPTE Offset - Precise time positioning for a track

SMPTE Offset (meta type `0x54`) specifies the SMPTE time at which a track is to start.
It holds the frame rate, hours, minutes, seconds, frames and fractional frames
(hundredths of a frame), packed into five bytes.
"#]

use crate::prelude::SmpteFps;
use core::fmt;
use thiserror::Error;

/// Errors in the fields of a [`SmpteOffset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SmpteError {
    /// The payload must be exactly five bytes
    #[error("SMPTE offset needs 5 bytes, found {0}")]
    Length(usize),
    /// The frame rate bits are not one of the four SMPTE rates
    #[error("invalid SMPTE frame rate bits {0}")]
    TrackFrame(u8),
    /// Hours range from 0 to 23
    #[error("SMPTE hour {0} is outside of 0..=23")]
    HourOffset(u8),
    /// Minutes range from 0 to 59
    #[error("SMPTE minute {0} is outside of 0..=59")]
    MinuteOffset(u8),
    /// Seconds range from 0 to 59
    #[error("SMPTE second {0} is outside of 0..=59")]
    SecondOffset(u8),
    /// Fractional frames range from 0 to 99
    #[error("SMPTE subframe {0} is outside of 0..=99")]
    Subframe(u8),
}

/// A track's starting position in SMPTE time code.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    fps: SmpteFps,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
}

impl SmpteOffset {
    /// Create an offset, validating every field.
    ///
    /// # Errors
    /// - `SmpteError::HourOffset` if hours > 23
    /// - `SmpteError::MinuteOffset` if minutes > 59
    /// - `SmpteError::SecondOffset` if seconds > 59
    /// - `SmpteError::Subframe` if fractional frames > 99
    pub const fn new(
        fps: SmpteFps,
        hour: u8,
        minute: u8,
        second: u8,
        frame: u8,
        subframe: u8,
    ) -> Result<Self, SmpteError> {
        if hour > 23 {
            return Err(SmpteError::HourOffset(hour));
        }
        if minute > 59 {
            return Err(SmpteError::MinuteOffset(minute));
        }
        if second > 59 {
            return Err(SmpteError::SecondOffset(second));
        }
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// Parse a SMPTE offset from its 5-byte payload.
    ///
    /// - Byte 0: `0rrhhhhh` where `rr` is frame rate type, `hhhhh` is hours
    /// - Byte 1: Minutes (0-59)
    /// - Byte 2: Seconds (0-59)
    /// - Byte 3: Frames (depends on frame rate)
    /// - Byte 4: Fractional frames in 100ths (0-99)
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        if data.len() != 5 {
            return Err(SmpteError::Length(data.len()));
        }
        let fps = match SmpteFps::from_offset_bits(data[0] >> 5) {
            Some(fps) => fps,
            None => return Err(SmpteError::TrackFrame(data[0] >> 5)),
        };
        Self::new(
            fps,
            data[0] & 0b0001_1111,
            data[1],
            data[2],
            data[3],
            data[4],
        )
    }

    /// The 5-byte payload
    pub const fn to_bytes(&self) -> [u8; 5] {
        [
            (self.fps.offset_bits() << 5) | self.hour,
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        ]
    }

    /// The frame rate of the offset
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }
    /// Hour component of the time code (0-23)
    pub const fn hour(&self) -> u8 {
        self.hour
    }
    /// Minute component of the time code (0-59)
    pub const fn minute(&self) -> u8 {
        self.minute
    }
    /// Second component of the time code (0-59)
    pub const fn second(&self) -> u8 {
        self.second
    }
    /// Frame number within the current second
    pub const fn frame(&self) -> u8 {
        self.frame
    }
    /// Fractional frames, in hundredths of a frame (0-99)
    pub const fn subframe(&self) -> u8 {
        self.subframe
    }
}

impl fmt::Display for SmpteOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.fps.as_division(),
            self.hour,
            self.minute,
            self.second,
            self.frame,
            self.subframe
        )
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    // this are the bytes after 00 FF 54 05
    // where 54 is smpte offset, and 05 is length five.
    let bytes = [0x41, 0x17, 0x2D, 0x0C, 0x22];
    let offset = SmpteOffset::parse(&bytes).unwrap();

    assert_eq!(offset.fps(), SmpteFps::TwentyNine);
    assert_eq!(offset.hour(), 1);
    assert_eq!(offset.minute(), 23);
    assert_eq!(offset.second(), 45);
    assert_eq!(offset.frame(), 12);
    assert_eq!(offset.subframe(), 34);
    assert_eq!(offset.to_bytes(), bytes);
}

#[test]
fn parse_invalid_smpte_offset() {
    use pretty_assertions::assert_eq;
    let bytes = [0x7F, 0x17, 0x2D, 0x0C, 0x22];
    let err = SmpteOffset::parse(&bytes).unwrap_err();
    assert_eq!(err, SmpteError::HourOffset(31));

    let bytes = [0x41, 0x50, 0x2D, 0x0C, 0x22];
    let err = SmpteOffset::parse(&bytes).unwrap_err();
    assert_eq!(err, SmpteError::MinuteOffset(80));
}
