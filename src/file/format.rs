use crate::ValueError;
use core::fmt;
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[doc = r#"
The layout of the tracks in a MIDI file, stored in the first field of the header chunk.

- Format 0: a single track carrying every channel
- Format 1: one or more tracks played simultaneously
- Format 2: one or more sequentially independent single-track patterns
"#]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum Format {
    /// Format 0
    SingleMultiChannel = 0,
    /// Format 1
    #[default]
    Simultaneous = 1,
    /// Format 2
    SequentiallyIndependent = 2,
}

impl Format {
    /// Identify the format from the raw header field.
    pub fn new(raw: u16) -> Result<Self, ValueError> {
        Self::try_from_primitive(raw).map_err(|e| ValueError::Format(e.number))
    }

    /// The raw header field for this format
    pub fn raw(self) -> u16 {
        self.into()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::SingleMultiChannel => "single multi-channel track",
            Format::Simultaneous => "simultaneous tracks",
            Format::SequentiallyIndependent => "sequentially independent tracks",
        };
        write!(f, "{} ({})", self.raw(), name)
    }
}

#[test]
fn format_from_raw() {
    use pretty_assertions::assert_eq;
    assert_eq!(Format::new(0).unwrap(), Format::SingleMultiChannel);
    assert_eq!(Format::new(2).unwrap(), Format::SequentiallyIndependent);
    assert_eq!(Format::new(3), Err(ValueError::Format(3)));
    assert_eq!(Format::Simultaneous.raw(), 1);
}

#[test]
fn default_format_does_not_catch_unknown_values() {
    use pretty_assertions::assert_eq;
    assert_eq!(Format::default(), Format::Simultaneous);
    assert_eq!(Format::new(0xFFFF), Err(ValueError::Format(0xFFFF)));
}
