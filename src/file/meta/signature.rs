use crate::ValueError;
use core::fmt;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Time signature (meta type `0x58`).
///
/// The denominator is stored as a power of two: `3` means an eighth note.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per measure
    pub numerator: u8,
    /// Negative power of two of the beat note
    pub denominator: u8,
    /// MIDI clocks in a metronome click
    pub clocks_per_click: u8,
    /// Notated 32nd notes in a MIDI quarter note (24 MIDI clocks)
    pub notated_32nds_per_quarter: u8,
}

impl TimeSignature {
    /// Create a time signature.
    pub const fn new(
        numerator: u8,
        denominator: u8,
        clocks_per_click: u8,
        notated_32nds_per_quarter: u8,
    ) -> Self {
        Self {
            numerator,
            denominator,
            clocks_per_click,
            notated_32nds_per_quarter,
        }
    }

    /// The denominator as a note value (4 for quarter notes), if it fits in a `u32`.
    pub const fn denominator_value(&self) -> Option<u32> {
        1u32.checked_shl(self.denominator as u32)
    }

    pub(crate) const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    pub(crate) const fn to_bytes(self) -> [u8; 4] {
        [
            self.numerator,
            self.denominator,
            self.clocks_per_click,
            self.notated_32nds_per_quarter,
        ]
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}",
            self.numerator, self.denominator, self.clocks_per_click, self.notated_32nds_per_quarter
        )
    }
}

/// The number of flats (negative) or sharps (positive) of a key signature.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum KeySignatureKey {
    Flat7 = -7,
    Flat6 = -6,
    Flat5 = -5,
    Flat4 = -4,
    Flat3 = -3,
    Flat2 = -2,
    Flat1 = -1,
    NoFlatsOrSharps = 0,
    Sharp1 = 1,
    Sharp2 = 2,
    Sharp3 = 3,
    Sharp4 = 4,
    Sharp5 = 5,
    Sharp6 = 6,
    Sharp7 = 7,
}

impl KeySignatureKey {
    /// Create a key from a signed accidental count.
    pub fn new(accidentals: i8) -> Result<Self, ValueError> {
        Self::try_from_primitive(accidentals).map_err(|e| ValueError::KeySignature(e.number))
    }

    /// Flats are negative, sharps positive
    pub fn accidentals(self) -> i8 {
        self.into()
    }
}

/// Whether a key signature is major or minor.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Tonality {
    /// Key is major
    Major = 0,
    /// Key is minor
    Minor = 1,
}

impl Tonality {
    /// Identify the tonality from its wire byte.
    pub fn new(byte: u8) -> Result<Self, ValueError> {
        Self::try_from_primitive(byte).map_err(|e| ValueError::Tonality(e.number))
    }
}

/// Key signature (meta type `0x59`).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeySignature {
    /// Flats or sharps
    pub key: KeySignatureKey,
    /// Major or minor
    pub tonality: Tonality,
}

impl KeySignature {
    /// Create a key signature.
    pub const fn new(key: KeySignatureKey, tonality: Tonality) -> Self {
        Self { key, tonality }
    }

    pub(crate) fn from_bytes(bytes: [u8; 2]) -> Result<Self, ValueError> {
        Ok(Self {
            key: KeySignatureKey::new(bytes[0] as i8)?,
            tonality: Tonality::new(bytes[1])?,
        })
    }

    pub(crate) fn to_bytes(self) -> [u8; 2] {
        [self.key.accidentals() as u8, self.tonality.into()]
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}\t{:?}", self.key, self.tonality)
    }
}

#[test]
fn key_signature_bytes() {
    use pretty_assertions::assert_eq;
    let sig = KeySignature::new(KeySignatureKey::Flat4, Tonality::Minor);
    assert_eq!(sig.to_bytes(), [0xFC, 0x01]);
    assert_eq!(KeySignature::from_bytes([0xFC, 0x01]).unwrap(), sig);
    assert_eq!(
        KeySignature::from_bytes([8, 0]),
        Err(ValueError::KeySignature(8))
    );
    assert_eq!(
        KeySignature::from_bytes([0, 2]),
        Err(ValueError::Tonality(2))
    );
}

#[test]
fn time_signature_denominator() {
    use pretty_assertions::assert_eq;
    let sig = TimeSignature::new(6, 3, 24, 8);
    assert_eq!(sig.denominator_value(), Some(8));
    assert_eq!(TimeSignature::from_bytes(sig.to_bytes()), sig);
    assert_eq!(TimeSignature::new(4, 40, 24, 8).denominator_value(), None);
}
