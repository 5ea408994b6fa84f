#![doc = r#"
Restricted integers used by every event field

MIDI packs most of its values into 7-bit data bytes, numbers its channels 0 through 15,
and stores delta times as variable length quantities that top out at 28 bits. Each of
those ranges gets its own type here, and every conversion into one of them is checked.
"#]

use crate::ValueError;
use core::fmt;
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Implements fallible conversions from the common integer widths.
macro_rules! restricted_from_ints {
    ($name:ident : $inner:ty => $max:expr, $err:ident ; $( $int:ty ),*) => {
        $(
            impl TryFrom<$int> for $name {
                type Error = ValueError;
                #[allow(clippy::unnecessary_cast)]
                fn try_from(value: $int) -> Result<Self, Self::Error> {
                    let wide = value as i64;
                    if (0..=$max as i64).contains(&wide) {
                        Ok(Self(wide as $inner))
                    } else {
                        Err(ValueError::$err(wide))
                    }
                }
            }
        )*
    };
}

#[doc = r#"
A byte with a leading 0 bit, holding a value between 0 and 127.

Notes, velocities, controller numbers and most other voice event fields are data bytes.

# Example
```rust
# use midiseq::prelude::*;
let velocity = DataByte::new(100).unwrap();
assert_eq!(velocity.value(), 100);

assert!(DataByte::new(128).is_err());
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct DataByte(pub(crate) u8);

impl DataByte {
    /// The largest value a data byte can hold
    pub const MAX: u8 = 0x7F;

    /// Create a data byte, checking for a leading 0 bit.
    pub fn new<B>(rep: B) -> Result<Self, ValueError>
    where
        B: TryInto<DataByte, Error = ValueError>,
    {
        rep.try_into()
    }

    /// Create a data byte by masking off the top bit.
    pub const fn new_lossy(byte: u8) -> Self {
        Self(byte & Self::MAX)
    }

    /// Returns the underlying byte
    pub const fn value(&self) -> u8 {
        self.0
    }
}

restricted_from_ints!(DataByte: u8 => DataByte::MAX, DataByte; u8, u16, u32, u64, i8, i16, i32, i64);

impl From<DataByte> for u8 {
    fn from(value: DataByte) -> Self {
        value.0
    }
}

impl fmt::Display for DataByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[doc = r#"
The number of ticks between an event and the one before it in the same track.

Delta times are written as variable length quantities, so they are bound to 28 bits
(`0..=0x0FFF_FFFF`). Negative values are rejected.

# Example
```rust
# use midiseq::prelude::*;
assert_eq!(DeltaTime::new(96).unwrap().ticks(), 96);
assert!(DeltaTime::new(-1).is_err());
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct DeltaTime(pub(crate) u32);

impl DeltaTime {
    /// The largest delta time a variable length quantity can carry
    pub const MAX: u32 = crate::varlen::MAX_VALUE;

    /// No ticks
    pub const ZERO: Self = Self(0);

    /// Create a delta time, checking that it is non-negative and fits in 28 bits.
    pub fn new<D>(ticks: D) -> Result<Self, ValueError>
    where
        D: TryInto<DeltaTime, Error = ValueError>,
    {
        ticks.try_into()
    }

    /// Returns the number of ticks
    pub const fn ticks(&self) -> u32 {
        self.0
    }
}

restricted_from_ints!(DeltaTime: u32 => DeltaTime::MAX, DeltaTime; u8, u16, u32, u64, i8, i16, i32, i64);

impl From<DeltaTime> for u32 {
    fn from(value: DeltaTime) -> Self {
        value.0
    }
}

impl fmt::Display for DeltaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[doc = r#"
The channel of a voice event.

Channels are stored in the low nibble of a status byte, so [`Channel::One`] is `0`
on the wire and [`Channel::Sixteen`] is `15`.
"#]
#[allow(missing_docs)]
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, IntoPrimitive, TryFromPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    One = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
}

impl Channel {
    const ALL: [Channel; 16] = {
        use Channel::*;
        [
            One, Two, Three, Four, Five, Six, Seven, Eight, Nine, Ten, Eleven, Twelve, Thirteen,
            Fourteen, Fifteen, Sixteen,
        ]
    };

    /// Create a channel from its wire number (0-15).
    pub fn new(number: u8) -> Result<Self, ValueError> {
        Self::try_from_primitive(number).map_err(|e| ValueError::Channel(e.number as i64))
    }

    /// Every channel, in wire order
    pub const fn all() -> [Channel; 16] {
        Self::ALL
    }

    /// Identify the channel from the low nibble of a status byte.
    pub const fn from_status(status: u8) -> Self {
        Self::ALL[(status & 0x0F) as usize]
    }

    /// Returns the wire number of the channel (0-15)
    pub fn number(self) -> u8 {
        self.into()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.number(), f)
    }
}

#[test]
fn data_byte_bounds() {
    use pretty_assertions::assert_eq;
    assert_eq!(DataByte::new(0).unwrap().value(), 0);
    assert_eq!(DataByte::new(127u8).unwrap().value(), 127);
    assert_eq!(DataByte::new(128), Err(ValueError::DataByte(128)));
    assert_eq!(DataByte::new(-3i64), Err(ValueError::DataByte(-3)));
    assert_eq!(DataByte::new_lossy(0xC5).value(), 0x45);
}

#[test]
fn delta_time_bounds() {
    use pretty_assertions::assert_eq;
    assert_eq!(DeltaTime::new(0x0FFF_FFFFu32).unwrap().ticks(), 0x0FFF_FFFF);
    assert_eq!(
        DeltaTime::new(0x1000_0000u32),
        Err(ValueError::DeltaTime(0x1000_0000))
    );
    assert_eq!(DeltaTime::new(-1), Err(ValueError::DeltaTime(-1)));
}

#[test]
fn channel_from_status_and_number() {
    use pretty_assertions::assert_eq;
    assert_eq!(Channel::from_status(0x93), Channel::Four);
    assert_eq!(Channel::new(15).unwrap(), Channel::Sixteen);
    assert_eq!(Channel::new(16), Err(ValueError::Channel(16)));
    for (i, channel) in Channel::all().into_iter().enumerate() {
        assert_eq!(channel.number() as usize, i);
    }
}
