use crate::ValueError;
use core::fmt;

#[doc = r#"
Tempo, in microseconds per quarter note (meta type `0x51`).

The value is stored in three bytes, so it must fit in 24 bits.

# Example
```rust
# use midiseq::prelude::*;
let tempo = Tempo::new(500_000).unwrap();
assert_eq!(tempo.bpm(), 120.);
assert!(Tempo::new(0x0100_0000).is_err());
```
"#]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct Tempo(u32);

impl Tempo {
    /// The largest tempo value (`0xFFFFFF`)
    pub const MAX: u32 = 0x00FF_FFFF;

    /// 120 beats per minute, the tempo assumed when a file sets none
    pub const DEFAULT: Tempo = Tempo(500_000);

    /// Create a tempo, checking that it fits in 24 bits.
    pub const fn new(micros_per_quarter_note: u32) -> Result<Self, ValueError> {
        if micros_per_quarter_note > Self::MAX {
            return Err(ValueError::Tempo(micros_per_quarter_note));
        }
        Ok(Self(micros_per_quarter_note))
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Quarter notes per minute
    pub fn bpm(&self) -> f64 {
        60_000_000. / self.0 as f64
    }

    pub(crate) const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    pub(crate) const fn to_bytes(self) -> [u8; 3] {
        let [_, a, b, c] = self.0.to_be_bytes();
        [a, b, c]
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Tempo {
    type Error = ValueError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Tempo> for u32 {
    fn from(value: Tempo) -> Self {
        value.0
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
