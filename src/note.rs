use core::fmt;
use core::str::FromStr;

use crate::{DataByte, ValueError};

#[doc = r#"
Identifies the note of a note on, note off or aftertouch event.

Notes are interpreted as a 7-bit number. Each value corresponds to some [`Key`] and
[`Octave`]: note `0` is `C-1`, note `60` is `C4` (middle C) and note `127` is `G9`.

# Example
```rust
# use midiseq::prelude::*;
let note = Note::from_databyte(63).unwrap();

assert_eq!(note.key(), Key::DSharp);
assert_eq!(note.octave(), Octave::new(4));
assert_eq!(note.to_string(), "D#4");
assert_eq!("D#4".parse::<Note>().unwrap(), note);
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note(DataByte);

impl Note {
    /// Middle C
    pub const MIDDLE_C: Note = Note(DataByte(60));

    /// Create a new note, checking for a leading 0 bit.
    pub fn from_databyte<B>(rep: B) -> Result<Self, ValueError>
    where
        B: TryInto<DataByte, Error = ValueError>,
    {
        rep.try_into().map(Self)
    }

    /// Create a note from a key and an octave.
    ///
    /// # Errors
    /// `Key::GSharp` through `Key::B` in octave 9 are not representable.
    pub fn new(key: Key, octave: Octave) -> Result<Self, ValueError> {
        let number = (octave.value() as i16 + 1) * 12 + key.get_mod_12() as i16;
        Self::from_databyte(number)
    }

    /// Identifies the key of the note
    #[inline]
    pub const fn key(&self) -> Key {
        Key::from_data_byte(&self.0)
    }

    /// Identifies the octave of the note
    #[inline]
    pub const fn octave(&self) -> Octave {
        Octave::from_data_byte(&self.0)
    }

    /// Returns the underlying byte of the note
    pub const fn byte(&self) -> u8 {
        self.0.0
    }

    /// Shift the note by a number of half steps.
    ///
    /// Fails rather than clamping or wrapping when the result leaves `0..=127`.
    pub fn transpose(self, steps: i32) -> Result<Self, ValueError> {
        let shifted = self.byte() as i64 + steps as i64;
        Self::from_databyte(shifted).map_err(|_| ValueError::Transpose {
            note: self.byte(),
            steps,
        })
    }
}

impl From<DataByte> for Note {
    fn from(value: DataByte) -> Self {
        Self(value)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.key(), self.octave())
    }
}

impl FromStr for Note {
    type Err = ValueError;

    /// Parses names like `C4`, `c#4`, `Db-1` or `G9`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValueError::NoteName(s.to_owned());
        let mut chars = s.trim().chars();

        let base = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(invalid()),
        };
        let rest = chars.as_str();
        let (shift, octave) = match rest.as_bytes().first() {
            Some(b'#') => (1, &rest[1..]),
            Some(b'b') => (-1, &rest[1..]),
            _ => (0, rest),
        };
        let octave: i16 = octave.parse().map_err(|_| invalid())?;
        if !(-1..=9).contains(&octave) {
            return Err(invalid());
        }

        let number = (octave + 1) * 12 + base + shift;
        Self::from_databyte(number).map_err(|_| invalid())
    }
}

#[allow(missing_docs)]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[doc = r#"
Identifies the pitch class of a [`Note`]

# Example
```rust
# use midiseq::prelude::*;
let note = Key::FSharp.with_octave(Octave::new(4)).unwrap();

assert_eq!(note.octave().value(), 4);
assert_eq!(note.key(), Key::FSharp);
```
"#]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    /// Returns an array beginning with [`Key::C`] to [`Key::B`]
    pub fn all() -> [Key; 12] {
        use Key::*;
        [C, CSharp, D, DSharp, E, F, FSharp, G, GSharp, A, ASharp, B]
    }

    /// Returns true if the key is sharp (or flat).
    ///
    /// # Example
    /// ```rust
    /// # use midiseq::prelude::*;
    /// assert!(!Key::C.is_sharp());
    /// assert!(Key::FSharp.is_sharp());
    /// ```
    #[inline]
    pub const fn is_sharp(&self) -> bool {
        use Key::*;
        matches!(self, CSharp | DSharp | FSharp | GSharp | ASharp)
    }

    /// Identify the key from a note byte.
    #[inline]
    pub const fn from_data_byte(key: &DataByte) -> Self {
        use Key::*;
        match key.value() % 12 {
            0 => C,
            1 => CSharp,
            2 => D,
            3 => DSharp,
            4 => E,
            5 => F,
            6 => FSharp,
            7 => G,
            8 => GSharp,
            9 => A,
            10 => ASharp,
            _ => B,
        }
    }

    const fn get_mod_12(&self) -> u8 {
        *self as u8
    }

    /// Create a [`Note`] given this key and a provided [`Octave`]
    pub fn with_octave(self, octave: Octave) -> Result<Note, ValueError> {
        Note::new(self, octave)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Key::*;
        let name = match self {
            C => "C",
            CSharp => "C#",
            D => "D",
            DSharp => "D#",
            E => "E",
            F => "F",
            FSharp => "F#",
            G => "G",
            GSharp => "G#",
            A => "A",
            ASharp => "A#",
            B => "B",
        };
        f.write_str(name)
    }
}

#[doc = r#"
Identifies the octave of a [`Note`]. Values range from -1 to 9.

# Example
```rust
# use midiseq::prelude::*;
let octave = Octave::new(12); // clamps to 9

assert_eq!(octave.value(), 9);
```
"#]
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Octave(i8);

impl Octave {
    /// Identify an octave from a note byte.
    pub const fn from_data_byte(key: &DataByte) -> Self {
        Self((key.value() / 12) as i8 - 1)
    }

    /// Should be a value between [-1, 9]. Clamps between these two values.
    pub const fn new(mut octave: i8) -> Self {
        if octave < -1 {
            octave = -1
        } else if octave > 9 {
            octave = 9;
        }
        Self(octave)
    }

    /// The octave, from `[-1,9]`
    pub const fn value(&self) -> i8 {
        self.0
    }
}

impl fmt::Display for Octave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[test]
fn note_from_key_octave_pairs() {
    use pretty_assertions::assert_eq;
    for byte in 0..128 {
        let note = Note::from_databyte(byte).unwrap();
        let made = Note::new(note.key(), note.octave()).unwrap();
        assert_eq!(note, made);
    }
    assert!(Note::new(Key::GSharp, Octave::new(9)).is_err());
}

#[test]
fn parse_note_names() {
    use pretty_assertions::assert_eq;
    assert_eq!("C-1".parse::<Note>().unwrap().byte(), 0);
    assert_eq!("C4".parse::<Note>().unwrap(), Note::MIDDLE_C);
    assert_eq!("c5".parse::<Note>().unwrap().byte(), 72);
    assert_eq!("Db4".parse::<Note>().unwrap().byte(), 61);
    assert_eq!("F#3".parse::<Note>().unwrap().byte(), 54);
    assert_eq!("G9".parse::<Note>().unwrap().byte(), 127);

    for bad in ["", "H4", "C", "C10", "G#9", "Cb-1", "C#x"] {
        assert_eq!(
            bad.parse::<Note>(),
            Err(ValueError::NoteName(bad.to_owned()))
        );
    }
}

#[test]
fn names_survive_display() {
    use pretty_assertions::assert_eq;
    for byte in 0..128u8 {
        let note = Note::from_databyte(byte).unwrap();
        assert_eq!(note.to_string().parse::<Note>().unwrap(), note);
    }
}

#[test]
fn transpose_is_checked() {
    use pretty_assertions::assert_eq;
    let c = Note::MIDDLE_C;
    assert_eq!(c.transpose(7).unwrap().byte(), 67);
    assert_eq!(c.transpose(-60).unwrap().byte(), 0);
    assert_eq!(
        c.transpose(68),
        Err(ValueError::Transpose { note: 60, steps: 68 })
    );
    assert!(c.transpose(-61).is_err());
}
