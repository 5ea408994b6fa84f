#![doc = r#"
Variable length quantities

Delta times and meta/sysex payload lengths are written 7 bits per byte, most significant
group first. Every byte but the last has its top bit set. Four bytes are the most a
quantity may use, which bounds values to 28 bits.

```text
       0x00 -> 00
       0x7F -> 7F
       0x80 -> 81 00
    0x3FFF -> FF 7F
 0x0FFFFFFF -> FF FF FF 7F
```
"#]

use crate::{CorruptKind, Error, Result, reader::Reader};
use std::io::Read;

/// The largest value a variable length quantity can hold (`0x0FFF_FFFF`)
pub const MAX_VALUE: u32 = 0x0FFF_FFFF;

/// The encoded form of a variable length quantity.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VarLen {
    bytes: [u8; 4],
    len: u8,
}

impl VarLen {
    /// The encoded bytes, most significant group first
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of encoded bytes (1 to 4)
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

/// Encode a value as a variable length quantity.
///
/// Fails with [`CorruptKind::VarLenOverflow`] if the value needs more than 28 bits.
pub fn encode(value: u64) -> core::result::Result<VarLen, CorruptKind> {
    if value > MAX_VALUE as u64 {
        return Err(CorruptKind::VarLenOverflow(value));
    }
    let value = value as u32;
    let mut out = VarLen {
        bytes: [0; 4],
        len: 0,
    };
    let mut skipping = true;
    for i in (0..4).rev() {
        let group = ((value >> (i * 7)) & 0x7F) as u8;
        if skipping && group == 0 && i != 0 {
            continue;
        }
        skipping = false;
        out.bytes[out.len as usize] = if i == 0 { group } else { group | 0x80 };
        out.len += 1;
    }
    Ok(out)
}

/// Decode a variable length quantity from the start of `source`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode<R: Read>(source: R) -> Result<(u32, usize)> {
    let mut reader = Reader::new(source);
    let value = reader.read_varlen()?;
    Ok((value, reader.buffer_position() as usize))
}

/// Append the encoded value to `out`, reporting overflow at the current end of `out`.
pub(crate) fn write(value: u64, out: &mut Vec<u8>) -> Result<()> {
    let encoded = encode(value).map_err(|kind| Error::corrupt(out.len() as u64, kind))?;
    out.extend_from_slice(encoded.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_encodings() {
        let cases: [(u64, &[u8]); 8] = [
            (0, &[0x00]),
            (0x40, &[0x40]),
            (0x7F, &[0x7F]),
            (0x80, &[0x81, 0x00]),
            (0x2000, &[0xC0, 0x00]),
            (0x3FFF, &[0xFF, 0x7F]),
            (0x10_0000, &[0xC0, 0x80, 0x00]),
            (0x0FFF_FFFF, &[0xFF, 0xFF, 0xFF, 0x7F]),
        ];
        for (value, bytes) in cases {
            assert_eq!(encode(value).unwrap().as_bytes(), bytes);
            assert_eq!(decode(bytes).unwrap(), (value as u32, bytes.len()));
        }
    }

    #[test]
    fn boundary_values_survive() {
        for value in [0, 127, 128, 16383, 16384, 2097151, 2097152, 268435455] {
            let encoded = encode(value).unwrap();
            let (decoded, used) = decode(encoded.as_bytes()).unwrap();
            assert_eq!(decoded as u64, value);
            assert_eq!(used, encoded.len());
        }
    }

    #[test]
    fn overflow_is_rejected() {
        assert_eq!(
            encode(268435456),
            Err(CorruptKind::VarLenOverflow(268435456))
        );
        assert!(encode(u64::MAX).is_err());
    }

    #[test]
    fn truncated_and_overlong_input() {
        let err = decode(&[0x81, 0x80][..]).unwrap_err();
        assert_eq!(err.corrupt_kind(), Some(&CorruptKind::UnexpectedEof));

        let err = decode(&[0x81, 0x80, 0x80, 0x80, 0x00][..]).unwrap_err();
        assert_eq!(err.corrupt_kind(), Some(&CorruptKind::VarLenTooLong));
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn trailing_bytes_are_left_alone() {
        assert_eq!(decode(&[0x81, 0x00, 0x42][..]).unwrap(), (128, 2));
    }
}
