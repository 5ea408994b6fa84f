#![doc = r#"
A byte source that knows where it is

[`Reader`] wraps any [`Read`] implementation and keeps track of how many bytes have been
consumed, so that a malformed stream can be reported with the offset of the problem.
Running out of data in the middle of a value is always reported as
[`CorruptKind::UnexpectedEof`].
"#]

use crate::{CorruptKind, Error, Result};
use std::io::{self, Read};

/// Reads big-endian integers, variable length quantities and raw byte runs from a stream.
pub struct Reader<R> {
    inner: R,
    position: u64,
    peeked: Option<u8>,
}

impl<R: Read> Reader<R> {
    /// Start reading from the beginning of `inner`.
    pub fn new(inner: R) -> Self {
        Self::with_offset(inner, 0)
    }

    /// Read from `inner`, reporting positions as if it began at `position`.
    pub fn with_offset(inner: R, position: u64) -> Self {
        Self {
            inner,
            position,
            peeked: None,
        }
    }

    /// Offset of the next byte to be read.
    pub fn buffer_position(&self) -> u64 {
        self.position
    }

    /// Build a corrupt data error at the current position.
    pub(crate) fn corrupt(&self, kind: impl Into<CorruptKind>) -> Error {
        Error::corrupt(self.position, kind.into())
    }

    fn fill_one(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Look at the next byte without consuming it. `None` at end of stream.
    pub fn peek_u8(&mut self) -> Result<Option<u8>> {
        if self.peeked.is_none() {
            self.peeked = self.fill_one()?;
        }
        Ok(self.peeked)
    }

    /// True once every byte of the stream has been consumed.
    pub fn is_at_end(&mut self) -> Result<bool> {
        Ok(self.peek_u8()?.is_none())
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = match self.peeked.take() {
            Some(byte) => byte,
            None => self
                .fill_one()?
                .ok_or_else(|| self.corrupt(CorruptKind::UnexpectedEof))?,
        };
        self.position += 1;
        Ok(byte)
    }

    /// Read exactly `N` bytes.
    pub fn read_exact_size<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        for slot in out.iter_mut() {
            *slot = self.read_u8()?;
        }
        Ok(out)
    }

    /// Read a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_exact_size().map(u16::from_be_bytes)
    }

    /// Read a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_exact_size().map(u32::from_be_bytes)
    }

    /// Read up to `len` bytes, stopping early at the end of the stream.
    pub fn read_up_to(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        if len == 0 {
            return Ok(out);
        }
        if let Some(byte) = self.peeked.take() {
            out.push(byte);
        }
        let remaining = (len - out.len()) as u64;
        (&mut self.inner).take(remaining).read_to_end(&mut out)?;
        self.position += out.len() as u64;
        Ok(out)
    }

    /// Read exactly `len` bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let bytes = self.read_up_to(len)?;
        if bytes.len() < len {
            return Err(self.corrupt(CorruptKind::UnexpectedEof));
        }
        Ok(bytes)
    }

    /// Read a variable length quantity (see [`varlen`](crate::varlen)).
    pub fn read_varlen(&mut self) -> Result<u32> {
        let mut value: u32 = 0;
        for _ in 0..4 {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::corrupt(self.position - 1, CorruptKind::VarLenTooLong))
    }

    /// Read a variable length quantity followed by that many bytes.
    pub fn read_varlen_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_varlen()?;
        self.read_bytes(len as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tracks_position_across_peeks() {
        let mut reader = Reader::new(&[0x12, 0x34, 0x56, 0x78, 0x9A][..]);
        assert_eq!(reader.peek_u8().unwrap(), Some(0x12));
        assert_eq!(reader.buffer_position(), 0);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.buffer_position(), 2);
        assert_eq!(reader.peek_u8().unwrap(), Some(0x56));
        assert_eq!(reader.read_up_to(10).unwrap(), vec![0x56, 0x78, 0x9A]);
        assert_eq!(reader.buffer_position(), 5);
        assert!(reader.is_at_end().unwrap());
    }

    #[test]
    fn eof_is_corrupt_data() {
        let mut reader = Reader::with_offset(&[0x00, 0x01][..], 100);
        let err = reader.read_u32().unwrap_err();
        assert_eq!(err.corrupt_kind(), Some(&CorruptKind::UnexpectedEof));
        assert_eq!(err.position(), Some(102));
    }

    #[test]
    fn varlen_bytes() {
        let mut reader = Reader::new(&[0x03, b'a', b'b', b'c', 0x05, b'x'][..]);
        assert_eq!(reader.read_varlen_bytes().unwrap(), b"abc".to_vec());
        assert!(reader.read_varlen_bytes().unwrap_err().is_corrupt_data());
    }
}
