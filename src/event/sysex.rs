use crate::{Result, file::meta::write_hex, reader::Reader, varlen};
use core::fmt;
use std::io::Read;

/// The two ways a system exclusive packet is introduced in a track.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SysExKind {
    /// A packet starting with `0xF0`
    #[default]
    Normal,
    /// An escape (`0xF7`): a continuation packet, or bytes sent as-is
    Escape,
}

impl SysExKind {
    /// The status byte introducing the packet
    pub const fn status(self) -> u8 {
        match self {
            Self::Normal => 0xF0,
            Self::Escape => 0xF7,
        }
    }
}

#[doc = r#"
A system exclusive event: a status byte, a variable length quantity and that many
raw bytes.

```text
F0 <varlen length> <bytes>
F7 <varlen length> <bytes>
```
"#]
#[derive(Clone, PartialEq, Eq, Debug, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SysExEvent {
    kind: SysExKind,
    data: Vec<u8>,
}

impl SysExEvent {
    /// A normal (`0xF0`) packet
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self::with_kind(SysExKind::Normal, data)
    }

    /// A packet of the given kind
    pub fn with_kind(kind: SysExKind, data: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            data: data.into(),
        }
    }

    /// How the packet is introduced
    pub const fn kind(&self) -> SysExKind {
        self.kind
    }

    /// The bytes following the length prefix
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the payload
    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    pub(crate) fn read<R: Read>(kind: SysExKind, reader: &mut Reader<R>) -> Result<Self> {
        let data = reader.read_varlen_bytes()?;
        Ok(Self { kind, data })
    }

    pub(crate) fn write(&self, out: &mut Vec<u8>) -> Result<()> {
        out.push(self.kind.status());
        varlen::write(self.data.len() as u64, out)?;
        out.extend_from_slice(&self.data);
        Ok(())
    }
}

impl fmt::Display for SysExEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.data)
    }
}

#[test]
fn escape_packets_keep_their_status() {
    use pretty_assertions::assert_eq;
    let escape = SysExEvent::with_kind(SysExKind::Escape, [0xF3, 0x01]);
    let mut out = Vec::new();
    escape.write(&mut out).unwrap();
    assert_eq!(out, vec![0xF7, 0x02, 0xF3, 0x01]);

    let mut reader = Reader::new(&out[1..]);
    assert_eq!(SysExEvent::read(SysExKind::Escape, &mut reader).unwrap(), escape);
    assert_eq!(escape.to_string(), "F3 01");
}
