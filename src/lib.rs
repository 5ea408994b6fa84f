#![doc = r#"
Read, edit and write Standard MIDI Files.

A file is loaded into a [`Sequence`]: an owned, mutable list of [`Track`]s, each an
ordered list of [`TrackEvent`]s. Every field is checked when it is set, so a sequence
that was built without errors can always be written back out.

# Example
```rust
use midiseq::prelude::*;

let mut sequence = Sequence::new(Format::Simultaneous, Division::ticks_per_quarter_note(96)?);

let mut track = Track::new();
track.push(TrackEvent::new(0, MetaEvent::Tempo(Tempo::new(500_000)?))?);
for name in ["C4", "E4", "G4"] {
    track.extend(ChannelVoiceMessage::complete_note(0, Channel::One, name, 100, 96)?);
}
track.push(TrackEvent::end_of_track(DeltaTime::ZERO));
sequence.add_track(track);

let mut higher = sequence.clone();
higher.transpose(5)?;

let bytes = higher.to_bytes()?;
let read = Sequence::open(&bytes[..])?;
assert_eq!(read, higher);
assert_ne!(read, sequence);
# Ok::<(), midiseq::Error>(())
```

# Features
- `strict`: reject track chunks that end early or have no end of track event, instead
  of reading them as far as they go.
- `serde`: derive `Serialize` and `Deserialize` for the model.

Irregularities the reader tolerates are reported through [`tracing`].
"#]
#![warn(missing_docs)]

mod byte;
pub use byte::*;

mod error;
pub use error::*;

pub mod varlen;

pub mod reader;

mod note;
pub use note::*;

pub mod file;
pub use file::*;

pub mod event;
pub use event::*;

pub mod message;
pub use message::*;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        byte::*,
        error::*,
        event::*,
        file::*,
        message::*,
        note::*,
    };
}
