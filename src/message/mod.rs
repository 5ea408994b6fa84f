#![doc = r#"
Channel messages carried by track events
"#]

mod channel;
pub use channel::*;
