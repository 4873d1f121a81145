//! Wire events for agent run streams and their decoder.
//!
//! The remote channel delivers a sequence of loosely-typed `(event, data)`
//! frames. Everything past [`decode`] works on the closed [`StreamEvent`]
//! union, so unknown wire shapes cannot leak further into the system.

mod decode;
mod event;

pub use {
    decode::decode,
    event::{RawRunEvent, StreamEvent, wire},
};
