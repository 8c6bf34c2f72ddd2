//! Keyboard input
//!
//! - `Key`: the fixed key vocabulary
//! - `KeySink`: raw keystroke injection (desktop: enigo)
//! - `InputDriver`: pacing, bursts and text typing on top of a sink

mod driver;
mod keys;

pub use driver::{InputDriver, KeySink};
pub use keys::Key;
