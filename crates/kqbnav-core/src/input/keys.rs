//! Key vocabulary
//!
//! Names follow the usual automation spelling (`esc`, `left`, `enter`, ...).
//! Anything outside the vocabulary is rejected instead of silently ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NavError;

/// A key the input driver can press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    Esc,
    Tab,
    Enter,
    Space,
    Left,
    Right,
    Up,
    Down,
    Backspace,
    Delete,
    /// Windows / super key
    Win,
    /// Printable character
    Char(char),
}

const KEY_NAMES: &[(&str, Key)] = &[
    ("esc", Key::Esc),
    ("escape", Key::Esc),
    ("tab", Key::Tab),
    ("enter", Key::Enter),
    ("return", Key::Enter),
    ("space", Key::Space),
    ("left", Key::Left),
    ("right", Key::Right),
    ("up", Key::Up),
    ("down", Key::Down),
    ("backspace", Key::Backspace),
    ("delete", Key::Delete),
    ("del", Key::Delete),
    ("win", Key::Win),
    ("winleft", Key::Win),
];

impl Key {
    /// Key that types `c`
    pub fn for_char(c: char) -> Key {
        match c {
            ' ' => Key::Space,
            '\t' => Key::Tab,
            '\n' => Key::Enter,
            c => Key::Char(c),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            key => KEY_NAMES
                .iter()
                .find(|(_, k)| k == key)
                .map(|(name, _)| name.to_string())
                .unwrap_or_default(),
        }
    }
}

impl FromStr for Key {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphanumeric() {
                return Ok(Key::Char(c));
            }
            if c == ' ' {
                return Ok(Key::Space);
            }
        }

        let lower = s.trim().to_ascii_lowercase();
        KEY_NAMES
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, key)| *key)
            .ok_or_else(|| NavError::UnknownKey(s.to_string()))
    }
}

impl TryFrom<String> for Key {
    type Error = NavError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.name()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
