//! Keystroke injection via enigo

use enigo::{Direction, Enigo, Keyboard, Settings};

use crate::error::{NavError, Result};
use crate::input::{Key, KeySink};

/// Sends key clicks to whatever window has focus
pub struct EnigoKeys {
    enigo: Enigo,
}

impl EnigoKeys {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default()).map_err(|e| NavError::Input(e.to_string()))?;
        Ok(Self { enigo })
    }
}

fn enigo_key(key: Key) -> enigo::Key {
    match key {
        Key::Esc => enigo::Key::Escape,
        Key::Tab => enigo::Key::Tab,
        Key::Enter => enigo::Key::Return,
        Key::Space => enigo::Key::Space,
        Key::Left => enigo::Key::LeftArrow,
        Key::Right => enigo::Key::RightArrow,
        Key::Up => enigo::Key::UpArrow,
        Key::Down => enigo::Key::DownArrow,
        Key::Backspace => enigo::Key::Backspace,
        Key::Delete => enigo::Key::Delete,
        Key::Win => enigo::Key::Meta,
        Key::Char(c) => enigo::Key::Unicode(c),
    }
}

impl KeySink for EnigoKeys {
    fn key(&mut self, key: Key) -> Result<()> {
        self.enigo
            .key(enigo_key(key), Direction::Click)
            .map_err(|e| NavError::Input(format!("{key}: {e}")))
    }
}
