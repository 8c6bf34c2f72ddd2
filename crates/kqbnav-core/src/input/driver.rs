//! Paced keyboard input
//!
//! Every keystroke is followed by the global pacing delay so the game sees
//! discrete presses. Bursts use their own (shorter) interval between presses
//! and pay the pacing delay once at the end.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use super::Key;
use crate::error::Result;

/// Raw keystroke injection
pub trait KeySink {
    /// Press and release one key
    fn key(&mut self, key: Key) -> Result<()>;
}

/// Keyboard driver with pacing
pub struct InputDriver<K: KeySink> {
    sink: K,
    pacing: Duration,
}

impl<K: KeySink> InputDriver<K> {
    pub fn new(sink: K, pacing: Duration) -> Self {
        Self { sink, pacing }
    }

    pub fn pacing(&self) -> Duration {
        self.pacing
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Press one key
    pub async fn press(&mut self, key: Key) -> Result<()> {
        self.sink.key(key)?;
        debug!(key = %key, "press");
        sleep(self.pacing).await;
        Ok(())
    }

    /// Press `key` `times` times, `interval` apart
    pub async fn burst(&mut self, key: Key, times: u32, interval: Duration) -> Result<()> {
        for _ in 0..times {
            self.sink.key(key)?;
            sleep(interval).await;
        }
        debug!(key = %key, times, "burst");
        sleep(self.pacing).await;
        Ok(())
    }

    /// Dismiss dialogs / leave menus
    pub async fn escape_burst(&mut self, times: u32, interval: Duration) -> Result<()> {
        self.burst(Key::Esc, times, interval).await
    }

    /// Park the menu cursor on the bottom-left item
    pub async fn reset_cursor(&mut self, times: u32, interval: Duration) -> Result<()> {
        self.burst(Key::Left, times, interval).await?;
        self.burst(Key::Down, times, interval).await
    }

    /// Type text one character at a time
    pub async fn type_text(&mut self, text: &str, per_char: Duration) -> Result<()> {
        for c in text.chars() {
            self.sink.key(Key::for_char(c))?;
            sleep(per_char).await;
        }
        debug!(chars = text.chars().count(), "typed text");
        sleep(self.pacing).await;
        Ok(())
    }
}
