//! Core types for kqbnav

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::NavError;

// ============ Logical Screen ============

/// UI states the game client can be observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalScreen {
    /// Nothing recognised (transition frame, occlusion, unlisted layout)
    Unknown,
    /// "Push button to start" splash
    PressButton,
    /// Title menu, "Online" entry visible
    MainMenu,
    /// Online menu, "Custom" entry visible
    OnlineMenu,
    /// Custom match menu, "Spectate" entry visible
    CustomMenu,
    /// Spectate code dialog
    CodeEntry,
    /// "Connecting to custom match"
    Connecting,
}

impl LogicalScreen {
    pub const ALL: [LogicalScreen; 7] = [
        LogicalScreen::Unknown,
        LogicalScreen::PressButton,
        LogicalScreen::MainMenu,
        LogicalScreen::OnlineMenu,
        LogicalScreen::CustomMenu,
        LogicalScreen::CodeEntry,
        LogicalScreen::Connecting,
    ];

    /// Menu depth; `None` for `Unknown`
    pub fn depth(&self) -> Option<u8> {
        match self {
            LogicalScreen::Unknown => None,
            LogicalScreen::PressButton => Some(0),
            LogicalScreen::MainMenu => Some(1),
            LogicalScreen::OnlineMenu => Some(2),
            LogicalScreen::CustomMenu => Some(3),
            LogicalScreen::CodeEntry => Some(4),
            LogicalScreen::Connecting => Some(5),
        }
    }

    /// True if `self` lies further into the menus than `other`
    pub fn is_beyond(&self, other: LogicalScreen) -> bool {
        match (self.depth(), other.depth()) {
            (Some(a), Some(b)) => a > b,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalScreen::Unknown => "unknown",
            LogicalScreen::PressButton => "press_button",
            LogicalScreen::MainMenu => "main_menu",
            LogicalScreen::OnlineMenu => "online_menu",
            LogicalScreen::CustomMenu => "custom_menu",
            LogicalScreen::CodeEntry => "code_entry",
            LogicalScreen::Connecting => "connecting",
        }
    }
}

impl fmt::Display for LogicalScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalScreen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        LogicalScreen::ALL
            .into_iter()
            .find(|screen| screen.as_str() == normalized)
            .ok_or_else(|| format!("unknown screen: {}", s))
    }
}

// ============ Screen Position ============

/// Centre of a matched template, in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPosition {
    pub x: u32,
    pub y: u32,
}

// ============ Spectate Code ============

static SPECTATE_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{6}$").unwrap());

/// Six-character alphanumeric custom match code (case-insensitive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectateCode(String);

impl SpectateCode {
    /// Validate a user-supplied code. Surrounding whitespace is trimmed first.
    pub fn parse(input: &str) -> Result<Self, NavError> {
        let trimmed = input.trim();
        if !SPECTATE_CODE_PATTERN.is_match(trimmed) {
            return Err(NavError::InvalidCode(input.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpectateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
