//! Error types for kqbnav
//!
//! "Template not on screen" is never an error: matchers return
//! [`MatchResult::NotFound`](crate::screen::MatchResult) and the navigator
//! reports an exhausted budget as [`NavOutcome::TimedOut`](crate::nav::NavOutcome).
//! Everything here is either a caller mistake or a fault.

use std::path::PathBuf;
use std::time::Duration;

use crate::screen::TemplateId;
use crate::types::LogicalScreen;

/// Navigation errors
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("Spectate code invalid, should be alphanumeric and 6 chars long: {0:?}")]
    InvalidCode(String),

    #[error("{0:?} is not a valid navigation target")]
    InvalidTarget(LogicalScreen),

    #[error("Unknown key name: {0:?}")]
    UnknownKey(String),

    #[error("Template {0:?} registered more than once")]
    DuplicateTemplate(TemplateId),

    #[error("Invalid name pattern: {0}")]
    InvalidPattern(String),

    #[error("Failed to launch application: {0}")]
    LaunchFailure(String),

    #[error("Cannot navigate from {from:?} to {to:?}")]
    IllegalTransition {
        from: LogicalScreen,
        to: LogicalScreen,
    },

    #[error("Timed out after {budget:?} navigating to {target:?} (last seen {last_seen:?})")]
    NavigationTimeout {
        target: LogicalScreen,
        last_seen: LogicalScreen,
        budget: Duration,
    },

    #[error("Failed to load template {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Screen capture failed: {0}")]
    Capture(String),

    #[error("Input injection failed: {0}")]
    Input(String),

    #[error("Window operation failed: {0}")]
    Window(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NavError {
    /// Caller mistakes that are surfaced immediately and never retried
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NavError::InvalidCode(_)
                | NavError::InvalidTarget(_)
                | NavError::UnknownKey(_)
                | NavError::DuplicateTemplate(_)
                | NavError::InvalidPattern(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
