//! Host OS collaborators: process table and top-level windows.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::error::{NavError, Result};

/// Case-insensitive, unanchored name matcher for process names and window titles
#[derive(Debug, Clone)]
pub struct NamePattern {
    pattern: String,
    regex: Regex,
}

impl NamePattern {
    /// `pattern` is a regular expression; plain names match as substrings
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| NavError::InvalidPattern(e.to_string()))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

/// Opaque top-level window handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

/// Process discovery
pub trait ProcessTable {
    /// True if any running process name matches
    fn is_running(&mut self, pattern: &NamePattern) -> bool;
}

/// Top-level window management
pub trait WindowSystem {
    fn windows(&self) -> Result<Vec<WindowHandle>>;
    fn title(&self, handle: WindowHandle) -> String;
    fn foreground(&self) -> Option<WindowHandle>;
    fn set_foreground(&mut self, handle: WindowHandle) -> Result<()>;
    fn close(&mut self, handle: WindowHandle) -> Result<()>;
}

/// Windows whose title matches, in enumeration order
pub fn matching_windows<W: WindowSystem>(windows: &W, pattern: &NamePattern) -> Result<Vec<WindowHandle>> {
    Ok(windows
        .windows()?
        .into_iter()
        .filter(|&handle| {
            let title = windows.title(handle);
            !title.is_empty() && pattern.is_match(&title)
        })
        .collect())
}

/// Bring every matching window to the foreground, then report whether the
/// foreground window matches. Hosts that cannot report the foreground window
/// count as focused when at least one window was raised.
pub fn focus_matching<W: WindowSystem>(windows: &mut W, pattern: &NamePattern) -> Result<bool> {
    let handles = matching_windows(windows, pattern)?;
    for &handle in &handles {
        debug!(handle = handle.0, title = %windows.title(handle), "Raising window");
        windows.set_foreground(handle)?;
    }

    Ok(match windows.foreground() {
        Some(handle) => pattern.is_match(&windows.title(handle)),
        None => !handles.is_empty(),
    })
}
