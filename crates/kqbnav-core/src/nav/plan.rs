//! Transition table: which maneuver moves `current` toward `target`

use crate::error::{NavError, Result};
use crate::screen::TemplateId;
use crate::types::LogicalScreen;

/// One navigator step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Already there
    Arrived,
    /// Transient frame; re-classify after a back-off
    Wait,
    /// Escape burst toward the main menu
    BackOut,
    /// Land focus on the item leading deeper, confirming once `focus` is visible
    Advance(TemplateId),
}

/// Pick the maneuver for one iteration.
///
/// `PressButton` can only be left through the launch sequence, so it is
/// illegal both as a source and as a target.
pub fn plan(current: LogicalScreen, target: LogicalScreen) -> Result<Step> {
    if current == target {
        return Ok(Step::Arrived);
    }
    if target == LogicalScreen::Unknown {
        return Err(NavError::InvalidTarget(target));
    }
    if target == LogicalScreen::PressButton || current == LogicalScreen::PressButton {
        return Err(NavError::IllegalTransition {
            from: current,
            to: target,
        });
    }

    if current == LogicalScreen::Unknown {
        return Ok(Step::Wait);
    }
    if !target.is_beyond(current) {
        return Ok(Step::BackOut);
    }

    let focus = match current {
        LogicalScreen::MainMenu => TemplateId::OnlineFocused,
        LogicalScreen::OnlineMenu => TemplateId::CustomFocused,
        LogicalScreen::CustomMenu => TemplateId::SpectateFocused,
        LogicalScreen::CodeEntry => TemplateId::EnterKey,
        // Connecting is the deepest screen; nothing lies beyond it
        _ => return Ok(Step::BackOut),
    };
    Ok(Step::Advance(focus))
}
