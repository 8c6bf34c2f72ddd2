//! Template registry
//!
//! Ordered (template → screen) pairs. Order is the tie-break when two
//! templates would match the same frame: the first entry wins.

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::TemplateId;
use crate::error::{NavError, Result};
use crate::types::LogicalScreen;

static STANDARD: Lazy<Arc<TemplateRegistry>> = Lazy::new(|| {
    Arc::new(TemplateRegistry {
        entries: vec![
            (TemplateId::PushButtonToStart, LogicalScreen::PressButton),
            (TemplateId::OnlineFocused, LogicalScreen::MainMenu),
            (TemplateId::OnlineNotFocused, LogicalScreen::MainMenu),
            (TemplateId::CustomFocused, LogicalScreen::OnlineMenu),
            (TemplateId::CustomNotFocused, LogicalScreen::OnlineMenu),
            (TemplateId::SpectateFocused, LogicalScreen::CustomMenu),
            (TemplateId::SpectateNotFocused, LogicalScreen::CustomMenu),
            (TemplateId::EnterKey, LogicalScreen::CodeEntry),
            (TemplateId::ConnectingToCustom, LogicalScreen::Connecting),
        ],
    })
});

/// Immutable ordered mapping from template to logical screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRegistry {
    entries: Vec<(TemplateId, LogicalScreen)>,
}

impl TemplateRegistry {
    /// Build a registry, rejecting templates that appear twice
    pub fn new(entries: Vec<(TemplateId, LogicalScreen)>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (template, _) in &entries {
            if !seen.insert(*template) {
                return Err(NavError::DuplicateTemplate(*template));
            }
        }
        Ok(Self { entries })
    }

    /// The game's menu templates, in priority order
    pub fn standard() -> Arc<TemplateRegistry> {
        Arc::clone(&STANDARD)
    }

    pub fn entries(&self) -> &[(TemplateId, LogicalScreen)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_covers_every_template() {
        let registry = TemplateRegistry::standard();
        assert_eq!(registry.len(), TemplateId::ALL.len());
        for template in TemplateId::ALL {
            assert!(registry.entries().iter().any(|(t, _)| *t == template), "{:?}", template);
        }
        let main_menu: Vec<TemplateId> = registry
            .entries()
            .iter()
            .filter(|(_, screen)| *screen == LogicalScreen::MainMenu)
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(main_menu, vec![TemplateId::OnlineFocused, TemplateId::OnlineNotFocused]);
        assert!(registry.entries().iter().all(|(_, screen)| *screen != LogicalScreen::Unknown));
    }

    #[test]
    fn test_duplicate_template_rejected() {
        let result = TemplateRegistry::new(vec![
            (TemplateId::EnterKey, LogicalScreen::CodeEntry),
            (TemplateId::EnterKey, LogicalScreen::Connecting),
        ]);
        assert!(matches!(
            result,
            Err(NavError::DuplicateTemplate(TemplateId::EnterKey))
        ));
    }

    #[test]
    fn test_standard_is_shared() {
        let a = TemplateRegistry::standard();
        let b = TemplateRegistry::standard();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
