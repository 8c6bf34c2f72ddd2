//! Reference screenshots the classifier and navigator look for.

use serde::{Deserialize, Serialize};

/// Handle to one reference image in the asset directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    PushButtonToStart,
    OnlineFocused,
    OnlineNotFocused,
    CustomFocused,
    CustomNotFocused,
    SpectateFocused,
    SpectateNotFocused,
    EnterKey,
    ConnectingToCustom,
}

impl TemplateId {
    pub const ALL: [TemplateId; 9] = [
        TemplateId::PushButtonToStart,
        TemplateId::OnlineFocused,
        TemplateId::OnlineNotFocused,
        TemplateId::CustomFocused,
        TemplateId::CustomNotFocused,
        TemplateId::SpectateFocused,
        TemplateId::SpectateNotFocused,
        TemplateId::EnterKey,
        TemplateId::ConnectingToCustom,
    ];

    /// File name under the asset directory
    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateId::PushButtonToStart => "KQB000-push-button-to-start.png",
            TemplateId::OnlineFocused => "KQB001a-online-focused.png",
            TemplateId::OnlineNotFocused => "KQB001b-online-not-focused.png",
            TemplateId::CustomFocused => "KQB002a-custom-focused.png",
            TemplateId::CustomNotFocused => "KQB002b-custom-not-focused.png",
            TemplateId::SpectateFocused => "KQB003a-spectate-focused.png",
            TemplateId::SpectateNotFocused => "KQB003b-spectate-not-focused.png",
            TemplateId::EnterKey => "KQB004-enter-key.png",
            TemplateId::ConnectingToCustom => "KQB005-connecting-to-custom.png",
        }
    }
}
