//! Desktop collaborators and the constructors that wire them together
//!
//! # Components
//! - `PrimaryMonitor`: xcap frame grabs
//! - `EnigoKeys`: enigo keystrokes
//! - `SysinfoProcesses`: sysinfo process table
//! - `NativeWindows`: Win32 windows (or none off Windows)

mod capture;
mod keyboard;
mod process;
mod window;

pub use capture::PrimaryMonitor;
pub use keyboard::EnigoKeys;
pub use process::SysinfoProcesses;
pub use window::NativeWindows;

use crate::config::Config;
use crate::error::Result;
use crate::input::InputDriver;
use crate::nav::Navigator;
use crate::screen::{ScreenClassifier, ScreenMatcher, TemplateRegistry, TemplateStore};
use crate::session::SessionController;

pub type DesktopMatcher = ScreenMatcher<PrimaryMonitor>;
pub type DesktopNavigator = Navigator<DesktopMatcher, EnigoKeys>;
pub type DesktopSession = SessionController<DesktopMatcher, EnigoKeys, SysinfoProcesses, NativeWindows>;

/// Navigator over the live screen and keyboard. Fails if any template asset is missing.
pub fn navigator(config: &Config) -> Result<DesktopNavigator> {
    let templates = TemplateStore::load(&config.asset_dir)?;
    let matcher = ScreenMatcher::new(PrimaryMonitor, templates, config.asset_dir.clone());
    let classifier = ScreenClassifier::new(matcher, TemplateRegistry::standard(), config.classifier.clone());
    let input = InputDriver::new(EnigoKeys::new()?, config.key_pacing());
    Ok(Navigator::new(classifier, input, config.navigation.clone()))
}

/// Full session controller for the local desktop
pub fn session(config: &Config) -> Result<DesktopSession> {
    SessionController::new(
        navigator(config)?,
        SysinfoProcesses::new(),
        NativeWindows::default(),
        config,
    )
}
