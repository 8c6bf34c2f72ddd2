//! kqbnav-core - screen-recognition driven navigation for the Killer Queen Black client
//!
//! Drives an un-instrumented game client into a spectate lobby purely by
//! matching reference screenshots against the live screen and injecting
//! keystrokes.
//!
//! # Architecture
//!
//! `SessionController` → `Navigator` → `ScreenClassifier` → `TemplateMatcher`,
//! with results flowing back up as plain enums. Everything runs sequentially
//! on one task; every wait is an explicit `tokio::time::sleep`.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use kqbnav_core::{desktop, Config};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> kqbnav_core::Result<()> {
//!     let config = Config::load(&Config::default_path());
//!     let mut session = desktop::session(&config)?;
//!     session
//!         .join_spectate("ab12cd", Duration::from_secs(30), Duration::from_millis(500))
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod desktop;
pub mod error;
pub mod host;
pub mod input;
pub mod nav;
pub mod screen;
pub mod session;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::{NavError, Result};
pub use nav::{NavOutcome, NavigationBudget, Navigator};
pub use screen::{Classification, ScreenClassifier, TemplateId, TemplateRegistry};
pub use session::SessionController;
pub use types::{LogicalScreen, ScreenPosition, SpectateCode};
