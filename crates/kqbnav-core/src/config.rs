//! Runtime configuration
//!
//! Loaded from `$KQBNAV_HOME/config.yaml` (default `~/.kqbnav/config.yaml`).
//! A missing or broken file falls back to the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::Result;
use crate::input::Key;

/// Convert float seconds from the config file; negative or non-finite values become zero
pub(crate) fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

/// Smallest accepted confidence step
pub const MIN_CONFIDENCE_STEP: f32 = 0.001;

/// Screen classifier tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub start_confidence: f32,
    pub min_confidence: f32,
    pub confidence_step: f32,
    pub poll_interval_secs: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            start_confidence: 1.0,
            min_confidence: 0.7,
            confidence_step: 0.05,
            poll_interval_secs: 0.5,
        }
    }
}

impl ClassifierConfig {
    pub fn poll_interval(&self) -> Duration {
        secs(self.poll_interval_secs)
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !(self.confidence_step >= MIN_CONFIDENCE_STEP) {
            problems.push(format!("confidence_step must be at least {}", MIN_CONFIDENCE_STEP));
        }
        if !(self.min_confidence >= 0.0 && self.start_confidence <= 1.0) {
            problems.push("confidences must lie in [0, 1]".to_string());
        }
        if !(self.start_confidence > self.min_confidence) {
            problems.push("start_confidence must exceed min_confidence".to_string());
        }
        problems
    }
}

/// Navigator tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Total time budget for one navigation
    pub budget_secs: f64,
    /// Back-off slept (and charged to the budget) on every non-advancing iteration
    pub poll_interval_secs: f64,
    /// Confidence used when checking a "focused" menu template
    pub focus_confidence: f32,
    /// Presses per direction when resetting the menu cursor
    pub cursor_reset_presses: u32,
    /// Presses in an escape burst
    pub burst_presses: u32,
    pub burst_interval_secs: f64,
    pub confirm_key: Key,
    /// Confirms allowed in a row without charging the budget
    pub max_maneuvers: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            budget_secs: 30.0,
            poll_interval_secs: 0.5,
            focus_confidence: 0.8,
            cursor_reset_presses: 10,
            burst_presses: 10,
            burst_interval_secs: 0.05,
            confirm_key: Key::Enter,
            max_maneuvers: 32,
        }
    }
}

impl NavigationConfig {
    pub fn budget(&self) -> Duration {
        secs(self.budget_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        secs(self.poll_interval_secs)
    }

    pub fn burst_interval(&self) -> Duration {
        secs(self.burst_interval_secs)
    }

    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !(self.poll_interval_secs > 0.0) {
            problems.push("poll_interval_secs must be positive".to_string());
        }
        if !(self.budget_secs >= 0.0) {
            problems.push("budget_secs must not be negative".to_string());
        }
        if self.max_maneuvers == 0 {
            problems.push("max_maneuvers must be at least 1".to_string());
        }
        if self.cursor_reset_presses == 0 {
            problems.push("cursor_reset_presses must be at least 1".to_string());
        }
        problems
    }
}

/// Application launch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// How long to wait for the process to appear (or exit) per attempt
    pub startup_timeout_secs: f64,
    pub poll_interval_secs: f64,
    /// Launch retries after the first attempt
    pub max_retries: u32,
    /// Close an already running client and start a fresh one
    pub restart_if_running: bool,
    /// Delay between the keys that open the start menu
    pub launch_key_interval_secs: f64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            startup_timeout_secs: 10.0,
            poll_interval_secs: 0.5,
            max_retries: 3,
            restart_if_running: false,
            launch_key_interval_secs: 0.5,
        }
    }
}

impl LaunchConfig {
    pub fn startup_timeout(&self) -> Duration {
        secs(self.startup_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        secs(self.poll_interval_secs)
    }

    pub fn launch_key_interval(&self) -> Duration {
        secs(self.launch_key_interval_secs)
    }
}

/// Code entry field editing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Backspaces issued to clear the placeholder
    pub clear_presses: u32,
    pub per_char_delay_secs: f64,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            clear_presses: 6,
            per_char_delay_secs: 0.05,
        }
    }
}

impl EntryConfig {
    pub fn per_char_delay(&self) -> Duration {
        secs(self.per_char_delay_secs)
    }
}

/// kqbnav configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Case-insensitive regex matched against process names and window titles
    pub process_name: String,
    /// Text typed into the start menu search to launch the game
    pub launch_query: String,
    /// Directory holding the reference screenshots
    pub asset_dir: PathBuf,
    /// Delay applied after every synthetic keystroke
    pub key_pacing_secs: f64,
    pub classifier: ClassifierConfig,
    pub navigation: NavigationConfig,
    pub launch: LaunchConfig,
    pub entry: EntryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            process_name: "killer queen black".to_string(),
            launch_query: "killer queen black".to_string(),
            asset_dir: PathBuf::from("KQB Screenshots"),
            key_pacing_secs: 0.1,
            classifier: ClassifierConfig::default(),
            navigation: NavigationConfig::default(),
            launch: LaunchConfig::default(),
            entry: EntryConfig::default(),
        }
    }
}

impl Config {
    /// kqbnav home directory
    pub fn home() -> PathBuf {
        if let Ok(home) = std::env::var("KQBNAV_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .map(|h| h.join(".kqbnav"))
            .unwrap_or_else(|| PathBuf::from(".kqbnav"))
    }

    pub fn default_path() -> PathBuf {
        Self::home().join("config.yaml")
    }

    /// Load configuration from file, falling back to defaults
    pub fn load(path: &Path) -> Config {
        if !path.exists() {
            info!(path = ?path, "No config found, using defaults");
            return Config::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Config>(&content) {
                Ok(config) => {
                    info!(path = ?path, "Config loaded");
                    config.sanitized()
                }
                Err(e) => {
                    error!(error = %e, path = ?path, "Failed to parse config");
                    Config::default()
                }
            },
            Err(e) => {
                error!(error = %e, path = ?path, "Failed to read config");
                Config::default()
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        info!(path = ?path, "Config saved");
        Ok(())
    }

    pub fn key_pacing(&self) -> Duration {
        secs(self.key_pacing_secs)
    }

    /// Replace sections whose values cannot work with their defaults
    fn sanitized(mut self) -> Self {
        let problems = self.classifier.problems();
        if !problems.is_empty() {
            warn!(?problems, "Invalid classifier config, using defaults");
            self.classifier = ClassifierConfig::default();
        }
        let problems = self.navigation.problems();
        if !problems.is_empty() {
            warn!(?problems, "Invalid navigation config, using defaults");
            self.navigation = NavigationConfig::default();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.yaml"));
        assert_eq!(config, Config::default());
        assert_eq!(config.navigation.budget(), Duration::from_secs(30));
        assert_eq!(config.key_pacing(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
asset_dir: /opt/kqb/templates
navigation:
  budget_secs: 45
  confirm_key: space
launch:
  restart_if_running: true
"#,
        )
        .unwrap();

        let config = Config::load(&path);
        assert_eq!(config.asset_dir, PathBuf::from("/opt/kqb/templates"));
        assert_eq!(config.navigation.budget(), Duration::from_secs(45));
        assert_eq!(config.navigation.confirm_key, Key::Space);
        assert_eq!(config.navigation.burst_presses, 10);
        assert!(config.launch.restart_if_running);
        assert_eq!(config.launch.max_retries, 3);
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_unknown_key_name_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "navigation:\n  confirm_key: hyperspace\n").unwrap();

        let config = Config::load(&path);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_classifier_section_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "process_name: kqb\nclassifier:\n  start_confidence: 0.6\n  min_confidence: 0.7\n",
        )
        .unwrap();

        let config = Config::load(&path);
        assert_eq!(config.process_name, "kqb");
        assert_eq!(config.classifier, ClassifierConfig::default());
    }

    #[test]
    fn test_tiny_confidence_step_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "classifier:\n  confidence_step: 0.0000000001\n").unwrap();

        let config = Config::load(&path);
        assert_eq!(config.classifier, ClassifierConfig::default());

        std::fs::write(&path, "classifier:\n  confidence_step: 0.001\n").unwrap();
        assert_eq!(Config::load(&path).classifier.confidence_step, MIN_CONFIDENCE_STEP);
    }

    #[test]
    fn test_zero_counts_in_navigation_replaced() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        for yaml in [
            "navigation:\n  budget_secs: 12\n  max_maneuvers: 0\n",
            "navigation:\n  budget_secs: 12\n  cursor_reset_presses: 0\n",
        ] {
            std::fs::write(&path, yaml).unwrap();
            let config = Config::load(&path);
            assert_eq!(config.navigation, NavigationConfig::default(), "{yaml}");
        }
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let mut config = Config::default();
        config.entry.clear_presses = 8;
        config.navigation.confirm_key = Key::Space;
        config.process_name = r"kqb|killer\s*queen".to_string();
        config.launch_query = "kqb".to_string();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path), config);
    }

    #[test]
    fn test_negative_seconds_clamp_to_zero() {
        assert_eq!(secs(-1.0), Duration::ZERO);
        assert_eq!(secs(f64::NAN), Duration::ZERO);
        assert_eq!(secs(0.25), Duration::from_millis(250));
    }
}
