//! Configuration management for Cyder
//!
//! Console timing, suggestion tuning, data paths and the chat filter word
//! list. Loaded from TOML or JSON by [`loader::ConfigLoader`], falling back to
//! defaults when no file exists.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Main configuration structure for Cyder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Printing loop timing
    pub console: ConsoleConfig,

    /// Unknown-command suggestion tuning
    pub suggestion: SuggestionConfig,

    /// Data locations
    pub paths: PathsConfig,

    /// Chat filter
    pub filter: FilterConfig,
}

impl Config {
    /// Check values that would make the console misbehave
    pub fn validate(&self) -> Result<()> {
        if self.console.keystroke_interval == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "console.keystroke_interval".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.console.line_interval_ms == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "console.line_interval_ms".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.suggestion.threshold) {
            return Err(Error::ConfigValidationFailed {
                field: "suggestion.threshold".to_string(),
                reason: format!("{} is outside 0.0..=1.0", self.suggestion.threshold),
            });
        }
        Ok(())
    }
}

/// Printing loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Delay between characters of regular-lane text when typing is animated
    pub char_delay_ms: u64,

    /// Delay between characters of priority-lane text
    pub priority_char_delay_ms: u64,

    /// Idle wait when both lanes are empty
    pub line_interval_ms: u64,

    /// Play a keystroke sound every this many typed characters
    pub keystroke_interval: usize,

    /// How often the typing animation preference is re-read
    pub preference_refresh_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            char_delay_ms: 12,
            priority_char_delay_ms: 2,
            line_interval_ms: 100,
            keystroke_interval: 2,
            preference_refresh_secs: 3,
        }
    }
}

impl ConsoleConfig {
    /// Configuration with every delay removed, used by tests
    pub fn instant() -> Self {
        Self {
            char_delay_ms: 0,
            priority_char_delay_ms: 0,
            line_interval_ms: 5,
            ..Self::default()
        }
    }

    /// Drop the per-character delays, keeping every other setting
    pub fn disable_typing(&mut self) {
        self.char_delay_ms = 0;
        self.priority_char_delay_ms = 0;
    }

    pub fn char_delay(&self) -> Duration {
        Duration::from_millis(self.char_delay_ms)
    }

    pub fn priority_char_delay(&self) -> Duration {
        Duration::from_millis(self.priority_char_delay_ms)
    }

    pub fn line_interval(&self) -> Duration {
        Duration::from_millis(self.line_interval_ms)
    }

    pub fn preference_refresh(&self) -> Duration {
        Duration::from_secs(self.preference_refresh_secs)
    }
}

/// Unknown-command suggestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// Minimum Jaro-Winkler similarity before a suggestion is shown
    pub threshold: f64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self { threshold: 0.80 }
    }
}

/// Data locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// JSON preference store
    pub preferences_file: PathBuf,

    /// Directory redirected command output is written to
    pub redirect_dir: PathBuf,

    /// Directory holding log files
    pub log_dir: PathBuf,

    /// Directory holding per-user data
    pub users_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        let base = default_data_dir();
        Self {
            preferences_file: base.join("preferences.json"),
            redirect_dir: base.join("files"),
            log_dir: base.join("logs"),
            users_dir: base.join("users"),
        }
    }
}

impl PathsConfig {
    /// Every path rooted under `base`
    pub fn rooted_at(base: &std::path::Path) -> Self {
        Self {
            preferences_file: base.join("preferences.json"),
            redirect_dir: base.join("files"),
            log_dir: base.join("logs"),
            users_dir: base.join("users"),
        }
    }
}

/// Chat filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Words rejected when the `filterchat` preference is on
    pub blocked_words: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blocked_words: ["fuck", "shit", "bitch", "bastard", "asshole", "dick", "cunt"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
        }
    }
}

/// Platform data directory for Cyder
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cyder")
}
