//! User preference store
//!
//! Preferences are boolean-like string flags (`"1"` / `"0"`) keyed by id and
//! persisted as a flat JSON object. The console only relies on the
//! [`PreferenceSource`] contract; [`PreferenceStore`] is the file-backed
//! implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Animate regular-lane text one character at a time
pub const TYPING_ANIMATION: &str = "typinganimation";
/// Reject input containing blocked words
pub const FILTER_CHAT: &str = "filterchat";
/// Log handler failures quietly
pub const SILENCE_ERRORS: &str = "silenceerrors";
/// Play a keystroke sound while typing
pub const PLAY_KEYSTROKES: &str = "playkeystrokes";

/// Static description of a known preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preference {
    pub id: &'static str,
    pub display_name: &'static str,
    pub default: bool,
    pub tooltip: &'static str,
}

/// Every preference the console knows about
pub const PREFERENCES: &[Preference] = &[
    Preference {
        id: TYPING_ANIMATION,
        display_name: "Typing Animation",
        default: true,
        tooltip: "Print console output one character at a time",
    },
    Preference {
        id: FILTER_CHAT,
        display_name: "Filter Chat",
        default: true,
        tooltip: "Refuse input containing blocked words",
    },
    Preference {
        id: SILENCE_ERRORS,
        display_name: "Silence Errors",
        default: false,
        tooltip: "Log command failures at debug level only",
    },
    Preference {
        id: PLAY_KEYSTROKES,
        display_name: "Typing Sound",
        default: true,
        tooltip: "Play a keystroke sound during the typing animation",
    },
    Preference {
        id: "roundedwindows",
        display_name: "Rounded Windows",
        default: false,
        tooltip: "Round the corners of widget frames",
    },
    Preference {
        id: "showseconds",
        display_name: "Show Seconds",
        default: false,
        tooltip: "Include seconds when printing the time",
    },
];

/// Look up a preference by id or display name, ignoring case and spaces
pub fn find_preference(name: &str) -> Option<&'static Preference> {
    let wanted: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    PREFERENCES.iter().find(|pref| {
        pref.id == wanted
            || pref
                .display_name
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_lowercase()
                == wanted
    })
}

/// Interpret a boolean-like string flag
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

/// Read access to user preferences
pub trait PreferenceSource: Send + Sync {
    /// Raw string value of a preference
    fn get(&self, id: &str) -> Option<String>;

    /// Boolean reading of a preference; unknown ids read as `false`
    fn get_bool(&self, id: &str) -> bool {
        self.get(id).map(|v| is_truthy(&v)).unwrap_or(false)
    }
}

/// File-backed preference store
#[derive(Debug)]
pub struct PreferenceStore {
    values: RwLock<BTreeMap<String, String>>,
    path: Option<PathBuf>,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl PreferenceStore {
    /// Store holding the defaults, never written to disk
    pub fn in_memory() -> Self {
        Self {
            values: RwLock::new(Self::defaults()),
            path: None,
        }
    }

    /// Load preferences from a JSON file; missing entries take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let mut values = Self::defaults();
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let stored: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)?;
            for (id, value) in stored {
                let value = match value {
                    serde_json::Value::Bool(b) => flag(b),
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                values.insert(id, value);
            }
            debug!("Loaded {} preferences from {}", values.len(), path.display());
        } else {
            debug!("No preference file at {}, using defaults", path.display());
        }

        Ok(Self {
            values: RwLock::new(values),
            path: Some(path.to_path_buf()),
        })
    }

    fn defaults() -> BTreeMap<String, String> {
        PREFERENCES
            .iter()
            .map(|pref| (pref.id.to_string(), flag(pref.default)))
            .collect()
    }

    /// Set a preference and persist the store
    pub fn set_bool(&self, id: &str, value: bool) -> Result<()> {
        self.values
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.to_string(), flag(value));
        self.save()
    }

    /// Flip a known preference, returning the preference and its new value
    pub fn toggle(&self, name: &str) -> Result<(&'static Preference, bool)> {
        let pref = find_preference(name).ok_or_else(|| Error::PreferenceNotFound {
            name: name.to_string(),
        })?;
        let new_value = !self.get_bool(pref.id);
        self.set_bool(pref.id, new_value)?;
        Ok((pref, new_value))
    }

    /// Snapshot of every stored value
    pub fn entries(&self) -> Vec<(String, String)> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Persist to the backing file, if any
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let snapshot = self.values.read().unwrap_or_else(|e| e.into_inner()).clone();
        let content = serde_json::to_string_pretty(&snapshot)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::PreferenceSaveFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        }
        fs::write(path, content).map_err(|e| {
            warn!("Could not write preferences: {}", e);
            Error::PreferenceSaveFailed {
                path: path.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl PreferenceSource for PreferenceStore {
    fn get(&self, id: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }
}
