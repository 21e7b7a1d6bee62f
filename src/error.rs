//! Error types and Result aliases for Cyder

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Cyder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Cyder
#[derive(Debug, Error)]
pub enum Error {
    // === Command errors ===
    /// Malformed arguments for a command
    #[error("Usage: {usage}")]
    Usage { usage: String },

    /// Arithmetic or single-function evaluation failed
    #[error("Could not evaluate '{expression}': {reason}")]
    Math { expression: String, reason: String },

    // === Redirection errors ===
    /// Redirection file name is not syntactically valid
    #[error("Invalid redirection target '{name}': {reason}")]
    InvalidRedirectTarget { name: String, reason: String },

    /// Failed to open or write the redirection file
    #[error("Redirection to '{}' failed: {reason}", path.display())]
    RedirectFailed { path: PathBuf, reason: String },

    // === Preference errors ===
    /// No preference with the given id or display name
    #[error("Preference '{name}' not found")]
    PreferenceNotFound { name: String },

    /// Failed to persist preferences
    #[error("Failed to save preferences to '{}': {reason}", path.display())]
    PreferenceSaveFailed { path: PathBuf, reason: String },

    // === Configuration errors ===
    /// Failed to load configuration file
    #[error("Failed to load config from '{}': {reason}", path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Configuration file not found
    #[error("Configuration file not found")]
    ConfigNotFound,

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Failed to parse configuration
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    // === I/O and serialization errors ===
    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Regex compilation errors
    #[error("Regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}

impl Error {
    /// Build a usage error from a usage string
    pub fn usage(usage: impl Into<String>) -> Self {
        Error::Usage {
            usage: usage.into(),
        }
    }
}
