//! Cyder - a console assistant driven by typed commands
//!
//! This library provides the command pipeline and the console output engine
//! behind the `cyder` binary.
//!
//! ## Module Organization
//!
//! ### Console
//!
//! - [`console`] - Printing queue, printing loop, background activities,
//!   output redirection and the output sink abstraction
//!
//! ### Command Handling
//!
//! - [`handler`] - Input pipeline, classifier cascade, built-in groups,
//!   math evaluation and unknown-command suggestions
//! - [`models`] - Parsed commands and printable items
//!
//! ### Support
//!
//! - [`config`] - Configuration loading and defaults
//! - [`preferences`] - User preference store
//! - [`collaborators`] - Widgets, frames, audio and URL opening
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cyder::collaborators::SystemCollaborators;
//! use cyder::console::{Console, StdoutSink};
//! use cyder::handler::InputHandler;
//! use cyder::models::InputSource;
//! use cyder::preferences::PreferenceStore;
//!
//! # async fn run() {
//! let config = cyder::default_config();
//! let console = Console::start(
//!     &config,
//!     Arc::new(PreferenceStore::in_memory()),
//!     Arc::new(SystemCollaborators),
//!     Box::new(StdoutSink::new()),
//! );
//! let mut handler = InputHandler::new(Arc::clone(console.shared()), &config);
//! handler.handle("hello", InputSource::User).await;
//! console.flush().await;
//! console.close().await;
//! # }
//! ```
//!
//! ## Architecture
//!
//! One tokio task per console drains the printing queue into the output
//! sink. Long-running commands run as named tokio tasks holding a
//! cancellation token; escape cancels them all and hurries the queue.

#[macro_use]
extern crate tracing;

pub mod collaborators;
pub mod config;
pub mod console;
pub mod error;
pub mod handler;
pub mod models;
pub mod preferences;

pub use config::loader::ConfigLoader;
pub use config::Config;
pub use console::Console;
pub use error::{Error, Result};
pub use handler::{HandleOutcome, InputHandler};

/// The current version of Cyder from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// The application description from Cargo.toml
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Load configuration from `path`, or from the search paths when `None`.
///
/// A missing or unreadable file falls back to defaults; only an explicit
/// path that fails to parse or validate is an error.
pub fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let config = ConfigLoader::load_from_path(path)?;
            info!("Configuration loaded from {}", path.display());
            Ok(config)
        }
        None => match ConfigLoader::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Failed to load configuration: {}. Using defaults", e);
                Ok(Config::default())
            }
        },
    }
}

/// Get default configuration
///
/// ```
/// let config = cyder::default_config();
/// assert_eq!(config.console.keystroke_interval, 2);
/// ```
pub fn default_config() -> Config {
    Config::default()
}

/// Human-readable explanation of a startup failure
pub fn handle_startup_error(error: &Error) -> String {
    match error {
        Error::ConfigLoadFailed { path, reason } => format!(
            "Configuration Error: Failed to load config from '{}': {}\n\nTry:\n• Check configuration file syntax\n• Ensure file permissions are correct",
            path.display(),
            reason
        ),
        Error::ConfigParseFailed { format, reason } => format!(
            "Configuration Error: Failed to parse {} config: {}\n\nTry:\n• Ensure the file is valid {}",
            format, reason, format
        ),
        Error::ConfigValidationFailed { field, reason } => format!(
            "Configuration Error: Validation failed for '{}': {}",
            field, reason
        ),
        Error::PreferenceSaveFailed { path, reason } => format!(
            "Preference Error: Could not write '{}': {}",
            path.display(),
            reason
        ),
        Error::Io(err) => format!(
            "I/O Error: {}\n\nTry:\n• Check file permissions\n• Ensure required directories exist",
            err
        ),
        _ => format!("Unexpected Error: {}", error),
    }
}
