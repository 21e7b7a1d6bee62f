//! Output Redirection
//!
//! Diverts one command's output to a file instead of the console. The open
//! file sits behind its own mutex, separate from the printing queue's, and
//! is dropped at the start of every new command.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::command::validate_redirect_target;
use crate::models::Printable;

#[derive(Debug)]
struct RedirectFile {
    path: PathBuf,
    file: File,
}

/// Redirection state for a console session
#[derive(Debug)]
pub struct Redirector {
    directory: PathBuf,
    target: Mutex<Option<RedirectFile>>,
}

impl Redirector {
    /// Redirector creating its files inside `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            target: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<RedirectFile>> {
        self.target.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Start diverting output to a fresh file named `name`
    pub fn begin(&self, name: &str) -> Result<PathBuf> {
        validate_redirect_target(name)?;

        fs::create_dir_all(&self.directory).map_err(|e| Error::RedirectFailed {
            path: self.directory.clone(),
            reason: e.to_string(),
        })?;

        let path = self.directory.join(name);
        let file = File::create(&path).map_err(|e| Error::RedirectFailed {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        info!("Redirecting output to {}", path.display());
        *self.lock() = Some(RedirectFile {
            path: path.clone(),
            file,
        });
        Ok(path)
    }

    /// Stop redirecting; later output goes to the console again
    pub fn reset(&self) {
        if let Some(previous) = self.lock().take() {
            debug!("Closed redirection file {}", previous.path.display());
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    /// Current redirection file, if any
    pub fn path(&self) -> Option<PathBuf> {
        self.lock().as_ref().map(|target| target.path.clone())
    }

    /// Write an item to the redirection file.
    ///
    /// Returns `Ok(false)` without writing when no redirection is active, so
    /// the check and the write happen under one lock acquisition.
    pub fn write(&self, item: &Printable) -> Result<bool> {
        let mut guard = self.lock();
        let Some(target) = guard.as_mut() else {
            return Ok(false);
        };
        target
            .file
            .write_all(item.to_string().as_bytes())
            .map_err(|e| Error::RedirectFailed {
                path: target.path.clone(),
                reason: e.to_string(),
            })?;
        Ok(true)
    }
}
