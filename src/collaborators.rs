//! External collaborators
//!
//! Everything the command pipeline dispatches to but does not implement:
//! widget windows, frame placement, audio, the platform URL opener and the
//! video-id probe. The console core only sees the [`Collaborators`] trait.

use std::process::ExitStatus;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Screen positions a console frame can be moved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FramePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl FramePosition {
    pub fn label(self) -> &'static str {
        match self {
            FramePosition::TopLeft => "top left",
            FramePosition::TopRight => "top right",
            FramePosition::BottomLeft => "bottom left",
            FramePosition::BottomRight => "bottom right",
            FramePosition::Center => "center",
        }
    }
}

/// An RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

/// Out-of-process or out-of-scope behaviour the classifier dispatches to
#[async_trait]
pub trait Collaborators: Send + Sync {
    /// Open a widget window by registry name
    fn open_widget(&self, widget: &str) -> anyhow::Result<()>;

    /// Move the console frame
    fn move_frame(&self, position: FramePosition) -> anyhow::Result<()>;

    /// Change the console frame title
    fn set_frame_title(&self, title: &str) -> anyhow::Result<()>;

    /// Open a URL in the platform browser
    fn open_url(&self, url: &str) -> anyhow::Result<()>;

    /// Start playing an audio clip
    fn play_audio(&self, clip: &str) -> anyhow::Result<()>;

    /// Stop any playing audio
    fn stop_audio(&self);

    /// Short keystroke sound used by the typing animation
    fn play_keystroke(&self) {}

    /// Change the console background colour
    fn set_background(&self, color: Rgb) -> anyhow::Result<()>;

    /// Pixelate the console background with the given block size
    fn pixelate(&self, block_size: u32) -> anyhow::Result<()>;

    /// Check whether a video id resolves to a real video
    async fn probe_video(&self, id: &str) -> bool;
}

/// Headless collaborators for the terminal binary.
///
/// URLs are handed to the platform opener; everything else only exists in a
/// windowed front end, so it is logged.
#[derive(Debug, Default)]
pub struct SystemCollaborators;

impl SystemCollaborators {
    fn opener() -> (&'static str, &'static [&'static str]) {
        if cfg!(target_os = "macos") {
            ("open", &[])
        } else if cfg!(target_os = "windows") {
            ("rundll32", &["url.dll,FileProtocolHandler"])
        } else {
            ("xdg-open", &[])
        }
    }
}

/// Launch a helper program and wait for it in the background so it is
/// reaped once it exits.
///
/// Must be called from within a tokio runtime.
pub fn spawn_reaped(
    program: &str,
    args: &[&str],
) -> anyhow::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = Command::new(program).args(args).spawn()?;
    let program = program.to_string();
    Ok(tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => {
                if !status.success() {
                    warn!("{} exited with {}", program, status);
                }
                Some(status)
            }
            Err(e) => {
                warn!("Failed to wait for {}: {}", program, e);
                None
            }
        }
    }))
}

#[async_trait]
impl Collaborators for SystemCollaborators {
    fn open_widget(&self, widget: &str) -> anyhow::Result<()> {
        info!("Widget '{}' requested (no window system attached)", widget);
        Ok(())
    }

    fn move_frame(&self, position: FramePosition) -> anyhow::Result<()> {
        info!("Frame move to {} requested", position.label());
        Ok(())
    }

    fn set_frame_title(&self, title: &str) -> anyhow::Result<()> {
        info!("Frame title set to '{}'", title);
        Ok(())
    }

    fn open_url(&self, url: &str) -> anyhow::Result<()> {
        let (program, args) = Self::opener();
        debug!("Opening {} with {}", url, program);
        let mut argv: Vec<&str> = args.iter().copied().collect();
        argv.push(url);
        spawn_reaped(program, &argv)?;
        Ok(())
    }

    fn play_audio(&self, clip: &str) -> anyhow::Result<()> {
        info!("Audio clip '{}' requested (no audio device attached)", clip);
        Ok(())
    }

    fn stop_audio(&self) {
        debug!("Audio stop requested");
    }

    fn set_background(&self, color: Rgb) -> anyhow::Result<()> {
        info!("Background colour set to #{:02x}{:02x}{:02x}", color.r, color.g, color.b);
        Ok(())
    }

    fn pixelate(&self, block_size: u32) -> anyhow::Result<()> {
        info!("Pixelation with block size {} requested", block_size);
        Ok(())
    }

    async fn probe_video(&self, id: &str) -> bool {
        warn!("Video probe for '{}' skipped: network lookups are disabled", id);
        false
    }
}
