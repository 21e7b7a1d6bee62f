//! Collaborators that record every call

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use cyder::collaborators::{Collaborators, FramePosition, Rgb};

#[derive(Debug, Default)]
pub struct RecordingCollaborators {
    events: Mutex<Vec<String>>,
    /// Make `open_widget` fail
    pub fail_widgets: AtomicBool,
    /// Probe attempt on which `probe_video` succeeds; 0 never succeeds
    pub probe_succeeds_on: AtomicUsize,
    probes: AtomicUsize,
    keystrokes: AtomicUsize,
}

impl RecordingCollaborators {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn has_event(&self, event: &str) -> bool {
        self.events().iter().any(|e| e == event)
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn keystrokes(&self) -> usize {
        self.keystrokes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Collaborators for RecordingCollaborators {
    fn open_widget(&self, widget: &str) -> anyhow::Result<()> {
        if self.fail_widgets.load(Ordering::SeqCst) {
            anyhow::bail!("widget {} unavailable", widget);
        }
        self.record(format!("widget:{}", widget));
        Ok(())
    }

    fn move_frame(&self, position: FramePosition) -> anyhow::Result<()> {
        self.record(format!("frame:{}", position.label()));
        Ok(())
    }

    fn set_frame_title(&self, title: &str) -> anyhow::Result<()> {
        self.record(format!("title:{}", title));
        Ok(())
    }

    fn open_url(&self, url: &str) -> anyhow::Result<()> {
        self.record(format!("url:{}", url));
        Ok(())
    }

    fn play_audio(&self, clip: &str) -> anyhow::Result<()> {
        self.record(format!("audio:{}", clip));
        Ok(())
    }

    fn stop_audio(&self) {
        self.record("audio:stop");
    }

    fn play_keystroke(&self) {
        self.keystrokes.fetch_add(1, Ordering::SeqCst);
    }

    fn set_background(&self, color: Rgb) -> anyhow::Result<()> {
        self.record(format!("background:{:02x}{:02x}{:02x}", color.r, color.g, color.b));
        Ok(())
    }

    fn pixelate(&self, block_size: u32) -> anyhow::Result<()> {
        self.record(format!("pixelate:{}", block_size));
        Ok(())
    }

    async fn probe_video(&self, _id: &str) -> bool {
        let attempt = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
        let wanted = self.probe_succeeds_on.load(Ordering::SeqCst);
        wanted != 0 && attempt >= wanted
    }
}
