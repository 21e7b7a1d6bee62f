//! Output Sinks
//!
//! The append-only styled surface the printing loop renders into. Two
//! implementations: [`StdoutSink`] for the terminal binary and
//! [`BufferSink`], an in-memory document that can be inspected while the
//! loop is running.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::models::{Component, Icon};

/// Append-only output surface with caret tracking
pub trait OutputSink: Send {
    /// Append text at the caret
    fn append_text(&mut self, text: &str);

    /// Append a single character at the caret
    fn append_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.append_text(ch.encode_utf8(&mut buf));
    }

    /// Insert an inline image at the caret
    fn insert_icon(&mut self, icon: &Icon);

    /// Insert an embedded component at the caret
    fn insert_component(&mut self, component: &Component);

    /// Caret position, in characters from the start of the document
    fn caret(&self) -> usize;
}

/// Sink writing to the process's standard output
#[derive(Debug, Default)]
pub struct StdoutSink {
    caret: usize,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
            warn!("Failed to write console output: {}", e);
            return;
        }
        self.caret += text.chars().count();
    }
}

impl OutputSink for StdoutSink {
    fn append_text(&mut self, text: &str) {
        self.write(text);
    }

    fn insert_icon(&mut self, icon: &Icon) {
        self.write(&format!("[icon: {}]", icon.name));
    }

    fn insert_component(&mut self, component: &Component) {
        self.write(&format!("[{}: {}]", component.kind, component.label));
    }

    fn caret(&self) -> usize {
        self.caret
    }
}

/// One run of document content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Icon(Icon),
    Component(Component),
}

/// In-memory document shared between a [`BufferSink`] and its readers
#[derive(Debug, Default)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Text content with icons and components elided
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Non-empty text lines
    pub fn lines(&self) -> Vec<String> {
        self.text()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn icons(&self) -> Vec<&Icon> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Icon(icon) => Some(icon),
                _ => None,
            })
            .collect()
    }

    pub fn components(&self) -> Vec<&Component> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Component(component) => Some(component),
                _ => None,
            })
            .collect()
    }

    fn caret(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Text(text) => text.chars().count(),
                _ => 1,
            })
            .sum()
    }

    fn push_char(&mut self, ch: char) {
        if ch == '\r' {
            self.rewind_line();
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Text(text)) => text.push(ch),
            _ => self.segments.push(Segment::Text(ch.to_string())),
        }
    }

    /// Carriage return: drop the text written since the last newline
    fn rewind_line(&mut self) {
        if let Some(Segment::Text(text)) = self.segments.last_mut() {
            let keep = text.rfind('\n').map(|i| i + 1).unwrap_or(0);
            text.truncate(keep);
            if text.is_empty() {
                self.segments.pop();
            }
        }
    }
}

/// Sink rendering into a shared in-memory [`Document`]
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    document: Arc<Mutex<Document>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle for reading what has been rendered
    pub fn document(&self) -> Arc<Mutex<Document>> {
        Arc::clone(&self.document)
    }

    /// Current text content
    pub fn text(&self) -> String {
        self.lock().text()
    }

    /// Current non-empty lines
    pub fn lines(&self) -> Vec<String> {
        self.lock().lines()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl OutputSink for BufferSink {
    fn append_text(&mut self, text: &str) {
        let mut document = self.lock();
        for ch in text.chars() {
            document.push_char(ch);
        }
    }

    fn insert_icon(&mut self, icon: &Icon) {
        self.lock().segments.push(Segment::Icon(icon.clone()));
    }

    fn insert_component(&mut self, component: &Component) {
        self.lock().segments.push(Segment::Component(component.clone()));
    }

    fn caret(&self) -> usize {
        self.lock().caret()
    }
}
