//! Printing Loop
//!
//! The single consumer of the printing queue. Drains the priority lane
//! first, then the regular lane, rendering text either at once or one
//! character at a time. Runs until the console session token is cancelled.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::queue::Lane;
use super::sink::OutputSink;
use super::ConsoleShared;
use crate::models::Printable;
use crate::preferences::{PreferenceSource, PLAY_KEYSTROKES, TYPING_ANIMATION};

/// Cached reading of a preference, refreshed on a fixed interval rather
/// than per item
#[derive(Debug)]
struct CachedPreference {
    id: &'static str,
    value: bool,
    refreshed: Option<Instant>,
    interval: Duration,
}

impl CachedPreference {
    fn new(id: &'static str, interval: Duration) -> Self {
        Self {
            id,
            value: false,
            refreshed: None,
            interval,
        }
    }

    fn get(&mut self, source: &dyn PreferenceSource) -> bool {
        let stale = self
            .refreshed
            .map(|at| at.elapsed() >= self.interval)
            .unwrap_or(true);
        if stale {
            self.value = source.get_bool(self.id);
            self.refreshed = Some(Instant::now());
        }
        self.value
    }
}

/// Background renderer for one console session
pub struct PrintingLoop {
    shared: Arc<ConsoleShared>,
    sink: Box<dyn OutputSink>,
    typing: CachedPreference,
    keystrokes: CachedPreference,
    typed_since_keystroke: usize,
}

impl PrintingLoop {
    pub fn new(shared: Arc<ConsoleShared>, sink: Box<dyn OutputSink>) -> Self {
        let refresh = shared.config.preference_refresh();
        Self {
            shared,
            sink,
            typing: CachedPreference::new(TYPING_ANIMATION, refresh),
            keystrokes: CachedPreference::new(PLAY_KEYSTROKES, refresh),
            typed_since_keystroke: 0,
        }
    }

    /// Drain the queue until the session is closed
    pub async fn run(mut self) {
        info!("Printing loop started");
        let shutdown = self.shared.shutdown.clone();
        let line_interval = self.shared.config.line_interval();

        loop {
            if shutdown.is_cancelled() {
                break;
            }

            match self.shared.queue.pop() {
                Some((lane, item)) => {
                    self.render(lane, item).await;
                    self.shared.queue.complete();
                }
                None => {
                    // Nothing left to hurry through; a prior escape is over
                    self.shared.finish_immediately.store(false, Ordering::SeqCst);
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = self.shared.queue.wait(line_interval) => {}
                    }
                }
            }
        }
        info!("Printing loop stopped");
    }

    fn finishing(&self) -> bool {
        self.shared.finish_immediately.load(Ordering::SeqCst)
    }

    async fn render(&mut self, lane: Lane, item: Printable) {
        match self.shared.redirector.write(&item) {
            Ok(true) => return,
            Ok(false) => {}
            Err(e) => {
                warn!("Dropping redirected output: {}", e);
                return;
            }
        }

        match item {
            Printable::Text(text) => {
                let (animate, delay, keystrokes) = match lane {
                    Lane::Priority => (
                        !self.finishing(),
                        self.shared.config.priority_char_delay(),
                        false,
                    ),
                    Lane::Regular => {
                        let typing = self.typing.get(self.shared.preferences.as_ref());
                        let keystrokes = self.keystrokes.get(self.shared.preferences.as_ref());
                        (
                            typing && !self.finishing(),
                            self.shared.config.char_delay(),
                            keystrokes,
                        )
                    }
                };

                if animate && !delay.is_zero() {
                    self.type_out(&text, delay, keystrokes).await;
                } else {
                    self.sink.append_text(&text);
                }
            }
            Printable::Icon(icon) => self.sink.insert_icon(&icon),
            Printable::Component(component) => self.sink.insert_component(&component),
        }
    }

    /// Typewriter rendering; flushes the remainder at once if an escape
    /// arrives mid-item
    async fn type_out(&mut self, text: &str, delay: Duration, keystrokes: bool) {
        let interval = self.shared.config.keystroke_interval.max(1);

        for (index, ch) in text.char_indices() {
            if self.finishing() {
                debug!("Finishing current item immediately");
                self.sink.append_text(&text[index..]);
                return;
            }

            self.sink.append_char(ch);

            if keystrokes && !ch.is_whitespace() {
                self.typed_since_keystroke += 1;
                if self.typed_since_keystroke >= interval {
                    self.typed_since_keystroke = 0;
                    self.shared.collaborators.play_keystroke();
                }
            }

            tokio::time::sleep(delay).await;
        }
    }
}
