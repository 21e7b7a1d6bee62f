//! Console session
//!
//! Owns the printing queue, the printing loop task, background activities
//! and redirection for one console window.
//!
//! ```text
//!  handlers ──► Printer ──► PrintQueue ─┬─ priority lane ─┐
//!                                       └─ regular lane ──┴─► PrintingLoop ──► OutputSink
//!                                                                   │
//!                                                                   └──► Redirector (file)
//! ```

pub mod activity;
pub mod bletchy;
pub mod printer;
pub mod queue;
pub mod redirect;
pub mod render_loop;
pub mod sink;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

pub use activity::{ActivityRegistry, CancellationToken};
pub use printer::Printer;
pub use queue::{Lane, PrintQueue};
pub use redirect::Redirector;
pub use sink::{BufferSink, OutputSink, StdoutSink};

use crate::collaborators::Collaborators;
use crate::config::{Config, ConsoleConfig};
use crate::models::Printable;
use crate::preferences::PreferenceStore;
use render_loop::PrintingLoop;

/// Notice printed when an escape is requested
pub const ESCAPED_NOTICE: &str = "Escaped";

/// State shared by the input pipeline, the printing loop and activities
pub struct ConsoleShared {
    /// Identifier used in log output
    pub session_id: Uuid,
    pub config: ConsoleConfig,
    pub queue: Arc<PrintQueue>,
    pub activities: Arc<ActivityRegistry>,
    pub redirector: Redirector,
    pub preferences: Arc<PreferenceStore>,
    pub collaborators: Arc<dyn Collaborators>,
    /// Render everything still queued without animation
    pub finish_immediately: AtomicBool,
    /// Cancelled when the console window closes
    pub shutdown: CancellationToken,
}

impl ConsoleShared {
    pub fn printer(&self) -> Printer {
        Printer::new(Arc::clone(&self.queue), Arc::clone(&self.activities))
    }

    /// Hurry queued output, stop activities and audio, and say so.
    ///
    /// Queued items are kept; they drain without animation. Returns the join
    /// handles of the cancelled activities.
    pub fn escape(&self) -> Vec<JoinHandle<()>> {
        info!("Escape requested");
        self.finish_immediately.store(true, Ordering::SeqCst);
        let handles = self.activities.cancel_all();
        self.collaborators.stop_audio();
        self.queue
            .push(Lane::Priority, Printable::text(format!("{}\n", ESCAPED_NOTICE)));
        handles
    }

    pub fn is_finishing(&self) -> bool {
        self.finish_immediately.load(Ordering::SeqCst)
    }

    /// Wait until everything queued so far has been rendered, or the session
    /// is closed
    pub async fn flush(&self) {
        while !self.queue.is_idle() {
            if self.shutdown.is_cancelled() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }
}

/// A running console session
pub struct Console {
    shared: Arc<ConsoleShared>,
    loop_handle: Mutex<Option<JoinHandle<()>>>,
}

impl Console {
    /// Create the session and spawn its printing loop.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: &Config,
        preferences: Arc<PreferenceStore>,
        collaborators: Arc<dyn Collaborators>,
        sink: Box<dyn OutputSink>,
    ) -> Self {
        let shared = Arc::new(ConsoleShared {
            session_id: Uuid::new_v4(),
            config: config.console.clone(),
            queue: Arc::new(PrintQueue::new()),
            activities: Arc::new(ActivityRegistry::new()),
            redirector: Redirector::new(config.paths.redirect_dir.clone()),
            preferences,
            collaborators,
            finish_immediately: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        });

        let printing_loop = PrintingLoop::new(Arc::clone(&shared), sink);
        let handle = tokio::spawn(printing_loop.run());
        info!("Console session {} started", shared.session_id);

        Self {
            shared,
            loop_handle: Mutex::new(Some(handle)),
        }
    }

    pub fn shared(&self) -> &Arc<ConsoleShared> {
        &self.shared
    }

    pub fn printer(&self) -> Printer {
        self.shared.printer()
    }

    pub fn queue(&self) -> &PrintQueue {
        &self.shared.queue
    }

    /// See [`ConsoleShared::escape`]
    pub fn escape(&self) -> Vec<JoinHandle<()>> {
        self.shared.escape()
    }

    /// Escape and wait until every cancelled activity has exited
    pub async fn escape_and_wait(&self) {
        let handles = self.shared.escape();
        ActivityRegistry::join(handles).await;
    }

    /// Wait until everything queued so far has been rendered
    pub async fn flush(&self) {
        self.shared.flush().await;
    }

    pub fn is_closed(&self) -> bool {
        self.shared.shutdown.is_cancelled()
    }

    /// Close the window: stop activities and the printing loop and wait for
    /// both to exit
    pub async fn close(&self) {
        self.shared.shutdown.cancel();
        ActivityRegistry::join(self.shared.activities.cancel_all()).await;

        let handle = self
            .loop_handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Printing loop ended abnormally: {}", e);
            }
        }
        info!("Console session {} closed", self.shared.session_id);
    }
}
