//! Named Background Activities
//!
//! Long-running command work (the YouTube probe, the bletchy animation) runs
//! as a tokio task registered under a name. Each task receives a
//! [`CancellationToken`] and is expected to check it between steps. Escaping
//! cancels every activity and hands back the join handles so callers that
//! need confirmed shutdown can wait for quiescence.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Activity name of the random video-id probe
pub const YOUTUBE_ACTIVITY: &str = "youtube";
/// Activity name of the text scramble animation
pub const BLETCHY_ACTIVITY: &str = "bletchy";

/// Activities whose output must jump the regular lane
pub const PRIORITY_ACTIVITIES: &[&str] = &[YOUTUBE_ACTIVITY, BLETCHY_ACTIVITY];

/// Cooperative cancellation signal shared between a task and its owner
#[derive(Debug, Clone)]
pub struct CancellationToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal cancellation to every holder of this token
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once the token is cancelled
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Sleep for `duration`, returning `false` early if cancelled
    pub async fn sleep(&self, duration: std::time::Duration) -> bool {
        tokio::select! {
            _ = self.cancelled() => false,
            _ = tokio::time::sleep(duration) => !self.is_cancelled(),
        }
    }
}

struct Activity {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Registry of named background activities
#[derive(Default)]
pub struct ActivityRegistry {
    activities: Mutex<HashMap<String, Activity>>,
}

impl std::fmt::Debug for ActivityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityRegistry")
            .field("active", &self.active_names())
            .finish()
    }
}

impl ActivityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Activity>> {
        self.activities.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Spawn `task` under `name`, cancelling any activity already using it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F, Fut>(&self, name: &str, task: F) -> CancellationToken
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let handle = tokio::spawn(task(token.clone()));

        let previous = self.lock().insert(
            name.to_string(),
            Activity {
                token: token.clone(),
                handle,
            },
        );
        if let Some(previous) = previous {
            debug!("Replacing running activity '{}'", name);
            previous.token.cancel();
        }
        debug!("Started activity '{}'", name);
        token
    }

    /// Whether an activity with this name is still running
    pub fn is_active(&self, name: &str) -> bool {
        self.lock()
            .get(name)
            .map(|activity| !activity.handle.is_finished() && !activity.token.is_cancelled())
            .unwrap_or(false)
    }

    /// Whether any of the named activities is running
    pub fn any_active(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.is_active(name))
    }

    /// Names of running activities
    pub fn active_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, a)| !a.handle.is_finished() && !a.token.is_cancelled())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Cancel one activity, returning its handle if it was registered
    pub fn cancel(&self, name: &str) -> Option<JoinHandle<()>> {
        let activity = self.lock().remove(name)?;
        activity.token.cancel();
        debug!("Cancelled activity '{}'", name);
        Some(activity.handle)
    }

    /// Cancel and forget every activity, returning their handles
    pub fn cancel_all(&self) -> Vec<JoinHandle<()>> {
        let drained: Vec<(String, Activity)> = self.lock().drain().collect();
        drained
            .into_iter()
            .map(|(name, activity)| {
                activity.token.cancel();
                debug!("Cancelled activity '{}'", name);
                activity.handle
            })
            .collect()
    }

    /// Wait for every handle to finish
    pub async fn join(handles: Vec<JoinHandle<()>>) {
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                if e.is_panic() {
                    warn!("Background activity panicked: {}", e);
                }
            }
        }
    }

    /// Wait until every registered activity has finished on its own
    pub async fn wait_idle(&self) {
        while !self.active_names().is_empty() {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    }
}
