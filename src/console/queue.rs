//! Printing Queue
//!
//! Two FIFO lanes of [`Printable`] items behind one mutex. The priority lane
//! is always drained first; within a lane order is preserved. Items are only
//! appended at the tail and taken from the head.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;

use crate::models::Printable;

/// Which lane an item travels in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Drained before anything in the regular lane
    Priority,
    /// Ordinary command output
    Regular,
}

#[derive(Debug, Default)]
struct Lanes {
    priority: VecDeque<Printable>,
    regular: VecDeque<Printable>,
    /// Popped but not yet reported complete by the consumer
    in_flight: usize,
    /// Items the consumer has finished rendering
    completed: u64,
}

/// Two-lane printing queue with a blocking pop for the printing loop
#[derive(Debug, Default)]
pub struct PrintQueue {
    lanes: Mutex<Lanes>,
    notify: Notify,
}

impl PrintQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Lanes> {
        self.lanes.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append an item to the tail of a lane and wake the consumer
    pub fn push(&self, lane: Lane, item: Printable) {
        {
            let mut lanes = self.lock();
            match lane {
                Lane::Priority => lanes.priority.push_back(item),
                Lane::Regular => lanes.regular.push_back(item),
            }
        }
        self.notify.notify_one();
    }

    /// Take the next item, priority lane first.
    ///
    /// The caller must call [`PrintQueue::complete`] once the item is rendered.
    pub fn pop(&self) -> Option<(Lane, Printable)> {
        let mut lanes = self.lock();
        let next = match lanes.priority.pop_front() {
            Some(item) => Some((Lane::Priority, item)),
            None => lanes.regular.pop_front().map(|item| (Lane::Regular, item)),
        };
        if next.is_some() {
            lanes.in_flight += 1;
        }
        next
    }

    /// Report that a popped item has been fully rendered
    pub fn complete(&self) {
        let mut lanes = self.lock();
        lanes.in_flight = lanes.in_flight.saturating_sub(1);
        lanes.completed += 1;
    }

    /// Pop, or wait up to `timeout` for an enqueue and try once more
    pub async fn pop_or_wait(&self, timeout: Duration) -> Option<(Lane, Printable)> {
        if let Some(next) = self.pop() {
            return Some(next);
        }
        let _ = tokio::time::timeout(timeout, self.notify.notified()).await;
        self.pop()
    }

    /// Wait up to `timeout` for an enqueue without taking anything
    pub async fn wait(&self, timeout: Duration) {
        let _ = tokio::time::timeout(timeout, self.notify.notified()).await;
    }

    /// Items waiting in both lanes
    pub fn len(&self) -> usize {
        let lanes = self.lock();
        lanes.priority.len() + lanes.regular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items waiting in one lane
    pub fn lane_len(&self, lane: Lane) -> usize {
        let lanes = self.lock();
        match lane {
            Lane::Priority => lanes.priority.len(),
            Lane::Regular => lanes.regular.len(),
        }
    }

    /// Waiting items plus any item currently being rendered
    pub fn outstanding(&self) -> usize {
        let lanes = self.lock();
        lanes.priority.len() + lanes.regular.len() + lanes.in_flight
    }

    /// Nothing waiting and nothing being rendered
    pub fn is_idle(&self) -> bool {
        self.outstanding() == 0
    }

    /// Total items rendered so far
    pub fn completed(&self) -> u64 {
        self.lock().completed
    }
}
