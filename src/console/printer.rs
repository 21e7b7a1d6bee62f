//! Console print API
//!
//! Every command writes through a [`Printer`]. Ordinary output goes to the
//! regular lane unless a priority activity (the YouTube probe or the bletchy
//! animation) is running, in which case it is sent to the priority lane so it
//! is not stuck behind the activity's own output.

use std::fmt::Display;
use std::sync::Arc;

use super::activity::{ActivityRegistry, PRIORITY_ACTIVITIES};
use super::queue::{Lane, PrintQueue};
use crate::models::{Component, Icon, Printable};

/// Cheap, cloneable handle for enqueueing console output
#[derive(Debug, Clone)]
pub struct Printer {
    queue: Arc<PrintQueue>,
    activities: Arc<ActivityRegistry>,
}

impl Printer {
    pub fn new(queue: Arc<PrintQueue>, activities: Arc<ActivityRegistry>) -> Self {
        Self { queue, activities }
    }

    /// Lane ordinary output should use right now
    pub fn current_lane(&self) -> Lane {
        if self.activities.any_active(PRIORITY_ACTIVITIES) {
            Lane::Priority
        } else {
            Lane::Regular
        }
    }

    /// Enqueue an item on the lane chosen by [`Printer::current_lane`]
    pub fn print_item(&self, item: Printable) {
        self.queue.push(self.current_lane(), item);
    }

    pub fn print(&self, value: impl Display) {
        self.print_item(Printable::Text(value.to_string()));
    }

    pub fn println(&self, value: impl Display) {
        self.print_item(Printable::Text(format!("{}\n", value)));
    }

    /// Print every line of `lines`, each followed by a newline
    pub fn println_all<I, T>(&self, lines: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        for line in lines {
            self.println(line);
        }
    }

    pub fn print_icon(&self, icon: Icon) {
        self.print_item(Printable::Icon(icon));
    }

    pub fn print_component(&self, component: Component) {
        self.print_item(Printable::Component(component));
    }

    /// Enqueue text on the priority lane regardless of running activities
    pub fn print_priority(&self, value: impl Display) {
        self.queue
            .push(Lane::Priority, Printable::Text(value.to_string()));
    }

    pub fn println_priority(&self, value: impl Display) {
        self.queue
            .push(Lane::Priority, Printable::Text(format!("{}\n", value)));
    }

    pub fn print_priority_item(&self, item: Printable) {
        self.queue.push(Lane::Priority, item);
    }
}
