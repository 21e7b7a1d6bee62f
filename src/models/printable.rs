//! Printable Item Model
//!
//! The heterogeneous items carried by the printing queue. The queue owns an
//! item from enqueue until the printing loop renders it into the sink.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An inline image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    /// Short name shown in text-only sinks
    pub name: String,
    /// Image file, when one exists
    pub path: Option<PathBuf>,
}

impl Icon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
        }
    }

    pub fn with_path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
        }
    }
}

/// An embedded interactive element (button, link, label)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Element kind, e.g. `button`
    pub kind: String,
    /// Visible label
    pub label: String,
    /// Console command run when the element is activated
    pub action: Option<String>,
}

impl Component {
    pub fn new(kind: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            label: label.into(),
            action: None,
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// One item in the printing queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Printable {
    /// Text, possibly typed out one character at a time
    Text(String),
    /// Inline image, rendered atomically
    Icon(Icon),
    /// Embedded component, rendered atomically
    Component(Component),
}

impl Printable {
    pub fn text(text: impl Into<String>) -> Self {
        Printable::Text(text.into())
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Printable::Text(_))
    }
}

/// Plain-text rendering used by text-only sinks and redirection files
impl fmt::Display for Printable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Printable::Text(text) => write!(f, "{}", text),
            Printable::Icon(icon) => write!(f, "[icon: {}]", icon.name),
            Printable::Component(component) => {
                write!(f, "[{}: {}]", component.kind, component.label)
            }
        }
    }
}
