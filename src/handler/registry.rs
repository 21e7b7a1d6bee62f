//! Widget and test registries
//!
//! Both are filled explicitly at startup: widgets by name and trigger
//! words, tests by name and callable. Lookup is a plain table search.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::classifier::HandlerContext;
use crate::models::{Component, Icon};

/// A widget window the console can open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub name: &'static str,
    pub triggers: &'static [&'static str],
    pub description: &'static str,
}

/// Widgets keyed by trigger word
#[derive(Debug, Clone, Default)]
pub struct WidgetRegistry {
    widgets: Vec<Widget>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard widget set
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for widget in DEFAULT_WIDGETS {
            registry.register(widget.clone());
        }
        registry
    }

    /// Add a widget; later registrations win on trigger clashes
    pub fn register(&mut self, widget: Widget) {
        self.widgets.insert(0, widget);
    }

    /// Widget whose trigger equals `word`, ignoring case
    pub fn find(&self, word: &str) -> Option<&Widget> {
        self.widgets.iter().find(|widget| {
            widget
                .triggers
                .iter()
                .any(|trigger| trigger.eq_ignore_ascii_case(word))
        })
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Every trigger word
    pub fn triggers(&self) -> Vec<&'static str> {
        self.widgets
            .iter()
            .flat_map(|widget| widget.triggers.iter().copied())
            .collect()
    }
}

const DEFAULT_WIDGETS: &[Widget] = &[
    Widget {
        name: "calculator",
        triggers: &["calculator", "calc"],
        description: "A basic calculator",
    },
    Widget {
        name: "weather",
        triggers: &["weather"],
        description: "Current weather for a location",
    },
    Widget {
        name: "pizza",
        triggers: &["pizza"],
        description: "A pizza order form",
    },
    Widget {
        name: "music",
        triggers: &["music", "mp3", "musicplayer"],
        description: "An audio player",
    },
    Widget {
        name: "notes",
        triggers: &["notes", "note"],
        description: "A note editor",
    },
    Widget {
        name: "phone",
        triggers: &["phone", "dialer", "dial"],
        description: "A phone dialer",
    },
    Widget {
        name: "tempconverter",
        triggers: &["temperature", "tempconverter", "temp"],
        description: "Temperature unit converter",
    },
    Widget {
        name: "imageresizer",
        triggers: &["imageresizer", "resizeimage"],
        description: "Image resizing tool",
    },
    Widget {
        name: "minecraft",
        triggers: &["minecraft"],
        description: "Minecraft launcher frame",
    },
];

/// A registered manual test
pub type TestFn = Arc<dyn Fn(&HandlerContext<'_>) -> anyhow::Result<()> + Send + Sync>;

/// Tests invocable by name from the console
#[derive(Clone, Default)]
pub struct TestRegistry {
    tests: BTreeMap<String, TestFn>,
}

impl std::fmt::Debug for TestRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRegistry")
            .field("tests", &self.tests.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in console tests
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("printtest", |ctx| {
            ctx.printer.println("Text output");
            ctx.printer.print_icon(Icon::new("logo"));
            ctx.printer.println("");
            ctx.printer
                .print_component(Component::new("button", "Help").with_action("help"));
            ctx.printer.println("");
            Ok(())
        });
        registry.register("counttest", |ctx| {
            for i in 1..=10 {
                ctx.printer.println(i);
            }
            Ok(())
        });
        registry.register("prioritytest", |ctx| {
            ctx.printer.println("Regular output");
            ctx.printer.println_priority("Priority output");
            Ok(())
        });
        registry.register("bletchytest", |ctx| {
            crate::console::bletchy::start(ctx.console, "Bletchy test complete");
            Ok(())
        });
        registry
    }

    /// Register a test; names are stored lowercased
    pub fn register<F>(&mut self, name: &str, test: F)
    where
        F: Fn(&HandlerContext<'_>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.tests.insert(name.to_lowercase(), Arc::new(test));
    }

    pub fn get(&self, name: &str) -> Option<TestFn> {
        self.tests.get(&name.to_lowercase()).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tests.keys().map(String::as_str).collect()
    }
}
