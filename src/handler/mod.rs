//! Input handling pipeline
//!
//! Turns one line of console input into console output:
//!
//! 1. reset redirection left over from the previous command
//! 2. parse; blank input is ignored without a trace
//! 3. log the command with its source and remember it in history
//! 4. start redirection when the line ends in `> file`
//! 5. reject filtered language when `filterchat` is on
//! 6. run the classifier cascade
//! 7. nothing matched: print `Unknown command` and maybe a suggestion

pub mod classifier;
pub mod filter;
pub mod groups;
pub mod math;
pub mod registry;
pub mod suggest;

use std::sync::Arc;

use tracing::{debug, info, warn};

pub use classifier::{Classification, Classifier, ClassifierGroup, GroupKind, HandlerContext};
pub use filter::ChatFilter;
pub use registry::{TestRegistry, Widget, WidgetRegistry};
pub use suggest::Suggestion;

use crate::config::{Config, PathsConfig, SuggestionConfig};
use crate::console::{ConsoleShared, Printer};
use crate::models::{InputSource, ParsedCommand};
use crate::preferences::{PreferenceSource, FILTER_CHAT, PREFERENCES};

/// Printed when no group handles a command
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// User commands kept for `history`
pub const HISTORY_LIMIT: usize = 1000;

/// What happened to one input line
#[derive(Debug, Clone, PartialEq)]
pub enum HandleOutcome {
    /// Blank input
    Ignored,
    /// Rejected by the chat filter
    Filtered,
    /// Handled by a classifier group
    Handled {
        group: GroupKind,
        matcher: &'static str,
    },
    /// No group matched
    Unknown { suggestion: Option<Suggestion> },
}

/// Per-console command handler
pub struct InputHandler {
    console: Arc<ConsoleShared>,
    classifier: Classifier,
    widgets: WidgetRegistry,
    tests: TestRegistry,
    filter: ChatFilter,
    paths: PathsConfig,
    suggestion: SuggestionConfig,
    catalog: Vec<String>,
    history: Vec<String>,
}

impl InputHandler {
    /// Handler with the built-in groups, widgets and tests
    pub fn new(console: Arc<ConsoleShared>, config: &Config) -> Self {
        Self::with_registries(
            console,
            config,
            groups::all(),
            WidgetRegistry::with_defaults(),
            TestRegistry::with_defaults(),
        )
    }

    /// Handler with caller-supplied groups and registries
    pub fn with_registries(
        console: Arc<ConsoleShared>,
        config: &Config,
        groups: Vec<ClassifierGroup>,
        widgets: WidgetRegistry,
        tests: TestRegistry,
    ) -> Self {
        let classifier = Classifier::new(groups);
        let catalog = build_catalog(&classifier, &widgets, &tests);
        debug!("Command catalog holds {} entries", catalog.len());

        Self {
            console,
            classifier,
            widgets,
            tests,
            filter: ChatFilter::new(&config.filter.blocked_words),
            paths: config.paths.clone(),
            suggestion: config.suggestion.clone(),
            catalog,
            history: Vec::new(),
        }
    }

    pub fn console(&self) -> &Arc<ConsoleShared> {
        &self.console
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Known command words, sorted
    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// Remembered user commands, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn printer(&self) -> Printer {
        self.console.printer()
    }

    fn remember(&mut self, line: &str) {
        if self.history.last().map(String::as_str) == Some(line) {
            return;
        }
        self.history.push(line.to_string());
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }

    /// Handle one line of input
    pub async fn handle(&mut self, line: &str, source: InputSource) -> HandleOutcome {
        let command = ParsedCommand::parse(line, source);

        // The printing loop decides file or screen when it renders, so output
        // queued under the previous redirection state must drain first
        let redirecting = command.as_ref().and_then(ParsedCommand::redirect).is_some();
        if redirecting || self.console.redirector.is_active() {
            self.console.flush().await;
        }
        self.console.redirector.reset();

        let Some(command) = command else {
            return HandleOutcome::Ignored;
        };

        match source {
            InputSource::User => {
                info!("[CLIENT]: {}", line.trim());
                self.remember(line.trim());
            }
            InputSource::Program => info!("[CONSOLE]: {}", line.trim()),
        }

        if let Some(target) = command.redirect() {
            match self.console.redirector.begin(target) {
                Ok(path) => debug!("Redirecting output to {}", path.display()),
                Err(e) => warn!("Could not redirect to '{}': {}", target, e),
            }
        }

        if self.console.preferences.get_bool(FILTER_CHAT) && self.filter.is_blocked(command.text())
        {
            self.printer().println(filter::REJECTION);
            return HandleOutcome::Filtered;
        }

        let classification = {
            let ctx = HandlerContext {
                console: &self.console,
                printer: self.printer(),
                widgets: &self.widgets,
                tests: &self.tests,
                paths: &self.paths,
                catalog: &self.catalog,
                history: &self.history,
            };
            self.classifier.classify(&command, &ctx)
        };
        if let Some(Classification { group, matcher }) = classification {
            return HandleOutcome::Handled { group, matcher };
        }

        self.printer().println(UNKNOWN_COMMAND);
        let suggestion = suggest::suggest(
            self.catalog.clone(),
            command.text().to_string(),
            self.suggestion.threshold,
        )
        .await;
        if let Some(suggestion) = &suggestion {
            self.printer()
                .println(format!("Most similar command: \"{}\"", suggestion.command));
        }
        HandleOutcome::Unknown { suggestion }
    }
}

/// Sorted, de-duplicated list of everything a user can type
fn build_catalog(
    classifier: &Classifier,
    widgets: &WidgetRegistry,
    tests: &TestRegistry,
) -> Vec<String> {
    let mut catalog: Vec<String> = classifier
        .keywords()
        .into_iter()
        .chain(widgets.triggers())
        .chain(tests.names())
        .chain(math::FUNCTIONS.iter().copied())
        .chain(PREFERENCES.iter().map(|pref| pref.id))
        .map(str::to_string)
        .collect();
    catalog.sort();
    catalog.dedup();
    catalog
}
