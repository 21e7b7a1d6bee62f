//! Command Classification
//!
//! An ordered cascade of matcher groups. Each [`Matcher`] pairs a trigger
//! with a handler closure; the handler both decides and performs (printing,
//! opening widgets, spawning activities). Groups are evaluated in
//! [`GroupKind`] order and the cascade stops at the first group whose
//! matcher reports success.

use std::fmt;

use tracing::{debug, error};

use super::registry::{TestRegistry, WidgetRegistry};
use crate::config::PathsConfig;
use crate::console::{ConsoleShared, Printer};
use crate::models::ParsedCommand;
use crate::preferences::{PreferenceSource, SILENCE_ERRORS};

/// Classifier groups, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKind {
    /// Canned replies and jokes
    GeneralPrints,
    /// Image prints and commands that spawn background activities
    ImagePrints,
    /// Widget windows looked up in the widget registry
    Widgets,
    /// Console frame placement
    FrameMovement,
    /// Websites and external applications
    ExternalOpeners,
    /// Audio clips
    Audio,
    /// System and utility commands
    GeneralCommands,
    /// URLs, math, preference toggles and registered tests
    Fallback,
}

impl GroupKind {
    pub const ALL: [GroupKind; 8] = [
        GroupKind::GeneralPrints,
        GroupKind::ImagePrints,
        GroupKind::Widgets,
        GroupKind::FrameMovement,
        GroupKind::ExternalOpeners,
        GroupKind::Audio,
        GroupKind::GeneralCommands,
        GroupKind::Fallback,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GroupKind::GeneralPrints => "general prints",
            GroupKind::ImagePrints => "image prints",
            GroupKind::Widgets => "widgets",
            GroupKind::FrameMovement => "frame movement",
            GroupKind::ExternalOpeners => "external openers",
            GroupKind::Audio => "audio",
            GroupKind::GeneralCommands => "general commands",
            GroupKind::Fallback => "fallback",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a handler may touch while running
pub struct HandlerContext<'a> {
    pub console: &'a ConsoleShared,
    pub printer: Printer,
    pub widgets: &'a WidgetRegistry,
    pub tests: &'a TestRegistry,
    pub paths: &'a PathsConfig,
    /// Known command words, for `help`
    pub catalog: &'a [String],
    /// Previous user commands, oldest first
    pub history: &'a [String],
}

/// Handler closure: `Ok(true)` when the command was handled
pub type Handler =
    Box<dyn Fn(&ParsedCommand, &HandlerContext<'_>) -> anyhow::Result<bool> + Send + Sync>;

/// When a matcher's handler is consulted
#[derive(Clone, Copy)]
pub enum Trigger {
    /// Whole input text equals one of these, ignoring case
    Exact(&'static [&'static str]),
    /// Verb equals one of these, ignoring case
    Verb(&'static [&'static str]),
    /// Arbitrary check on the parsed command
    Predicate(fn(&ParsedCommand) -> bool),
    /// Always consult the handler; it decides by returning `Ok(false)`
    Always,
}

impl Trigger {
    pub fn matches(&self, command: &ParsedCommand) -> bool {
        match self {
            Trigger::Exact(phrases) => {
                let text = command.text();
                phrases.iter().any(|phrase| phrase.eq_ignore_ascii_case(text))
            }
            Trigger::Verb(verbs) => verbs.iter().any(|verb| command.is_verb(verb)),
            Trigger::Predicate(check) => check(command),
            Trigger::Always => true,
        }
    }

    /// Literal words this trigger responds to
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Trigger::Exact(words) | Trigger::Verb(words) => words,
            Trigger::Predicate(_) | Trigger::Always => &[],
        }
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Exact(words) => f.debug_tuple("Exact").field(words).finish(),
            Trigger::Verb(words) => f.debug_tuple("Verb").field(words).finish(),
            Trigger::Predicate(_) => f.write_str("Predicate"),
            Trigger::Always => f.write_str("Always"),
        }
    }
}

/// A trigger paired with the handler it guards
pub struct Matcher {
    name: &'static str,
    trigger: Trigger,
    handler: Handler,
}

impl Matcher {
    pub fn new<F>(name: &'static str, trigger: Trigger, handler: F) -> Self
    where
        F: Fn(&ParsedCommand, &HandlerContext<'_>) -> anyhow::Result<bool> + Send + Sync + 'static,
    {
        Self {
            name,
            trigger,
            handler: Box::new(handler),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn matches(&self, command: &ParsedCommand) -> bool {
        self.trigger.matches(command)
    }

    /// Run the handler if the trigger matches
    pub fn run(&self, command: &ParsedCommand, ctx: &HandlerContext<'_>) -> anyhow::Result<bool> {
        if !self.matches(command) {
            return Ok(false);
        }
        (self.handler)(command, ctx)
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("name", &self.name)
            .field("trigger", &self.trigger)
            .finish()
    }
}

/// One named batch of matchers
#[derive(Debug)]
pub struct ClassifierGroup {
    kind: GroupKind,
    matchers: Vec<Matcher>,
}

impl ClassifierGroup {
    pub fn new(kind: GroupKind, matchers: Vec<Matcher>) -> Self {
        Self { kind, matchers }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    /// Name of the first matcher that handled the command
    pub fn check(
        &self,
        command: &ParsedCommand,
        ctx: &HandlerContext<'_>,
    ) -> anyhow::Result<Option<&'static str>> {
        for matcher in &self.matchers {
            if matcher.run(command, ctx)? {
                return Ok(Some(matcher.name()));
            }
        }
        Ok(None)
    }
}

/// Which group and matcher handled a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub group: GroupKind,
    pub matcher: &'static str,
}

/// The full ordered cascade
#[derive(Debug, Default)]
pub struct Classifier {
    groups: Vec<ClassifierGroup>,
}

impl Classifier {
    /// Build from groups in any order; evaluation follows [`GroupKind`] order
    pub fn new(mut groups: Vec<ClassifierGroup>) -> Self {
        groups.sort_by_key(ClassifierGroup::kind);
        Self { groups }
    }

    pub fn groups(&self) -> &[ClassifierGroup] {
        &self.groups
    }

    /// Literal trigger words of every matcher
    pub fn keywords(&self) -> Vec<&'static str> {
        self.groups
            .iter()
            .flat_map(|group| group.matchers())
            .flat_map(|matcher| matcher.trigger().keywords().iter().copied())
            .collect()
    }

    /// Run the cascade. A group whose handler fails counts as not matched.
    pub fn classify(
        &self,
        command: &ParsedCommand,
        ctx: &HandlerContext<'_>,
    ) -> Option<Classification> {
        for group in &self.groups {
            match group.check(command, ctx) {
                Ok(Some(matcher)) => {
                    debug!("'{}' handled by {} / {}", command.text(), group.kind(), matcher);
                    return Some(Classification {
                        group: group.kind(),
                        matcher,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    if ctx.console.preferences.get_bool(SILENCE_ERRORS) {
                        debug!("{} failed on '{}': {:#}", group.kind(), command.text(), e);
                    } else {
                        error!("{} failed on '{}': {:#}", group.kind(), command.text(), e);
                    }
                }
            }
        }
        None
    }
}
