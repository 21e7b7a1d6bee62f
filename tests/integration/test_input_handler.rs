//! Integration Tests for the Input Pipeline
//!
//! Drive `InputHandler` end to end against a running console that renders
//! into memory, checking both the outcome and the rendered output.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::sync::atomic::Ordering;

use cyder::handler::classifier::{ClassifierGroup, GroupKind, Matcher, Trigger};
use cyder::handler::filter::REJECTION;
use cyder::handler::groups::general_prints::GREETINGS;
use cyder::handler::{HandleOutcome, InputHandler, TestRegistry, WidgetRegistry, UNKNOWN_COMMAND};
use cyder::models::InputSource;
use cyder::preferences::{PreferenceSource, FILTER_CHAT, TYPING_ANIMATION};
use tempfile::TempDir;
use test_utils::fixtures::start_console_with;
use test_utils::{start_console, test_config};

#[tokio::test]
async fn test_greeting_is_one_of_the_fixed_set() {
    let t = start_console().await;
    let mut handler = t.handler();

    for _ in 0..5 {
        let outcome = t.run(&mut handler, "hi").await;
        assert_eq!(
            outcome,
            HandleOutcome::Handled {
                group: GroupKind::GeneralPrints,
                matcher: "greeting"
            }
        );
        assert!(GREETINGS.contains(&t.last_line().as_str()));
    }
}

#[tokio::test]
async fn test_greeting_matches_ignoring_case() {
    let t = start_console().await;
    let mut handler = t.handler();
    let outcome = t.run(&mut handler, "  HeLLo ").await;
    assert!(matches!(outcome, HandleOutcome::Handled { group: GroupKind::GeneralPrints, .. }));
}

#[tokio::test]
async fn test_floor_prints_double() {
    let t = start_console().await;
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "floor(3.7)").await;
    assert_eq!(
        outcome,
        HandleOutcome::Handled {
            group: GroupKind::Fallback,
            matcher: "math function"
        }
    );
    assert_eq!(t.last_line(), "3.0");
}

#[tokio::test]
async fn test_arithmetic_expression() {
    let t = start_console().await;
    let mut handler = t.handler();
    t.run(&mut handler, "2 + 3 * 4").await;
    assert_eq!(t.last_line(), "14.0");
    t.run(&mut handler, "round(2.5)").await;
    assert_eq!(t.last_line(), "3");
}

#[tokio::test]
async fn test_bad_function_arguments_print_usage() {
    let t = start_console().await;
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "pow(2)").await;
    assert_eq!(
        outcome,
        HandleOutcome::Handled {
            group: GroupKind::Fallback,
            matcher: "math function"
        }
    );
    assert_eq!(t.last_line(), "Usage: pow(<base>, <exponent>)");

    t.run(&mut handler, "floor(abc)").await;
    assert_eq!(t.last_line(), "Usage: floor(<number>)");
    assert!(!t.output().contains(UNKNOWN_COMMAND));
}

#[tokio::test]
async fn test_long_sign_run_is_evaluated() {
    let t = start_console().await;
    let mut handler = t.handler();

    let line = format!("{}1", "-".repeat(20_000));
    let outcome = t.run(&mut handler, &line).await;
    assert_eq!(
        outcome,
        HandleOutcome::Handled {
            group: GroupKind::Fallback,
            matcher: "expression"
        }
    );
    assert_eq!(t.last_line(), "1.0");

    let chain = format!("{}2", "2^".repeat(20_000));
    let outcome = t.run(&mut handler, &chain).await;
    assert!(matches!(outcome, HandleOutcome::Unknown { .. }));
}

#[tokio::test]
async fn test_blank_input_is_ignored_silently() {
    let t = start_console().await;
    let mut handler = t.handler();

    assert_eq!(t.run(&mut handler, "").await, HandleOutcome::Ignored);
    assert_eq!(t.run(&mut handler, "   \t").await, HandleOutcome::Ignored);
    assert!(t.output().is_empty());
    assert!(handler.history().is_empty());
}

#[tokio::test]
async fn test_widget_dispatch() {
    let t = start_console().await;
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "Calc").await;
    assert_eq!(
        outcome,
        HandleOutcome::Handled {
            group: GroupKind::Widgets,
            matcher: "widget"
        }
    );
    assert!(t.collaborators.has_event("widget:calculator"));
}

#[tokio::test]
async fn test_failing_widget_falls_through_to_unknown() {
    let t = start_console().await;
    t.collaborators.fail_widgets.store(true, Ordering::SeqCst);
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "weather").await;
    assert!(matches!(outcome, HandleOutcome::Unknown { .. }));
    assert!(t.output().contains(UNKNOWN_COMMAND));
}

#[tokio::test]
async fn test_frame_and_openers() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "top left").await;
    t.run(&mut handler, "search rust async").await;
    t.run(&mut handler, "www.rust-lang.org").await;
    t.run(&mut handler, "frametitle My Console").await;

    assert!(t.collaborators.has_event("frame:top left"));
    assert!(t
        .collaborators
        .has_event("url:https://www.google.com/search?q=rust+async"));
    assert!(t.collaborators.has_event("url:https://www.rust-lang.org"));
    assert!(t.collaborators.has_event("title:My Console"));
}

#[tokio::test]
async fn test_usage_is_printed_for_malformed_arguments() {
    let t = start_console().await;
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "hex twelve").await;
    assert_eq!(
        outcome,
        HandleOutcome::Handled {
            group: GroupKind::GeneralCommands,
            matcher: "hex"
        }
    );
    assert_eq!(t.last_line(), "Usage: hex <integer>");

    t.run(&mut handler, "hex 255").await;
    assert_eq!(t.last_line(), "0xFF");
}

#[tokio::test]
async fn test_preference_toggle_persists() {
    let t = start_console().await;
    let mut handler = t.handler();
    assert!(t.preferences.get_bool(TYPING_ANIMATION));

    let outcome = t.run(&mut handler, "typing animation").await;
    assert_eq!(
        outcome,
        HandleOutcome::Handled {
            group: GroupKind::Fallback,
            matcher: "preference toggle"
        }
    );
    assert_eq!(t.last_line(), "Typing Animation set to false");
    assert!(!t.preferences.get_bool(TYPING_ANIMATION));

    let saved = std::fs::read_to_string(&t.config.paths.preferences_file).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved[TYPING_ANIMATION], "0");
}

#[tokio::test]
async fn test_filter_rejects_when_enabled() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.filter.blocked_words = vec!["darn".to_string()];
    let t = start_console_with(dir, config);
    let mut handler = t.handler();

    assert_eq!(t.run(&mut handler, "echo darn it").await, HandleOutcome::Filtered);
    assert_eq!(t.last_line(), REJECTION);

    t.preferences.set_bool(FILTER_CHAT, false).unwrap();
    let outcome = t.run(&mut handler, "echo darn it").await;
    assert!(matches!(outcome, HandleOutcome::Handled { matcher: "echo", .. }));
    assert_eq!(t.last_line(), "darn it");
}

#[tokio::test]
async fn test_unknown_command_suggests_similar() {
    let t = start_console().await;
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "calculater").await;
    match outcome {
        HandleOutcome::Unknown {
            suggestion: Some(suggestion),
        } => {
            assert_eq!(suggestion.command, "calculator");
            assert!(suggestion.similarity > 0.8);
        }
        other => panic!("expected a suggestion, got {:?}", other),
    }
    assert_eq!(
        t.lines(),
        vec![
            UNKNOWN_COMMAND.to_string(),
            "Most similar command: \"calculator\"".to_string()
        ]
    );
}

#[tokio::test]
async fn test_unknown_command_without_close_match() {
    let t = start_console().await;
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "qqqqqqqqqq").await;
    assert_eq!(outcome, HandleOutcome::Unknown { suggestion: None });
    assert_eq!(t.lines(), vec![UNKNOWN_COMMAND.to_string()]);
}

#[tokio::test]
async fn test_groups_run_in_fixed_order() {
    let t = start_console().await;
    let groups = vec![
        ClassifierGroup::new(
            GroupKind::Fallback,
            vec![Matcher::new("late", Trigger::Exact(&["ping"]), |_, ctx| {
                ctx.printer.println("late");
                Ok(true)
            })],
        ),
        ClassifierGroup::new(
            GroupKind::GeneralPrints,
            vec![Matcher::new("early", Trigger::Exact(&["ping"]), |_, ctx| {
                ctx.printer.println("early");
                Ok(true)
            })],
        ),
    ];
    let mut handler = InputHandler::with_registries(
        std::sync::Arc::clone(t.console.shared()),
        &t.config,
        groups,
        WidgetRegistry::new(),
        TestRegistry::new(),
    );

    let outcome = t.run(&mut handler, "ping").await;
    assert_eq!(
        outcome,
        HandleOutcome::Handled {
            group: GroupKind::GeneralPrints,
            matcher: "early"
        }
    );
    assert_eq!(t.lines(), vec!["early".to_string()]);
}

#[tokio::test]
async fn test_handler_error_falls_through_to_later_group() {
    let t = start_console().await;
    let groups = vec![
        ClassifierGroup::new(
            GroupKind::GeneralPrints,
            vec![Matcher::new("broken", Trigger::Always, |_, _| {
                anyhow::bail!("boom")
            })],
        ),
        ClassifierGroup::new(
            GroupKind::Fallback,
            vec![Matcher::new("recovered", Trigger::Always, |_, ctx| {
                ctx.printer.println("recovered");
                Ok(true)
            })],
        ),
    ];
    let mut handler = InputHandler::with_registries(
        std::sync::Arc::clone(t.console.shared()),
        &t.config,
        groups,
        WidgetRegistry::new(),
        TestRegistry::new(),
    );

    let outcome = t.run(&mut handler, "anything").await;
    assert_eq!(
        outcome,
        HandleOutcome::Handled {
            group: GroupKind::Fallback,
            matcher: "recovered"
        }
    );
    assert_eq!(t.last_line(), "recovered");
}

#[tokio::test]
async fn test_history_is_deduplicated_and_user_only() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "echo a").await;
    t.run(&mut handler, "echo a").await;
    handler.handle("echo program", InputSource::Program).await;
    t.run(&mut handler, "echo b").await;

    assert_eq!(handler.history(), ["echo a", "echo b"]);

    t.run(&mut handler, "history").await;
    assert!(t.output().contains("   3  history"));
}

#[tokio::test]
async fn test_registered_test_runs_by_name() {
    let t = start_console().await;
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "counttest").await;
    assert_eq!(
        outcome,
        HandleOutcome::Handled {
            group: GroupKind::Fallback,
            matcher: "test"
        }
    );
    assert_eq!(t.lines().len(), 10);
    assert_eq!(t.last_line(), "10");
}

#[tokio::test]
async fn test_adduser_creates_user_file() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "adduser Nathan").await;

    let users: Vec<_> = std::fs::read_dir(&t.config.paths.users_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(users.len(), 1);
    assert!(users[0].join("userdata.json").exists());
    assert!(t.last_line().starts_with("Created user \"Nathan\""));
}

#[tokio::test]
async fn test_help_lists_catalog() {
    let t = start_console().await;
    let mut handler = t.handler();
    assert!(handler.catalog().iter().any(|c| c == "calculator"));
    assert!(handler.catalog().iter().any(|c| c == "floor"));

    t.run(&mut handler, "help").await;
    assert!(t.output().contains("  calculator\n"));
}

#[tokio::test]
async fn test_exit_closes_console() {
    let t = start_console().await;
    let mut handler = t.handler();

    handler.handle("exit", InputSource::User).await;
    assert!(t.console.is_closed());
    t.console.close().await;
}
