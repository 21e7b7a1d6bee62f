//! Integration Tests for the Printing Queue and Loop
//!
//! Lane ordering, escape behaviour and background activities observed
//! through a console rendering into memory.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::time::{Duration, Instant};

use cyder::config::ConsoleConfig;
use cyder::console::activity::{BLETCHY_ACTIVITY, YOUTUBE_ACTIVITY};
use cyder::console::{Lane, ESCAPED_NOTICE};
use cyder::models::{Component, Icon};
use tempfile::TempDir;
use test_utils::fixtures::start_console_with;
use test_utils::{start_console, test_config};

#[tokio::test]
async fn test_priority_lane_renders_first() {
    let t = start_console().await;
    let printer = t.console.printer();

    // Nothing renders until this task yields
    printer.println("regular one");
    printer.println("regular two");
    printer.println_priority("urgent");
    t.flush().await;

    assert_eq!(t.lines(), vec!["urgent", "regular one", "regular two"]);
}

#[tokio::test]
async fn test_regular_lane_is_fifo() {
    let t = start_console().await;
    let printer = t.console.printer();

    for i in 0..50 {
        printer.println(i);
    }
    t.flush().await;

    let expected: Vec<String> = (0..50).map(|i| i.to_string()).collect();
    assert_eq!(t.lines(), expected);
}

#[tokio::test]
async fn test_icons_and_components_render_inline() {
    let t = start_console().await;
    let printer = t.console.printer();

    printer.print("before ");
    printer.print_icon(Icon::new("logo"));
    printer.print_component(Component::new("button", "Help").with_action("help"));
    printer.println(" after");
    t.flush().await;

    let document = t.sink.document();
    let document = document.lock().unwrap();
    assert_eq!(document.icons().len(), 1);
    assert_eq!(document.components()[0].label, "Help");
    assert_eq!(document.text(), "before  after\n");
}

#[tokio::test]
async fn test_escape_drains_queue_without_animation() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(dir.path());
    config.console = ConsoleConfig {
        char_delay_ms: 50,
        priority_char_delay_ms: 50,
        ..ConsoleConfig::default()
    };
    let t = start_console_with(dir, config);
    let printer = t.console.printer();

    let line = "a line that would take several seconds to type out";
    for _ in 0..3 {
        printer.println(line);
    }
    assert_eq!(t.console.queue().outstanding(), 3);

    let started = Instant::now();
    t.console.escape_and_wait().await;
    t.flush().await;

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(t.console.queue().completed(), 4);
    let lines = t.lines();
    assert_eq!(lines[0], ESCAPED_NOTICE);
    assert_eq!(lines[1..], [line, line, line]);
    assert!(t.collaborators.has_event("audio:stop"));
}

#[tokio::test]
async fn test_escape_notice_uses_priority_lane() {
    let t = start_console().await;
    let handles = t.console.escape();
    assert!(handles.is_empty());
    assert_eq!(t.console.queue().lane_len(Lane::Priority), 1);
    t.flush().await;
    assert_eq!(t.last_line(), ESCAPED_NOTICE);
}

#[tokio::test]
async fn test_bletchy_settles_on_target() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "bletchy hello world").await;
    t.console.shared().activities.wait_idle().await;
    t.flush().await;

    assert_eq!(t.last_line(), "hello world");
    assert!(!t.console.shared().activities.is_active(BLETCHY_ACTIVITY));
}

#[tokio::test]
async fn test_escape_cancels_activities() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "youtube").await;
    assert!(t.console.shared().activities.is_active(YOUTUBE_ACTIVITY));

    t.console.escape_and_wait().await;
    assert!(t.console.shared().activities.active_names().is_empty());
    t.flush().await;
    assert!(t.output().contains(ESCAPED_NOTICE));
}

#[tokio::test]
async fn test_youtube_activity_reports_found_video() {
    let t = start_console().await;
    t.collaborators
        .probe_succeeds_on
        .store(3, std::sync::atomic::Ordering::SeqCst);
    let mut handler = t.handler();

    t.run(&mut handler, "youtube").await;
    tokio::time::timeout(
        Duration::from_secs(5),
        t.console.shared().activities.wait_idle(),
    )
    .await
    .unwrap();
    t.flush().await;

    assert_eq!(t.collaborators.probes(), 3);
    assert!(t.last_line().starts_with("Found a video: https://www.youtube.com/watch?v="));
    assert!(t
        .collaborators
        .events()
        .iter()
        .any(|e| e.starts_with("url:https://www.youtube.com/watch?v=")));
}

#[tokio::test]
async fn test_stopscript_cancels_youtube() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "youtube").await;
    t.run(&mut handler, "stopscript").await;
    assert!(!t.console.shared().activities.is_active(YOUTUBE_ACTIVITY));
    assert!(t.output().contains("YouTube script stopped"));

    t.run(&mut handler, "stopscript").await;
    assert_eq!(t.last_line(), "No script is running");
}

#[tokio::test]
async fn test_close_stops_printing_loop() {
    let t = start_console().await;
    t.console.printer().println("last words");
    t.flush().await;
    t.console.close().await;

    assert!(t.console.is_closed());
    assert_eq!(t.last_line(), "last words");
}
