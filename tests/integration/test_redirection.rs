//! Integration Tests for Output Redirection
//!
//! `command > file` diverts everything the command prints into a file in
//! the redirect directory for the duration of that command.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::fs;

use cyder::handler::HandleOutcome;
use cyder::models::InputSource;
use test_utils::start_console;

#[tokio::test]
async fn test_echo_is_written_to_file() {
    let t = start_console().await;
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "echo hi > out.txt").await;
    assert!(matches!(outcome, HandleOutcome::Handled { matcher: "echo", .. }));

    let file = t.config.paths.redirect_dir.join("out.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "hi\n");
    assert!(t.output().is_empty());
}

#[tokio::test]
async fn test_redirection_ends_with_the_command() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "echo first > log.txt").await;
    t.run(&mut handler, "echo second").await;

    let file = t.config.paths.redirect_dir.join("log.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "first\n");
    assert_eq!(t.lines(), vec!["second"]);
    assert!(!t.console.shared().redirector.is_active());
}

#[tokio::test]
async fn test_back_to_back_commands_keep_redirected_output() {
    let t = start_console().await;
    let mut handler = t.handler();

    // No flush between the two commands, as in the terminal input loop
    handler.handle("echo first > log.txt", InputSource::User).await;
    handler.handle("echo second", InputSource::User).await;
    t.flush().await;

    let file = t.config.paths.redirect_dir.join("log.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "first\n");
    assert_eq!(t.lines(), vec!["second"]);
}

#[tokio::test]
async fn test_pending_screen_output_stays_off_the_file() {
    let t = start_console().await;
    let mut handler = t.handler();

    handler.handle("echo screen", InputSource::User).await;
    handler.handle("echo file > out.txt", InputSource::User).await;
    t.flush().await;

    let file = t.config.paths.redirect_dir.join("out.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "file\n");
    assert_eq!(t.lines(), vec!["screen"]);
}

#[tokio::test]
async fn test_redirect_truncates_existing_file() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "echo one two three > out.txt").await;
    t.run(&mut handler, "echo four > out.txt").await;

    let file = t.config.paths.redirect_dir.join("out.txt");
    assert_eq!(fs::read_to_string(file).unwrap(), "four\n");
}

#[tokio::test]
async fn test_multi_line_output_is_redirected() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "counttest > counts.txt").await;

    let file = t.config.paths.redirect_dir.join("counts.txt");
    let content = fs::read_to_string(file).unwrap();
    assert_eq!(content.lines().count(), 10);
    assert!(content.ends_with("10\n"));
}

#[tokio::test]
async fn test_unsafe_file_name_is_not_redirection() {
    let t = start_console().await;
    let mut handler = t.handler();

    t.run(&mut handler, "echo hi > ../escape.txt").await;

    assert_eq!(t.last_line(), "hi > ../escape.txt");
    assert!(!t.dir.path().join("escape.txt").exists());
}

#[tokio::test]
async fn test_bare_redirect_token_is_not_redirection() {
    let t = start_console().await;
    let mut handler = t.handler();

    let outcome = t.run(&mut handler, "> out.txt").await;
    assert!(matches!(outcome, HandleOutcome::Unknown { .. }));
    assert!(!t.config.paths.redirect_dir.join("out.txt").exists());
}
