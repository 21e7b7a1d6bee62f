//! Unit tests for command parsing
//!
//! Verb and argument splitting, redirection detection and the triggers the
//! classifier builds on top of a parsed command.

use cyder::handler::classifier::Trigger;
use cyder::models::command::validate_redirect_target;
use cyder::models::{InputSource, ParsedCommand};

fn parse(line: &str) -> ParsedCommand {
    ParsedCommand::parse(line, InputSource::User).expect("non-blank input")
}

#[cfg(test)]
mod command_parsing_tests {
    use super::*;

    #[test]
    fn test_single_word() {
        let cmd = parse("help");
        assert_eq!(cmd.verb(), "help");
        assert!(cmd.args().is_empty());
        assert_eq!(cmd.rest(), "");
        assert_eq!(cmd.source(), InputSource::User);
    }

    #[test]
    fn test_internal_whitespace_is_collapsed() {
        let cmd = parse("echo   hello \t  world");
        assert_eq!(cmd.text(), "echo hello world");
        assert_eq!(cmd.rest(), "hello world");
        assert_eq!(cmd.arg(1), Some("world"));
        assert_eq!(cmd.arg(2), None);
    }

    #[test]
    fn test_args_keep_their_case() {
        let cmd = parse("FrameTitle My Console");
        assert_eq!(cmd.verb(), "frametitle");
        assert_eq!(cmd.rest(), "My Console");
        assert_eq!(cmd.lowercase_text(), "frametitle my console");
    }

    #[test]
    fn test_program_source_is_kept() {
        let cmd = ParsedCommand::parse("counttest", InputSource::Program).unwrap();
        assert_eq!(cmd.source(), InputSource::Program);
    }

    #[test]
    fn test_redirect_with_several_args() {
        let cmd = parse("echo a b c > notes.md");
        assert_eq!(cmd.args(), ["a", "b", "c"]);
        assert_eq!(cmd.redirect(), Some("notes.md"));
    }

    #[test]
    fn test_trailing_redirect_token_without_file() {
        let cmd = parse("echo hi >");
        assert!(cmd.redirect().is_none());
        assert_eq!(cmd.args(), ["hi", ">"]);
    }

    #[test]
    fn test_redirect_name_rules() {
        assert!(validate_redirect_target("a").is_ok());
        assert!(validate_redirect_target("report-2024_final.txt").is_ok());
        assert!(validate_redirect_target("-rf").is_err());
        assert!(validate_redirect_target("has space").is_err());
        assert!(validate_redirect_target(&"x".repeat(256)).is_err());
    }
}

#[cfg(test)]
mod trigger_tests {
    use super::*;

    #[test]
    fn test_exact_trigger_ignores_case_and_padding() {
        let trigger = Trigger::Exact(&["flip a coin"]);
        assert!(trigger.matches(&parse("  Flip  A coin ")));
        assert!(!trigger.matches(&parse("flip a coin please")));
    }

    #[test]
    fn test_verb_trigger_ignores_args() {
        let trigger = Trigger::Verb(&["echo"]);
        assert!(trigger.matches(&parse("ECHO anything at all")));
        assert!(!trigger.matches(&parse("echoes")));
    }

    #[test]
    fn test_predicate_and_always() {
        let trigger = Trigger::Predicate(|cmd| cmd.arg_count() == 2);
        assert!(trigger.matches(&parse("pow 2 8")));
        assert!(!trigger.matches(&parse("pow 2")));
        assert!(Trigger::Always.matches(&parse("whatever")));
        assert!(Trigger::Always.keywords().is_empty());
        assert_eq!(Trigger::Verb(&["a", "b"]).keywords(), ["a", "b"]);
    }
}
