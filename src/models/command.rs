//! Parsed Command Model
//!
//! A console input line split into a verb and arguments, with any trailing
//! `> file` redirection pulled out. Built once per input and passed by
//! reference through the classifier.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Token that introduces an output redirection target
pub const REDIRECT_TOKEN: &str = ">";

static REDIRECT_FILE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,254}$").expect("valid regex"));

/// Where an input line came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    /// Typed by the user at the console
    User,
    /// Issued by the program itself (tests, scripted replays)
    Program,
}

/// Immutable parse of one console input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Whitespace-normalized text, excluding any redirection suffix
    text: String,
    /// First token, lowercased
    verb: String,
    /// Remaining tokens as typed
    args: Vec<String>,
    /// File name output should be diverted to
    redirect: Option<String>,
    /// Who issued the input
    source: InputSource,
}

impl ParsedCommand {
    /// Parse a raw input line. Blank input yields `None`.
    pub fn parse(line: &str, source: InputSource) -> Option<Self> {
        let mut tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return None;
        }

        // `verb ... > file`: the `>` must be an argument, never the verb itself
        let mut redirect = None;
        if tokens.len() >= 3 && tokens[tokens.len() - 2] == REDIRECT_TOKEN {
            let candidate = &tokens[tokens.len() - 1];
            if validate_redirect_target(candidate).is_ok() {
                redirect = tokens.pop();
                tokens.pop();
            }
        }

        let verb_typed = tokens.remove(0);
        let text = std::iter::once(verb_typed.as_str())
            .chain(tokens.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        Some(Self {
            text,
            verb: verb_typed.to_lowercase(),
            args: tokens,
            redirect,
            source,
        })
    }

    /// Normalized input text without the redirection suffix
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Normalized input text, lowercased
    pub fn lowercase_text(&self) -> String {
        self.text.to_lowercase()
    }

    /// Lowercased first token
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Whether the verb equals `verb`, ignoring case
    pub fn is_verb(&self, verb: &str) -> bool {
        self.verb.eq_ignore_ascii_case(verb)
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// All arguments joined by single spaces
    pub fn rest(&self) -> String {
        self.args.join(" ")
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn source(&self) -> InputSource {
        self.source
    }
}

/// Check that a redirection file name is a plain, portable file name
pub fn validate_redirect_target(name: &str) -> Result<()> {
    if name == "." || name == ".." {
        return Err(Error::InvalidRedirectTarget {
            name: name.to_string(),
            reason: "not a file name".to_string(),
        });
    }
    if !REDIRECT_FILE_NAME.is_match(name) {
        return Err(Error::InvalidRedirectTarget {
            name: name.to_string(),
            reason: "only letters, digits, '.', '_' and '-' are allowed".to_string(),
        });
    }
    Ok(())
}
