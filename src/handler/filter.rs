//! Chat filter
//!
//! Rejects input containing blocked words when the `filterchat`
//! preference is on. Words are compared whole, after stripping punctuation,
//! so innocent words that merely contain a blocked one pass.

use std::collections::HashSet;

/// Message printed when input is rejected
pub const REJECTION: &str = "Sorry, but that language is prohibited.";

#[derive(Debug, Clone, Default)]
pub struct ChatFilter {
    blocked: HashSet<String>,
}

impl ChatFilter {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            blocked: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Whether any word of `text` is blocked
    pub fn is_blocked(&self, text: &str) -> bool {
        text.split_whitespace().any(|word| {
            let cleaned: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            !cleaned.is_empty() && self.blocked.contains(&cleaned)
        })
    }
}
