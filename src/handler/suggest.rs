//! Unknown-command suggestions
//!
//! Jaro-Winkler similarity between the typed input and every known command
//! word. Scoring runs on a blocking task so a large catalog never stalls the
//! input pipeline.

use tracing::{debug, warn};

/// Prefix bonus scale for Jaro-Winkler
const PREFIX_SCALE: f64 = 0.1;
/// Longest prefix that earns the bonus
const MAX_PREFIX: usize = 4;

/// Best catalog match for an unknown command
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub command: String,
    pub similarity: f64,
}

/// Jaro similarity in `0.0..=1.0`
pub fn jaro(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a.len()];
    let mut b_matched = vec![false; b.len()];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b.len());
        for j in start..end {
            if !b_matched[j] && b[j] == *ca {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }
    if matches == 0 {
        return 0.0;
    }

    let a_seq = a.iter().zip(&a_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let b_seq = b.iter().zip(&b_matched).filter(|(_, m)| **m).map(|(c, _)| c);
    let transpositions = a_seq.zip(b_seq).filter(|(x, y)| x != y).count() / 2;

    let m = matches as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - transpositions as f64) / m) / 3.0
}

/// Jaro-Winkler similarity in `0.0..=1.0`
pub fn jaro_winkler(a: &str, b: &str) -> f64 {
    let jaro = jaro(a, b);
    let prefix = a
        .chars()
        .zip(b.chars())
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count();
    jaro + prefix as f64 * PREFIX_SCALE * (1.0 - jaro)
}

/// Best match for `input` in `catalog`, compared case-insensitively against
/// both the whole input and its first word
pub fn best_match(catalog: &[String], input: &str) -> Option<Suggestion> {
    let full = input.trim().to_lowercase();
    let verb = full.split_whitespace().next().unwrap_or("").to_string();

    catalog
        .iter()
        .map(|command| {
            let candidate = command.to_lowercase();
            let similarity = jaro_winkler(&full, &candidate).max(jaro_winkler(&verb, &candidate));
            Suggestion {
                command: command.clone(),
                similarity,
            }
        })
        .fold(None, |best: Option<Suggestion>, next| match best {
            Some(best) if best.similarity >= next.similarity => Some(best),
            _ => Some(next),
        })
}

/// Compute the best match off the async runtime and keep it only when it
/// beats `threshold`
pub async fn suggest(catalog: Vec<String>, input: String, threshold: f64) -> Option<Suggestion> {
    let result = tokio::task::spawn_blocking(move || best_match(&catalog, &input)).await;
    match result {
        Ok(Some(suggestion)) if suggestion.similarity > threshold => {
            debug!(
                "Suggesting '{}' ({:.3})",
                suggestion.command, suggestion.similarity
            );
            Some(suggestion)
        }
        Ok(_) => None,
        Err(e) => {
            warn!("Suggestion task failed: {}", e);
            None
        }
    }
}
