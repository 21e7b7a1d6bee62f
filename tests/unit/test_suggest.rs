//! Unit tests for unknown-command suggestions

use cyder::handler::suggest::{best_match, jaro_winkler, suggest};

fn catalog(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod similarity_tests {
    use super::*;

    #[test]
    fn test_similarity_is_symmetric_for_equal_length() {
        let ab = jaro_winkler("weather", "waether");
        let ba = jaro_winkler("waether", "weather");
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn test_unrelated_words_score_low() {
        assert!(jaro_winkler("youtube", "qqq") < 0.5);
    }
}

#[cfg(test)]
mod best_match_tests {
    use super::*;

    #[test]
    fn test_case_is_ignored() {
        let words = catalog(&["Help"]);
        let best = best_match(&words, "HELP").unwrap();
        assert_eq!(best.similarity, 1.0);
        assert_eq!(best.command, "Help");
    }

    #[test]
    fn test_ties_keep_the_first_entry() {
        let words = catalog(&["abc", "abc"]);
        let best = best_match(&words, "abd").unwrap();
        assert_eq!(best.command, "abc");
    }

    #[tokio::test]
    async fn test_threshold_is_exclusive() {
        let words = catalog(&["help"]);
        assert!(suggest(words.clone(), "help".into(), 1.0).await.is_none());
        assert!(suggest(words, "help".into(), 0.99).await.is_some());
    }
}
