//! Stopword filtering
//!
//! Multi-language stopword lists from the `stop-words` crate, with support
//! for custom lists. The lexical embedder drops stopwords so that function
//! words do not dominate sentence similarity.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

/// A filter for removing stopwords from term lists
#[derive(Debug, Clone)]
pub struct StopwordFilter {
    /// Set of stopwords (lowercase)
    stopwords: FxHashSet<String>,
}

impl Default for StopwordFilter {
    fn default() -> Self {
        Self::new("en")
    }
}

impl StopwordFilter {
    /// Create a new stopword filter for the given language
    ///
    /// Unknown languages fall back to English.
    pub fn new(language: &str) -> Self {
        let lang = match language.to_lowercase().as_str() {
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "ru" | "russian" => LANGUAGE::Russian,
            "sv" | "swedish" => LANGUAGE::Swedish,
            _ => LANGUAGE::English,
        };

        Self {
            stopwords: get(lang).iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Create an empty stopword filter (no filtering)
    pub fn empty() -> Self {
        Self {
            stopwords: FxHashSet::default(),
        }
    }

    /// Create a stopword filter from a custom list
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// Add additional stopwords to the filter
    pub fn add_stopwords(&mut self, words: &[&str]) {
        self.stopwords
            .extend(words.iter().map(|w| w.to_lowercase()));
    }

    /// Check if a word is a stopword (case-insensitive)
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    /// Get the number of stopwords in the filter
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    /// Check if the filter is empty
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
