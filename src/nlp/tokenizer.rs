//! Unicode-aware term extraction
//!
//! Splits sentences into normalised terms using UAX #29 word boundaries.
//! Terms feed both the lexical embedder and the ROUGE scorer, so the two
//! agree on what counts as "the same word".

use unicode_segmentation::UnicodeSegmentation;

/// A Unicode-aware term tokenizer following UAX #29
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Minimum term length in characters
    min_token_length: usize,
    /// Whether to strip simple English inflections
    lemmatize: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Create a new tokenizer with default settings
    pub fn new() -> Self {
        Self {
            min_token_length: 1,
            lemmatize: true,
        }
    }

    /// Set minimum token length
    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_token_length = min_length;
        self
    }

    /// Enable or disable suffix stripping
    pub fn with_lemmatize(mut self, lemmatize: bool) -> Self {
        self.lemmatize = lemmatize;
        self
    }

    /// Lowercased terms of `text`, in order, punctuation dropped
    pub fn terms(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .filter(|word| word.chars().count() >= self.min_token_length)
            .filter(|word| word.chars().any(char::is_alphanumeric))
            .map(|word| {
                if self.lemmatize {
                    basic_lemmatize(word)
                } else {
                    word.to_lowercase()
                }
            })
            .collect()
    }
}

/// Basic English lemmatization
///
/// Handles plural and common verb suffixes only; good enough to merge
/// "networks"/"network" when comparing sentences.
fn basic_lemmatize(word: &str) -> String {
    let lower = word.to_lowercase();
    if !lower.is_ascii() {
        return lower;
    }

    if lower.ends_with("ies") && lower.len() > 4 {
        return format!("{}y", &lower[..lower.len() - 3]);
    }
    if lower.ends_with("es") && lower.len() > 3 {
        let stem = &lower[..lower.len() - 2];
        if stem.ends_with("ss")
            || stem.ends_with("sh")
            || stem.ends_with("ch")
            || stem.ends_with('x')
            || stem.ends_with('o')
        {
            return stem.to_string();
        }
    }
    if lower.ends_with('s') && lower.len() > 2 && !lower.ends_with("ss") {
        return lower[..lower.len() - 1].to_string();
    }
    if lower.ends_with("ing") && lower.len() > 5 {
        return undouble(&lower[..lower.len() - 3]);
    }
    if lower.ends_with("ied") && lower.len() > 4 {
        return format!("{}y", &lower[..lower.len() - 3]);
    }
    if lower.ends_with("ed") && lower.len() > 4 {
        return undouble(&lower[..lower.len() - 2]);
    }

    lower
}

/// running -> run, stopped -> stop
fn undouble(stem: &str) -> String {
    let bytes = stem.as_bytes();
    if bytes.len() >= 2 && bytes[bytes.len() - 1] == bytes[bytes.len() - 2] {
        stem[..stem.len() - 1].to_string()
    } else {
        stem.to_string()
    }
}
