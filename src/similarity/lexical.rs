//! Lexical sentence embeddings
//!
//! Builds L2-normalised term-frequency vectors over a per-document
//! vocabulary, so the dot product of two sentences is their cosine
//! similarity in bag-of-words space.

use super::Embedder;
use crate::errors::Result;
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::Tokenizer;
use rustc_hash::FxHashMap;

/// Bag-of-words embedder with stopword removal
#[derive(Debug, Clone, Default)]
pub struct BagOfWordsEmbedder {
    tokenizer: Tokenizer,
    stopwords: StopwordFilter,
}

impl BagOfWordsEmbedder {
    /// Create an embedder using the stopword list for `language`
    pub fn new(language: &str) -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            stopwords: StopwordFilter::new(language),
        }
    }

    /// Replace the tokenizer
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Replace the stopword filter
    pub fn with_stopwords(mut self, stopwords: StopwordFilter) -> Self {
        self.stopwords = stopwords;
        self
    }

    fn content_terms(&self, sentence: &str) -> Vec<String> {
        self.tokenizer
            .terms(sentence)
            .into_iter()
            .filter(|term| !self.stopwords.is_stopword(term))
            .collect()
    }
}

impl Embedder for BagOfWordsEmbedder {
    fn encode(&self, sentences: &[String]) -> Result<Vec<Vec<f64>>> {
        let sentence_terms: Vec<Vec<String>> =
            sentences.iter().map(|s| self.content_terms(s)).collect();

        // Dimensions in order of first occurrence.
        let mut vocabulary: FxHashMap<&str, usize> = FxHashMap::default();
        for term in sentence_terms.iter().flatten() {
            let next = vocabulary.len();
            vocabulary.entry(term.as_str()).or_insert(next);
        }

        let embeddings = sentence_terms
            .iter()
            .map(|terms| {
                let mut vector = vec![0.0; vocabulary.len()];
                for term in terms {
                    vector[vocabulary[term.as_str()]] += 1.0;
                }
                let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for value in &mut vector {
                        *value /= norm;
                    }
                }
                vector
            })
            .collect();

        Ok(embeddings)
    }
}
